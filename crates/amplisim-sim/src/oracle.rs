//! Phase oracle marking the solutions of a search problem.

use std::collections::BTreeSet;

use tracing::debug;

use crate::error::{SimError, SimResult};
use crate::operator::Operator;
use crate::statevector::{bitstring, parse_bitstring};

/// A phase oracle: `O|x⟩ = -|x⟩` for marked `x`, `|x⟩` otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Oracle {
    num_qubits: usize,
    marked: BTreeSet<usize>,
}

impl Oracle {
    /// Oracle over `num_qubits` qubits marking the given basis indices.
    ///
    /// Duplicates collapse. The marked set may be empty, but the planner
    /// will refuse to plan a search for it.
    pub fn new(num_qubits: usize, marked: impl IntoIterator<Item = usize>) -> SimResult<Self> {
        if num_qubits == 0 {
            return Err(SimError::EmptyRegister);
        }
        if num_qubits >= usize::BITS as usize {
            return Err(SimError::TooManyQubits {
                requested: num_qubits,
                max: usize::BITS as usize - 1,
            });
        }
        let search_space = 1usize << num_qubits;
        let marked = marked
            .into_iter()
            .map(|state| {
                if state < search_space {
                    Ok(state)
                } else {
                    Err(SimError::MarkedStateOutOfRange {
                        state,
                        search_space,
                    })
                }
            })
            .collect::<SimResult<BTreeSet<_>>>()?;
        debug!(num_qubits, solutions = marked.len(), "built oracle");
        Ok(Self { num_qubits, marked })
    }

    /// Oracle marking MSB-first bitstrings of width `num_qubits`.
    pub fn from_bitstrings<S: AsRef<str>>(num_qubits: usize, marked: &[S]) -> SimResult<Self> {
        let indices = marked
            .iter()
            .map(|bits| parse_bitstring(bits.as_ref(), num_qubits))
            .collect::<SimResult<Vec<_>>>()?;
        Self::new(num_qubits, indices)
    }

    /// The sign-flip operator. Applying it touches only the marked
    /// amplitudes.
    pub fn operator(&self) -> SimResult<Operator> {
        Operator::phase_flip(self.num_qubits, self.marked.iter().copied())
    }

    /// Register width n.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Marked basis indices in ascending order.
    pub fn marked(&self) -> &BTreeSet<usize> {
        &self.marked
    }

    /// Marked states rendered as bitstrings.
    pub fn marked_bitstrings(&self) -> Vec<String> {
        self.marked
            .iter()
            .map(|&i| bitstring(i, self.num_qubits))
            .collect()
    }

    /// M.
    pub fn num_solutions(&self) -> usize {
        self.marked.len()
    }

    /// N = 2^n.
    pub fn search_space(&self) -> usize {
        1 << self.num_qubits
    }

    pub fn is_marked(&self, state: usize) -> bool {
        self.marked.contains(&state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex64;

    #[test]
    fn test_oracle_matrix_two_qubits() {
        let oracle = Oracle::from_bitstrings(2, &["11"]).unwrap();
        let m = oracle.operator().unwrap().to_matrix();
        for i in 0..4 {
            for j in 0..4 {
                let expected = match (i == j, i == 3) {
                    (false, _) => 0.0,
                    (true, true) => -1.0,
                    (true, false) => 1.0,
                };
                assert!((m[[i, j]] - Complex64::new(expected, 0.0)).norm() < 1e-12);
            }
        }
    }

    #[test]
    fn test_bitstrings_are_msb_first() {
        let oracle = Oracle::from_bitstrings(3, &["001", "100"]).unwrap();
        assert!(oracle.is_marked(1));
        assert!(oracle.is_marked(4));
        assert_eq!(oracle.num_solutions(), 2);
        assert_eq!(oracle.marked_bitstrings(), vec!["001", "100"]);
    }

    #[test]
    fn test_duplicates_collapse() {
        let oracle = Oracle::new(2, [3, 3, 1]).unwrap();
        assert_eq!(oracle.num_solutions(), 2);
        assert_eq!(oracle.search_space(), 4);
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert!(matches!(
            Oracle::new(2, [4]),
            Err(SimError::MarkedStateOutOfRange {
                state: 4,
                search_space: 4
            })
        ));
        assert!(matches!(
            Oracle::from_bitstrings(2, &["101"]),
            Err(SimError::InvalidBitstring { .. })
        ));
        assert!(matches!(
            Oracle::from_bitstrings(2, &["1a"]),
            Err(SimError::InvalidBitstring { .. })
        ));
    }

    #[test]
    fn test_empty_marked_set_is_allowed() {
        let oracle = Oracle::new(2, []).unwrap();
        assert_eq!(oracle.num_solutions(), 0);
        assert!(oracle.operator().unwrap().unitarity_deviation() < 1e-12);
    }
}
