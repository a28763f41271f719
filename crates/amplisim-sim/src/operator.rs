//! Unitary operators on the full register space.
//!
//! An [`Operator`] always behaves as an N×N unitary, but is stored in the
//! cheapest form that reproduces its action: a small gate plus its
//! placement, a list of sign flips, a scalar phase, an explicit matrix, or
//! an ordered composition of these.

use std::sync::Arc;

use ndarray::{Array1, Array2};
use num_complex::Complex64;
use rayon::prelude::*;

use crate::error::{SimError, SimResult};
use crate::gates::{GateMatrix, unitarity_deviation};

#[derive(Debug, Clone)]
enum Repr {
    /// k-qubit gate on `targets`, identity elsewhere.
    Placed {
        gate: GateMatrix,
        targets: Vec<usize>,
        target_mask: usize,
    },
    /// Negate the listed basis states.
    PhaseFlip { states: Arc<[usize]> },
    /// Negate every basis state containing all bits of `mask`.
    MaskedPhaseFlip { mask: usize },
    /// Multiply every amplitude by a unit scalar.
    GlobalPhase { phase: Complex64 },
    /// Explicit N×N matrix.
    Dense { matrix: Array2<Complex64> },
    /// Apply each stage in order.
    Sequence { stages: Vec<Operator> },
}

/// An immutable unitary acting on an n-qubit register.
#[derive(Debug, Clone)]
pub struct Operator {
    num_qubits: usize,
    repr: Repr,
}

/// 2^n, or `TooManyQubits` when it does not fit in a `usize`.
fn register_dimension(num_qubits: usize) -> SimResult<usize> {
    u32::try_from(num_qubits)
        .ok()
        .and_then(|n| 1usize.checked_shl(n))
        .ok_or(SimError::TooManyQubits {
            requested: num_qubits,
            max: usize::BITS as usize - 1,
        })
}

impl Operator {
    /// Gate placement; callers validate targets (see [`crate::gates::place`]).
    pub(crate) fn placed(gate: GateMatrix, targets: Vec<usize>, num_qubits: usize) -> Self {
        let target_mask = targets.iter().fold(0usize, |m, &q| m | (1 << q));
        Self {
            num_qubits,
            repr: Repr::Placed {
                gate,
                targets,
                target_mask,
            },
        }
    }

    /// Sign flip on each state of `states`; every state must be below 2^n.
    pub fn phase_flip(num_qubits: usize, states: impl IntoIterator<Item = usize>) -> SimResult<Self> {
        let dimension = register_dimension(num_qubits)?;
        let mut states: Vec<usize> = states.into_iter().collect();
        states.sort_unstable();
        states.dedup();
        if let Some(&state) = states.iter().find(|&&s| s >= dimension) {
            return Err(SimError::MarkedStateOutOfRange {
                state,
                search_space: dimension,
            });
        }
        Ok(Self {
            num_qubits,
            repr: Repr::PhaseFlip {
                states: states.into(),
            },
        })
    }

    pub(crate) fn masked_phase_flip(num_qubits: usize, mask: usize) -> Self {
        Self {
            num_qubits,
            repr: Repr::MaskedPhaseFlip { mask },
        }
    }

    /// Scalar phase `e^{iφ}` on the whole register.
    pub fn global_phase(num_qubits: usize, phi: f64) -> Self {
        Self {
            num_qubits,
            repr: Repr::GlobalPhase {
                phase: Complex64::from_polar(1.0, phi),
            },
        }
    }

    /// The identity on `num_qubits` qubits.
    pub fn identity(num_qubits: usize) -> Self {
        Self::global_phase(num_qubits, 0.0)
    }

    /// An explicit matrix, checked for shape and unitarity.
    pub fn dense(matrix: Array2<Complex64>, tolerance: f64) -> SimResult<Self> {
        let (rows, cols) = matrix.dim();
        if rows != cols {
            return Err(SimError::DimensionMismatch {
                expected: rows,
                got: cols,
            });
        }
        if rows < 2 || !rows.is_power_of_two() {
            return Err(SimError::DimensionMismatch {
                expected: rows.next_power_of_two().max(2),
                got: rows,
            });
        }
        let deviation = unitarity_deviation(&matrix);
        if deviation > tolerance {
            return Err(SimError::NonUnitaryOperator {
                deviation,
                tolerance,
            });
        }
        Ok(Self {
            num_qubits: rows.trailing_zeros() as usize,
            repr: Repr::Dense { matrix },
        })
    }

    /// Compose `stages`; the first stage is applied first.
    pub fn sequence(num_qubits: usize, stages: Vec<Operator>) -> SimResult<Self> {
        let expected = register_dimension(num_qubits)?;
        if let Some(bad) = stages.iter().find(|op| op.num_qubits != num_qubits) {
            return Err(SimError::DimensionMismatch {
                expected,
                got: bad.dimension(),
            });
        }
        Ok(Self {
            num_qubits,
            repr: Repr::Sequence { stages },
        })
    }

    /// `self` followed by `next`.
    pub fn then(self, next: Operator) -> SimResult<Self> {
        let n = self.num_qubits;
        Self::sequence(n, vec![self, next])
    }

    /// Number of qubits the operator acts on.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Side length N = 2^n.
    pub fn dimension(&self) -> usize {
        1 << self.num_qubits
    }

    /// The inverse operator.
    pub fn dagger(&self) -> Self {
        let repr = match &self.repr {
            Repr::Placed {
                gate,
                targets,
                target_mask,
            } => Repr::Placed {
                gate: gate.dagger(),
                targets: targets.clone(),
                target_mask: *target_mask,
            },
            Repr::PhaseFlip { .. } | Repr::MaskedPhaseFlip { .. } => self.repr.clone(),
            Repr::GlobalPhase { phase } => Repr::GlobalPhase {
                phase: phase.conj(),
            },
            Repr::Dense { matrix } => Repr::Dense {
                matrix: matrix.t().mapv(|z| z.conj()),
            },
            Repr::Sequence { stages } => Repr::Sequence {
                stages: stages.iter().rev().map(Operator::dagger).collect(),
            },
        };
        Self {
            num_qubits: self.num_qubits,
            repr,
        }
    }

    /// Materialize the N×N matrix. Costs N applications; meant for small n.
    pub fn to_matrix(&self) -> Array2<Complex64> {
        let dim = self.dimension();
        let mut matrix = Array2::zeros((dim, dim));
        for col in 0..dim {
            let mut basis = vec![Complex64::new(0.0, 0.0); dim];
            basis[col] = Complex64::new(1.0, 0.0);
            self.apply_to(&mut basis, usize::MAX);
            for (row, value) in basis.into_iter().enumerate() {
                matrix[[row, col]] = value;
            }
        }
        matrix
    }

    /// Largest entry of `U†U - I` for the materialized matrix.
    pub fn unitarity_deviation(&self) -> f64 {
        unitarity_deviation(&self.to_matrix())
    }

    /// Replace `amps` with operator × `amps`.
    ///
    /// Vectors with at least `parallel_threshold` amplitudes are processed on
    /// the rayon pool. The caller guarantees `amps.len() == self.dimension()`.
    pub(crate) fn apply_to(&self, amps: &mut Vec<Complex64>, parallel_threshold: usize) {
        debug_assert_eq!(amps.len(), self.dimension());
        let parallel = amps.len() >= parallel_threshold;
        match &self.repr {
            Repr::Placed {
                gate,
                targets,
                target_mask,
            } => {
                *amps = apply_placed(gate, targets, *target_mask, amps, parallel);
            }
            Repr::PhaseFlip { states } => {
                for &s in states.iter() {
                    amps[s] = -amps[s];
                }
            }
            Repr::MaskedPhaseFlip { mask } => {
                let mask = *mask;
                let flip = |(i, a): (usize, &mut Complex64)| {
                    if i & mask == mask {
                        *a = -*a;
                    }
                };
                if parallel {
                    amps.par_iter_mut().enumerate().for_each(flip);
                } else {
                    amps.iter_mut().enumerate().for_each(flip);
                }
            }
            Repr::GlobalPhase { phase } => {
                let phase = *phase;
                if parallel {
                    amps.par_iter_mut().for_each(|a| *a *= phase);
                } else {
                    amps.iter_mut().for_each(|a| *a *= phase);
                }
            }
            Repr::Dense { matrix } => {
                let vector = Array1::from(std::mem::take(amps));
                *amps = matrix.dot(&vector).to_vec();
            }
            Repr::Sequence { stages } => {
                for stage in stages {
                    stage.apply_to(amps, parallel_threshold);
                }
            }
        }
    }
}

/// Each output amplitude only reads the previous vector, so rows can be
/// computed independently.
fn apply_placed(
    gate: &GateMatrix,
    targets: &[usize],
    target_mask: usize,
    amps: &[Complex64],
    parallel: bool,
) -> Vec<Complex64> {
    let matrix = gate.matrix();
    let local_dim = gate.dimension();

    let local_index = |global: usize| {
        targets
            .iter()
            .enumerate()
            .fold(0usize, |acc, (j, &q)| acc | (((global >> q) & 1) << j))
    };
    let global_index = |base: usize, local: usize| {
        targets
            .iter()
            .enumerate()
            .fold(base, |acc, (j, &q)| acc | (((local >> j) & 1) << q))
    };
    let row = |i: usize| -> Complex64 {
        let base = i & !target_mask;
        let r = local_index(i);
        (0..local_dim)
            .map(|c| {
                let m = matrix[[r, c]];
                if m == Complex64::new(0.0, 0.0) {
                    m
                } else {
                    m * amps[global_index(base, c)]
                }
            })
            .sum()
    };

    if parallel {
        (0..amps.len()).into_par_iter().map(row).collect()
    } else {
        (0..amps.len()).map(row).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gates::{self, place};

    fn approx_eq(a: &Array2<Complex64>, b: &Array2<Complex64>) -> bool {
        a.iter().zip(b.iter()).all(|(x, y)| (x - y).norm() < 1e-10)
    }

    fn kron(a: &Array2<Complex64>, b: &Array2<Complex64>) -> Array2<Complex64> {
        let (ar, ac) = a.dim();
        let (br, bc) = b.dim();
        Array2::from_shape_fn((ar * br, ac * bc), |(r, c)| {
            a[[r / br, c / bc]] * b[[r % br, c % bc]]
        })
    }

    #[test]
    fn test_placement_matches_kronecker_product() {
        // Qubit 0 is the least-significant bit, so X on qubit 0 of two
        // qubits is I ⊗ X and on qubit 1 it is X ⊗ I.
        let x = gates::pauli_x();
        let id = gates::identity();
        let on_q0 = place(&x, &[0], 2).unwrap().to_matrix();
        let on_q1 = place(&x, &[1], 2).unwrap().to_matrix();
        assert!(approx_eq(&on_q0, &kron(id.matrix(), x.matrix())));
        assert!(approx_eq(&on_q1, &kron(x.matrix(), id.matrix())));
    }

    #[test]
    fn test_reversed_cx_targets() {
        // cx(control=1, target=0) on two qubits maps |10⟩ (2) ↔ |11⟩ (3).
        let m = place(&gates::cx(), &[1, 0], 2).unwrap().to_matrix();
        let one = Complex64::new(1.0, 0.0);
        assert_eq!(m[[3, 2]], one);
        assert_eq!(m[[2, 3]], one);
        assert_eq!(m[[0, 0]], one);
        assert_eq!(m[[1, 1]], one);
    }

    #[test]
    fn test_parallel_and_serial_agree() {
        let op = place(&gates::ry(0.77), &[2], 4).unwrap();
        let init: Vec<Complex64> = (0..16)
            .map(|i| Complex64::new(f64::from(i as u32), -0.5 * f64::from(i as u32)))
            .collect();
        let mut serial = init.clone();
        let mut parallel = init;
        op.apply_to(&mut serial, usize::MAX);
        op.apply_to(&mut parallel, 1);
        assert_eq!(serial, parallel);
    }

    #[test]
    fn test_masked_flip_matches_phase_flip() {
        let masked = gates::mcz_operator(&[0, 2], 3).unwrap().to_matrix();
        let listed = Operator::phase_flip(3, [0b101, 0b111]).unwrap().to_matrix();
        assert!(approx_eq(&masked, &listed));
    }

    #[test]
    fn test_phase_flip_out_of_range() {
        assert!(matches!(
            Operator::phase_flip(2, [4]),
            Err(SimError::MarkedStateOutOfRange {
                state: 4,
                search_space: 4
            })
        ));
    }

    #[test]
    fn test_sequence_width_checked() {
        let a = place(&gates::hadamard(), &[0], 2).unwrap();
        let b = place(&gates::hadamard(), &[0], 3).unwrap();
        assert!(matches!(
            a.then(b),
            Err(SimError::DimensionMismatch {
                expected: 4,
                got: 8
            })
        ));
    }

    #[test]
    fn test_dense_checks_unitarity() {
        let m = Array2::from_shape_fn((4, 4), |(r, c)| {
            Complex64::new(if r == c { 2.0 } else { 0.0 }, 0.0)
        });
        assert!(matches!(
            Operator::dense(m, 1e-9),
            Err(SimError::NonUnitaryOperator { .. })
        ));
    }

    #[test]
    fn test_dense_rejects_non_finite_entries() {
        let m = Array2::from_elem((2, 2), Complex64::new(f64::NAN, 0.0));
        assert!(matches!(
            Operator::dense(m, 1e-9),
            Err(SimError::NonUnitaryOperator { deviation, .. }) if deviation.is_infinite()
        ));
    }

    #[test]
    fn test_phase_flip_rejects_oversized_register() {
        let n = usize::BITS as usize;
        assert!(matches!(
            Operator::phase_flip(n, [0]),
            Err(SimError::TooManyQubits { requested, .. }) if requested == n
        ));
        assert!(matches!(
            Operator::sequence(n, vec![]),
            Err(SimError::TooManyQubits { .. })
        ));
    }

    #[test]
    fn test_dagger_of_sequence_inverts() {
        let op = Operator::sequence(
            2,
            vec![
                place(&gates::hadamard(), &[0], 2).unwrap(),
                place(&gates::cx(), &[0, 1], 2).unwrap(),
                place(&gates::rz(0.3), &[1], 2).unwrap(),
            ],
        )
        .unwrap();
        let round = op.clone().then(op.dagger()).unwrap().to_matrix();
        assert!(approx_eq(&round, &Operator::identity(2).to_matrix()));
    }
}
