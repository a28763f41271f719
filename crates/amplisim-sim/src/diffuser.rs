//! Grover diffusion operator, the reflection about the uniform superposition.

use std::f64::consts::PI;

use crate::error::{SimError, SimResult};
use crate::gates::{hadamard, layer, mcz_operator, pauli_x};
use crate::operator::Operator;

/// `D = 2|s⟩⟨s| - I` where `|s⟩` is the uniform superposition over n qubits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Diffuser {
    num_qubits: usize,
}

impl Diffuser {
    pub fn new(num_qubits: usize) -> SimResult<Self> {
        if num_qubits == 0 {
            return Err(SimError::EmptyRegister);
        }
        Ok(Self { num_qubits })
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Gate-level diffuser: `H⊗n · X⊗n · MCZ · X⊗n · H⊗n`, then a global
    /// phase of -1.
    ///
    /// The five gate layers alone give `I - 2|s⟩⟨s|`; the trailing phase
    /// turns that into `2|s⟩⟨s| - I`, so oracle-then-diffuser rotates the
    /// marked amplitude towards +1 rather than -1.
    pub fn operator(&self) -> SimResult<Operator> {
        let n = self.num_qubits;
        let all: Vec<usize> = (0..n).collect();
        Operator::sequence(
            n,
            vec![
                layer(&hadamard(), n)?,
                layer(&pauli_x(), n)?,
                mcz_operator(&all, n)?,
                layer(&pauli_x(), n)?,
                layer(&hadamard(), n)?,
                Operator::global_phase(n, PI),
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex64;

    #[test]
    fn test_diffuser_is_reflection_about_uniform_state() {
        for n in 1..=4 {
            let m = Diffuser::new(n).unwrap().operator().unwrap().to_matrix();
            let dim = 1usize << n;
            let two_over_n = 2.0 / dim as f64;
            for i in 0..dim {
                for j in 0..dim {
                    let expected = if i == j { two_over_n - 1.0 } else { two_over_n };
                    assert!(
                        (m[[i, j]] - Complex64::new(expected, 0.0)).norm() < 1e-10,
                        "n={n} [{i},{j}] = {}",
                        m[[i, j]]
                    );
                }
            }
        }
    }

    #[test]
    fn test_diffuser_is_unitary() {
        let op = Diffuser::new(3).unwrap().operator().unwrap();
        assert!(op.unitarity_deviation() < 1e-10);
    }

    #[test]
    fn test_empty_register() {
        assert!(matches!(Diffuser::new(0), Err(SimError::EmptyRegister)));
    }
}
