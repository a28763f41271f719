//! Statevector simulation engine.

use num_complex::Complex64;
use tracing::{trace, warn};

use amplisim_ir::Circuit;

use crate::config::SimConfig;
use crate::error::{SimError, SimResult};
use crate::gates;
use crate::operator::Operator;
use crate::rotation::Axis;

/// A statevector representing a quantum state.
///
/// Amplitude `i` belongs to the basis state whose bit `k` is the value of
/// qubit `k`. Total probability is 1 (within `norm_epsilon`) after
/// construction and after every successful [`apply`](Self::apply).
#[derive(Debug, Clone)]
pub struct StateVector {
    /// The state amplitudes (2^n complex numbers).
    amplitudes: Vec<Complex64>,
    /// Number of qubits.
    num_qubits: usize,
    config: SimConfig,
}

impl StateVector {
    /// Create a new statevector initialized to |0...0⟩.
    pub fn new(num_qubits: usize) -> SimResult<Self> {
        Self::with_config(num_qubits, &SimConfig::default())
    }

    /// Create |0...0⟩ using custom tolerances and limits.
    pub fn with_config(num_qubits: usize, config: &SimConfig) -> SimResult<Self> {
        if num_qubits == 0 {
            return Err(SimError::EmptyRegister);
        }
        if num_qubits > config.max_qubits {
            return Err(SimError::TooManyQubits {
                requested: num_qubits,
                max: config.max_qubits,
            });
        }
        let size = 1 << num_qubits;
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); size];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Ok(Self {
            amplitudes,
            num_qubits,
            config: config.clone(),
        })
    }

    /// Wrap existing amplitudes; they must already be normalized.
    pub fn from_amplitudes(amplitudes: Vec<Complex64>) -> SimResult<Self> {
        let len = amplitudes.len();
        if len < 2 || !len.is_power_of_two() {
            return Err(SimError::DimensionMismatch {
                expected: len.next_power_of_two().max(2),
                got: len,
            });
        }
        let config = SimConfig::default();
        let num_qubits = len.trailing_zeros() as usize;
        if num_qubits > config.max_qubits {
            return Err(SimError::TooManyQubits {
                requested: num_qubits,
                max: config.max_qubits,
            });
        }
        let mut state = Self {
            amplitudes,
            num_qubits,
            config,
        };
        state.enforce_normalization()?;
        Ok(state)
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Number of amplitudes, 2^n.
    pub fn dimension(&self) -> usize {
        self.amplitudes.len()
    }

    /// The raw amplitudes.
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// The configuration this state checks itself against.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Replace the amplitudes with `operator × amplitudes`.
    pub fn apply(&mut self, operator: &Operator) -> SimResult<()> {
        if operator.dimension() != self.dimension() {
            return Err(SimError::DimensionMismatch {
                expected: self.dimension(),
                got: operator.dimension(),
            });
        }
        operator.apply_to(&mut self.amplitudes, self.config.parallel_threshold);
        self.enforce_normalization()
    }

    /// Apply every instruction of `circuit` in order.
    pub fn apply_circuit(&mut self, circuit: &Circuit) -> SimResult<()> {
        if circuit.num_qubits() != self.num_qubits {
            return Err(SimError::DimensionMismatch {
                expected: self.dimension(),
                got: u32::try_from(circuit.num_qubits())
                    .ok()
                    .and_then(|n| 1usize.checked_shl(n))
                    .unwrap_or(usize::MAX),
            });
        }
        for inst in circuit.instructions() {
            let op = gates::operator_for(inst, self.num_qubits, self.config.unitarity_tolerance)?;
            self.apply(&op)?;
        }
        Ok(())
    }

    /// Probability of measuring basis state `index`.
    pub fn probability(&self, index: usize) -> SimResult<f64> {
        self.amplitudes
            .get(index)
            .map(|a| a.norm_sqr())
            .ok_or(SimError::BasisStateOutOfRange {
                index,
                dimension: self.dimension(),
            })
    }

    /// Born-rule distribution over all basis states.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(|a| a.norm_sqr()).collect()
    }

    /// Sum of all probabilities.
    pub fn total_probability(&self) -> f64 {
        self.amplitudes.iter().map(|a| a.norm_sqr()).sum()
    }

    /// Combined probability of a set of basis states.
    pub fn probability_of(&self, states: &[usize]) -> SimResult<f64> {
        states.iter().map(|&s| self.probability(s)).sum()
    }

    /// ⟨ψ|σ|ψ⟩ for the Pauli operator along `axis` on `qubit`.
    pub fn expectation(&self, axis: Axis, qubit: usize) -> SimResult<f64> {
        if qubit >= self.num_qubits {
            return Err(SimError::InvalidQubitIndex {
                qubit,
                num_qubits: self.num_qubits,
            });
        }
        let mask = 1 << qubit;
        let pairs = (0..self.dimension())
            .filter(|i| i & mask == 0)
            .map(|i| (self.amplitudes[i], self.amplitudes[i | mask]));
        let value: f64 = match axis {
            Axis::Z => pairs.map(|(a0, a1)| a0.norm_sqr() - a1.norm_sqr()).sum(),
            Axis::X => pairs.map(|(a0, a1)| 2.0 * (a0.conj() * a1).re).sum(),
            Axis::Y => pairs.map(|(a0, a1)| 2.0 * (a0.conj() * a1).im).sum(),
        };
        Ok(value)
    }

    /// Basis index rendered most-significant qubit first, width n.
    pub fn bitstring(&self, index: usize) -> String {
        bitstring(index, self.num_qubits)
    }

    /// Rescale small drift, reject drift that indicates a logic error.
    fn enforce_normalization(&mut self) -> SimResult<()> {
        let total = self.total_probability();
        let drift = (total - 1.0).abs();
        if !total.is_finite() || drift > self.config.drift_tolerance {
            return Err(SimError::NormalizationDrift {
                total,
                tolerance: self.config.drift_tolerance,
            });
        }
        if drift > self.config.renormalize_threshold {
            trace!(total, "renormalizing statevector");
            let scale = 1.0 / total.sqrt();
            for amp in &mut self.amplitudes {
                *amp *= scale;
            }
            let total = self.total_probability();
            if (total - 1.0).abs() > self.config.norm_epsilon {
                warn!(total, "renormalization did not restore unit norm");
                return Err(SimError::NormalizationDrift {
                    total,
                    tolerance: self.config.norm_epsilon,
                });
            }
        }
        Ok(())
    }
}

/// Render `index` as an n-bit string, most-significant qubit first.
pub fn bitstring(index: usize, num_qubits: usize) -> String {
    format!("{index:0num_qubits$b}")
}

/// Parse an MSB-first bitstring of exactly `width` characters.
pub fn parse_bitstring(bits: &str, width: usize) -> SimResult<usize> {
    let invalid = || SimError::InvalidBitstring {
        bitstring: bits.to_string(),
        width,
    };
    if bits.len() != width || !bits.chars().all(|c| c == '0' || c == '1') {
        return Err(invalid());
    }
    usize::from_str_radix(bits, 2).map_err(|_| invalid())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gates::{self, place};
    use amplisim_ir::QubitId;

    fn approx_eq(a: Complex64, b: Complex64) -> bool {
        (a - b).norm() < 1e-10
    }

    #[test]
    fn test_initial_state() {
        let sv = StateVector::new(2).unwrap();
        assert!(approx_eq(sv.amplitudes[0], Complex64::new(1.0, 0.0)));
        assert!(approx_eq(sv.amplitudes[1], Complex64::new(0.0, 0.0)));
        assert!(approx_eq(sv.amplitudes[2], Complex64::new(0.0, 0.0)));
        assert!(approx_eq(sv.amplitudes[3], Complex64::new(0.0, 0.0)));
    }

    #[test]
    fn test_empty_and_oversized_registers() {
        assert!(matches!(StateVector::new(0), Err(SimError::EmptyRegister)));
        let config = SimConfig {
            max_qubits: 4,
            ..SimConfig::default()
        };
        assert!(matches!(
            StateVector::with_config(5, &config),
            Err(SimError::TooManyQubits {
                requested: 5,
                max: 4
            })
        ));
    }

    #[test]
    fn test_hadamard() {
        let mut sv = StateVector::new(1).unwrap();
        sv.apply(&place(&gates::hadamard(), &[0], 1).unwrap()).unwrap();

        let sqrt2_inv = 1.0 / 2.0_f64.sqrt();
        assert!(approx_eq(sv.amplitudes[0], Complex64::new(sqrt2_inv, 0.0)));
        assert!(approx_eq(sv.amplitudes[1], Complex64::new(sqrt2_inv, 0.0)));
    }

    #[test]
    fn test_bell_state() {
        let mut sv = StateVector::new(2).unwrap();
        sv.apply_circuit(&Circuit::bell().unwrap()).unwrap();

        let sqrt2_inv = 1.0 / 2.0_f64.sqrt();
        assert!(approx_eq(sv.amplitudes[0], Complex64::new(sqrt2_inv, 0.0)));
        assert!(approx_eq(sv.amplitudes[1], Complex64::new(0.0, 0.0)));
        assert!(approx_eq(sv.amplitudes[2], Complex64::new(0.0, 0.0)));
        assert!(approx_eq(sv.amplitudes[3], Complex64::new(sqrt2_inv, 0.0)));
    }

    #[test]
    fn test_x_gate_sets_lsb() {
        let mut sv = StateVector::new(3).unwrap();
        sv.apply(&place(&gates::pauli_x(), &[0], 3).unwrap()).unwrap();
        assert_eq!(sv.probability(0b001).unwrap(), 1.0);
        assert_eq!(sv.bitstring(1), "001");
    }

    #[test]
    fn test_dimension_mismatch() {
        let mut sv = StateVector::new(2).unwrap();
        let op = place(&gates::hadamard(), &[0], 3).unwrap();
        assert!(matches!(
            sv.apply(&op),
            Err(SimError::DimensionMismatch {
                expected: 4,
                got: 8
            })
        ));
    }

    #[test]
    fn test_probability_out_of_range() {
        let sv = StateVector::new(2).unwrap();
        assert!(matches!(
            sv.probability(4),
            Err(SimError::BasisStateOutOfRange {
                index: 4,
                dimension: 4
            })
        ));
    }

    #[test]
    fn test_expectation_values() {
        let mut sv = StateVector::new(1).unwrap();
        assert!((sv.expectation(Axis::Z, 0).unwrap() - 1.0).abs() < 1e-12);

        sv.apply(&place(&gates::hadamard(), &[0], 1).unwrap()).unwrap();
        assert!((sv.expectation(Axis::X, 0).unwrap() - 1.0).abs() < 1e-12);
        assert!(sv.expectation(Axis::Z, 0).unwrap().abs() < 1e-12);

        // S·H|0⟩ = |+i⟩
        sv.apply(&place(&gates::s(), &[0], 1).unwrap()).unwrap();
        assert!((sv.expectation(Axis::Y, 0).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_ry_expectation_is_cosine() {
        let theta = 1.1;
        let mut circuit = Circuit::with_size("ry", 2);
        circuit.ry(theta, QubitId(1)).unwrap();
        let mut sv = StateVector::new(2).unwrap();
        sv.apply_circuit(&circuit).unwrap();
        assert!((sv.expectation(Axis::Z, 1).unwrap() - theta.cos()).abs() < 1e-12);
        assert!((sv.expectation(Axis::X, 1).unwrap() - theta.sin()).abs() < 1e-12);
        assert!((sv.expectation(Axis::Z, 0).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_from_amplitudes_validates() {
        let half = Complex64::new(0.5, 0.0);
        assert!(StateVector::from_amplitudes(vec![half; 4]).is_ok());
        assert!(matches!(
            StateVector::from_amplitudes(vec![half; 3]),
            Err(SimError::DimensionMismatch { .. })
        ));
        assert!(matches!(
            StateVector::from_amplitudes(vec![half; 8]),
            Err(SimError::NormalizationDrift { .. })
        ));
    }

    #[test]
    fn test_small_drift_is_rescaled() {
        let a = Complex64::new((0.5_f64 + 1e-10).sqrt(), 0.0);
        let b = Complex64::new(0.5_f64.sqrt(), 0.0);
        let sv = StateVector::from_amplitudes(vec![a, b]).unwrap();
        assert!((sv.total_probability() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_circuit_with_non_finite_angle_fails_before_evolving() {
        let config = SimConfig {
            unitarity_tolerance: 1e-7,
            ..SimConfig::default()
        };
        let mut circuit = Circuit::with_size("nan", 1);
        circuit.h(QubitId(0)).unwrap().ry(f64::NAN, QubitId(0)).unwrap();

        let mut sv = StateVector::with_config(1, &config).unwrap();
        let err = sv.apply_circuit(&circuit).unwrap_err();
        assert!(matches!(
            err,
            SimError::NonUnitaryOperator { tolerance, .. } if tolerance == 1e-7
        ));
    }

    #[test]
    fn test_bitstring_helpers() {
        assert_eq!(bitstring(6, 3), "110");
        assert_eq!(bitstring(1, 4), "0001");
        assert_eq!(parse_bitstring("110", 3).unwrap(), 6);
        assert!(parse_bitstring("12", 2).is_err());
        assert!(parse_bitstring("0110", 3).is_err());
    }
}
