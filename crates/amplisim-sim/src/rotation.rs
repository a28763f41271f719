//! Single-parameter rotation gate and measurement axes.
//!
//! This is the building block a variational classifier drives: it owns one
//! angle, changes it only through [`RotationGate::set_theta`], and reads the
//! result back with [`StateVector::expectation`](crate::StateVector::expectation).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use amplisim_ir::{Instruction, QubitId, StandardGate};

use crate::error::{SimError, SimResult};
use crate::gates::{self, GateMatrix};
use crate::operator::Operator;

/// Bloch-sphere axis for rotations and Pauli expectation values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Pauli-X.
    X,
    /// Pauli-Y.
    Y,
    /// Pauli-Z, the computational basis.
    Z,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        };
        f.write_str(name)
    }
}

impl FromStr for Axis {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "x" => Ok(Axis::X),
            "y" => Ok(Axis::Y),
            "z" => Ok(Axis::Z),
            other => Err(SimError::Config(format!(
                "unknown axis '{other}', expected x, y or z"
            ))),
        }
    }
}

/// A rotation `R_axis(θ)` on one qubit with an explicitly owned angle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RotationGate {
    axis: Axis,
    qubit: usize,
    theta: f64,
}

impl RotationGate {
    /// Create a rotation about `axis` on `qubit`.
    pub fn new(axis: Axis, qubit: usize, theta: f64) -> Self {
        Self { axis, qubit, theta }
    }

    /// `Ry(θ)` on `qubit`.
    pub fn ry(qubit: usize, theta: f64) -> Self {
        Self::new(Axis::Y, qubit, theta)
    }

    /// `Rx(θ)` on `qubit`.
    pub fn rx(qubit: usize, theta: f64) -> Self {
        Self::new(Axis::X, qubit, theta)
    }

    /// Rotation axis.
    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Target qubit.
    pub fn qubit(&self) -> usize {
        self.qubit
    }

    /// Current angle.
    pub fn theta(&self) -> f64 {
        self.theta
    }

    /// Replace the angle. This is the only way θ changes.
    pub fn set_theta(&mut self, theta: f64) {
        self.theta = theta;
    }

    /// The 2×2 matrix for the current angle. A non-finite angle is
    /// rejected with [`SimError::NonUnitaryOperator`].
    pub fn matrix(&self) -> SimResult<GateMatrix> {
        let matrix = match self.axis {
            Axis::X => gates::rx(self.theta),
            Axis::Y => gates::ry(self.theta),
            Axis::Z => gates::rz(self.theta),
        };
        matrix.validated(gates::UNITARITY_TOLERANCE)
    }

    /// The gate placed in an `num_qubits`-qubit register.
    pub fn operator(&self, num_qubits: usize) -> SimResult<Operator> {
        gates::place(&self.matrix()?, &[self.qubit], num_qubits)
    }

    /// The gate as a circuit instruction.
    pub fn instruction(&self) -> SimResult<Instruction> {
        let gate = match self.axis {
            Axis::X => StandardGate::Rx(self.theta),
            Axis::Y => StandardGate::Ry(self.theta),
            Axis::Z => StandardGate::Rz(self.theta),
        };
        let qubit = u32::try_from(self.qubit).map_err(|_| SimError::InvalidQubitIndex {
            qubit: self.qubit,
            num_qubits: u32::MAX as usize,
        })?;
        Ok(Instruction::single_qubit_gate(gate, QubitId(qubit))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StateVector;
    use std::f64::consts::PI;

    #[test]
    fn test_set_theta_changes_matrix() {
        let mut gate = RotationGate::ry(0, 0.0);
        let before = gate.matrix().unwrap();
        gate.set_theta(PI / 3.0);
        assert_eq!(gate.theta(), PI / 3.0);
        assert_ne!(gate.matrix().unwrap(), before);
    }

    #[test]
    fn test_non_finite_theta_rejected_at_construction() {
        let mut gate = RotationGate::ry(0, 0.3);
        for theta in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            gate.set_theta(theta);
            assert!(matches!(
                gate.operator(1),
                Err(SimError::NonUnitaryOperator { .. })
            ));
        }
        gate.set_theta(0.3);
        assert!(gate.operator(1).is_ok());
    }

    #[test]
    fn test_instruction_rejects_wide_qubit_index() {
        let gate = RotationGate::ry(u32::MAX as usize + 1, 0.1);
        assert!(matches!(
            gate.instruction(),
            Err(SimError::InvalidQubitIndex { .. })
        ));
        let inst = RotationGate::rx(3, 0.1).instruction().unwrap();
        assert_eq!(inst.qubits, vec![QubitId(3)]);
    }

    #[test]
    fn test_ry_then_z_expectation() {
        // ⟨Z⟩ after Ry(θ)|0⟩ is cos θ; the classifier reads exactly this.
        let mut gate = RotationGate::ry(0, 0.0);
        for theta in [0.0, 0.4, PI / 2.0, 2.5, PI] {
            gate.set_theta(theta);
            let mut sv = StateVector::new(1).unwrap();
            sv.apply(&gate.operator(1).unwrap()).unwrap();
            let z = sv.expectation(Axis::Z, 0).unwrap();
            assert!((z - theta.cos()).abs() < 1e-12, "theta={theta}: {z}");
        }
    }

    #[test]
    fn test_rx_then_y_expectation() {
        // Rx(θ)|0⟩ = cos(θ/2)|0⟩ - i sin(θ/2)|1⟩, so ⟨Y⟩ = -sin θ.
        let gate = RotationGate::rx(0, 0.9);
        let mut sv = StateVector::new(1).unwrap();
        sv.apply(&gate.operator(1).unwrap()).unwrap();
        assert!((sv.expectation(Axis::Y, 0).unwrap() + 0.9_f64.sin()).abs() < 1e-12);
    }

    #[test]
    fn test_operator_rejects_bad_qubit() {
        let gate = RotationGate::ry(2, 0.1);
        assert!(matches!(
            gate.operator(2),
            Err(SimError::InvalidQubitIndex {
                qubit: 2,
                num_qubits: 2
            })
        ));
    }

    #[test]
    fn test_axis_parsing() {
        assert_eq!("Z".parse::<Axis>().unwrap(), Axis::Z);
        assert!("w".parse::<Axis>().is_err());
        assert_eq!(Axis::X.to_string(), "x");
    }
}
