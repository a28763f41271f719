//! Quantum gate kinds.

use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};

/// Gates understood by the simulator.
///
/// Rotation angles are stored as evaluated `f64` values; a circuit is a
/// concrete program, not a template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StandardGate {
    // Single-qubit Pauli gates
    /// Identity gate.
    I,
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,

    // Single-qubit Clifford gates
    /// Hadamard gate.
    H,
    /// S gate (sqrt(Z)).
    S,
    /// S-dagger gate.
    Sdg,
    /// T gate (fourth root of Z).
    T,
    /// T-dagger gate.
    Tdg,

    // Single-qubit rotation gates
    /// Rotation around X axis.
    Rx(f64),
    /// Rotation around Y axis.
    Ry(f64),
    /// Rotation around Z axis.
    Rz(f64),
    /// Phase gate diag(1, e^{iθ}).
    P(f64),

    // Two-qubit gates
    /// Controlled-X (CNOT) gate. Operands: control, target.
    CX,
    /// Controlled-Z gate.
    CZ,
    /// SWAP gate.
    Swap,

    // Multi-qubit gates
    /// Toffoli gate (CCX). Operands: control, control, target.
    CCX,
    /// Multi-controlled Z over the given number of qubits.
    ///
    /// Flips the sign of the all-ones state of its operands; `Mcz(2)` is CZ
    /// and `Mcz(1)` is Z.
    Mcz(u32),
}

impl StandardGate {
    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            StandardGate::I => "id",
            StandardGate::X => "x",
            StandardGate::Y => "y",
            StandardGate::Z => "z",
            StandardGate::H => "h",
            StandardGate::S => "s",
            StandardGate::Sdg => "sdg",
            StandardGate::T => "t",
            StandardGate::Tdg => "tdg",
            StandardGate::Rx(_) => "rx",
            StandardGate::Ry(_) => "ry",
            StandardGate::Rz(_) => "rz",
            StandardGate::P(_) => "p",
            StandardGate::CX => "cx",
            StandardGate::CZ => "cz",
            StandardGate::Swap => "swap",
            StandardGate::CCX => "ccx",
            StandardGate::Mcz(_) => "mcz",
        }
    }

    /// Get the number of qubits this gate operates on.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            StandardGate::I
            | StandardGate::X
            | StandardGate::Y
            | StandardGate::Z
            | StandardGate::H
            | StandardGate::S
            | StandardGate::Sdg
            | StandardGate::T
            | StandardGate::Tdg
            | StandardGate::Rx(_)
            | StandardGate::Ry(_)
            | StandardGate::Rz(_)
            | StandardGate::P(_) => 1,

            StandardGate::CX | StandardGate::CZ | StandardGate::Swap => 2,

            StandardGate::CCX => 3,

            StandardGate::Mcz(width) => *width,
        }
    }

    /// The rotation angle, for parameterized gates.
    pub fn parameter(&self) -> Option<f64> {
        match self {
            StandardGate::Rx(t) | StandardGate::Ry(t) | StandardGate::Rz(t) | StandardGate::P(t) => {
                Some(*t)
            }
            _ => None,
        }
    }

    /// Check if this gate takes a parameter.
    pub fn is_parameterized(&self) -> bool {
        self.parameter().is_some()
    }

    /// The gate that undoes this one.
    pub fn inverse(&self) -> StandardGate {
        match self {
            StandardGate::S => StandardGate::Sdg,
            StandardGate::Sdg => StandardGate::S,
            StandardGate::T => StandardGate::Tdg,
            StandardGate::Tdg => StandardGate::T,
            StandardGate::Rx(t) => StandardGate::Rx(-t),
            StandardGate::Ry(t) => StandardGate::Ry(-t),
            StandardGate::Rz(t) => StandardGate::Rz(-t),
            StandardGate::P(t) => StandardGate::P(-t),
            // Everything else is self-inverse.
            other => other.clone(),
        }
    }

    /// Resolve a gate record's name and parameter.
    ///
    /// `arity` is the number of operands in the record; it fixes the width of
    /// `mcz` and is ignored for fixed-width gates.
    pub fn from_name(name: &str, param: Option<f64>, arity: usize) -> IrResult<Self> {
        let lower = name.to_ascii_lowercase();
        let needs_param = |g: fn(f64) -> StandardGate| {
            param
                .map(g)
                .ok_or_else(|| IrError::MissingParameter(lower.clone()))
        };

        let gate = match lower.as_str() {
            "rx" => return needs_param(StandardGate::Rx),
            "ry" => return needs_param(StandardGate::Ry),
            "rz" => return needs_param(StandardGate::Rz),
            "p" | "phase" => return needs_param(StandardGate::P),
            "id" | "i" => StandardGate::I,
            "x" => StandardGate::X,
            "y" => StandardGate::Y,
            "z" => StandardGate::Z,
            "h" => StandardGate::H,
            "s" => StandardGate::S,
            "sdg" => StandardGate::Sdg,
            "t" => StandardGate::T,
            "tdg" => StandardGate::Tdg,
            "cx" | "cnot" => StandardGate::CX,
            "cz" => StandardGate::CZ,
            "swap" => StandardGate::Swap,
            "ccx" | "toffoli" => StandardGate::CCX,
            "mcz" => StandardGate::Mcz(u32::try_from(arity).unwrap_or(u32::MAX)),
            _ => return Err(IrError::UnknownGate(name.to_string())),
        };

        if param.is_some() {
            return Err(IrError::UnexpectedParameter(lower));
        }
        Ok(gate)
    }
}
