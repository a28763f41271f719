//! Circuit instructions combining gates with operands.

use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::StandardGate;
use crate::qubit::QubitId;

/// A gate applied to an ordered list of qubits.
///
/// For controlled gates the controls come first and the target last.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GateRecord", into = "GateRecord")]
pub struct Instruction {
    /// The gate to apply.
    pub gate: StandardGate,
    /// Qubits this instruction operates on.
    pub qubits: Vec<QubitId>,
}

impl Instruction {
    /// Create a gate instruction, checking operand count and uniqueness.
    pub fn new(gate: StandardGate, qubits: impl IntoIterator<Item = QubitId>) -> IrResult<Self> {
        let qubits: Vec<QubitId> = qubits.into_iter().collect();
        let expected = gate.num_qubits();
        let got = u32::try_from(qubits.len()).unwrap_or(u32::MAX);
        if expected != got || got == 0 {
            return Err(IrError::QubitCountMismatch {
                gate_name: gate.name().to_string(),
                expected,
                got,
            });
        }
        for (i, q) in qubits.iter().enumerate() {
            if qubits[..i].contains(q) {
                return Err(IrError::DuplicateQubit {
                    qubit: *q,
                    gate_name: Some(gate.name().to_string()),
                });
            }
        }
        Ok(Self { gate, qubits })
    }

    /// Create a single-qubit gate instruction.
    pub fn single_qubit_gate(gate: StandardGate, qubit: QubitId) -> IrResult<Self> {
        Self::new(gate, [qubit])
    }

    /// Create a two-qubit gate instruction.
    pub fn two_qubit_gate(gate: StandardGate, q1: QubitId, q2: QubitId) -> IrResult<Self> {
        Self::new(gate, [q1, q2])
    }

    /// The instruction that undoes this one on the same operands.
    pub fn inverse(&self) -> Self {
        Self {
            gate: self.gate.inverse(),
            qubits: self.qubits.clone(),
        }
    }

    /// Get the gate name.
    pub fn name(&self) -> &'static str {
        self.gate.name()
    }
}

/// Wire form of an [`Instruction`]: `{"gate": "ry", "qubits": [0], "param": 0.5}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateRecord {
    /// Gate name, case-insensitive.
    pub gate: String,
    /// Operand qubit indices.
    pub qubits: Vec<u32>,
    /// Rotation angle for parameterized gates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub param: Option<f64>,
}

impl TryFrom<GateRecord> for Instruction {
    type Error = IrError;

    fn try_from(record: GateRecord) -> IrResult<Self> {
        let gate = StandardGate::from_name(&record.gate, record.param, record.qubits.len())?;
        Instruction::new(gate, record.qubits.into_iter().map(QubitId))
    }
}

impl From<Instruction> for GateRecord {
    fn from(inst: Instruction) -> Self {
        Self {
            gate: inst.gate.name().to_string(),
            qubits: inst.qubits.iter().map(|q| q.0).collect(),
            param: inst.gate.parameter(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operand_count_checked() {
        let err = Instruction::new(StandardGate::CX, [QubitId(0)]).unwrap_err();
        assert!(matches!(
            err,
            IrError::QubitCountMismatch {
                expected: 2,
                got: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_duplicate_operand_rejected() {
        let err = Instruction::new(StandardGate::CZ, [QubitId(1), QubitId(1)]).unwrap_err();
        assert!(matches!(err, IrError::DuplicateQubit { qubit: QubitId(1), .. }));
    }

    #[test]
    fn test_record_decoding() {
        let inst: Instruction =
            serde_json::from_str(r#"{"gate": "ry", "qubits": [0], "param": 0.25}"#).unwrap();
        assert_eq!(inst.gate, StandardGate::Ry(0.25));
        assert_eq!(inst.qubits, vec![QubitId(0)]);

        let mcz: Instruction =
            serde_json::from_str(r#"{"gate": "mcz", "qubits": [0, 1, 2]}"#).unwrap();
        assert_eq!(mcz.gate, StandardGate::Mcz(3));
    }

    #[test]
    fn test_record_encoding_omits_missing_param() {
        let inst = Instruction::two_qubit_gate(StandardGate::CX, QubitId(0), QubitId(1)).unwrap();
        let json = serde_json::to_string(&inst).unwrap();
        assert_eq!(json, r#"{"gate":"cx","qubits":[0,1]}"#);
    }

    #[test]
    fn test_empty_mcz_rejected() {
        let result: Result<Instruction, _> =
            serde_json::from_str(r#"{"gate": "mcz", "qubits": []}"#);
        assert!(result.is_err());
    }
}
