//! Property-based tests for the JSON circuit description.

use amplisim_ir::{Circuit, QubitId, StandardGate};
use proptest::prelude::*;

/// Gate operations that can be applied to a circuit.
#[derive(Debug, Clone)]
enum GateOp {
    H(u32),
    X(u32),
    Ry(f64, u32),
    Cx(u32, u32),
    Mcz(Vec<u32>),
}

impl GateOp {
    fn apply(self, circuit: &mut Circuit) {
        // Operand collisions are generated on purpose; the builder rejects them.
        let _ = match self {
            GateOp::H(q) => circuit.h(QubitId(q)),
            GateOp::X(q) => circuit.x(QubitId(q)),
            GateOp::Ry(theta, q) => circuit.ry(theta, QubitId(q)),
            GateOp::Cx(c, t) => circuit.cx(QubitId(c), QubitId(t)),
            GateOp::Mcz(qs) => {
                let qubits: Vec<QubitId> = qs.into_iter().map(QubitId).collect();
                circuit.mcz(&qubits)
            }
        };
    }
}

fn arb_gate_op(num_qubits: u32) -> impl Strategy<Value = GateOp> {
    prop_oneof![
        (0..num_qubits).prop_map(GateOp::H),
        (0..num_qubits).prop_map(GateOp::X),
        (-3.2_f64..3.2, 0..num_qubits).prop_map(|(t, q)| GateOp::Ry(t, q)),
        (0..num_qubits, 0..num_qubits).prop_map(|(c, t)| GateOp::Cx(c, t)),
        prop::collection::vec(0..num_qubits, 1..=num_qubits as usize).prop_map(GateOp::Mcz),
    ]
}

fn arb_circuit() -> impl Strategy<Value = Circuit> {
    (1_u32..=5).prop_flat_map(|num_qubits| {
        prop::collection::vec(arb_gate_op(num_qubits), 0..=12).prop_map(move |ops| {
            let mut circuit = Circuit::with_size("prop", num_qubits);
            for op in ops {
                op.apply(&mut circuit);
            }
            circuit
        })
    })
}

proptest! {
    #[test]
    fn json_preserves_circuit(circuit in arb_circuit()) {
        let json = circuit.to_json().unwrap();
        let back = Circuit::from_json(&json).unwrap();
        prop_assert_eq!(back, circuit);
    }

    #[test]
    fn double_inverse_restores_gates(circuit in arb_circuit()) {
        let twice = circuit.inverse().inverse();
        prop_assert_eq!(twice.instructions(), circuit.instructions());
    }

    #[test]
    fn builder_never_stores_invalid_operands(circuit in arb_circuit()) {
        for inst in circuit.instructions() {
            prop_assert_eq!(inst.qubits.len() as u32, inst.gate.num_qubits());
            for q in &inst.qubits {
                prop_assert!(q.index() < circuit.num_qubits());
            }
        }
    }
}

#[test]
fn parameterized_record_round_trips_angle() {
    let json = r#"{"name": "rot", "num_qubits": 1, "instructions": [
        {"gate": "RY", "qubits": [0], "param": 1.25}
    ]}"#;
    let circuit = Circuit::from_json(json).unwrap();
    assert_eq!(circuit.instructions()[0].gate, StandardGate::Ry(1.25));
}
