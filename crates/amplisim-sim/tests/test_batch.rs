//! Labeled batch execution, as used by a classifier training loop.

use amplisim_ir::{Circuit, QubitId};
use amplisim_sim::{Axis, LabeledCircuit, RotationGate, SimError, Simulator, StateVector};

fn encoded(x: f64, theta: f64) -> Circuit {
    // Feature encoding followed by the trainable rotation.
    let mut circuit = Circuit::with_size(format!("x={x}"), 1);
    circuit.ry(x, QubitId(0)).unwrap();
    circuit.ry(theta, QubitId(0)).unwrap();
    circuit
}

fn dataset(theta: f64) -> Vec<LabeledCircuit<i8>> {
    [(-1.25, -1), (-0.5, -1), (0.25, 1), (1.5, 1)]
        .into_iter()
        .map(|(x, label)| LabeledCircuit::new(label, encoded(x, theta)))
        .collect()
}

#[test]
fn batch_preserves_order_and_labels() {
    let data = dataset(0.1);
    let stats = Simulator::new().run_batch(&data, 256, 5, Axis::Z).unwrap();
    assert_eq!(stats.len(), data.len());
    for (s, d) in stats.iter().zip(&data) {
        assert_eq!(s.label, d.label);
        assert_eq!(s.counts.shots(), 256);
        assert_eq!(s.probabilities.len(), 2);
        assert_eq!(s.expectations.len(), 1);
        assert_eq!(s.axis, Axis::Z);
    }
}

#[test]
fn batch_expectations_are_exact() {
    let theta = 0.25;
    let stats = Simulator::new()
        .run_batch(&dataset(theta), 64, 0, Axis::Z)
        .unwrap();
    for (s, x) in stats.iter().zip([-1.25, -0.5, 0.25, 1.5]) {
        let expected = (x + theta).cos();
        assert!((s.expectations[0] - expected).abs() < 1e-12);
        assert!((s.probabilities[0] - (1.0 + expected) / 2.0).abs() < 1e-12);
    }
}

#[test]
fn batch_is_seed_reproducible() {
    let sim = Simulator::new();
    let a = sim.run_batch(&dataset(0.0), 500, 42, Axis::X).unwrap();
    let b = sim.run_batch(&dataset(0.0), 500, 42, Axis::X).unwrap();
    for (x, y) in a.iter().zip(&b) {
        assert_eq!(x.counts, y.counts);
    }
}

#[test]
fn batch_rejects_zero_shots() {
    assert!(matches!(
        Simulator::new().run_batch(&dataset(0.0), 0, 1, Axis::Z),
        Err(SimError::InvalidShotCount(0))
    ));
}

#[test]
fn dataset_round_trips_through_json() {
    let data = dataset(0.5);
    let json = serde_json::to_string(&data).unwrap();
    let back: Vec<LabeledCircuit<i8>> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, data);
}

#[test]
fn rotation_gate_drives_expectation() {
    // One parameter update step as a classifier would perform it.
    let mut gate = RotationGate::ry(0, 0.0);
    let mut previous = f64::INFINITY;
    for step in 0..5 {
        gate.set_theta(step as f64 * 0.5);
        let mut sv = StateVector::new(1).unwrap();
        sv.apply(&gate.operator(1).unwrap()).unwrap();
        let z = sv.expectation(Axis::Z, 0).unwrap();
        assert!(z < previous);
        previous = z;
    }

    let mut circuit = Circuit::with_size("trained", 1);
    circuit.push(gate.instruction().unwrap()).unwrap();
    let stats = Simulator::new()
        .run_batch(&[LabeledCircuit::new("trained", circuit)], 100, 3, Axis::Z)
        .unwrap();
    assert!((stats[0].expectations[0] - previous).abs() < 1e-12);
}
