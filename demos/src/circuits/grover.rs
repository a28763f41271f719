//! Grover's search as a plain gate-level circuit.
//!
//! Grover's algorithm finds a marked item in an unstructured database
//! with O(sqrt(N)) queries, compared to O(N) classically. This version
//! spells every round out as circuit instructions, so it can be written to
//! JSON and simulated like any other circuit.

use amplisim_ir::{Circuit, IrResult, QubitId};
use amplisim_sim::{SimResult, optimal_iterations};

/// Generate a Grover search circuit.
///
/// # Arguments
/// * `n_qubits` - Number of qubits (search space size = 2^n)
/// * `marked` - The basis states to find (each below 2^n)
/// * `iterations` - Number of oracle+diffusion rounds
///
/// The gate-level diffusion below equals `-(2|s⟩⟨s| - I)`. The sign is a
/// global phase per round and does not change any measured probability.
pub fn grover_circuit(n_qubits: u32, marked: &[usize], iterations: usize) -> IrResult<Circuit> {
    let mut circuit = Circuit::with_size("grover", n_qubits);

    // Uniform superposition
    circuit.h_all()?;

    for _ in 0..iterations {
        for &state in marked {
            apply_oracle(&mut circuit, n_qubits, state)?;
        }
        apply_diffusion(&mut circuit, n_qubits)?;
    }

    Ok(circuit)
}

/// Planned round count for `marked` states among 2^n.
pub fn planned_iterations(n_qubits: u32, num_marked: usize) -> SimResult<usize> {
    optimal_iterations(1usize << n_qubits, num_marked)
}

fn all_qubits(n_qubits: u32) -> Vec<QubitId> {
    (0..n_qubits).map(QubitId).collect()
}

/// Flip the phase of `state`: X on its zero bits, MCZ, undo the X gates.
fn apply_oracle(circuit: &mut Circuit, n_qubits: u32, state: usize) -> IrResult<()> {
    let zeros: Vec<QubitId> = (0..n_qubits)
        .filter(|&q| (state >> q) & 1 == 0)
        .map(QubitId)
        .collect();
    for &q in &zeros {
        circuit.x(q)?;
    }
    circuit.mcz(&all_qubits(n_qubits))?;
    for &q in &zeros {
        circuit.x(q)?;
    }
    Ok(())
}

/// H, X, MCZ, X, H on every qubit.
fn apply_diffusion(circuit: &mut Circuit, n_qubits: u32) -> IrResult<()> {
    circuit.h_all()?;
    circuit.x_all()?;
    circuit.mcz(&all_qubits(n_qubits))?;
    circuit.x_all()?;
    circuit.h_all()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use amplisim_sim::StateVector;

    #[test]
    fn test_planned_iterations() {
        assert_eq!(planned_iterations(2, 1).unwrap(), 1);
        assert_eq!(planned_iterations(3, 1).unwrap(), 2);
        assert_eq!(planned_iterations(4, 1).unwrap(), 3);
    }

    #[test]
    fn test_grover_circuit_shape() {
        let circuit = grover_circuit(4, &[7], 3).unwrap();
        assert_eq!(circuit.num_qubits(), 4);
        // 4 H + 3 × (oracle: 1 X + MCZ + 1 X, diffusion: 4 + 4 + 1 + 4 + 4)
        assert_eq!(circuit.len(), 4 + 3 * (3 + 17));
    }

    #[test]
    fn test_grover_circuit_finds_state() {
        let circuit = grover_circuit(3, &[0b110], 2).unwrap();
        let mut sv = StateVector::new(3).unwrap();
        sv.apply_circuit(&circuit).unwrap();
        assert!(sv.probability(0b110).unwrap() > 0.94);
    }
}
