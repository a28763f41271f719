//! Classical input encoding.
//!
//! A register starts in |0…0⟩; X gates write classical bits into it.

use amplisim_ir::{Circuit, IrResult, QubitId};

/// A circuit that prepares the basis state `value` on `n_qubits` qubits.
///
/// Bit `k` of `value` is written to qubit `k`.
pub fn encode_input(n_qubits: u32, value: usize) -> IrResult<Circuit> {
    let mut circuit = Circuit::with_size(format!("encode_{value}"), n_qubits);
    for q in 0..n_qubits {
        if (value >> q) & 1 == 1 {
            circuit.x(QubitId(q))?;
        }
    }
    Ok(circuit)
}

/// X on qubit 0 followed by CNOT(0 → 1): the classical copy of a set bit.
pub fn cnot_copy() -> IrResult<Circuit> {
    let mut circuit = Circuit::with_size("cnot_copy", 2);
    circuit.x(QubitId(0))?.cx(QubitId(0), QubitId(1))?;
    Ok(circuit)
}

/// Toffoli acting as a reversible AND of qubits 0 and 1 into qubit 2.
pub fn toffoli_and(a: bool, b: bool) -> IrResult<Circuit> {
    let value = usize::from(a) | (usize::from(b) << 1);
    let mut circuit = encode_input(3, value)?;
    circuit.ccx(QubitId(0), QubitId(1), QubitId(2))?;
    Ok(circuit)
}
