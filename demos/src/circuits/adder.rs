//! Half adder built from CNOT and Toffoli gates.
//!
//! Qubits 0 and 1 hold the inputs, qubit 2 receives the sum (XOR) and
//! qubit 3 the carry (AND).

use amplisim_ir::{Circuit, IrResult, QubitId};

use super::encoding::encode_input;

pub const SUM: usize = 2;
pub const CARRY: usize = 3;

/// Append the half adder to a 4-qubit circuit.
pub fn append_half_adder(circuit: &mut Circuit) -> IrResult<()> {
    circuit
        .cx(QubitId(0), QubitId(2))?
        .cx(QubitId(1), QubitId(2))?
        .ccx(QubitId(0), QubitId(1), QubitId(3))?;
    Ok(())
}

/// Encode `a` and `b`, then add them.
pub fn half_adder(a: bool, b: bool) -> IrResult<Circuit> {
    let mut circuit = encode_input(4, usize::from(a) | (usize::from(b) << 1))?;
    append_half_adder(&mut circuit)?;
    Ok(circuit)
}

/// Read `(carry, sum)` out of a measured 4-qubit basis index.
pub fn decode_output(outcome: usize) -> (bool, bool) {
    ((outcome >> CARRY) & 1 == 1, (outcome >> SUM) & 1 == 1)
}
