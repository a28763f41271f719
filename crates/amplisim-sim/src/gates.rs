//! Gate library: unitary blocks for standard gates and their placement in
//! the full register space.
//!
//! # Operand ordering
//!
//! A k-qubit gate is a 2^k × 2^k matrix over a *local* basis. When the gate
//! is placed on `targets`, local bit `j` is the qubit `targets[j]`, and qubit
//! 0 is the least-significant bit of a global basis index. Controlled gates
//! list their controls first: in `cx` the control is local bit 0 and the
//! target local bit 1.

use std::f64::consts::FRAC_1_SQRT_2;

use ndarray::Array2;
use num_complex::Complex64;

use amplisim_ir::{Instruction, StandardGate};

use crate::error::{SimError, SimResult};
use crate::operator::Operator;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);
const I: Complex64 = Complex64::new(0.0, 1.0);

/// Default tolerance for the unitarity check.
pub const UNITARITY_TOLERANCE: f64 = 1e-9;

/// A validated unitary acting on a small number of qubits.
#[derive(Debug, Clone, PartialEq)]
pub struct GateMatrix {
    num_qubits: usize,
    matrix: Array2<Complex64>,
}

impl GateMatrix {
    /// Validate `matrix` as a k-qubit unitary.
    pub fn new(matrix: Array2<Complex64>) -> SimResult<Self> {
        Self::with_tolerance(matrix, UNITARITY_TOLERANCE)
    }

    /// Validate `matrix` as a k-qubit unitary with a custom tolerance.
    pub fn with_tolerance(matrix: Array2<Complex64>, tolerance: f64) -> SimResult<Self> {
        let (rows, cols) = matrix.dim();
        if rows != cols {
            return Err(SimError::DimensionMismatch {
                expected: rows,
                got: cols,
            });
        }
        if rows < 2 || !rows.is_power_of_two() {
            return Err(SimError::DimensionMismatch {
                expected: rows.next_power_of_two().max(2),
                got: rows,
            });
        }
        Self {
            num_qubits: rows.trailing_zeros() as usize,
            matrix,
        }
        .validated(tolerance)
    }

    /// Re-check an already built gate, e.g. one evaluated from an angle.
    pub fn validated(self, tolerance: f64) -> SimResult<Self> {
        let deviation = unitarity_deviation(&self.matrix);
        if deviation > tolerance {
            return Err(SimError::NonUnitaryOperator {
                deviation,
                tolerance,
            });
        }
        Ok(self)
    }

    /// Build a gate from literal rows.
    fn from_rows<const D: usize>(rows: [[Complex64; D]; D]) -> Self {
        let matrix = Array2::from_shape_fn((D, D), |(r, c)| rows[r][c]);
        Self {
            num_qubits: D.trailing_zeros() as usize,
            matrix,
        }
    }

    fn diagonal(entries: &[Complex64]) -> Self {
        let dim = entries.len();
        let matrix = Array2::from_shape_fn((dim, dim), |(r, c)| if r == c { entries[r] } else { ZERO });
        Self {
            num_qubits: dim.trailing_zeros() as usize,
            matrix,
        }
    }

    /// Number of qubits the gate acts on.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Side length of the matrix, 2^k.
    pub fn dimension(&self) -> usize {
        self.matrix.nrows()
    }

    /// The matrix in the local basis.
    pub fn matrix(&self) -> &Array2<Complex64> {
        &self.matrix
    }

    /// Conjugate transpose, the inverse of a unitary.
    pub fn dagger(&self) -> Self {
        Self {
            num_qubits: self.num_qubits,
            matrix: self.matrix.t().mapv(|z| z.conj()),
        }
    }
}

/// Largest entry magnitude of `U†U - I`; infinite if any entry is not finite.
pub fn unitarity_deviation(matrix: &Array2<Complex64>) -> f64 {
    let product = matrix.t().mapv(|z| z.conj()).dot(matrix);
    product
        .indexed_iter()
        .map(|((r, c), z)| {
            let expected = if r == c { ONE } else { ZERO };
            let d = (z - expected).norm();
            if d.is_finite() { d } else { f64::INFINITY }
        })
        .fold(0.0, f64::max)
}

// =========================================================================
// Fixed gates
// =========================================================================

/// Identity on one qubit.
pub fn identity() -> GateMatrix {
    GateMatrix::from_rows([[ONE, ZERO], [ZERO, ONE]])
}

/// Hadamard gate.
pub fn hadamard() -> GateMatrix {
    let h = Complex64::new(FRAC_1_SQRT_2, 0.0);
    GateMatrix::from_rows([[h, h], [h, -h]])
}

/// Pauli-X gate.
pub fn pauli_x() -> GateMatrix {
    GateMatrix::from_rows([[ZERO, ONE], [ONE, ZERO]])
}

/// Pauli-Y gate.
pub fn pauli_y() -> GateMatrix {
    GateMatrix::from_rows([[ZERO, -I], [I, ZERO]])
}

/// Pauli-Z gate.
pub fn pauli_z() -> GateMatrix {
    GateMatrix::diagonal(&[ONE, -ONE])
}

/// S gate.
pub fn s() -> GateMatrix {
    GateMatrix::diagonal(&[ONE, I])
}

/// S-dagger gate.
pub fn sdg() -> GateMatrix {
    GateMatrix::diagonal(&[ONE, -I])
}

/// T gate.
pub fn t() -> GateMatrix {
    phase(std::f64::consts::FRAC_PI_4)
}

/// T-dagger gate.
pub fn tdg() -> GateMatrix {
    phase(-std::f64::consts::FRAC_PI_4)
}

// =========================================================================
// Parameterized gates; evaluated on every call
//
// A non-finite angle yields a non-finite matrix. Callers that take angles
// from outside go through `GateMatrix::validated`.
// =========================================================================

/// Rotation about X: `[[cos θ/2, -i sin θ/2], [-i sin θ/2, cos θ/2]]`.
pub fn rx(theta: f64) -> GateMatrix {
    let c = Complex64::new((theta / 2.0).cos(), 0.0);
    let s = Complex64::new(0.0, -(theta / 2.0).sin());
    GateMatrix::from_rows([[c, s], [s, c]])
}

/// Rotation about Y: `[[cos θ/2, -sin θ/2], [sin θ/2, cos θ/2]]`.
pub fn ry(theta: f64) -> GateMatrix {
    let c = Complex64::new((theta / 2.0).cos(), 0.0);
    let s = Complex64::new((theta / 2.0).sin(), 0.0);
    GateMatrix::from_rows([[c, -s], [s, c]])
}

/// Rotation about Z: `diag(e^{-iθ/2}, e^{iθ/2})`.
pub fn rz(theta: f64) -> GateMatrix {
    GateMatrix::diagonal(&[
        Complex64::from_polar(1.0, -theta / 2.0),
        Complex64::from_polar(1.0, theta / 2.0),
    ])
}

/// Phase gate `diag(1, e^{iθ})`.
pub fn phase(theta: f64) -> GateMatrix {
    GateMatrix::diagonal(&[ONE, Complex64::from_polar(1.0, theta)])
}

// =========================================================================
// Multi-qubit gates
// =========================================================================

/// Add a control qubit as local bit 0; `gate` moves up to bits 1..=k.
pub fn controlled(gate: &GateMatrix) -> GateMatrix {
    let inner = gate.dimension();
    let dim = inner * 2;
    let matrix = Array2::from_shape_fn((dim, dim), |(r, c)| {
        let (r_ctrl, c_ctrl) = (r & 1, c & 1);
        if r_ctrl != c_ctrl {
            ZERO
        } else if r_ctrl == 1 {
            gate.matrix[[r >> 1, c >> 1]]
        } else if r == c {
            ONE
        } else {
            ZERO
        }
    });
    GateMatrix {
        num_qubits: gate.num_qubits + 1,
        matrix,
    }
}

/// CNOT; operands (control, target).
pub fn cx() -> GateMatrix {
    controlled(&pauli_x())
}

/// Controlled-Z.
pub fn cz() -> GateMatrix {
    mcz(2)
}

/// SWAP.
pub fn swap() -> GateMatrix {
    GateMatrix::from_rows([
        [ONE, ZERO, ZERO, ZERO],
        [ZERO, ZERO, ONE, ZERO],
        [ZERO, ONE, ZERO, ZERO],
        [ZERO, ZERO, ZERO, ONE],
    ])
}

/// Toffoli; operands (control, control, target).
pub fn ccx() -> GateMatrix {
    controlled(&cx())
}

/// Multi-controlled Z on `k` qubits: flips the sign of |1…1⟩ only.
///
/// The dense form is only practical for small `k`; register-wide phase
/// flips go through [`mcz_operator`].
pub fn mcz(k: usize) -> GateMatrix {
    let dim = 1usize << k;
    let mut entries = vec![ONE; dim];
    entries[dim - 1] = -ONE;
    GateMatrix::diagonal(&entries)
}

// =========================================================================
// Placement
// =========================================================================

fn check_targets(targets: &[usize], num_qubits: usize) -> SimResult<()> {
    for (i, &q) in targets.iter().enumerate() {
        if q >= num_qubits {
            return Err(SimError::InvalidQubitIndex {
                qubit: q,
                num_qubits,
            });
        }
        if targets[..i].contains(&q) {
            return Err(SimError::DuplicateQubit { qubit: q });
        }
    }
    Ok(())
}

/// Embed `gate` on `targets` of an `num_qubits`-qubit register, identity on
/// every other qubit.
pub fn place(gate: &GateMatrix, targets: &[usize], num_qubits: usize) -> SimResult<Operator> {
    if targets.len() != gate.num_qubits() {
        return Err(SimError::DimensionMismatch {
            expected: gate.num_qubits(),
            got: targets.len(),
        });
    }
    check_targets(targets, num_qubits)?;
    Ok(Operator::placed(gate.clone(), targets.to_vec(), num_qubits))
}

/// Multi-controlled Z on `targets`, applied as a sign flip on every basis
/// state whose target bits are all set.
pub fn mcz_operator(targets: &[usize], num_qubits: usize) -> SimResult<Operator> {
    if targets.is_empty() {
        return Err(SimError::DimensionMismatch {
            expected: 1,
            got: 0,
        });
    }
    check_targets(targets, num_qubits)?;
    let mask = targets.iter().fold(0usize, |m, &q| m | (1 << q));
    Ok(Operator::masked_phase_flip(num_qubits, mask))
}

/// Apply `gate` to every qubit of the register, in qubit order.
pub fn layer(gate: &GateMatrix, num_qubits: usize) -> SimResult<Operator> {
    let stages = (0..num_qubits)
        .map(|q| place(gate, &[q], num_qubits))
        .collect::<SimResult<Vec<_>>>()?;
    Operator::sequence(num_qubits, stages)
}

/// Matrix of a circuit-description gate.
///
/// `Mcz` is returned in dense form; prefer [`operator_for`], which applies it
/// as a phase flip.
pub fn matrix_for(gate: &StandardGate) -> GateMatrix {
    match gate {
        StandardGate::I => identity(),
        StandardGate::X => pauli_x(),
        StandardGate::Y => pauli_y(),
        StandardGate::Z => pauli_z(),
        StandardGate::H => hadamard(),
        StandardGate::S => s(),
        StandardGate::Sdg => sdg(),
        StandardGate::T => t(),
        StandardGate::Tdg => tdg(),
        StandardGate::Rx(theta) => rx(*theta),
        StandardGate::Ry(theta) => ry(*theta),
        StandardGate::Rz(theta) => rz(*theta),
        StandardGate::P(theta) => phase(*theta),
        StandardGate::CX => cx(),
        StandardGate::CZ => cz(),
        StandardGate::Swap => swap(),
        StandardGate::CCX => ccx(),
        StandardGate::Mcz(k) => mcz(*k as usize),
    }
}

/// Operator for one circuit instruction on an `num_qubits`-qubit register.
///
/// Parameterized gates are checked against `tolerance`, which rejects
/// non-finite angles.
pub fn operator_for(
    instruction: &Instruction,
    num_qubits: usize,
    tolerance: f64,
) -> SimResult<Operator> {
    let targets: Vec<usize> = instruction.qubits.iter().map(|q| q.index()).collect();
    match instruction.gate {
        StandardGate::Mcz(_) => mcz_operator(&targets, num_qubits),
        ref gate if gate.is_parameterized() => {
            place(&matrix_for(gate).validated(tolerance)?, &targets, num_qubits)
        }
        ref gate => place(&matrix_for(gate), &targets, num_qubits),
    }
}
