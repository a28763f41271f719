//! amplisim Circuit Description
//!
//! This crate defines the serialized input the simulator consumes: an
//! ordered sequence of gate records on a fixed-width qubit register.
//!
//! # Qubit Ordering
//!
//! Qubit `k` is bit `k` of a basis-state index (qubit 0 is the
//! least-significant bit). Bitstrings printed by the simulator list the
//! most significant qubit first.
//!
//! # Example
//!
//! ```rust
//! use amplisim_ir::{Circuit, QubitId};
//!
//! let mut circuit = Circuit::with_size("bell_state", 2);
//! circuit.h(QubitId(0)).unwrap();
//! circuit.cx(QubitId(0), QubitId(1)).unwrap();
//!
//! let json = circuit.to_json().unwrap();
//! let back = Circuit::from_json(&json).unwrap();
//! assert_eq!(back, circuit);
//! ```
//!
//! # Wire Format
//!
//! ```json
//! {
//!   "name": "classifier_input",
//!   "num_qubits": 1,
//!   "instructions": [
//!     { "gate": "ry", "qubits": [0], "param": -1.0 },
//!     { "gate": "rx", "qubits": [0], "param": 0.2 }
//!   ]
//! }
//! ```
//!
//! # Supported Gates
//!
//! | Gate | Qubits | Description |
//! |------|--------|-------------|
//! | `id` | 1 | Identity |
//! | `h` | 1 | Hadamard gate |
//! | `x`, `y`, `z` | 1 | Pauli gates |
//! | `s`, `sdg`, `t`, `tdg` | 1 | Phase gates |
//! | `rx`, `ry`, `rz`, `p` | 1 | Parameterized rotations |
//! | `cx`, `cz`, `swap` | 2 | Two-qubit gates |
//! | `ccx` | 3 | Toffoli gate |
//! | `mcz` | any | Multi-controlled Z |

pub mod circuit;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod qubit;

pub use circuit::Circuit;
pub use error::{IrError, IrResult};
pub use gate::StandardGate;
pub use instruction::{GateRecord, Instruction};
pub use qubit::QubitId;
