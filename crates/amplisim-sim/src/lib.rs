//! Dense state-vector simulation and amplitude amplification.
//!
//! The crate evolves a register of up to [`SimConfig::max_qubits`] qubits
//! through unitary [`Operator`]s and samples measurement outcomes by the Born
//! rule. On top of that it implements Grover search: a phase [`Oracle`], the
//! [`Diffuser`], an [`IterationPlan`] for the number of rounds, and the
//! [`AmplitudeAmplification`] driver that ties them together.
//!
//! # Qubit Ordering
//!
//! Qubit `k` is bit `k` of a basis index, so qubit 0 is the least-significant
//! bit. Bitstrings are printed most-significant qubit first: in a 3-qubit
//! register, `"001"` is basis index 1 and has qubit 0 set.
//!
//! # Example
//!
//! ```rust
//! use amplisim_sim::{AmplitudeAmplification, Oracle};
//!
//! let oracle = Oracle::from_bitstrings(2, &["11"]).unwrap();
//! let outcome = AmplitudeAmplification::new(oracle).unwrap().run().unwrap();
//!
//! assert_eq!(outcome.iterations, 1);
//! assert!(outcome.state.probability(0b11).unwrap() > 0.99);
//! ```
//!
//! # Sampling
//!
//! ```rust
//! use amplisim_ir::Circuit;
//! use amplisim_sim::Simulator;
//!
//! let result = Simulator::new()
//!     .run_seeded(&Circuit::bell().unwrap(), 1000, 42)
//!     .unwrap();
//! assert_eq!(result.counts.get(0b00) + result.counts.get(0b11), 1000);
//! ```

pub mod config;
pub mod diffuser;
pub mod driver;
pub mod error;
pub mod gates;
pub mod operator;
pub mod oracle;
pub mod planner;
pub mod rotation;
pub mod sampler;
pub mod simulator;
pub mod statevector;

pub use config::SimConfig;
pub use diffuser::Diffuser;
pub use driver::{AmplitudeAmplification, DriverState, SearchOutcome};
pub use error::{SimError, SimResult};
pub use gates::GateMatrix;
pub use operator::Operator;
pub use oracle::Oracle;
pub use planner::{IterationPlan, optimal_iterations};
pub use rotation::{Axis, RotationGate};
pub use sampler::{Counts, Sampler};
pub use simulator::{CircuitStatistics, LabeledCircuit, SimulationResult, Simulator};
pub use statevector::StateVector;
