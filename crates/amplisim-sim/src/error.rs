//! Error types for the sim crate.

use thiserror::Error;

/// Errors produced while building operators or running a simulation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SimError {
    /// A gate targets a qubit outside the register.
    #[error("Qubit {qubit} is outside the register [0, {num_qubits})")]
    InvalidQubitIndex {
        /// The offending qubit index.
        qubit: usize,
        /// Width of the register.
        num_qubits: usize,
    },

    /// A gate names the same qubit twice.
    #[error("Qubit {qubit} appears more than once in a gate placement")]
    DuplicateQubit {
        /// The repeated qubit index.
        qubit: usize,
    },

    /// Operator and state sizes disagree.
    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Dimension required by the receiver.
        expected: usize,
        /// Dimension that was supplied.
        got: usize,
    },

    /// A matrix failed the unitarity check at construction.
    #[error("Operator is not unitary: max |U†U - I| entry is {deviation:e} (tolerance {tolerance:e})")]
    NonUnitaryOperator {
        /// Largest entry of `U†U - I` by magnitude.
        deviation: f64,
        /// Tolerance the check ran with.
        tolerance: f64,
    },

    /// Planning was requested with an empty marked set.
    #[error("No marked states among {search_space} basis states; nothing to amplify")]
    NoSolution {
        /// Size of the search space N.
        search_space: usize,
    },

    /// More solutions than basis states.
    #[error("{solutions} solutions requested but the search space has only {search_space} states")]
    TooManySolutions {
        /// Requested solution count M.
        solutions: usize,
        /// Size of the search space N.
        search_space: usize,
    },

    /// Shot count must be at least 1.
    #[error("Shot count must be at least 1, got {0}")]
    InvalidShotCount(u64),

    /// Total probability left the hard tolerance.
    #[error("Total probability {total} deviates from 1 beyond tolerance {tolerance:e}")]
    NormalizationDrift {
        /// Observed total probability.
        total: f64,
        /// Tolerance that was exceeded.
        tolerance: f64,
    },

    /// A register needs at least one qubit.
    #[error("A register needs at least one qubit")]
    EmptyRegister,

    /// Register exceeds the configured limit.
    #[error("{requested} qubits requested but the simulator is limited to {max}")]
    TooManyQubits {
        /// Requested register width.
        requested: usize,
        /// Configured limit.
        max: usize,
    },

    /// Marked state does not exist in the search space.
    #[error("Marked state {state} is outside the search space of {search_space} states")]
    MarkedStateOutOfRange {
        /// The offending basis index.
        state: usize,
        /// Size of the search space N.
        search_space: usize,
    },

    /// Basis index is outside the state vector.
    #[error("Basis state {index} is outside a state vector of dimension {dimension}")]
    BasisStateOutOfRange {
        /// The offending basis index.
        index: usize,
        /// Dimension of the state vector.
        dimension: usize,
    },

    /// Bitstring is not a width-n string of `0`/`1`.
    #[error("'{bitstring}' is not a {width}-bit basis state")]
    InvalidBitstring {
        /// The rejected input.
        bitstring: String,
        /// Required width.
        width: usize,
    },

    /// The driver was asked for its result before reaching `Done`.
    #[error("Amplitude amplification has not finished (state: {state})")]
    DriverIncomplete {
        /// The state the driver was in.
        state: String,
    },

    /// A previous step failed; the amplitudes can no longer be trusted.
    #[error("Amplitude amplification was aborted by an earlier error")]
    DriverAborted,

    /// Circuit description error.
    #[error("Circuit IR error: {0}")]
    Ir(#[from] amplisim_ir::IrError),

    /// Configuration is invalid or could not be loaded.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for simulation operations.
pub type SimResult<T> = Result<T, SimError>;
