//! Amplitude amplification driver.
//!
//! Owns one register and walks it through
//! `Init → Superposition → Iterating → Done`, one oracle+diffuser round per
//! [`step`](AmplitudeAmplification::step). The loop is strictly sequential;
//! parallelism lives inside each operator application.

use std::fmt;

use tracing::{debug, instrument, trace};

use crate::config::SimConfig;
use crate::diffuser::Diffuser;
use crate::error::{SimError, SimResult};
use crate::gates::{hadamard, layer};
use crate::operator::Operator;
use crate::oracle::Oracle;
use crate::planner::IterationPlan;
use crate::statevector::StateVector;

/// Where the driver is in its run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    /// Register not yet prepared.
    Init,
    /// Uniform superposition prepared, no rounds applied.
    Superposition,
    /// `completed` of `total` rounds applied.
    Iterating { completed: usize, total: usize },
    /// All rounds applied; the state can be read out.
    Done,
}

impl fmt::Display for DriverState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriverState::Init => f.write_str("init"),
            DriverState::Superposition => f.write_str("superposition"),
            DriverState::Iterating { completed, total } => {
                write!(f, "iterating ({completed}/{total})")
            }
            DriverState::Done => f.write_str("done"),
        }
    }
}

/// Result of a completed search.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// The plan computed for the oracle.
    pub plan: IterationPlan,
    /// Rounds actually applied (the plan's k unless overridden).
    pub iterations: usize,
    /// The amplified register.
    pub state: StateVector,
}

impl SearchOutcome {
    /// Combined probability of all marked states.
    pub fn success_probability(&self, oracle: &Oracle) -> f64 {
        oracle
            .marked()
            .iter()
            .filter_map(|&i| self.state.probability(i).ok())
            .sum()
    }
}

/// Grover search over the marked set of an [`Oracle`].
#[derive(Debug)]
pub struct AmplitudeAmplification {
    oracle: Oracle,
    plan: IterationPlan,
    iterations: usize,
    config: SimConfig,
    oracle_op: Operator,
    diffuser_op: Operator,
    state: DriverState,
    register: Option<StateVector>,
    aborted: bool,
}

impl AmplitudeAmplification {
    /// Plan the search and build the oracle and diffuser operators.
    ///
    /// Fails with [`SimError::NoSolution`] when nothing is marked.
    pub fn new(oracle: Oracle) -> SimResult<Self> {
        let plan = IterationPlan::for_oracle(&oracle)?;
        let oracle_op = oracle.operator()?;
        let diffuser_op = Diffuser::new(oracle.num_qubits())?.operator()?;
        Ok(Self {
            iterations: plan.iterations,
            oracle,
            plan,
            config: SimConfig::default(),
            oracle_op,
            diffuser_op,
            state: DriverState::Init,
            register: None,
            aborted: false,
        })
    }

    /// Apply exactly `k` rounds instead of the planned count.
    pub fn with_iterations(mut self, k: usize) -> Self {
        self.iterations = k;
        self
    }

    /// Use `config` for the register this driver allocates.
    pub fn with_config(mut self, config: SimConfig) -> Self {
        self.config = config;
        self
    }

    pub fn oracle(&self) -> &Oracle {
        &self.oracle
    }

    pub fn plan(&self) -> &IterationPlan {
        &self.plan
    }

    /// Rounds this driver will apply.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    /// The register as it stands, if it has been prepared.
    pub fn register(&self) -> Option<&StateVector> {
        self.register.as_ref()
    }

    /// Perform one transition and return the new state.
    ///
    /// An error aborts the driver; every later call returns
    /// [`SimError::DriverAborted`].
    pub fn step(&mut self) -> SimResult<DriverState> {
        if self.aborted {
            return Err(SimError::DriverAborted);
        }
        match self.advance() {
            Ok(next) => {
                self.state = next;
                Ok(next)
            }
            Err(e) => {
                self.aborted = true;
                self.register = None;
                Err(e)
            }
        }
    }

    fn advance(&mut self) -> SimResult<DriverState> {
        match self.state {
            DriverState::Init => {
                let n = self.oracle.num_qubits();
                let mut register = StateVector::with_config(n, &self.config)?;
                register.apply(&layer(&hadamard(), n)?)?;
                self.register = Some(register);
                debug!(num_qubits = n, "prepared uniform superposition");
                Ok(DriverState::Superposition)
            }
            DriverState::Superposition if self.iterations == 0 => Ok(DriverState::Done),
            DriverState::Superposition => self.round(0),
            DriverState::Iterating { completed, total } if completed >= total => {
                Ok(DriverState::Done)
            }
            DriverState::Iterating { completed, .. } => self.round(completed),
            DriverState::Done => Ok(DriverState::Done),
        }
    }

    fn round(&mut self, completed: usize) -> SimResult<DriverState> {
        let register = self.register.as_mut().ok_or(SimError::DriverAborted)?;
        register.apply(&self.oracle_op)?;
        register.apply(&self.diffuser_op)?;
        let completed = completed + 1;
        trace!(
            completed,
            total = self.iterations,
            "applied oracle and diffuser"
        );
        if completed == self.iterations {
            Ok(DriverState::Done)
        } else {
            Ok(DriverState::Iterating {
                completed,
                total: self.iterations,
            })
        }
    }

    /// Step until `Done` and return the outcome.
    #[instrument(skip(self), fields(num_qubits = self.oracle.num_qubits(), iterations = self.iterations))]
    pub fn run(mut self) -> SimResult<SearchOutcome> {
        while self.step()? != DriverState::Done {}
        let iterations = self.iterations;
        let plan = self.plan;
        let state = self.finish()?;
        debug!(iterations, "amplitude amplification finished");
        Ok(SearchOutcome {
            plan,
            iterations,
            state,
        })
    }

    /// Hand back the final register. Only valid at `Done`.
    pub fn finish(self) -> SimResult<StateVector> {
        if self.aborted {
            return Err(SimError::DriverAborted);
        }
        match (self.state, self.register) {
            (DriverState::Done, Some(register)) => Ok(register),
            (state, _) => Err(SimError::DriverIncomplete {
                state: state.to_string(),
            }),
        }
    }
}
