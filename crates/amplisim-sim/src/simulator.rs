//! Circuit simulator and labeled batch execution.

use std::time::Instant;

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use amplisim_ir::Circuit;

use crate::config::SimConfig;
use crate::error::{SimError, SimResult};
use crate::rotation::Axis;
use crate::sampler::{Counts, Sampler, derive_seed};
use crate::statevector::StateVector;

/// Measurement results for one circuit.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationResult {
    /// Circuit name.
    pub circuit: String,
    /// Register width.
    pub num_qubits: usize,
    /// Number of shots taken.
    pub shots: u64,
    /// Outcome counts, serialized as bitstring → count.
    pub counts: Counts,
    /// Wall-clock time for evolution and sampling.
    pub execution_time_ms: u64,
}

/// One entry of a labeled dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledCircuit<L> {
    pub label: L,
    pub circuit: Circuit,
}

impl<L> LabeledCircuit<L> {
    pub fn new(label: L, circuit: Circuit) -> Self {
        Self { label, circuit }
    }
}

/// Per-circuit statistics returned by [`Simulator::run_batch`].
#[derive(Debug, Clone, Serialize)]
pub struct CircuitStatistics<L> {
    /// Label copied from the input.
    pub label: L,
    /// Sampled outcomes.
    pub counts: Counts,
    /// Exact outcome probabilities, indexed by basis state.
    pub probabilities: Vec<f64>,
    /// Axis the expectations were taken along.
    pub axis: Axis,
    /// `⟨σ_axis⟩` for each qubit, indexed by qubit.
    pub expectations: Vec<f64>,
}

/// Local statevector simulator.
///
/// Each circuit is evolved once and then sampled; the state is never
/// collapsed between shots.
#[derive(Debug, Clone, Default)]
pub struct Simulator {
    config: SimConfig,
}

impl Simulator {
    /// Create a simulator with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a simulator with custom tolerances and limits.
    pub fn with_config(config: SimConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Evolve |0…0⟩ through `circuit`.
    pub fn statevector(&self, circuit: &Circuit) -> SimResult<StateVector> {
        let num_qubits = circuit.num_qubits();
        if num_qubits > self.config.max_qubits {
            return Err(SimError::TooManyQubits {
                requested: num_qubits,
                max: self.config.max_qubits,
            });
        }
        let mut sv = StateVector::with_config(num_qubits, &self.config)?;
        sv.apply_circuit(circuit)?;
        Ok(sv)
    }

    /// Simulate `circuit` and draw `shots` outcomes from `rng`.
    #[instrument(skip(self, circuit, rng), fields(circuit = circuit.name()))]
    pub fn run<R: Rng + ?Sized>(
        &self,
        circuit: &Circuit,
        shots: u64,
        rng: &mut R,
    ) -> SimResult<SimulationResult> {
        let start = Instant::now();
        debug!(
            "Starting simulation: {} qubits, {} instructions, {} shots",
            circuit.num_qubits(),
            circuit.len(),
            shots
        );

        let sv = self.statevector(circuit)?;
        let counts = Sampler::sample(&sv, shots, rng)?;

        let elapsed = start.elapsed();
        debug!("Simulation completed in {:?}", elapsed);

        Ok(SimulationResult {
            circuit: circuit.name().to_string(),
            num_qubits: circuit.num_qubits(),
            shots,
            counts,
            execution_time_ms: elapsed.as_millis() as u64,
        })
    }

    /// Like [`run`](Self::run) with a `StdRng` seeded from `seed`.
    pub fn run_seeded(&self, circuit: &Circuit, shots: u64, seed: u64) -> SimResult<SimulationResult> {
        let mut rng = StdRng::seed_from_u64(seed);
        self.run(circuit, shots, &mut rng)
    }

    /// Simulate every circuit of a labeled dataset on the rayon pool.
    ///
    /// Entry `i` samples with a generator derived from `(seed, i)`, so the
    /// output is reproducible and in input order. The first failing entry
    /// aborts the batch.
    #[instrument(skip(self, dataset), fields(circuits = dataset.len()))]
    pub fn run_batch<L>(
        &self,
        dataset: &[LabeledCircuit<L>],
        shots: u64,
        seed: u64,
        axis: Axis,
    ) -> SimResult<Vec<CircuitStatistics<L>>>
    where
        L: Clone + Send + Sync,
    {
        if shots == 0 {
            return Err(SimError::InvalidShotCount(shots));
        }
        let start = Instant::now();
        let stats = dataset
            .par_iter()
            .enumerate()
            .map(|(i, entry)| {
                let sv = self.statevector(&entry.circuit)?;
                let mut rng = StdRng::seed_from_u64(derive_seed(seed, i as u64));
                let counts = Sampler::sample(&sv, shots, &mut rng)?;
                let expectations = (0..sv.num_qubits())
                    .map(|q| sv.expectation(axis, q))
                    .collect::<SimResult<Vec<_>>>()?;
                Ok(CircuitStatistics {
                    label: entry.label.clone(),
                    counts,
                    probabilities: sv.probabilities(),
                    axis,
                    expectations,
                })
            })
            .collect::<SimResult<Vec<_>>>()?;
        debug!("Batch of {} circuits completed in {:?}", stats.len(), start.elapsed());
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use amplisim_ir::QubitId;

    #[test]
    fn test_bell_state() {
        let circuit = Circuit::bell().unwrap();
        let result = Simulator::new().run_seeded(&circuit, 1000, 3).unwrap();

        assert_eq!(result.shots, 1000);
        assert_eq!(result.num_qubits, 2);
        assert_eq!(result.counts.get(0b01) + result.counts.get(0b10), 0);
        let c00 = result.counts.get(0b00);
        let c11 = result.counts.get(0b11);
        assert_eq!(c00 + c11, 1000);
        assert!(c00 > 400 && c11 > 400);
    }

    #[test]
    fn test_x_gate() {
        let mut circuit = Circuit::with_size("x", 1);
        circuit.x(QubitId(0)).unwrap();
        let result = Simulator::new().run_seeded(&circuit, 100, 0).unwrap();
        assert_eq!(result.counts.get_bitstring("1").unwrap(), 100);
    }

    #[test]
    fn test_run_is_seed_reproducible() {
        let circuit = Circuit::ghz(3).unwrap();
        let sim = Simulator::new();
        let a = sim.run_seeded(&circuit, 500, 11).unwrap();
        let b = sim.run_seeded(&circuit, 500, 11).unwrap();
        assert_eq!(a.counts, b.counts);
    }

    #[test]
    fn test_too_many_qubits() {
        let sim = Simulator::with_config(SimConfig {
            max_qubits: 3,
            ..SimConfig::default()
        });
        let circuit = Circuit::with_size("wide", 4);
        assert!(matches!(
            sim.run_seeded(&circuit, 10, 0),
            Err(SimError::TooManyQubits {
                requested: 4,
                max: 3
            })
        ));
    }

    #[test]
    fn test_result_serializes_bitstrings() {
        let mut circuit = Circuit::with_size("x1", 2);
        circuit.x(QubitId(1)).unwrap();
        let result = Simulator::new().run_seeded(&circuit, 8, 0).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["circuit"], "x1");
        assert_eq!(json["counts"]["counts"]["10"], 8);
    }
}
