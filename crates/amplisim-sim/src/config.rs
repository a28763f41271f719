//! Simulator configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// Numerical tolerances and resource limits for a simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Largest register the simulator will allocate.
    pub max_qubits: usize,

    /// Total probability must be within this distance of 1 at every
    /// observable point.
    pub norm_epsilon: f64,

    /// Drift above this triggers rescaling after an apply.
    pub renormalize_threshold: f64,

    /// Drift above this is an upstream logic error, not floating noise.
    pub drift_tolerance: f64,

    /// Max entry of `U†U - I` accepted for the parameterized gates of a
    /// circuit applied with [`StateVector::apply_circuit`](crate::StateVector::apply_circuit).
    pub unitarity_tolerance: f64,

    /// Vectors with at least this many amplitudes are updated on the
    /// rayon pool.
    pub parallel_threshold: usize,

    /// Shots drawn per task by [`Sampler::sample_parallel`](crate::Sampler::sample_parallel).
    pub sample_chunk_size: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            max_qubits: 24,
            norm_epsilon: 1e-9,
            renormalize_threshold: 1e-12,
            drift_tolerance: 1e-6,
            unitarity_tolerance: 1e-9,
            parallel_threshold: 1 << 14,
            sample_chunk_size: 4096,
        }
    }
}

impl SimConfig {
    /// Default configuration overlaid with `AMPLISIM_*` environment variables.
    ///
    /// Recognized: `AMPLISIM_MAX_QUBITS`, `AMPLISIM_PARALLEL_THRESHOLD`.
    pub fn from_env() -> SimResult<Self> {
        let mut config = Self::default();
        if let Some(v) = read_env_usize("AMPLISIM_MAX_QUBITS")? {
            config.max_qubits = v;
        }
        if let Some(v) = read_env_usize("AMPLISIM_PARALLEL_THRESHOLD")? {
            config.parallel_threshold = v;
        }
        config.validate()?;
        Ok(config)
    }

    /// Parse a YAML document; missing keys keep their defaults.
    pub fn from_yaml_str(source: &str) -> SimResult<Self> {
        let config: Self = serde_yaml_ng::from_str(source)
            .map_err(|e| SimError::Config(format!("invalid YAML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a YAML configuration file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> SimResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| SimError::Config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_yaml_str(&source)
    }

    /// Reject tolerance orderings that would make the normalization check
    /// contradict itself.
    pub fn validate(&self) -> SimResult<()> {
        if self.max_qubits == 0 || self.max_qubits >= usize::BITS as usize {
            return Err(SimError::Config(format!(
                "max_qubits must be in 1..{}, got {}",
                usize::BITS,
                self.max_qubits
            )));
        }
        let tolerances = [
            ("norm_epsilon", self.norm_epsilon),
            ("renormalize_threshold", self.renormalize_threshold),
            ("drift_tolerance", self.drift_tolerance),
            ("unitarity_tolerance", self.unitarity_tolerance),
        ];
        for (name, value) in tolerances {
            if !value.is_finite() || value <= 0.0 {
                return Err(SimError::Config(format!(
                    "{name} must be a positive finite number, got {value}"
                )));
            }
        }
        if self.renormalize_threshold > self.norm_epsilon {
            return Err(SimError::Config(
                "renormalize_threshold must not exceed norm_epsilon".into(),
            ));
        }
        if self.norm_epsilon > self.drift_tolerance {
            return Err(SimError::Config(
                "norm_epsilon must not exceed drift_tolerance".into(),
            ));
        }
        if self.sample_chunk_size == 0 {
            return Err(SimError::Config("sample_chunk_size must be at least 1".into()));
        }
        Ok(())
    }
}

fn read_env_usize(key: &str) -> SimResult<Option<usize>> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| SimError::Config(format!("{key}={raw}: {e}"))),
        Err(_) => Ok(None),
    }
}
