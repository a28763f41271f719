//! Born-rule measurement sampling.

use std::collections::BTreeMap;

use rand::Rng;
use rand::SeedableRng;
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rayon::prelude::*;
use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};
use tracing::{debug, warn};

use crate::error::{SimError, SimResult};
use crate::statevector::{StateVector, bitstring, parse_bitstring};

/// Measurement counts keyed by basis index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Counts {
    num_qubits: usize,
    shots: u64,
    counts: BTreeMap<usize, u64>,
}

impl Counts {
    fn empty(num_qubits: usize) -> Self {
        Self {
            num_qubits,
            shots: 0,
            counts: BTreeMap::new(),
        }
    }

    fn record(&mut self, index: usize, n: u64) {
        *self.counts.entry(index).or_insert(0) += n;
        self.shots += n;
    }

    fn merge(mut self, other: Counts) -> Self {
        for (index, n) in other.counts {
            self.record(index, n);
        }
        self
    }

    /// Occurrences of basis state `index`.
    pub fn get(&self, index: usize) -> u64 {
        self.counts.get(&index).copied().unwrap_or(0)
    }

    /// Occurrences of an MSB-first bitstring.
    pub fn get_bitstring(&self, bits: &str) -> SimResult<u64> {
        Ok(self.get(parse_bitstring(bits, self.num_qubits)?))
    }

    /// Total number of shots.
    pub fn shots(&self) -> u64 {
        self.shots
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Number of distinct outcomes observed.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Most common outcome; ties go to the lowest index.
    pub fn most_frequent(&self) -> Option<(usize, u64)> {
        self.counts
            .iter()
            .fold(None, |best: Option<(usize, u64)>, (&i, &n)| match best {
                Some((_, b)) if b >= n => best,
                _ => Some((i, n)),
            })
    }

    /// Empirical probability of `index`.
    pub fn frequency(&self, index: usize) -> f64 {
        if self.shots == 0 {
            0.0
        } else {
            self.get(index) as f64 / self.shots as f64
        }
    }

    /// Observed outcomes in ascending index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, u64)> + '_ {
        self.counts.iter().map(|(&i, &n)| (i, n))
    }

    /// Outcomes keyed by MSB-first bitstring.
    pub fn to_bitstring_map(&self) -> BTreeMap<String, u64> {
        self.iter()
            .map(|(i, n)| (bitstring(i, self.num_qubits), n))
            .collect()
    }
}

struct BitstringCounts<'a>(&'a Counts);

impl Serialize for BitstringCounts<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (i, n) in self.0.iter() {
            map.serialize_entry(&bitstring(i, self.0.num_qubits), &n)?;
        }
        map.end()
    }
}

impl Serialize for Counts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Counts", 3)?;
        s.serialize_field("num_qubits", &self.num_qubits)?;
        s.serialize_field("shots", &self.shots)?;
        s.serialize_field("counts", &BitstringCounts(self))?;
        s.end()
    }
}

/// Draws measurement outcomes from a [`StateVector`] without collapsing it.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sampler;

impl Sampler {
    /// Draw `shots` outcomes using the caller's random source.
    pub fn sample<R: Rng + ?Sized>(
        state: &StateVector,
        shots: u64,
        rng: &mut R,
    ) -> SimResult<Counts> {
        if shots == 0 {
            return Err(SimError::InvalidShotCount(shots));
        }
        let dist = distribution(state)?;
        let mut counts = Counts::empty(state.num_qubits());
        for _ in 0..shots {
            counts.record(dist.sample(rng), 1);
        }
        debug!(shots, outcomes = counts.len(), "sampled statevector");
        Ok(counts)
    }

    /// Draw a single outcome.
    pub fn sample_one<R: Rng + ?Sized>(state: &StateVector, rng: &mut R) -> SimResult<usize> {
        Ok(distribution(state)?.sample(rng))
    }

    /// Draw `shots` outcomes on the rayon pool.
    ///
    /// Shots are split into chunks of `sample_chunk_size`; chunk `c` draws
    /// from a `StdRng` seeded with `(seed, c)`. The result depends only on
    /// the state, `shots` and `seed`, never on thread scheduling.
    pub fn sample_parallel(state: &StateVector, shots: u64, seed: u64) -> SimResult<Counts> {
        if shots == 0 {
            return Err(SimError::InvalidShotCount(shots));
        }
        let dist = distribution(state)?;
        let chunk = state.config().sample_chunk_size.max(1);
        let chunks = shots.div_ceil(chunk);
        let n = state.num_qubits();

        let counts = (0..chunks)
            .into_par_iter()
            .map(|c| {
                let mut rng = StdRng::seed_from_u64(derive_seed(seed, c));
                let len = chunk.min(shots - c * chunk);
                let mut local = Counts::empty(n);
                for _ in 0..len {
                    local.record(dist.sample(&mut rng), 1);
                }
                local
            })
            .reduce(|| Counts::empty(n), Counts::merge);

        debug!(shots, chunks, outcomes = counts.len(), "sampled statevector in parallel");
        Ok(counts)
    }
}

/// Mix `stream` into `seed` so neighbouring streams are unrelated.
pub(crate) fn derive_seed(seed: u64, stream: u64) -> u64 {
    let mut z = seed ^ stream.wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Outcome distribution of `state`, rescaled if it drifted past `norm_epsilon`.
fn distribution(state: &StateVector) -> SimResult<WeightedIndex<f64>> {
    let mut probs = state.probabilities();
    let total: f64 = probs.iter().sum();
    if !total.is_finite() || total <= 0.0 {
        return Err(SimError::NormalizationDrift {
            total,
            tolerance: state.config().norm_epsilon,
        });
    }
    if (total - 1.0).abs() > state.config().norm_epsilon {
        warn!(total, "renormalizing outcome distribution before sampling");
        for p in &mut probs {
            *p /= total;
        }
    }
    WeightedIndex::new(&probs).map_err(|_| SimError::NormalizationDrift {
        total,
        tolerance: state.config().norm_epsilon,
    })
}
