//! Configuration for the connected-components solver.

use crate::error::{GraphError, Result};

/// Whether the solver samples a bounded-degree subgraph before the full
/// FastSV pass.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum SamplingPolicy {
    /// Sample when the graph has more than `2 * samples_per_vertex` entries
    /// per vertex on average and more than 1024 vertices.
    #[default]
    Auto,
    /// Always sample, whatever the graph's size.
    Always,
    /// Never sample.
    Never,
}

/// Parameters of [`connected_components`](crate::connected_components).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConnectivityConfig {
    samples_per_vertex: usize,
    hash_samples: usize,
    seed: u64,
    sampling: SamplingPolicy,
}

/// Vertices at or below this count are never sampled under
/// [`SamplingPolicy::Auto`].
pub(super) const SAMPLING_MIN_VERTICES: usize = 1024;

impl ConnectivityConfig {
    /// Overrides how many leading entries of each row the sampled subgraph
    /// keeps.
    ///
    /// # Errors
    /// Returns [`GraphError::InvalidParameters`] when `samples` is zero.
    pub fn with_samples_per_vertex(mut self, samples: usize) -> Result<Self> {
        if samples == 0 {
            return Err(GraphError::parameters(
                "samples_per_vertex must be greater than zero",
            ));
        }
        self.samples_per_vertex = samples;
        Ok(self)
    }

    /// Overrides how many random labels are drawn to find the dominant
    /// sampled component.
    ///
    /// # Errors
    /// Returns [`GraphError::InvalidParameters`] when `samples` is zero.
    pub fn with_hash_samples(mut self, samples: usize) -> Result<Self> {
        if samples == 0 {
            return Err(GraphError::parameters("hash_samples must be greater than zero"));
        }
        self.hash_samples = samples;
        Ok(self)
    }

    /// Seeds the generator used to pick the dominant sampled component.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Overrides the sampling policy.
    #[must_use]
    pub fn with_sampling(mut self, sampling: SamplingPolicy) -> Self {
        self.sampling = sampling;
        self
    }

    /// Leading row entries kept by the sampled subgraph.
    #[must_use]
    #[rustfmt::skip]
    pub fn samples_per_vertex(&self) -> usize { self.samples_per_vertex }

    /// Random labels drawn when choosing the dominant component.
    #[must_use]
    #[rustfmt::skip]
    pub fn hash_samples(&self) -> usize { self.hash_samples }

    /// Seed of the label sampler.
    #[must_use]
    #[rustfmt::skip]
    pub fn seed(&self) -> u64 { self.seed }

    /// Sampling policy.
    #[must_use]
    #[rustfmt::skip]
    pub fn sampling(&self) -> SamplingPolicy { self.sampling }

    /// Whether a graph with `vertices` vertices and `entries` stored entries
    /// should be sampled first.
    pub(super) fn samples(&self, vertices: usize, entries: usize) -> bool {
        match self.sampling {
            SamplingPolicy::Always => vertices > 0,
            SamplingPolicy::Never => false,
            SamplingPolicy::Auto => {
                entries > vertices.saturating_mul(self.samples_per_vertex).saturating_mul(2)
                    && vertices > SAMPLING_MIN_VERTICES
            }
        }
    }
}

impl Default for ConnectivityConfig {
    fn default() -> Self {
        Self {
            samples_per_vertex: 4,
            hash_samples: 864,
            seed: 0x5eed_f457,
            sampling: SamplingPolicy::Auto,
        }
    }
}
