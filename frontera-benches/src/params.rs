//! Benchmark parameter types used as Criterion benchmark ids.

use std::fmt;

/// Size of a synthetic graph benchmark input.
#[derive(Clone, Debug)]
pub struct GraphBenchParams {
    /// Number of vertices.
    pub vertex_count: usize,
    /// Mean number of random neighbours drawn per vertex.
    pub average_degree: usize,
}

impl fmt::Display for GraphBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n={},d={}", self.vertex_count, self.average_degree)
    }
}

/// Parameters for a betweenness benchmark run.
#[derive(Clone, Debug)]
pub struct BatchBenchParams {
    /// Number of vertices.
    pub vertex_count: usize,
    /// Number of sources in the batch.
    pub batch: usize,
}

impl fmt::Display for BatchBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n={},batch={}", self.vertex_count, self.batch)
    }
}
