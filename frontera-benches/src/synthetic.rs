//! Seeded random graphs for benchmarking.
//!
//! Vertices are split into contiguous blocks, one per component. Each block
//! is connected by a random recursive tree and then densified with random
//! intra-block edges, so the component count is exact while the degree
//! distribution stays irregular. Generation is reproducible from the seed.

use frontera_core::{Graph, GraphError, Kind, SparseMatrix};
use rand::{Rng, SeedableRng, rngs::SmallRng};

/// Errors that may occur during synthetic graph generation.
#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum SyntheticError {
    /// The requested vertex count was zero.
    #[error("vertex count must be greater than zero")]
    ZeroVertices,
    /// The component count was zero or exceeded the vertex count.
    #[error("component count must be between 1 and {vertex_count}, got {components}")]
    InvalidComponents {
        /// Requested number of components.
        components: usize,
        /// Requested number of vertices.
        vertex_count: usize,
    },
    /// The generated triplets were rejected.
    #[error("graph construction failed: {0}")]
    Graph(#[from] GraphError),
}

/// Configuration for synthetic graph generation.
#[derive(Clone, Debug)]
pub struct SyntheticGraphConfig {
    /// Number of vertices.
    pub vertex_count: usize,
    /// Random edges drawn per vertex on top of the spanning tree.
    pub average_degree: usize,
    /// Number of connected components.
    pub components: usize,
    /// Edge interpretation. Undirected graphs store both directions.
    pub kind: Kind,
    /// RNG seed for reproducibility.
    pub seed: u64,
}

/// Generates a graph with unit weights from `config`.
///
/// # Errors
/// Returns [`SyntheticError::ZeroVertices`] or
/// [`SyntheticError::InvalidComponents`] for unusable configurations.
///
/// # Examples
/// ```
/// use frontera_benches::synthetic::{SyntheticGraphConfig, generate};
/// use frontera_core::Kind;
///
/// let config = SyntheticGraphConfig {
///     vertex_count: 100,
///     average_degree: 4,
///     components: 2,
///     kind: Kind::Undirected,
///     seed: 42,
/// };
/// let graph = generate(&config).expect("valid config");
/// assert_eq!(graph.vertex_count(), 100);
/// ```
pub fn generate(config: &SyntheticGraphConfig) -> Result<Graph<f64>, SyntheticError> {
    let n = config.vertex_count;
    if n == 0 {
        return Err(SyntheticError::ZeroVertices);
    }
    if config.components == 0 || config.components > n {
        return Err(SyntheticError::InvalidComponents {
            components: config.components,
            vertex_count: n,
        });
    }

    let mut rng = SmallRng::seed_from_u64(config.seed);
    let mut edges = Vec::with_capacity(n.saturating_mul(config.average_degree.saturating_add(1)));
    for block in 0..config.components {
        let start = block_start(n, config.components, block);
        let end = block_start(n, config.components, block + 1);
        for v in start.saturating_add(1)..end {
            edges.push((rng.gen_range(start..v), v));
        }
        if end - start < 2 {
            continue;
        }
        for _ in 0..(end - start).saturating_mul(config.average_degree) {
            let u = rng.gen_range(start..end);
            let v = rng.gen_range(start..end);
            if u != v {
                edges.push((u, v));
            }
        }
    }

    let triplets: Vec<(usize, usize, f64)> = match config.kind {
        Kind::Undirected => edges
            .iter()
            .flat_map(|&(u, v)| [(u, v, 1.0), (v, u, 1.0)])
            .collect(),
        Kind::Directed => edges.iter().map(|&(u, v)| (u, v, 1.0)).collect(),
    };
    let adjacency = SparseMatrix::from_triplets(n, n, triplets)?;
    Ok(Graph::new(adjacency, config.kind))
}

fn block_start(n: usize, blocks: usize, block: usize) -> usize {
    n.saturating_mul(block).checked_div(blocks).unwrap_or(n)
}
