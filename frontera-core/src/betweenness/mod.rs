//! Batched Brandes betweenness centrality.
//!
//! Every source owns a lane of dense per-vertex arrays. The forward phase
//! advances all lanes one hop at a time, counting shortest paths and
//! recording which vertices each lane reached at each depth. The backward
//! phase walks the recorded depths in reverse and accumulates dependencies.
//! Both phases choose per hop between scanning outgoing edges of the active
//! vertices ("push") and scanning incoming edges of candidate vertices
//! ("pull") from the density of the active set across all lanes. Edge
//! weights are ignored.

mod lane;

use rayon::prelude::*;
use tracing::{Span, debug, field, info, instrument};

use crate::{
    error::{GraphError, Result},
    graph::Graph,
    matrix::EdgeValue,
};

use self::lane::Lane;

/// Forward density above which a push hop switches to pull.
const FORWARD_PULL_DENSITY: f64 = 0.10;
/// Forward density above which a pull hop stays in pull.
const FORWARD_STAY_PULL_DENSITY: f64 = 0.06;

/// Backward rule: the pull kernel pays off either when the active set is
/// fairly dense and larger than the target depth, or when it is sparser but
/// much larger than the target depth.
fn backward_pulls(w_density: f64, w_to_s_ratio: f64) -> bool {
    (w_density > 0.1 && w_to_s_ratio > 1.0) || (w_density > 0.01 && w_to_s_ratio > 10.0)
}

fn forward_pulls(density: f64, last_was_pull: bool) -> bool {
    if last_was_pull {
        density > FORWARD_STAY_PULL_DENSITY
    } else {
        density > FORWARD_PULL_DENSITY
    }
}

#[cfg(feature = "metrics")]
fn record_depth(depth: usize) {
    metrics::counter!("frontera_betweenness_depth").increment(depth as u64);
}

#[cfg(not(feature = "metrics"))]
fn record_depth(_depth: usize) {}

/// Computes unnormalised betweenness centrality from a batch of sources.
///
/// `centrality[v]` is the sum over the sources `s` of the Brandes dependency
/// `δ_s(v)`: the fraction of shortest `s → t` paths through `v`, summed over
/// all targets `t`. Sources contribute nothing to their own score, and a
/// source listed twice counts twice. An empty batch yields all zeros.
///
/// # Errors
/// Returns [`GraphError::InvalidStructure`] when [`Graph::check`] fails,
/// [`GraphError::MissingTranspose`] when the graph is directed, not known to
/// have symmetric structure and has no cached transpose, and
/// [`GraphError::InvalidSource`] when a source is not a vertex.
///
/// # Examples
/// ```
/// use frontera_core::{Graph, Kind, SparseMatrix, betweenness_centrality};
///
/// // Path 0 - 1 - 2: every shortest path between the ends crosses vertex 1.
/// let adjacency = SparseMatrix::from_triplets(
///     3,
///     3,
///     [(0, 1, 1_u8), (1, 0, 1), (1, 2, 1), (2, 1, 1)],
/// )
/// .expect("triplets must be in bounds");
/// let graph = Graph::new(adjacency, Kind::Undirected);
/// let centrality = betweenness_centrality(&graph, &[0, 2]).expect("sources must be valid");
/// assert_eq!(centrality, vec![0.0, 2.0, 0.0]);
/// ```
#[instrument(
    name = "betweenness.run",
    err,
    skip(graph, sources),
    fields(
        vertices = graph.vertex_count(),
        sources = sources.len(),
        depth = field::Empty,
    ),
)]
pub fn betweenness_centrality<T: EdgeValue>(graph: &Graph<T>, sources: &[usize]) -> Result<Vec<f64>> {
    graph.check()?;
    let incoming = graph.incoming().ok_or(GraphError::MissingTranspose)?;
    let adjacency = graph.adjacency();
    let n = graph.vertex_count();
    if let Some(&vertex) = sources.iter().find(|&&source| source >= n) {
        return Err(GraphError::InvalidSource {
            vertex,
            vertex_count: n,
        });
    }
    if sources.is_empty() {
        return Ok(vec![0.0; n]);
    }

    let lane_cells = (sources.len() * n) as f64;
    let mut lanes: Vec<Lane> = sources
        .par_iter()
        .map(|&source| Lane::start(source, adjacency))
        .collect();

    let mut frontier_size: usize = lanes.iter().map(Lane::frontier_len).sum();
    let mut last_was_pull = false;
    let mut depth = 0_usize;
    while frontier_size > 0 && depth < n {
        let density = frontier_size as f64 / lane_cells;
        let pull = forward_pulls(density, last_was_pull);
        if pull != last_was_pull {
            debug!(depth, density, pull, "forward direction switched");
        }
        lanes
            .par_iter_mut()
            .for_each(|lane| lane.advance(adjacency, incoming, pull));
        last_was_pull = pull;
        frontier_size = lanes.iter().map(Lane::frontier_len).sum();
        depth += 1;
    }
    Span::current().record("depth", depth);
    record_depth(depth);

    for level in (1..depth).rev() {
        let w_size: usize = lanes.iter().map(|lane| lane.snapshot_len(level)).sum();
        let s_size: usize = lanes.iter().map(|lane| lane.snapshot_len(level - 1)).sum();
        let w_density = w_size as f64 / lane_cells;
        let w_to_s_ratio = w_size as f64 / s_size as f64;
        let pull = backward_pulls(w_density, w_to_s_ratio);
        lanes
            .par_iter_mut()
            .for_each(|lane| lane.accumulate(level, adjacency, incoming, pull));
    }

    let offset = sources.len() as f64;
    let centrality: Vec<f64> = (0..n)
        .into_par_iter()
        .map(|vertex| lanes.iter().map(|lane| lane.dependency(vertex)).sum::<f64>() - offset)
        .collect();
    info!(depth, sources = sources.len(), "betweenness centrality completed");
    Ok(centrality)
}
