//! Direction-optimising breadth-first search.
//!
//! Each step advances the frontier either by scattering along the outgoing
//! edges of its members ("push") or by letting every unvisited vertex scan
//! its incoming edges for a frontier member ("pull"). The choice is made
//! per step from the frontier size and the number of edges still
//! unexplored. Pull steps need the incoming-edge view of the graph and the
//! heuristic needs the cached out-degree; when either is missing the
//! traversal pushes throughout.

mod config;

use std::{
    fmt,
    sync::atomic::{AtomicUsize, Ordering},
};

use rayon::prelude::*;
use tracing::{Span, debug, field, info, instrument};

use crate::{
    error::{GraphError, Result},
    frontier::Frontier,
    graph::Graph,
    matrix::{EdgeValue, SparseMatrix},
};

pub use self::config::{DirectionPolicy, TraversalConfig, TraversalRequest};

const UNVISITED: usize = usize::MAX;

/// Counters describing how a traversal proceeded.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct TraversalStats {
    steps: usize,
    push_steps: usize,
    pull_steps: usize,
    direction_switches: usize,
    visited: usize,
}

impl TraversalStats {
    /// Number of frontier expansions performed.
    #[must_use]
    #[rustfmt::skip]
    pub fn steps(&self) -> usize { self.steps }

    /// Expansions performed by scanning outgoing edges.
    #[must_use]
    #[rustfmt::skip]
    pub fn push_steps(&self) -> usize { self.push_steps }

    /// Expansions performed by scanning incoming edges.
    #[must_use]
    #[rustfmt::skip]
    pub fn pull_steps(&self) -> usize { self.pull_steps }

    /// Number of times consecutive steps changed direction.
    #[must_use]
    #[rustfmt::skip]
    pub fn direction_switches(&self) -> usize { self.direction_switches }

    /// Vertices reached, including the source.
    #[must_use]
    #[rustfmt::skip]
    pub fn visited(&self) -> usize { self.visited }
}

/// Output of [`breadth_first_search`].
///
/// Unreached vertices hold `None`. The source has level 0 and is its own
/// parent.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TraversalResult {
    level: Option<Vec<Option<usize>>>,
    parent: Option<Vec<Option<usize>>>,
    stats: TraversalStats,
}

impl TraversalResult {
    /// Hop distance from the source, when levels were requested.
    #[must_use]
    pub fn level(&self) -> Option<&[Option<usize>]> {
        self.level.as_deref()
    }

    /// Predecessor on a shortest path from the source, when parents were
    /// requested.
    #[must_use]
    pub fn parent(&self) -> Option<&[Option<usize>]> {
        self.parent.as_deref()
    }

    /// Step counters.
    #[must_use]
    #[rustfmt::skip]
    pub fn stats(&self) -> TraversalStats { self.stats }

    /// Splits the result into its level and parent vectors.
    #[must_use]
    pub fn into_parts(self) -> (Option<Vec<Option<usize>>>, Option<Vec<Option<usize>>>) {
        (self.level, self.parent)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Direction {
    Push,
    Pull,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Push => "push",
            Self::Pull => "pull",
        })
    }
}

/// Push/pull state machine driven by frontier sizes.
#[derive(Clone, Debug)]
struct DirectionSwitch {
    push: bool,
    enabled: bool,
    any_pull: bool,
    edges_unexplored: usize,
    last_len: usize,
    vertex_count: usize,
    alpha: usize,
    n_over_beta1: usize,
    n_over_beta2: usize,
}

impl DirectionSwitch {
    fn new(vertex_count: usize, edge_count: usize, enabled: bool, config: &TraversalConfig) -> Self {
        Self {
            push: true,
            enabled,
            any_pull: false,
            edges_unexplored: edge_count,
            last_len: 0,
            vertex_count,
            alpha: config.alpha(),
            n_over_beta1: vertex_count / config.beta1(),
            n_over_beta2: vertex_count / config.beta2(),
        }
    }

    /// Picks the direction for expanding a frontier of `len` vertices.
    ///
    /// `frontier_edges` is only evaluated while no pull step has happened.
    fn decide(&mut self, len: usize, frontier_edges: impl FnOnce() -> usize) -> Direction {
        if self.enabled {
            if self.push {
                let growing = len > self.last_len;
                if self.edges_unexplored < self.vertex_count {
                    // Too few edges remain for a pull step to pay off.
                    self.enabled = false;
                } else if self.any_pull {
                    self.push = !(growing && len > self.n_over_beta1);
                } else {
                    let edges = frontier_edges();
                    self.edges_unexplored = self.edges_unexplored.saturating_sub(edges);
                    self.push = !(growing && edges.saturating_mul(self.alpha) > self.edges_unexplored);
                }
            } else {
                let shrinking = len < self.last_len;
                self.push = shrinking && len <= self.n_over_beta2;
            }
        }
        self.any_pull |= !self.push;
        self.last_len = len;
        if self.push { Direction::Push } else { Direction::Pull }
    }
}

/// Per-vertex parent and level slots shared by the parallel kernels.
struct VisitState {
    parent: Vec<AtomicUsize>,
    level: Vec<AtomicUsize>,
}

impl VisitState {
    fn new(vertex_count: usize, source: usize) -> Self {
        let parent: Vec<AtomicUsize> = (0..vertex_count).map(|_| AtomicUsize::new(UNVISITED)).collect();
        let level: Vec<AtomicUsize> = (0..vertex_count).map(|_| AtomicUsize::new(UNVISITED)).collect();
        parent[source].store(source, Ordering::Relaxed);
        level[source].store(0, Ordering::Relaxed);
        Self { parent, level }
    }

    fn is_visited(&self, vertex: usize) -> bool {
        self.parent[vertex].load(Ordering::Relaxed) != UNVISITED
    }

    /// Claims `vertex` for `parent`. Exactly one concurrent caller wins.
    fn claim(&self, vertex: usize, parent: usize, depth: usize) -> bool {
        if self.is_visited(vertex) {
            return false;
        }
        let won = self.parent[vertex]
            .compare_exchange(UNVISITED, parent, Ordering::AcqRel, Ordering::Relaxed)
            .is_ok();
        if won {
            self.level[vertex].store(depth, Ordering::Relaxed);
        }
        won
    }

    /// Records a vertex settled by its own pull scan.
    fn settle(&self, vertex: usize, parent: usize, depth: usize) {
        self.parent[vertex].store(parent, Ordering::Relaxed);
        self.level[vertex].store(depth, Ordering::Relaxed);
    }

    fn into_outputs(self, request: TraversalRequest) -> (Option<Vec<Option<usize>>>, Option<Vec<Option<usize>>>) {
        let unpack = |slots: Vec<AtomicUsize>| -> Vec<Option<usize>> {
            slots
                .into_par_iter()
                .map(|slot| Some(slot.into_inner()).filter(|&value| value != UNVISITED))
                .collect()
        };
        let level = request.level().then(|| unpack(self.level));
        let parent = request.parent().then(|| unpack(self.parent));
        (level, parent)
    }
}

fn push_step<T: EdgeValue>(
    adjacency: &SparseMatrix<T>,
    members: &[usize],
    visit: &VisitState,
    depth: usize,
) -> Frontier {
    let next = members
        .par_iter()
        .flat_map_iter(|&u| {
            adjacency
                .minor_indices(u)
                .iter()
                .copied()
                .filter(move |&v| visit.claim(v, u, depth))
        })
        .collect();
    Frontier::Sparse(next)
}

fn pull_step<T: EdgeValue>(
    incoming: &SparseMatrix<T>,
    present: &[bool],
    visit: &VisitState,
    depth: usize,
) -> Frontier {
    let next: Vec<bool> = (0..incoming.nrows())
        .into_par_iter()
        .map(|v| {
            if visit.is_visited(v) {
                return false;
            }
            match incoming.minor_indices(v).iter().find(|&&u| present[u]) {
                Some(&u) => {
                    visit.settle(v, u, depth);
                    true
                }
                None => false,
            }
        })
        .collect();
    let len = next.par_iter().filter(|&&member| member).count();
    Frontier::Dense { present: next, len }
}

#[cfg(feature = "metrics")]
fn record_switch() {
    metrics::counter!("frontera_bfs_direction_switches").increment(1);
}

#[cfg(not(feature = "metrics"))]
fn record_switch() {}

/// Runs a breadth-first search from `source`.
///
/// Levels and/or parents are produced according to `request`. When two
/// frontier members reach the same vertex in one step, which of them becomes
/// its parent is unspecified; every reported parent is an in-neighbour one
/// level closer to the source.
///
/// # Errors
/// Returns [`GraphError::InvalidStructure`] when [`Graph::check`] fails and
/// [`GraphError::InvalidSource`] when `source` is not a vertex.
///
/// # Examples
/// ```
/// use frontera_core::{Graph, Kind, SparseMatrix, TraversalConfig, TraversalRequest, breadth_first_search};
///
/// let adjacency = SparseMatrix::from_triplets(3, 3, [(0, 1, 1_u8), (1, 2, 1)])
///     .expect("triplets must be in bounds");
/// let graph = Graph::new(adjacency, Kind::Directed);
/// let result = breadth_first_search(&graph, 0, TraversalRequest::LEVELS, &TraversalConfig::default())
///     .expect("source must be valid");
/// assert_eq!(result.level(), Some([Some(0), Some(1), Some(2)].as_slice()));
/// ```
#[instrument(
    name = "bfs.run",
    err,
    skip(graph, config),
    fields(
        vertices = graph.vertex_count(),
        policy = ?config.policy(),
        steps = field::Empty,
        visited = field::Empty,
    ),
)]
pub fn breadth_first_search<T: EdgeValue>(
    graph: &Graph<T>,
    source: usize,
    request: TraversalRequest,
    config: &TraversalConfig,
) -> Result<TraversalResult> {
    graph.check()?;
    let n = graph.vertex_count();
    if source >= n {
        return Err(GraphError::InvalidSource {
            vertex: source,
            vertex_count: n,
        });
    }
    if !request.any() {
        return Ok(TraversalResult::default());
    }

    let adjacency = graph.adjacency();
    let out_degree = graph.out_degree();
    let incoming = graph.incoming();
    let adaptive = config.policy() == DirectionPolicy::Adaptive;
    let pull_view = match (adaptive, out_degree, incoming) {
        (true, Some(degree), Some(matrix)) => Some((degree, matrix)),
        _ => None,
    };
    if adaptive && pull_view.is_none() {
        debug!("out-degree or incoming edges unavailable, pushing throughout");
    }

    let mut switch = DirectionSwitch::new(n, graph.edge_count(), pull_view.is_some(), config);
    let visit = VisitState::new(n, source);
    let mut frontier = Frontier::Sparse(vec![source]);
    let mut stats = TraversalStats {
        visited: 1,
        ..TraversalStats::default()
    };
    let mut previous = Direction::Push;

    while stats.visited < n {
        let depth = stats.steps + 1;
        let direction = match pull_view {
            Some((degree, _)) => switch.decide(frontier.len(), || frontier.degree_sum(degree)),
            None => Direction::Push,
        };
        if direction != previous {
            stats.direction_switches += 1;
            record_switch();
            debug!(depth, frontier = frontier.len(), %direction, "direction switched");
        }
        previous = direction;

        frontier = match (direction, pull_view) {
            (Direction::Pull, Some((_, matrix))) => {
                stats.pull_steps += 1;
                pull_step(matrix, &frontier.into_dense(n), &visit, depth)
            }
            _ => {
                stats.push_steps += 1;
                push_step(adjacency, &frontier.into_sparse(), &visit, depth)
            }
        };
        stats.steps = depth;
        if frontier.is_empty() {
            break;
        }
        stats.visited += frontier.len();
    }

    let span = Span::current();
    span.record("steps", stats.steps);
    span.record("visited", stats.visited);
    info!(
        steps = stats.steps,
        visited = stats.visited,
        pull_steps = stats.pull_steps,
        "breadth-first search completed"
    );

    let (level, parent) = visit.into_outputs(request);
    Ok(TraversalResult { level, parent, stats })
}

#[cfg(test)]
mod tests;

#[cfg(test)]
mod property;
