//! Shared test utilities for `frontera-core`.

use std::collections::VecDeque;

use frontera_test_support::{
    ci::property_test_profile::ProptestRunProfile,
    graphs::{KARATE_EDGES, KARATE_VERTICES},
};
use proptest::test_runner::Config as ProptestConfig;
use rand::{Rng, SeedableRng, rngs::SmallRng};

use crate::{Graph, Kind, SparseMatrix};

/// Builds a standard proptest configuration from the shared CI profile.
///
/// This keeps property suites aligned on the same `PROGTEST_CASES` and
/// `FRONTERA_PBT_FORK` interpretation.
#[must_use]
pub(crate) fn suite_proptest_config(default_cases: u32) -> ProptestConfig {
    let profile = ProptestRunProfile::load(default_cases, false);
    ProptestConfig {
        cases: profile.cases(),
        fork: profile.fork(),
        ..ProptestConfig::default()
    }
}

/// Builds a matrix holding both directions of every undirected edge.
pub(crate) fn symmetric_matrix(vertices: usize, edges: &[(usize, usize)]) -> SparseMatrix<f64> {
    SparseMatrix::from_triplets(
        vertices,
        vertices,
        edges
            .iter()
            .flat_map(|&(u, v)| [(u, v, 1.0), (v, u, 1.0)]),
    )
    .expect("edges must be in bounds")
}

/// Builds a matrix holding each edge in the given direction only.
pub(crate) fn directed_matrix(vertices: usize, edges: &[(usize, usize)]) -> SparseMatrix<f64> {
    SparseMatrix::from_triplets(vertices, vertices, edges.iter().map(|&(u, v)| (u, v, 1.0)))
        .expect("edges must be in bounds")
}

/// The karate club as an undirected graph.
pub(crate) fn karate() -> Graph<f64> {
    Graph::new(symmetric_matrix(KARATE_VERTICES, KARATE_EDGES), Kind::Undirected)
}

/// Random edge list over `vertices` vertices with roughly `vertices * degree`
/// edges, self-loops included.
pub(crate) fn random_edges(vertices: usize, degree: usize, seed: u64) -> Vec<(usize, usize)> {
    let mut rng = SmallRng::seed_from_u64(seed);
    if vertices == 0 {
        return Vec::new();
    }
    (0..vertices * degree)
        .map(|_| (rng.gen_range(0..vertices), rng.gen_range(0..vertices)))
        .collect()
}

/// Queue-based breadth-first levels used as an oracle.
pub(crate) fn reference_levels<T: crate::EdgeValue>(
    adjacency: &SparseMatrix<T>,
    source: usize,
) -> Vec<Option<usize>> {
    let mut level = vec![None; adjacency.nrows()];
    let mut queue = VecDeque::from([source]);
    level[source] = Some(0);
    while let Some(u) = queue.pop_front() {
        let next = level[u].map(|depth| depth + 1);
        for &v in adjacency.minor_indices(u) {
            if level[v].is_none() {
                level[v] = next;
                queue.push_back(v);
            }
        }
    }
    level
}

/// Labels each vertex with the smallest vertex id reachable over undirected
/// edges, by repeated flood fill.
pub(crate) fn reference_components<T: crate::EdgeValue>(adjacency: &SparseMatrix<T>) -> Vec<usize> {
    let n = adjacency.nrows();
    let mut label = vec![usize::MAX; n];
    for start in 0..n {
        if label[start] != usize::MAX {
            continue;
        }
        label[start] = start;
        let mut stack = vec![start];
        while let Some(u) = stack.pop() {
            for &v in adjacency.minor_indices(u) {
                if label[v] == usize::MAX {
                    label[v] = start;
                    stack.push(v);
                }
            }
        }
    }
    label
}

/// Sequential Brandes dependency accumulation over unweighted edges.
pub(crate) fn reference_betweenness<T: crate::EdgeValue>(
    adjacency: &SparseMatrix<T>,
    sources: &[usize],
) -> Vec<f64> {
    let n = adjacency.nrows();
    let mut centrality = vec![0.0; n];
    for &source in sources {
        let mut sigma = vec![0.0_f64; n];
        let mut depth = vec![usize::MAX; n];
        let mut order = Vec::with_capacity(n);
        let mut queue = VecDeque::from([source]);
        sigma[source] = 1.0;
        depth[source] = 0;
        while let Some(u) = queue.pop_front() {
            order.push(u);
            for &v in adjacency.minor_indices(u) {
                if depth[v] == usize::MAX {
                    depth[v] = depth[u] + 1;
                    queue.push_back(v);
                }
                if depth[v] == depth[u] + 1 {
                    sigma[v] += sigma[u];
                }
            }
        }
        let mut delta = vec![0.0_f64; n];
        for &v in order.iter().rev() {
            for &w in adjacency.minor_indices(v) {
                if depth[w] == depth[v] + 1 {
                    delta[v] += sigma[v] / sigma[w] * (1.0 + delta[w]);
                }
            }
            if v != source {
                centrality[v] += delta[v];
            }
        }
    }
    centrality
}
