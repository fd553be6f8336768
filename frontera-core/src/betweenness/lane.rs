//! Per-source working set for the batched betweenness computation.

use rayon::prelude::*;

use crate::matrix::{EdgeValue, SparseMatrix};

const NOT_REACHED: usize = usize::MAX;

/// Dense arrays owned by one source.
///
/// `paths[v]` is the number of shortest paths from the source to `v`; zero
/// marks a vertex not reached yet. `snapshots[d]` lists the vertices first
/// reached by hop `d + 1` and `depth_of[v]` is the index of the snapshot that
/// holds `v`. `scratch` and `gather` are accumulators that every kernel
/// leaves zeroed.
#[derive(Debug)]
pub(super) struct Lane {
    paths: Vec<f64>,
    depth_of: Vec<usize>,
    snapshots: Vec<Vec<usize>>,
    frontier: Vec<(usize, f64)>,
    dependency: Vec<f64>,
    scratch: Vec<f64>,
    gather: Vec<f64>,
}

impl Lane {
    /// Seeds the lane with `source` and takes the first hop along its
    /// outgoing edges.
    pub(super) fn start<T: EdgeValue>(source: usize, adjacency: &SparseMatrix<T>) -> Self {
        let n = adjacency.nrows();
        let mut lane = Self {
            paths: vec![0.0; n],
            depth_of: vec![NOT_REACHED; n],
            snapshots: Vec::new(),
            frontier: vec![(source, 1.0)],
            dependency: vec![1.0; n],
            scratch: vec![0.0; n],
            gather: vec![0.0; n],
        };
        lane.paths[source] = 1.0;
        lane.frontier = lane.push_hop(adjacency);
        lane
    }

    pub(super) fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    pub(super) fn snapshot_len(&self, depth: usize) -> usize {
        self.snapshots.get(depth).map_or(0, Vec::len)
    }

    /// Accumulated `1 + δ(vertex)` for this lane's source.
    pub(super) fn dependency(&self, vertex: usize) -> f64 {
        self.dependency[vertex]
    }

    /// Records the current frontier and replaces it with the next hop.
    pub(super) fn advance<T: EdgeValue>(
        &mut self,
        adjacency: &SparseMatrix<T>,
        incoming: &SparseMatrix<T>,
        pull: bool,
    ) {
        let depth = self.snapshots.len();
        let mut members = Vec::with_capacity(self.frontier.len());
        for &(vertex, count) in &self.frontier {
            self.paths[vertex] += count;
            self.depth_of[vertex] = depth;
            members.push(vertex);
        }
        self.snapshots.push(members);
        self.frontier = if pull {
            self.pull_hop(incoming)
        } else {
            self.push_hop(adjacency)
        };
    }

    /// Adds the dependencies carried from snapshot `depth` to snapshot
    /// `depth - 1`.
    pub(super) fn accumulate<T: EdgeValue>(
        &mut self,
        depth: usize,
        adjacency: &SparseMatrix<T>,
        incoming: &SparseMatrix<T>,
        pull: bool,
    ) {
        let (Some(active), Some(targets)) = (self.snapshots.get(depth), self.snapshots.get(depth - 1))
        else {
            return;
        };
        for &vertex in active {
            self.scratch[vertex] = self.dependency[vertex] / self.paths[vertex];
        }

        if pull {
            let scratch = &self.scratch;
            let depth_of = &self.depth_of;
            let updates: Vec<(usize, f64)> = targets
                .par_iter()
                .filter_map(|&u| {
                    let mut found = false;
                    let mut sum = 0.0;
                    for &v in adjacency.minor_indices(u) {
                        if depth_of[v] == depth {
                            found = true;
                            sum += scratch[v];
                        }
                    }
                    found.then_some((u, sum))
                })
                .collect();
            for (u, sum) in updates {
                self.dependency[u] += sum * self.paths[u];
            }
        } else {
            let mut touched = Vec::new();
            for &v in active {
                let weight = self.scratch[v];
                for &u in incoming.minor_indices(v) {
                    if self.depth_of[u] == depth - 1 {
                        if self.gather[u] == 0.0 {
                            touched.push(u);
                        }
                        self.gather[u] += weight;
                    }
                }
            }
            for u in touched {
                self.dependency[u] += self.gather[u] * self.paths[u];
                self.gather[u] = 0.0;
            }
        }

        for &vertex in active {
            self.scratch[vertex] = 0.0;
        }
    }

    /// Path counts one hop out along outgoing edges, restricted to vertices
    /// without a path count.
    fn push_hop<T: EdgeValue>(&mut self, adjacency: &SparseMatrix<T>) -> Vec<(usize, f64)> {
        let mut touched = Vec::new();
        for &(u, count) in &self.frontier {
            for &v in adjacency.minor_indices(u) {
                if self.paths[v] == 0.0 {
                    if self.scratch[v] == 0.0 {
                        touched.push(v);
                    }
                    self.scratch[v] += count;
                }
            }
        }
        touched
            .into_iter()
            .map(|v| (v, std::mem::take(&mut self.scratch[v])))
            .collect()
    }

    /// Same hop as [`Self::push_hop`], computed by letting every vertex
    /// without a path count sum its in-neighbours' frontier counts.
    fn pull_hop<T: EdgeValue>(&mut self, incoming: &SparseMatrix<T>) -> Vec<(usize, f64)> {
        for &(u, count) in &self.frontier {
            self.scratch[u] = count;
        }
        let paths = &self.paths;
        let scratch = &self.scratch;
        let next: Vec<(usize, f64)> = (0..paths.len())
            .into_par_iter()
            .filter_map(|v| {
                if paths[v] != 0.0 {
                    return None;
                }
                let mut found = false;
                let mut sum = 0.0;
                for &u in incoming.minor_indices(v) {
                    let count = scratch[u];
                    if count != 0.0 {
                        found = true;
                        sum += count;
                    }
                }
                found.then_some((v, sum))
            })
            .collect();
        for &(u, _) in &self.frontier {
            self.scratch[u] = 0.0;
        }
        next
    }
}
