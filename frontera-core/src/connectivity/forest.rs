//! FastSV hooking and shortcutting over a row-compressed structure.

use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;
use tracing::debug;

/// Borrowed row-compressed structure. Indices inside a row need not be
/// sorted.
#[derive(Clone, Copy, Debug)]
pub(super) struct Rows<'a> {
    offsets: &'a [usize],
    indices: &'a [usize],
}

impl<'a> Rows<'a> {
    /// `offsets` holds one entry per row plus a terminator.
    pub(super) fn new(offsets: &'a [usize], indices: &'a [usize]) -> Self {
        Self { offsets, indices }
    }

    pub(super) fn len(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    pub(super) fn entries(&self) -> usize {
        self.offsets.last().copied().unwrap_or(0)
    }

    pub(super) fn row(&self, vertex: usize) -> &'a [usize] {
        &self.indices[self.offsets[vertex]..self.offsets[vertex + 1]]
    }
}

/// Parent forest carried across FastSV passes.
///
/// `parent[v] <= v` holds throughout and every parent lies in the same
/// component as its child. `snapshot` is the parent vector as of the end of
/// the previous round; it equals `parent` between passes.
#[derive(Debug)]
pub(super) struct Forest {
    parent: Vec<AtomicUsize>,
    snapshot: Vec<usize>,
    grandparent: Vec<usize>,
    next_grandparent: Vec<usize>,
    min_neighbour_grandparent: Vec<usize>,
}

impl Forest {
    /// Points every vertex at the smallest of itself and its neighbours.
    pub(super) fn new(rows: Rows<'_>) -> Self {
        let initial: Vec<usize> = (0..rows.len())
            .into_par_iter()
            .map(|vertex| rows.row(vertex).iter().copied().fold(vertex, usize::min))
            .collect();
        Self {
            parent: initial.par_iter().map(|&p| AtomicUsize::new(p)).collect(),
            grandparent: initial.clone(),
            next_grandparent: vec![0; initial.len()],
            min_neighbour_grandparent: initial.clone(),
            snapshot: initial,
        }
    }

    /// Component label of every vertex as of the last completed pass.
    pub(super) fn labels(&self) -> &[usize] {
        &self.snapshot
    }

    pub(super) fn into_labels(self) -> Vec<usize> {
        self.snapshot
    }

    /// Hooks and shortcuts over `rows` until the grandparent vector stops
    /// changing. Returns the number of rounds taken.
    pub(super) fn converge(&mut self, rows: Rows<'_>) -> usize {
        let mut rounds = 0_usize;
        loop {
            rounds += 1;

            let grandparent = &self.grandparent;
            self.min_neighbour_grandparent
                .par_iter_mut()
                .enumerate()
                .for_each(|(vertex, best)| {
                    *best = rows
                        .row(vertex)
                        .iter()
                        .map(|&neighbour| grandparent[neighbour])
                        .fold(*best, usize::min);
                });

            // Stochastic hooking: each vertex offers its best grandparent to
            // the root it pointed at when the round started.
            let parent = &self.parent;
            let offers = &self.min_neighbour_grandparent;
            self.snapshot.par_iter().enumerate().for_each(|(vertex, &root)| {
                parent[root].fetch_min(offers[vertex], Ordering::Relaxed);
            });

            self.parent
                .par_iter_mut()
                .zip(self.min_neighbour_grandparent.par_iter())
                .zip(self.grandparent.par_iter())
                .for_each(|((slot, &offer), &grand)| {
                    let current = slot.get_mut();
                    *current = (*current).min(offer).min(grand);
                });

            self.snapshot
                .par_iter_mut()
                .zip(self.parent.par_iter())
                .for_each(|(seen, slot)| *seen = slot.load(Ordering::Relaxed));
            let snapshot = &self.snapshot;
            self.next_grandparent
                .par_iter_mut()
                .zip(snapshot.par_iter())
                .for_each(|(grand, &p)| *grand = snapshot[p]);

            let settled = self
                .next_grandparent
                .par_iter()
                .zip(self.grandparent.par_iter())
                .all(|(next, current)| next == current);
            debug!(round = rounds, settled, "fastsv round completed");
            if settled {
                return rounds;
            }
            std::mem::swap(&mut self.grandparent, &mut self.next_grandparent);
        }
    }
}
