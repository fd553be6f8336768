//! Bounded-degree sampling and the dominant-component rewrite.
//!
//! Most edges of a large graph usually belong to one giant component. A
//! FastSV pass over the first few entries of every row finds most of that
//! component cheaply; the dominant sampled label is then estimated from a
//! random draw and every edge into it is replaced by a single edge to its
//! root, so the full pass only has to settle what sampling missed.

use std::collections::HashMap;

use rand::{Rng, SeedableRng, rngs::SmallRng};
use rayon::prelude::*;
use tracing::{Span, debug, field, instrument};

use crate::{
    error::Result,
    partition::{partition_count, prefix_sum, ranges, split_by_counts},
};

use super::{
    config::ConnectivityConfig,
    forest::{Forest, Rows},
};

/// Row-compressed structure produced by a partitioned build.
#[derive(Debug)]
pub(super) struct OwnedRows {
    offsets: Vec<usize>,
    indices: Vec<usize>,
}

impl OwnedRows {
    pub(super) fn view(&self) -> Rows<'_> {
        Rows::new(&self.offsets, &self.indices)
    }
}

/// Lays out rows of known lengths and fills them one partition per worker.
///
/// `fill(vertex, out)` receives exactly `row_len[vertex]` slots.
fn build_rows<F>(row_len: &[usize], fill: F) -> Result<OwnedRows>
where
    F: Fn(usize, &mut [usize]) + Sync,
{
    let vertices = row_len.len();
    let offsets = prefix_sum(row_len);
    let parts = ranges(vertices, partition_count(vertices));
    let totals: Vec<usize> = parts
        .iter()
        .map(|range| offsets[range.end] - offsets[range.start])
        .collect();
    let mut indices = vec![0_usize; offsets[vertices]];
    let slices = split_by_counts(&mut indices, &totals)?;
    parts
        .into_par_iter()
        .zip(slices)
        .for_each(|(range, slice)| {
            let base = offsets[range.start];
            for vertex in range {
                fill(vertex, &mut slice[offsets[vertex] - base..offsets[vertex + 1] - base]);
            }
        });
    Ok(OwnedRows { offsets, indices })
}

/// Keeps the first `samples` entries of every row.
fn bounded_sample(rows: Rows<'_>, samples: usize) -> Result<OwnedRows> {
    let row_len: Vec<usize> = (0..rows.len())
        .into_par_iter()
        .map(|vertex| rows.row(vertex).len().min(samples))
        .collect();
    build_rows(&row_len, |vertex, out| {
        out.copy_from_slice(&rows.row(vertex)[..out.len()]);
    })
}

/// Most frequent label among `draws` uniformly drawn vertices.
///
/// Ties go to the label that first reached the winning count.
fn dominant_label(labels: &[usize], draws: usize, seed: u64) -> Option<usize> {
    if labels.is_empty() {
        return None;
    }
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut counts: HashMap<usize, usize> = HashMap::new();
    let mut best = None;
    let mut best_count = 0_usize;
    for _ in 0..draws {
        let label = labels[rng.gen_range(0..labels.len())];
        let count = counts.entry(label).or_insert(0);
        *count += 1;
        if *count > best_count {
            best_count = *count;
            best = Some(label);
        }
    }
    best
}

/// Rewrites `rows` around the dominant label `key`.
///
/// Rows labelled `key` lose all their entries. Any other row keeps the
/// neighbours not labelled `key` and, when it dropped at least one, gains a
/// single entry to `key`. Row `key` lists every row that gained such an
/// entry so the rewritten structure stays symmetric. Without those entries
/// `key` could not take a smaller label from a redirected row, and the final
/// labels would not be guaranteed to be component minima.
fn rewrite(rows: Rows<'_>, labels: &[usize], key: usize) -> Result<OwnedRows> {
    let mut row_len: Vec<usize> = (0..rows.len())
        .into_par_iter()
        .map(|vertex| {
            if labels[vertex] == key {
                return 0;
            }
            let row = rows.row(vertex);
            let kept = row.iter().filter(|&&neighbour| labels[neighbour] != key).count();
            kept + usize::from(kept < row.len())
        })
        .collect();
    let redirected: Vec<usize> = (0..rows.len())
        .into_par_iter()
        .filter(|&vertex| {
            labels[vertex] != key
                && rows
                    .row(vertex)
                    .iter()
                    .any(|&neighbour| labels[neighbour] == key)
        })
        .collect();
    row_len[key] = redirected.len();

    build_rows(&row_len, |vertex, out| {
        if vertex == key {
            out.copy_from_slice(&redirected);
            return;
        }
        if out.is_empty() {
            return;
        }
        let mut written = 0;
        for &neighbour in rows.row(vertex) {
            if labels[neighbour] != key {
                out[written] = neighbour;
                written += 1;
            }
        }
        if written < out.len() {
            out[written] = key;
        }
    })
}

/// Runs FastSV over a bounded-degree sample of `rows`, then returns `rows`
/// rewritten around the dominant sampled component together with the
/// number of rounds spent on the sample.
#[instrument(
    name = "connectivity.sample",
    err,
    skip_all,
    fields(
        samples = config.samples_per_vertex(),
        key = field::Empty,
        entries = field::Empty,
    ),
)]
pub(super) fn reduce(
    rows: Rows<'_>,
    forest: &mut Forest,
    config: &ConnectivityConfig,
) -> Result<(OwnedRows, usize)> {
    let sample = bounded_sample(rows, config.samples_per_vertex())?;
    let rounds = forest.converge(sample.view());
    let Some(key) = dominant_label(forest.labels(), config.hash_samples(), config.seed()) else {
        return Ok((OwnedRows { offsets: vec![0], indices: Vec::new() }, rounds));
    };
    let rewritten = rewrite(rows, forest.labels(), key)?;
    let entries = rewritten.view().entries();
    let span = Span::current();
    span.record("key", key);
    span.record("entries", entries);
    debug!(
        key,
        sampled_entries = sample.view().entries(),
        entries,
        rounds,
        "sampled components and rewrote the dominant one"
    );
    Ok((rewritten, rounds))
}
