//! Contiguous work ranges and disjoint output slices for partitioned passes.
//!
//! A partitioned pass splits the vertex range into one contiguous block per
//! worker, sizes its output with a prefix sum over per-block counts and hands
//! each worker its own `&mut` slice of a shared arena.

use std::ops::Range;

use crate::error::{GraphError, Result};

/// Number of partitions used for a pass over `len` items.
///
/// One partition per rayon worker, but never more than one per sixteen
/// items, and always at least one.
#[must_use]
pub(crate) fn partition_count(len: usize) -> usize {
    rayon::current_num_threads().min(len / 16).max(1)
}

/// Splits `0..len` into `parts` contiguous ranges whose lengths differ by at
/// most one.
#[must_use]
pub(crate) fn ranges(len: usize, parts: usize) -> Vec<Range<usize>> {
    let parts = parts.max(1);
    let boundary = |part: usize| (len * part).div_ceil(parts);
    (0..parts).map(|part| boundary(part)..boundary(part + 1)).collect()
}

/// Exclusive prefix sum of `counts`, with the grand total appended.
#[must_use]
pub(crate) fn prefix_sum(counts: &[usize]) -> Vec<usize> {
    let mut offsets = Vec::with_capacity(counts.len() + 1);
    let mut total = 0_usize;
    offsets.push(0);
    for &count in counts {
        total += count;
        offsets.push(total);
    }
    offsets
}

/// Splits `arena` into consecutive disjoint slices of the given lengths.
///
/// # Errors
/// Returns [`GraphError::InvalidStructure`] when the lengths add up to more
/// than the arena holds.
pub(crate) fn split_by_counts<'a, T>(
    mut arena: &'a mut [T],
    counts: &[usize],
) -> Result<Vec<&'a mut [T]>> {
    let mut slices = Vec::with_capacity(counts.len());
    for &count in counts {
        if count > arena.len() {
            return Err(GraphError::structure(format!(
                "partition needs {count} slots but only {} remain",
                arena.len()
            )));
        }
        let (head, tail) = arena.split_at_mut(count);
        slices.push(head);
        arena = tail;
    }
    Ok(slices)
}
