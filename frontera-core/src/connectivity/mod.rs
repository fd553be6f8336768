//! Connected components by FastSV hooking and shortcutting.
//!
//! The solver keeps a forest of parent pointers in which every vertex points
//! at a smaller or equal vertex of its own component. Each round lets a
//! vertex offer the smallest grandparent among its neighbours to its root,
//! then shortcuts every pointer one level. Large graphs are first solved on
//! a bounded-degree sample, after which the edges into the dominant sampled
//! component are collapsed before the full pass.

mod config;
mod forest;
mod sampling;

use std::{cmp::Reverse, collections::HashMap};

use tracing::{Span, field, info, instrument};

use crate::{
    error::{GraphError, Result},
    graph::{Graph, Kind, Tristate},
    matrix::EdgeValue,
};

use self::forest::{Forest, Rows};

pub use self::config::{ConnectivityConfig, SamplingPolicy};

#[cfg(feature = "metrics")]
fn record_rounds(rounds: usize) {
    metrics::counter!("frontera_fastsv_rounds").increment(rounds as u64);
}

#[cfg(not(feature = "metrics"))]
fn record_rounds(_rounds: usize) {}

/// Labels every vertex with the smallest vertex id of its connected
/// component.
///
/// The graph must be undirected, or directed with a cached symmetric
/// structure of [`Tristate::True`]. Edge values are ignored.
///
/// # Errors
/// Returns [`GraphError::InvalidStructure`] when [`Graph::check`] fails and
/// [`GraphError::Asymmetric`] when the structure is not known to be
/// symmetric.
///
/// # Examples
/// ```
/// use frontera_core::{ConnectivityConfig, Graph, Kind, SparseMatrix, connected_components};
///
/// let adjacency = SparseMatrix::from_triplets(
///     4,
///     4,
///     [(0, 2, 1_u8), (2, 0, 1), (1, 3, 1), (3, 1, 1)],
/// )
/// .expect("triplets must be in bounds");
/// let graph = Graph::new(adjacency, Kind::Undirected);
/// let labels = connected_components(&graph, &ConnectivityConfig::default())
///     .expect("undirected graphs are symmetric");
/// assert_eq!(labels, vec![0, 1, 0, 1]);
/// ```
#[instrument(
    name = "connectivity.run",
    err,
    skip(graph, config),
    fields(
        vertices = graph.vertex_count(),
        entries = graph.edge_count(),
        sampled = field::Empty,
        rounds = field::Empty,
    ),
)]
pub fn connected_components<T: EdgeValue>(
    graph: &Graph<T>,
    config: &ConnectivityConfig,
) -> Result<Vec<usize>> {
    graph.check()?;
    let symmetric = matches!(graph.kind(), Kind::Undirected)
        || matches!(graph.symmetric_structure(), Tristate::True);
    if !symmetric {
        return Err(GraphError::Asymmetric);
    }

    let adjacency = graph.adjacency();
    let full = Rows::new(adjacency.offsets(), adjacency.indices());
    let mut forest = Forest::new(full);
    let sampled = config.samples(full.len(), full.entries());
    let mut rounds = 0_usize;

    let rewritten;
    let rows = if sampled {
        let (reduced, sample_rounds) = sampling::reduce(full, &mut forest, config)?;
        rounds += sample_rounds;
        rewritten = reduced;
        rewritten.view()
    } else {
        full
    };
    if rows.entries() > 0 {
        rounds += forest.converge(rows);
    }

    let span = Span::current();
    span.record("sampled", sampled);
    span.record("rounds", rounds);
    record_rounds(rounds);
    let labels = forest.into_labels();
    info!(
        vertices = labels.len(),
        rounds,
        sampled,
        "connected components completed"
    );
    Ok(labels)
}

/// Component counts and sizes derived from a label vector.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ComponentSummary {
    sizes: Vec<(usize, usize)>,
}

impl ComponentSummary {
    /// Groups `labels` by value.
    ///
    /// # Examples
    /// ```
    /// use frontera_core::ComponentSummary;
    ///
    /// let summary = ComponentSummary::from_labels(&[0, 1, 0, 1, 4, 0]);
    /// assert_eq!(summary.count(), 3);
    /// assert_eq!(summary.largest(), Some((0, 3)));
    /// ```
    #[must_use]
    pub fn from_labels(labels: &[usize]) -> Self {
        let mut counts: HashMap<usize, usize> = HashMap::new();
        for &label in labels {
            *counts.entry(label).or_insert(0) += 1;
        }
        let mut sizes: Vec<(usize, usize)> = counts.into_iter().collect();
        sizes.sort_unstable_by_key(|&(label, size)| (Reverse(size), label));
        Self { sizes }
    }

    /// Number of distinct components.
    #[must_use]
    #[rustfmt::skip]
    pub fn count(&self) -> usize { self.sizes.len() }

    /// `(label, size)` pairs, largest component first and ties by label.
    #[must_use]
    #[rustfmt::skip]
    pub fn sizes(&self) -> &[(usize, usize)] { &self.sizes }

    /// The largest component, if any vertex was labelled.
    #[must_use]
    pub fn largest(&self) -> Option<(usize, usize)> {
        self.sizes.first().copied()
    }

    /// Components made of a single vertex.
    #[must_use]
    pub fn singletons(&self) -> usize {
        self.sizes.iter().filter(|&&(_, size)| size == 1).count()
    }
}
