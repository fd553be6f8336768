//! Single-owner holder for lazily derived graph properties.

use crate::matrix::SparseMatrix;

use super::{Kind, Tristate};

/// Cached transpose of a graph's adjacency.
#[derive(Clone, Debug, PartialEq)]
pub enum TransposeCache<T> {
    /// The graph is undirected, so the adjacency is its own transpose and no
    /// second copy is stored.
    SelfAliased,
    /// An owned row-major transpose.
    Owned(SparseMatrix<T>),
}

#[derive(Clone, Debug)]
pub(super) struct GraphCache<T> {
    pub(super) transpose: Option<TransposeCache<T>>,
    pub(super) out_degree: Option<Vec<usize>>,
    pub(super) in_degree: Option<Vec<usize>>,
    pub(super) symmetric_structure: Tristate,
    pub(super) self_loop_count: Option<usize>,
    pub(super) edge_min: Option<Option<T>>,
    pub(super) edge_max: Option<Option<T>>,
}

impl<T> GraphCache<T> {
    pub(super) fn new(kind: Kind) -> Self {
        Self {
            transpose: None,
            out_degree: None,
            in_degree: None,
            symmetric_structure: Self::known_symmetry(kind),
            self_loop_count: None,
            edge_min: None,
            edge_max: None,
        }
    }

    /// Drops every derived property. Undirected graphs keep their symmetry.
    pub(super) fn invalidate(&mut self, kind: Kind) {
        *self = Self::new(kind);
    }

    const fn known_symmetry(kind: Kind) -> Tristate {
        match kind {
            Kind::Undirected => Tristate::True,
            Kind::Directed => Tristate::Unknown,
        }
    }
}
