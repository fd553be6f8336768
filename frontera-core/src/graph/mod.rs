//! Graph store: adjacency plus lazily computed derived properties.
//!
//! A [`Graph`] owns its row-major adjacency and a cache of properties the
//! algorithms consult: the transpose, out- and in-degree vectors, whether the
//! structure is symmetric, the self-loop count and the edge-weight bounds.
//! Each property is computed on first request by a `cached_*` accessor and
//! stays valid until the adjacency is mutated, at which point every cache is
//! dropped.

mod cache;
mod degree;

use std::fmt;

use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::{
    error::{GraphError, Result},
    matrix::{EdgeValue, Layout, SparseMatrix},
};

use self::cache::GraphCache;

pub use self::{cache::TransposeCache, degree::DegreeSample};

/// Whether edges are interpreted as directed or undirected.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Kind {
    /// Every stored `(u, v)` entry is matched by `(v, u)`.
    Undirected,
    /// Entries are directed edges from row to column.
    Directed,
}

/// Three-valued flag for properties that may not have been computed yet.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Tristate {
    /// The property holds.
    True,
    /// The property does not hold.
    False,
    /// The property has not been determined.
    #[default]
    Unknown,
}

impl Tristate {
    /// Returns `Some(flag)` for a known value and `None` otherwise.
    #[must_use]
    pub const fn known(self) -> Option<bool> {
        match self {
            Self::True => Some(true),
            Self::False => Some(false),
            Self::Unknown => None,
        }
    }
}

impl From<bool> for Tristate {
    fn from(value: bool) -> Self {
        if value { Self::True } else { Self::False }
    }
}

/// Selects the out- or in-degree vector.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum DegreeOrientation {
    /// Number of entries in each row.
    Out,
    /// Number of entries in each column.
    In,
}

impl fmt::Display for DegreeOrientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Out => "out",
            Self::In => "in",
        })
    }
}

/// Adjacency of a graph together with its cached derived properties.
///
/// # Examples
/// ```
/// use frontera_core::{Graph, Kind, SparseMatrix};
///
/// let adjacency = SparseMatrix::from_triplets(3, 3, [(0, 1, 1_u8), (1, 2, 1)])
///     .expect("triplets must be in bounds");
/// let mut graph = Graph::new(adjacency, Kind::Directed);
/// assert_eq!(graph.cached_out_degree(), &[1, 1, 0]);
/// assert!(!graph.cached_symmetric_structure());
/// ```
#[derive(Clone, Debug)]
pub struct Graph<T> {
    adjacency: SparseMatrix<T>,
    kind: Kind,
    cache: GraphCache<T>,
}

impl<T: EdgeValue> Graph<T> {
    /// Wraps an adjacency matrix. No property is computed up front.
    #[must_use]
    pub fn new(adjacency: SparseMatrix<T>, kind: Kind) -> Self {
        Self {
            adjacency,
            kind,
            cache: GraphCache::new(kind),
        }
    }

    /// The adjacency matrix.
    #[must_use]
    #[rustfmt::skip]
    pub fn adjacency(&self) -> &SparseMatrix<T> { &self.adjacency }

    /// The edge interpretation.
    #[must_use]
    #[rustfmt::skip]
    pub fn kind(&self) -> Kind { self.kind }

    /// Number of vertices (rows of the adjacency).
    #[must_use]
    #[rustfmt::skip]
    pub fn vertex_count(&self) -> usize { self.adjacency.nrows() }

    /// Number of stored adjacency entries.
    #[must_use]
    #[rustfmt::skip]
    pub fn edge_count(&self) -> usize { self.adjacency.nnz() }

    /// Boolean pattern of the adjacency.
    #[must_use]
    pub fn structure(&self) -> SparseMatrix<bool> {
        self.adjacency.structure()
    }

    /// Mutable access to the adjacency. Every cache is dropped first.
    #[must_use]
    pub fn adjacency_mut(&mut self) -> &mut SparseMatrix<T> {
        self.invalidate_caches();
        &mut self.adjacency
    }

    /// Replaces the adjacency and drops every cache.
    pub fn replace_adjacency(&mut self, adjacency: SparseMatrix<T>) {
        self.adjacency = adjacency;
        self.invalidate_caches();
    }

    /// Consumes the graph and returns its adjacency.
    #[must_use]
    pub fn into_adjacency(self) -> SparseMatrix<T> {
        self.adjacency
    }

    /// Drops every cached property.
    ///
    /// An undirected graph keeps its symmetric-structure flag because it holds
    /// by construction.
    pub fn invalidate_caches(&mut self) {
        self.cache.invalidate(self.kind);
    }

    /// Validates the adjacency and whatever properties are currently cached.
    ///
    /// # Errors
    /// Returns [`GraphError::InvalidStructure`] when the adjacency is not
    /// square or not row-major, when a cached transpose does not mirror the
    /// adjacency's shape or layout, or when a cached degree vector has the
    /// wrong length.
    #[instrument(
        name = "graph.check",
        err,
        skip(self),
        fields(vertices = self.adjacency.nrows(), edges = self.adjacency.nnz(), kind = ?self.kind),
    )]
    pub fn check(&self) -> Result<()> {
        let adjacency = &self.adjacency;
        if !adjacency.is_square() {
            return Err(GraphError::structure(format!(
                "adjacency must be square, got {}x{}",
                adjacency.nrows(),
                adjacency.ncols()
            )));
        }
        if adjacency.layout() != Layout::ByRow {
            return Err(GraphError::structure("adjacency must be stored by row"));
        }
        if let Some(TransposeCache::Owned(transpose)) = &self.cache.transpose {
            if transpose.nrows() != adjacency.ncols() || transpose.ncols() != adjacency.nrows() {
                return Err(GraphError::structure(
                    "cached transpose dimensions do not mirror the adjacency",
                ));
            }
            if transpose.layout() != Layout::ByRow {
                return Err(GraphError::structure("cached transpose must be stored by row"));
            }
        }
        if self
            .cache
            .out_degree
            .as_ref()
            .is_some_and(|degree| degree.len() != adjacency.nrows())
        {
            return Err(GraphError::structure(
                "cached out-degree length does not match the row count",
            ));
        }
        if self
            .cache
            .in_degree
            .as_ref()
            .is_some_and(|degree| degree.len() != adjacency.ncols())
        {
            return Err(GraphError::structure(
                "cached in-degree length does not match the column count",
            ));
        }
        Ok(())
    }

    /// Cached transpose, if one has been computed or the graph is undirected.
    #[must_use]
    pub fn transpose_cache(&self) -> Option<&TransposeCache<T>> {
        match self.kind {
            Kind::Undirected => Some(&TransposeCache::SelfAliased),
            Kind::Directed => self.cache.transpose.as_ref(),
        }
    }

    /// The matrix whose rows list each vertex's in-neighbours, when available
    /// without computation.
    ///
    /// Undirected graphs and graphs known to have symmetric structure use the
    /// adjacency itself; otherwise the cached transpose is returned.
    #[must_use]
    pub fn incoming(&self) -> Option<&SparseMatrix<T>> {
        if self.kind == Kind::Undirected || self.cache.symmetric_structure == Tristate::True {
            return Some(&self.adjacency);
        }
        match &self.cache.transpose {
            Some(TransposeCache::Owned(transpose)) => Some(transpose),
            Some(TransposeCache::SelfAliased) => Some(&self.adjacency),
            None => None,
        }
    }

    /// Cached out-degree vector, if computed.
    #[must_use]
    pub fn out_degree(&self) -> Option<&[usize]> {
        self.cache.out_degree.as_deref()
    }

    /// Cached in-degree vector, if computed. Undirected graphs report their
    /// out-degree.
    #[must_use]
    pub fn in_degree(&self) -> Option<&[usize]> {
        match self.kind {
            Kind::Undirected => self.cache.out_degree.as_deref(),
            Kind::Directed => self.cache.in_degree.as_deref(),
        }
    }

    /// Symmetric-structure flag as currently known.
    #[must_use]
    #[rustfmt::skip]
    pub fn symmetric_structure(&self) -> Tristate { self.cache.symmetric_structure }

    /// Self-loop count, if computed.
    #[must_use]
    #[rustfmt::skip]
    pub fn self_loop_count(&self) -> Option<usize> { self.cache.self_loop_count }

    /// Returns the transpose, computing and caching it on first use.
    ///
    /// Undirected graphs return the adjacency itself.
    pub fn cached_transpose(&mut self) -> &SparseMatrix<T> {
        if self.kind == Kind::Undirected {
            self.cache.transpose = Some(TransposeCache::SelfAliased);
            return &self.adjacency;
        }
        if self.cache.transpose.is_none() {
            debug!(vertices = self.adjacency.nrows(), "computing transpose");
            self.cache.transpose = Some(TransposeCache::Owned(self.adjacency.transpose()));
        }
        match &self.cache.transpose {
            Some(TransposeCache::Owned(transpose)) => transpose,
            _ => &self.adjacency,
        }
    }

    /// Returns the out-degree vector, computing and caching it on first use.
    pub fn cached_out_degree(&mut self) -> &[usize] {
        let adjacency = &self.adjacency;
        self.cache.out_degree.get_or_insert_with(|| {
            (0..adjacency.nrows())
                .into_par_iter()
                .map(|row| adjacency.slot_len(row))
                .collect()
        })
    }

    /// Returns the in-degree vector, computing and caching it on first use.
    ///
    /// Undirected graphs share the out-degree cache.
    pub fn cached_in_degree(&mut self) -> &[usize] {
        if self.kind == Kind::Undirected {
            return self.cached_out_degree();
        }
        let adjacency = &self.adjacency;
        let transpose = match &self.cache.transpose {
            Some(TransposeCache::Owned(transpose)) => Some(transpose),
            _ => None,
        };
        self.cache.in_degree.get_or_insert_with(|| match transpose {
            Some(transpose) => (0..transpose.nrows())
                .into_par_iter()
                .map(|row| transpose.slot_len(row))
                .collect(),
            None => {
                let mut degree = vec![0_usize; adjacency.ncols()];
                for &col in adjacency.indices() {
                    degree[col] += 1;
                }
                degree
            }
        })
    }

    /// Returns whether the adjacency has symmetric structure, computing and
    /// caching the answer on first use.
    ///
    /// Directed graphs compare the adjacency pattern against the transpose
    /// pattern, caching the transpose as a side effect. A non-square
    /// adjacency is never symmetric.
    pub fn cached_symmetric_structure(&mut self) -> bool {
        if let Some(known) = self.cache.symmetric_structure.known() {
            return known;
        }
        let symmetric = self.adjacency.is_square() && {
            self.cached_transpose();
            match &self.cache.transpose {
                Some(TransposeCache::Owned(transpose)) => {
                    transpose.offsets() == self.adjacency.offsets()
                        && transpose.indices() == self.adjacency.indices()
                }
                _ => true,
            }
        };
        self.cache.symmetric_structure = Tristate::from(symmetric);
        symmetric
    }

    /// Returns the number of diagonal entries, computing and caching it on
    /// first use.
    pub fn cached_self_loop_count(&mut self) -> usize {
        let adjacency = &self.adjacency;
        *self
            .cache
            .self_loop_count
            .get_or_insert_with(|| adjacency.diagonal_count())
    }

    /// Returns the smallest comparable edge value, or `None` for a graph
    /// without comparable values.
    pub fn cached_edge_min(&mut self) -> Option<T> {
        let values = self.adjacency.values();
        *self.cache.edge_min.get_or_insert_with(|| {
            values
                .par_iter()
                .copied()
                .filter(|value| value.is_comparable())
                .reduce_with(|left, right| if right < left { right } else { left })
        })
    }

    /// Returns the largest comparable edge value, or `None` for a graph
    /// without comparable values.
    pub fn cached_edge_max(&mut self) -> Option<T> {
        let values = self.adjacency.values();
        *self.cache.edge_max.get_or_insert_with(|| {
            values
                .par_iter()
                .copied()
                .filter(|value| value.is_comparable())
                .reduce_with(|left, right| if right > left { right } else { left })
        })
    }

    /// Removes every self-loop from the adjacency.
    ///
    /// When the self-loop count is already known to be zero nothing changes.
    /// Otherwise all caches are dropped, the diagonal is removed, the
    /// symmetric-structure flag is restored (removing the diagonal cannot
    /// break symmetry) and the self-loop count becomes zero.
    pub fn delete_self_loops(&mut self) {
        if self.cache.self_loop_count == Some(0) {
            return;
        }
        let symmetric = self.cache.symmetric_structure;
        self.invalidate_caches();
        let removed = self.adjacency.remove_diagonal();
        debug!(removed, "deleted self-loops");
        self.cache.symmetric_structure = symmetric;
        self.cache.self_loop_count = Some(0);
    }
}
