//! Frontera core library.
//!
//! Sparse graph analytics over a row-compressed adjacency: adaptive
//! push/pull breadth-first search, batched Brandes betweenness centrality
//! and FastSV connected components with degree sampling. A [`Graph`] owns
//! the adjacency together with lazily computed, explicitly invalidated
//! derived properties that the algorithms consult.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod betweenness;
mod connectivity;
mod error;
mod frontier;
mod graph;
mod matrix;
mod partition;
mod traversal;

#[cfg(test)]
pub(crate) mod test_utils;

pub use crate::{
    betweenness::betweenness_centrality,
    connectivity::{ComponentSummary, ConnectivityConfig, SamplingPolicy, connected_components},
    error::{GraphError, GraphErrorCode, Result},
    graph::{DegreeOrientation, DegreeSample, Graph, Kind, TransposeCache, Tristate},
    matrix::{EdgeValue, Layout, SparseMatrix},
    traversal::{
        DirectionPolicy, TraversalConfig, TraversalRequest, TraversalResult, TraversalStats,
        breadth_first_search,
    },
};
