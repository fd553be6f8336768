//! Error types for the Frontera core library.
//!
//! Defines the error enum exposed by the public API and a convenient result alias.

use std::fmt;

use thiserror::Error;

use crate::graph::DegreeOrientation;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// Error type produced by graph construction and the graph algorithms.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum GraphError {
    /// A requested source vertex does not exist in the graph.
    #[error("invalid source vertex {vertex}: graph has {vertex_count} vertices")]
    InvalidSource {
        /// The vertex supplied by the caller.
        vertex: usize,
        /// Number of vertices in the graph.
        vertex_count: usize,
    },
    /// The adjacency or one of its cached properties is malformed.
    #[error("invalid graph structure: {reason}")]
    InvalidStructure {
        /// Human-readable description of the violated constraint.
        reason: String,
    },
    /// A directed graph without known symmetric structure lacks a cached transpose.
    #[error("the transpose must be cached for a directed graph without symmetric structure")]
    MissingTranspose,
    /// The adjacency is not known to have symmetric structure.
    #[error("the adjacency must be known to be symmetric")]
    Asymmetric,
    /// A degree vector required by the operation has not been cached.
    #[error("the {orientation} degree must be cached before this operation")]
    MissingDegree {
        /// Which degree vector was missing.
        orientation: DegreeOrientation,
    },
    /// Configuration values were rejected during validation.
    #[error("invalid parameters: {reason}")]
    InvalidParameters {
        /// Explanation of the rejected configuration.
        reason: String,
    },
}

define_error_codes! {
    /// Stable codes describing [`GraphError`] variants.
    enum GraphErrorCode for GraphError {
        /// A requested source vertex does not exist in the graph.
        InvalidSource => InvalidSource { .. } => "GRAPH_INVALID_SOURCE",
        /// The adjacency or one of its cached properties is malformed.
        InvalidStructure => InvalidStructure { .. } => "GRAPH_INVALID_STRUCTURE",
        /// A directed graph without known symmetric structure lacks a cached transpose.
        MissingTranspose => MissingTranspose => "GRAPH_MISSING_TRANSPOSE",
        /// The adjacency is not known to have symmetric structure.
        Asymmetric => Asymmetric => "GRAPH_ASYMMETRIC",
        /// A degree vector required by the operation has not been cached.
        MissingDegree => MissingDegree { .. } => "GRAPH_MISSING_DEGREE",
        /// Configuration values were rejected during validation.
        InvalidParameters => InvalidParameters { .. } => "GRAPH_INVALID_PARAMETERS",
    }
}

impl GraphError {
    pub(crate) fn structure(reason: impl Into<String>) -> Self {
        Self::InvalidStructure {
            reason: reason.into(),
        }
    }

    pub(crate) fn parameters(reason: impl Into<String>) -> Self {
        Self::InvalidParameters {
            reason: reason.into(),
        }
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, GraphError>;
