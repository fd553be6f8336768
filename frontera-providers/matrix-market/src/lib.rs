//! Matrix Market reader producing frontera adjacency matrices.
//!
//! Coordinate and array documents with real, integer or pattern fields and
//! general, symmetric or skew-symmetric storage are supported. Every value
//! is read as `f64`; pattern entries become `1.0`. Symmetric storage is
//! expanded to both triangles and skew-symmetric storage mirrors each value
//! negated. When a coordinate repeats, its first value is kept.

mod errors;
mod header;
mod lines;
mod reader;

pub use errors::MatrixMarketError;
pub use reader::{read_matrix, read_matrix_path};
