use std::io;

use frontera_core::GraphError;
use thiserror::Error;

/// Failures while reading a Matrix Market document.
///
/// Line numbers are 1-based and count every physical line, comments
/// included.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum MatrixMarketError {
    #[error("the %%MatrixMarket banner line is missing")]
    MissingBanner,
    #[error("line {line}: malformed banner: {reason}")]
    MalformedBanner { line: usize, reason: String },
    #[error("line {line}: {what} is not supported")]
    Unsupported { line: usize, what: String },
    #[error("the size line is missing")]
    MissingSize,
    #[error("line {line}: invalid size line: {reason}")]
    InvalidSize { line: usize, reason: String },
    #[error("line {line}: invalid entry: {reason}")]
    InvalidEntry { line: usize, reason: String },
    #[error("line {line}: entry ({row}, {col}) lies outside a {nrows}x{ncols} matrix")]
    OutOfBounds {
        line: usize,
        row: usize,
        col: usize,
        nrows: usize,
        ncols: usize,
    },
    #[error("line {line}: more entries than the {expected} announced")]
    TooManyEntries { line: usize, expected: usize },
    #[error("expected {expected} entries but found {found}")]
    TooFewEntries { expected: usize, found: usize },
    #[error("matrix construction failed: {0}")]
    Graph(#[from] GraphError),
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}
