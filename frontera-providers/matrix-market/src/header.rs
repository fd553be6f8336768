//! Banner, optional GraphBLAS type line and size line.

use std::io::BufRead;

use crate::{errors::MatrixMarketError, lines::NumberedLines};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Format {
    Coordinate,
    Array,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Field {
    Real,
    Integer,
    Pattern,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Symmetry {
    General,
    Symmetric,
    SkewSymmetric,
}

/// Element types a `%%GraphBLAS` line may name. Values are read as `f64`
/// whatever the declared type.
const GRAPHBLAS_TYPES: &[&str] = &[
    "GrB_BOOL", "GrB_INT8", "GrB_INT16", "GrB_INT32", "GrB_INT64", "GrB_UINT8", "GrB_UINT16",
    "GrB_UINT32", "GrB_UINT64", "GrB_FP32", "GrB_FP64",
];

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Header {
    pub(crate) format: Format,
    pub(crate) field: Field,
    pub(crate) symmetry: Symmetry,
    pub(crate) nrows: usize,
    pub(crate) ncols: usize,
    /// Entries listed in the body.
    pub(crate) entries: usize,
}

impl Header {
    pub(crate) fn read<R: BufRead>(lines: &mut NumberedLines<R>) -> Result<Self, MatrixMarketError> {
        let (line, banner) = lines.next_raw()?.ok_or(MatrixMarketError::MissingBanner)?;
        let (format, field, symmetry) = parse_banner(line, &banner)?;

        let mut size = None;
        if let Some((line, text)) = lines.next_raw()? {
            if text.starts_with("%%GraphBLAS") {
                check_graphblas_line(line, &text)?;
            } else if !text.starts_with('%') && !text.trim().is_empty() {
                size = Some((line, text));
            }
        }
        let (line, text) = match size {
            Some(found) => found,
            None => lines.next_content()?.ok_or(MatrixMarketError::MissingSize)?,
        };
        let (nrows, ncols, entries) = parse_size(line, &text, format, symmetry)?;
        Ok(Self {
            format,
            field,
            symmetry,
            nrows,
            ncols,
            entries,
        })
    }
}

fn malformed(line: usize, reason: impl Into<String>) -> MatrixMarketError {
    MatrixMarketError::MalformedBanner {
        line,
        reason: reason.into(),
    }
}

fn parse_banner(line: usize, text: &str) -> Result<(Format, Field, Symmetry), MatrixMarketError> {
    let words: Vec<&str> = text.split_whitespace().collect();
    let [prefix, object, format, field, symmetry] = words.as_slice() else {
        return Err(malformed(line, format!("expected 5 words, found {}", words.len())));
    };
    if *prefix != "%%MatrixMarket" {
        return Err(malformed(line, format!("expected %%MatrixMarket, found {prefix}")));
    }
    if *object != "matrix" {
        return Err(malformed(line, format!("expected object `matrix`, found {object}")));
    }
    let format = match format.to_ascii_lowercase().as_str() {
        "coordinate" => Format::Coordinate,
        "array" => Format::Array,
        other => return Err(malformed(line, format!("unknown format {other}"))),
    };
    let field = match field.to_ascii_lowercase().as_str() {
        "real" => Field::Real,
        "integer" => Field::Integer,
        "pattern" => Field::Pattern,
        "complex" => {
            return Err(MatrixMarketError::Unsupported {
                line,
                what: "the complex field".to_owned(),
            });
        }
        other => return Err(malformed(line, format!("unknown field {other}"))),
    };
    let symmetry = match symmetry.to_ascii_lowercase().as_str() {
        "general" => Symmetry::General,
        "symmetric" => Symmetry::Symmetric,
        "skew-symmetric" => Symmetry::SkewSymmetric,
        "hermitian" => {
            return Err(MatrixMarketError::Unsupported {
                line,
                what: "hermitian storage".to_owned(),
            });
        }
        other => return Err(malformed(line, format!("unknown symmetry {other}"))),
    };
    if format == Format::Array && field == Field::Pattern {
        return Err(MatrixMarketError::Unsupported {
            line,
            what: "the pattern field in array format".to_owned(),
        });
    }
    Ok((format, field, symmetry))
}

fn check_graphblas_line(line: usize, text: &str) -> Result<(), MatrixMarketError> {
    let words: Vec<&str> = text.split_whitespace().collect();
    match words.as_slice() {
        [_, kind] if GRAPHBLAS_TYPES.contains(kind) => Ok(()),
        [_, kind] => Err(MatrixMarketError::Unsupported {
            line,
            what: format!("GraphBLAS type {kind}"),
        }),
        _ => Err(malformed(
            line,
            format!("%%GraphBLAS line needs 2 words, found {}", words.len()),
        )),
    }
}

fn parse_dimension(line: usize, word: &str, name: &str) -> Result<usize, MatrixMarketError> {
    word.parse::<usize>()
        .map_err(|err| MatrixMarketError::InvalidSize {
            line,
            reason: format!("{name} `{word}`: {err}"),
        })
}

fn parse_size(
    line: usize,
    text: &str,
    format: Format,
    symmetry: Symmetry,
) -> Result<(usize, usize, usize), MatrixMarketError> {
    let words: Vec<&str> = text.split_whitespace().collect();
    let (nrows, ncols, entries) = match (format, words.as_slice()) {
        (Format::Coordinate, [rows, cols, nnz]) => (
            parse_dimension(line, rows, "rows")?,
            parse_dimension(line, cols, "columns")?,
            parse_dimension(line, nnz, "entries")?,
        ),
        (Format::Array, [rows, cols]) => {
            let nrows = parse_dimension(line, rows, "rows")?;
            let ncols = parse_dimension(line, cols, "columns")?;
            (nrows, ncols, array_entries(nrows, ncols, symmetry))
        }
        (Format::Coordinate, _) => {
            return Err(MatrixMarketError::InvalidSize {
                line,
                reason: format!("coordinate size needs 3 numbers, found {}", words.len()),
            });
        }
        (Format::Array, _) => {
            return Err(MatrixMarketError::InvalidSize {
                line,
                reason: format!("array size needs 2 numbers, found {}", words.len()),
            });
        }
    };
    if nrows == 0 || ncols == 0 {
        return Err(MatrixMarketError::InvalidSize {
            line,
            reason: format!("dimensions must be positive, found {nrows}x{ncols}"),
        });
    }
    if symmetry != Symmetry::General && nrows != ncols {
        return Err(MatrixMarketError::InvalidSize {
            line,
            reason: format!("{symmetry:?} storage needs a square matrix, found {nrows}x{ncols}"),
        });
    }
    Ok((nrows, ncols, entries))
}

/// Values listed by an array body: every column for general storage, the
/// lower triangle for symmetric storage and the strict lower triangle for
/// skew-symmetric storage.
fn array_entries(nrows: usize, ncols: usize, symmetry: Symmetry) -> usize {
    match symmetry {
        Symmetry::General => nrows.saturating_mul(ncols),
        Symmetry::Symmetric => nrows.saturating_mul(nrows.saturating_add(1)) / 2,
        Symmetry::SkewSymmetric => nrows.saturating_mul(nrows.saturating_sub(1)) / 2,
    }
}
