//! Body parsing and matrix assembly.

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use frontera_core::SparseMatrix;
use tracing::{Span, debug, field as span_field, instrument};

use crate::{
    errors::MatrixMarketError,
    header::{Field, Format, Header, Symmetry},
    lines::NumberedLines,
};

type Triplet = (usize, usize, f64);

/// Cap on the up-front reservation taken from the size line.
const RESERVE_LIMIT: usize = 1 << 16;

/// Reads a Matrix Market document into a row-major matrix.
///
/// # Errors
/// Returns a [`MatrixMarketError`] naming the offending line when the
/// document is malformed or uses an unsupported field or storage, and
/// [`MatrixMarketError::Io`] when the reader fails.
///
/// # Examples
/// ```
/// use frontera_providers_matrix_market::read_matrix;
///
/// let text = "%%MatrixMarket matrix coordinate pattern symmetric\n3 3 2\n2 1\n3 2\n";
/// let matrix = read_matrix(text.as_bytes()).expect("document must parse");
/// assert_eq!(matrix.nnz(), 4);
/// assert_eq!(matrix.minor_indices(1), &[0, 2]);
/// ```
#[instrument(
    name = "matrix_market.read",
    err,
    skip(reader),
    fields(rows = span_field::Empty, cols = span_field::Empty, entries = span_field::Empty),
)]
pub fn read_matrix<R: BufRead>(reader: R) -> Result<SparseMatrix<f64>, MatrixMarketError> {
    let mut lines = NumberedLines::new(reader);
    let header = Header::read(&mut lines)?;
    let span = Span::current();
    span.record("rows", header.nrows);
    span.record("cols", header.ncols);
    span.record("entries", header.entries);
    debug!(?header, "read Matrix Market header");

    let mirrored = header.symmetry != Symmetry::General;
    let claimed = header.entries.saturating_mul(if mirrored { 2 } else { 1 });
    let mut triplets: Vec<Triplet> = Vec::with_capacity(claimed.min(RESERVE_LIMIT));
    match header.format {
        Format::Coordinate => read_coordinate(&mut lines, &header, &mut triplets)?,
        Format::Array => read_array(&mut lines, &header, &mut triplets)?,
    }
    Ok(SparseMatrix::from_triplets(header.nrows, header.ncols, triplets)?)
}

/// Opens `path` and reads it with [`read_matrix`].
///
/// # Errors
/// As [`read_matrix`], plus [`MatrixMarketError::Io`] when the file cannot
/// be opened.
pub fn read_matrix_path(path: impl AsRef<Path>) -> Result<SparseMatrix<f64>, MatrixMarketError> {
    let file = File::open(path.as_ref())?;
    read_matrix(BufReader::new(file))
}

fn push(triplets: &mut Vec<Triplet>, symmetry: Symmetry, row: usize, col: usize, value: f64) {
    match symmetry {
        Symmetry::General => triplets.push((row, col, value)),
        Symmetry::Symmetric => triplets.extend([(row, col, value), (col, row, value)]),
        Symmetry::SkewSymmetric => triplets.extend([(row, col, value), (col, row, -value)]),
    }
}

fn invalid_entry(line: usize, reason: impl Into<String>) -> MatrixMarketError {
    MatrixMarketError::InvalidEntry {
        line,
        reason: reason.into(),
    }
}

fn parse_value(line: usize, word: &str, field: Field) -> Result<f64, MatrixMarketError> {
    match field {
        Field::Real => word
            .parse::<f64>()
            .map_err(|err| invalid_entry(line, format!("real value `{word}`: {err}"))),
        Field::Integer => word
            .parse::<i64>()
            .map(|value| value as f64)
            .map_err(|err| invalid_entry(line, format!("integer value `{word}`: {err}"))),
        Field::Pattern => Ok(1.0),
    }
}

/// Converts a 1-based coordinate to 0-based, checking it against the
/// declared dimensions.
fn coordinate(
    line: usize,
    row: &str,
    col: &str,
    header: &Header,
) -> Result<(usize, usize), MatrixMarketError> {
    let parse = |word: &str, name: &str| {
        word.parse::<usize>()
            .map_err(|err| invalid_entry(line, format!("{name} index `{word}`: {err}")))
    };
    let (row, col) = (parse(row, "row")?, parse(col, "column")?);
    if row == 0 || col == 0 || row > header.nrows || col > header.ncols {
        return Err(MatrixMarketError::OutOfBounds {
            line,
            row,
            col,
            nrows: header.nrows,
            ncols: header.ncols,
        });
    }
    Ok((row - 1, col - 1))
}

fn read_coordinate<R: BufRead>(
    lines: &mut NumberedLines<R>,
    header: &Header,
    triplets: &mut Vec<Triplet>,
) -> Result<(), MatrixMarketError> {
    let mut found = 0_usize;
    while let Some((line, text)) = lines.next_content()? {
        let words: Vec<&str> = text.split_whitespace().collect();
        let (row, col, value) = match (header.field, words.as_slice()) {
            (Field::Pattern, [row, col]) => (*row, *col, None),
            (Field::Real | Field::Integer, [row, col, value]) => (*row, *col, Some(*value)),
            (Field::Pattern, _) => {
                return Err(invalid_entry(line, format!("expected 2 words, found {}", words.len())));
            }
            (Field::Real | Field::Integer, _) => {
                return Err(invalid_entry(line, format!("expected 3 words, found {}", words.len())));
            }
        };
        let (row, col) = coordinate(line, row, col, header)?;
        if found == header.entries {
            return Err(MatrixMarketError::TooManyEntries {
                line,
                expected: header.entries,
            });
        }
        let value = value.map_or(Ok(1.0), |word| parse_value(line, word, header.field))?;
        push(triplets, header.symmetry, row, col, value);
        found += 1;
    }
    if found < header.entries {
        return Err(MatrixMarketError::TooFewEntries {
            expected: header.entries,
            found,
        });
    }
    Ok(())
}

/// Array bodies list one value per line in column-major order, starting
/// each column at the diagonal for symmetric storage and just below it for
/// skew-symmetric storage.
fn read_array<R: BufRead>(
    lines: &mut NumberedLines<R>,
    header: &Header,
    triplets: &mut Vec<Triplet>,
) -> Result<(), MatrixMarketError> {
    let first_row = |col: usize| match header.symmetry {
        Symmetry::General => 0,
        Symmetry::Symmetric => col,
        Symmetry::SkewSymmetric => col + 1,
    };
    let (mut row, mut col) = (first_row(0), 0_usize);
    let mut found = 0_usize;
    while let Some((line, text)) = lines.next_content()? {
        let words: Vec<&str> = text.split_whitespace().collect();
        let [word] = words.as_slice() else {
            return Err(invalid_entry(line, format!("expected 1 word, found {}", words.len())));
        };
        if row >= header.nrows || col >= header.ncols {
            return Err(MatrixMarketError::TooManyEntries {
                line,
                expected: header.entries,
            });
        }
        let value = parse_value(line, word, header.field)?;
        push(triplets, header.symmetry, row, col, value);
        found += 1;
        row += 1;
        if row == header.nrows {
            col += 1;
            row = first_row(col);
        }
    }
    if found < header.entries {
        return Err(MatrixMarketError::TooFewEntries {
            expected: header.entries,
            found,
        });
    }
    Ok(())
}
