//! Compressed sparse adjacency storage.
//!
//! [`SparseMatrix`] holds a compressed sparse row (or column) structure with
//! one value per stored entry. Construction always validates the offset and
//! index arrays so that the graph algorithms can index them directly.

mod value;

use rayon::prelude::*;

use crate::error::{GraphError, Result};

pub use self::value::EdgeValue;

/// Storage orientation of a [`SparseMatrix`].
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Layout {
    /// Offsets index rows; stored indices are column ids.
    #[default]
    ByRow,
    /// Offsets index columns; stored indices are row ids.
    ByColumn,
}

/// Compressed sparse matrix with sorted, unique minor indices per major slot.
#[derive(Clone, Debug, PartialEq)]
pub struct SparseMatrix<T> {
    nrows: usize,
    ncols: usize,
    offsets: Vec<usize>,
    indices: Vec<usize>,
    values: Vec<T>,
    layout: Layout,
}

impl<T: EdgeValue> SparseMatrix<T> {
    /// Builds a matrix from caller-assembled compressed arrays.
    ///
    /// # Errors
    /// Returns [`GraphError::InvalidStructure`] when the offsets are not a
    /// non-decreasing prefix sum over `indices`, when `values` and `indices`
    /// differ in length, or when a major slot holds an out-of-range, unsorted
    /// or duplicated minor index.
    ///
    /// # Examples
    /// ```
    /// use frontera_core::{Layout, SparseMatrix};
    ///
    /// let matrix = SparseMatrix::from_parts(2, 2, vec![0, 1, 2], vec![1, 0], vec![1_u8, 1], Layout::ByRow)
    ///     .expect("arrays must be valid");
    /// assert_eq!(matrix.nnz(), 2);
    /// ```
    pub fn from_parts(
        nrows: usize,
        ncols: usize,
        offsets: Vec<usize>,
        indices: Vec<usize>,
        values: Vec<T>,
        layout: Layout,
    ) -> Result<Self> {
        let matrix = Self {
            nrows,
            ncols,
            offsets,
            indices,
            values,
            layout,
        };
        matrix.validate()?;
        Ok(matrix)
    }

    /// Builds a row-major matrix from `(row, column, value)` triplets.
    ///
    /// Triplets may arrive in any order. When a coordinate repeats, the first
    /// occurrence wins and later ones are discarded.
    ///
    /// # Errors
    /// Returns [`GraphError::InvalidStructure`] when a triplet lies outside
    /// the `nrows × ncols` bounds or the row offsets cannot be allocated.
    pub fn from_triplets<I>(nrows: usize, ncols: usize, triplets: I) -> Result<Self>
    where
        I: IntoIterator<Item = (usize, usize, T)>,
    {
        let mut entries: Vec<(usize, usize, T)> = triplets.into_iter().collect();
        if let Some(&(row, col, _)) = entries
            .iter()
            .find(|(row, col, _)| *row >= nrows || *col >= ncols)
        {
            return Err(GraphError::structure(format!(
                "entry ({row}, {col}) lies outside a {nrows}x{ncols} matrix"
            )));
        }

        // Stable sort keeps the first occurrence ahead of its duplicates.
        entries.par_sort_by_key(|&(row, col, _)| (row, col));
        entries.dedup_by_key(|&mut (row, col, _)| (row, col));

        let mut offsets = Vec::new();
        offsets
            .try_reserve_exact(nrows.saturating_add(1))
            .map_err(|err| GraphError::structure(format!("cannot allocate {nrows} rows: {err}")))?;
        offsets.resize(nrows + 1, 0_usize);
        for &(row, _, _) in &entries {
            offsets[row + 1] += 1;
        }
        for row in 0..nrows {
            offsets[row + 1] += offsets[row];
        }
        let (indices, values) = entries.into_iter().map(|(_, col, value)| (col, value)).unzip();

        Ok(Self {
            nrows,
            ncols,
            offsets,
            indices,
            values,
            layout: Layout::ByRow,
        })
    }

    /// Builds an empty `nrows × ncols` matrix.
    #[must_use]
    pub fn empty(nrows: usize, ncols: usize) -> Self {
        Self {
            nrows,
            ncols,
            offsets: vec![0; nrows + 1],
            indices: Vec::new(),
            values: Vec::new(),
            layout: Layout::ByRow,
        }
    }

    /// Checks the compressed arrays against the matrix dimensions.
    ///
    /// # Errors
    /// Returns [`GraphError::InvalidStructure`] describing the first violation.
    pub fn validate(&self) -> Result<()> {
        let (major, minor) = self.major_minor();
        if self.offsets.len() != major + 1 {
            return Err(GraphError::structure(format!(
                "offsets has length {} but {} major slots require {}",
                self.offsets.len(),
                major,
                major + 1
            )));
        }
        if self.offsets.first().copied() != Some(0) {
            return Err(GraphError::structure("offsets must start at zero"));
        }
        if self.values.len() != self.indices.len() {
            return Err(GraphError::structure(format!(
                "values has length {} but indices has length {}",
                self.values.len(),
                self.indices.len()
            )));
        }
        if self.offsets.last().copied() != Some(self.indices.len()) {
            return Err(GraphError::structure(format!(
                "offsets must end at the entry count {}",
                self.indices.len()
            )));
        }
        if let Some(slot) = self.offsets.windows(2).position(|pair| pair[0] > pair[1]) {
            return Err(GraphError::structure(format!(
                "offsets decrease at major slot {slot}"
            )));
        }
        let bad_slot = (0..major).into_par_iter().find_any(|&slot| {
            let minors = self.minor_indices(slot);
            minors.last().is_some_and(|&last| last >= minor)
                || minors.windows(2).any(|pair| pair[0] >= pair[1])
        });
        if let Some(slot) = bad_slot {
            return Err(GraphError::structure(format!(
                "major slot {slot} has out-of-range, unsorted or duplicate indices"
            )));
        }
        Ok(())
    }

    /// Number of rows.
    #[must_use]
    #[rustfmt::skip]
    pub fn nrows(&self) -> usize { self.nrows }

    /// Number of columns.
    #[must_use]
    #[rustfmt::skip]
    pub fn ncols(&self) -> usize { self.ncols }

    /// Number of stored entries.
    #[must_use]
    #[rustfmt::skip]
    pub fn nnz(&self) -> usize { self.indices.len() }

    /// Storage orientation.
    #[must_use]
    #[rustfmt::skip]
    pub fn layout(&self) -> Layout { self.layout }

    /// Returns `true` when the matrix has as many rows as columns.
    #[must_use]
    pub fn is_square(&self) -> bool {
        self.nrows == self.ncols
    }

    /// Offsets into [`Self::indices`], one per major slot plus a terminator.
    #[must_use]
    #[rustfmt::skip]
    pub fn offsets(&self) -> &[usize] { &self.offsets }

    /// Minor index of every stored entry.
    #[must_use]
    #[rustfmt::skip]
    pub fn indices(&self) -> &[usize] { &self.indices }

    /// Value of every stored entry.
    #[must_use]
    #[rustfmt::skip]
    pub fn values(&self) -> &[T] { &self.values }

    /// Mutable access to the stored values. The structure cannot change.
    #[must_use]
    #[rustfmt::skip]
    pub fn values_mut(&mut self) -> &mut [T] { &mut self.values }

    /// Minor indices stored in major slot `slot`.
    ///
    /// For a row-major matrix these are the out-neighbours of vertex `slot`.
    ///
    /// # Panics
    /// Panics when `slot` is not a valid major index.
    #[must_use]
    pub fn minor_indices(&self, slot: usize) -> &[usize] {
        &self.indices[self.offsets[slot]..self.offsets[slot + 1]]
    }

    /// Number of entries stored in major slot `slot`.
    ///
    /// # Panics
    /// Panics when `slot` is not a valid major index.
    #[must_use]
    pub fn slot_len(&self, slot: usize) -> usize {
        self.offsets[slot + 1] - self.offsets[slot]
    }

    /// Iterates over `(minor, value)` pairs of major slot `slot`.
    ///
    /// # Panics
    /// Panics when `slot` is not a valid major index.
    pub fn slot(&self, slot: usize) -> impl Iterator<Item = (usize, T)> + '_ {
        let range = self.offsets[slot]..self.offsets[slot + 1];
        self.indices[range.clone()]
            .iter()
            .copied()
            .zip(self.values[range].iter().copied())
    }

    /// Returns the transpose stored in row-major order.
    ///
    /// A column-major matrix already stores its transpose row by row, so its
    /// arrays are reused without a counting pass.
    #[must_use]
    pub fn transpose(&self) -> Self {
        match self.layout {
            Layout::ByColumn => Self {
                nrows: self.ncols,
                ncols: self.nrows,
                offsets: self.offsets.clone(),
                indices: self.indices.clone(),
                values: self.values.clone(),
                layout: Layout::ByRow,
            },
            Layout::ByRow => self.swap_major(),
        }
    }

    /// Converts the matrix to row-major storage, leaving its meaning unchanged.
    #[must_use]
    pub fn into_row_major(self) -> Self {
        match self.layout {
            Layout::ByRow => self,
            Layout::ByColumn => {
                let mut swapped = self.swap_major();
                swapped.nrows = self.nrows;
                swapped.ncols = self.ncols;
                swapped.layout = Layout::ByRow;
                swapped
            }
        }
    }

    /// Boolean pattern with the same structure as this matrix.
    #[must_use]
    pub fn structure(&self) -> SparseMatrix<bool> {
        SparseMatrix {
            nrows: self.nrows,
            ncols: self.ncols,
            offsets: self.offsets.clone(),
            indices: self.indices.clone(),
            values: vec![true; self.indices.len()],
            layout: self.layout,
        }
    }

    /// Returns `true` when both matrices store entries at the same coordinates.
    #[must_use]
    pub fn same_structure<U>(&self, other: &SparseMatrix<U>) -> bool {
        self.nrows == other.nrows
            && self.ncols == other.ncols
            && self.layout == other.layout
            && self.offsets == other.offsets
            && self.indices == other.indices
    }

    /// Counts entries on the main diagonal.
    #[must_use]
    pub fn diagonal_count(&self) -> usize {
        let (major, _) = self.major_minor();
        (0..major)
            .into_par_iter()
            .filter(|&slot| self.minor_indices(slot).binary_search(&slot).is_ok())
            .count()
    }

    /// Removes entries on the main diagonal and returns how many were removed.
    pub fn remove_diagonal(&mut self) -> usize {
        let (major, _) = self.major_minor();
        let mut offsets = Vec::with_capacity(major + 1);
        offsets.push(0);
        let mut indices = Vec::with_capacity(self.indices.len());
        let mut values = Vec::with_capacity(self.values.len());
        for slot in 0..major {
            for (minor, value) in self.slot(slot) {
                if minor != slot {
                    indices.push(minor);
                    values.push(value);
                }
            }
            offsets.push(indices.len());
        }
        let removed = self.indices.len() - indices.len();
        self.offsets = offsets;
        self.indices = indices;
        self.values = values;
        removed
    }

    fn major_minor(&self) -> (usize, usize) {
        match self.layout {
            Layout::ByRow => (self.nrows, self.ncols),
            Layout::ByColumn => (self.ncols, self.nrows),
        }
    }

    /// Counting-sort transpose of the stored arrays. Minor indices of the
    /// result come out sorted because major slots are visited in order.
    fn swap_major(&self) -> Self {
        let (major, minor) = self.major_minor();
        let mut offsets = vec![0_usize; minor + 1];
        for &index in &self.indices {
            offsets[index + 1] += 1;
        }
        for slot in 0..minor {
            offsets[slot + 1] += offsets[slot];
        }
        let mut cursor = offsets.clone();
        let mut indices = vec![0_usize; self.indices.len()];
        let mut values = self.values.clone();
        for slot in 0..major {
            for (index, value) in self.slot(slot) {
                let at = cursor[index];
                indices[at] = slot;
                values[at] = value;
                cursor[index] += 1;
            }
        }
        Self {
            nrows: self.ncols,
            ncols: self.nrows,
            offsets,
            indices,
            values,
            layout: self.layout,
        }
    }
}
