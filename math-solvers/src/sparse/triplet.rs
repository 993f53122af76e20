//! Coordinate (triplet) accumulation for square sparse matrices

use super::csr::CsrMatrix;
use crate::error::{Result, SolverError};
use crate::traits::RealField;

/// Square matrix under construction, stored as unordered (row, col, value) triplets.
///
/// Duplicate coordinates are kept as separate entries and summed when the
/// matrix is compressed with [`TripletMatrix::into_csr`].
#[derive(Debug, Clone)]
pub struct TripletMatrix<T: RealField> {
    dim: usize,
    rows: Vec<usize>,
    cols: Vec<usize>,
    values: Vec<T>,
}

impl<T: RealField> TripletMatrix<T> {
    /// Create an empty `dim x dim` matrix
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            rows: Vec::new(),
            cols: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Create an empty matrix with room for `nnz_estimate` triplets
    pub fn with_capacity(dim: usize, nnz_estimate: usize) -> Self {
        Self {
            dim,
            rows: Vec::with_capacity(nnz_estimate),
            cols: Vec::with_capacity(nnz_estimate),
            values: Vec::with_capacity(nnz_estimate),
        }
    }

    /// Append the triplet (row, col, value)
    ///
    /// No deduplication happens here. Coordinates outside the matrix are
    /// rejected so that compression can never index out of range.
    pub fn add_entry(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        if row >= self.dim || col >= self.dim {
            return Err(SolverError::IndexOutOfBounds {
                row,
                col,
                dim: self.dim,
            });
        }
        self.rows.push(row);
        self.cols.push(col);
        self.values.push(value);
        Ok(())
    }

    /// Matrix dimension
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of stored triplets (duplicates counted separately)
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over the stored triplets in insertion order
    pub fn triplets(&self) -> impl Iterator<Item = (usize, usize, T)> + '_ {
        self.rows
            .iter()
            .zip(self.cols.iter())
            .zip(self.values.iter())
            .map(|((&r, &c), &v)| (r, c, v))
    }

    /// Compress into CSR, summing duplicate coordinates
    pub fn into_csr(self) -> CsrMatrix<T> {
        let dim = self.dim;
        let triplets: Vec<(usize, usize, T)> = self.triplets().collect();
        CsrMatrix::from_sorted_aggregate(dim, dim, triplets)
    }
}
