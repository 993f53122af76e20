//! Two-state sparse matrix: triplet building, then compressed rows
//!
//! [`SparseMatrix`] makes the one-way transition explicit. Entries can only be
//! added while building, products can only be taken once compressed, and both
//! misuses surface as [`SolverError`] values instead of silent wrong output.

use super::csr::CsrMatrix;
use super::triplet::TripletMatrix;
use crate::error::{Result, SolverError};
use crate::traits::{LinearOperator, RealField};
use ndarray::Array1;

/// Square sparse matrix in either building or compressed state
#[derive(Debug, Clone)]
pub enum SparseMatrix<T: RealField> {
    /// Accumulating unordered triplets; duplicates allowed
    Building(TripletMatrix<T>),
    /// Compressed row storage; duplicates already summed
    Compressed(CsrMatrix<T>),
}

impl<T: RealField> SparseMatrix<T> {
    /// Start an empty `dim x dim` matrix in building state
    pub fn new(dim: usize) -> Self {
        SparseMatrix::Building(TripletMatrix::new(dim))
    }

    /// Matrix dimension
    pub fn dim(&self) -> usize {
        match self {
            SparseMatrix::Building(t) => t.dim(),
            SparseMatrix::Compressed(c) => c.num_rows,
        }
    }

    pub fn is_compressed(&self) -> bool {
        matches!(self, SparseMatrix::Compressed(_))
    }

    /// Append a triplet; fails once the matrix has been compressed
    pub fn add_entry(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        match self {
            SparseMatrix::Building(t) => t.add_entry(row, col, value),
            SparseMatrix::Compressed(_) => Err(SolverError::AlreadyCompressed),
        }
    }

    /// Convert triplets to CSR in place. Compressing twice is a no-op.
    pub fn compress(&mut self) {
        if self.is_compressed() {
            return;
        }
        let building = std::mem::replace(self, SparseMatrix::Building(TripletMatrix::new(0)));
        *self = SparseMatrix::Compressed(building.into_csr());
    }

    /// Borrow the compressed form
    pub fn as_csr(&self) -> Result<&CsrMatrix<T>> {
        match self {
            SparseMatrix::Compressed(c) => Ok(c),
            SparseMatrix::Building(_) => Err(SolverError::NotCompressed),
        }
    }

    /// Compress if needed and hand over the CSR matrix
    pub fn into_csr(self) -> CsrMatrix<T> {
        match self {
            SparseMatrix::Building(t) => t.into_csr(),
            SparseMatrix::Compressed(c) => c,
        }
    }

    /// Matrix-vector product; requires the compressed state
    pub fn multiply(&self, x: &Array1<T>) -> Result<Array1<T>> {
        self.as_csr()?.matvec(x)
    }
}

impl<T: RealField> LinearOperator<T> for SparseMatrix<T> {
    fn num_rows(&self) -> usize {
        self.dim()
    }

    fn num_cols(&self) -> usize {
        self.dim()
    }

    fn apply(&self, x: &Array1<T>) -> Result<Array1<T>> {
        self.multiply(x)
    }
}
