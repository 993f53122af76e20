//! Compressed Sparse Row (CSR) matrix format
//!
//! CSR format stores:
//! - `values`: Non-zero entries in row-major order
//! - `col_indices`: Column index for each value
//! - `row_ptrs`: Index into values/col_indices where each row starts

use crate::error::{Result, SolverError, check_len};
use crate::traits::{LinearOperator, RealField};
use ndarray::{Array1, Array2};
use std::ops::Range;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Rows below this count are multiplied sequentially even with `rayon` enabled
#[cfg(feature = "rayon")]
const PARALLEL_ROW_THRESHOLD: usize = 246;

/// Compressed Sparse Row (CSR) matrix format
///
/// Memory-efficient storage for sparse matrices with O(nnz) space complexity.
/// Matrix-vector products are O(nnz) instead of O(n²) for dense matrices.
///
/// Invariants: `row_ptrs` has `num_rows + 1` non-decreasing entries starting
/// at 0, `row_ptrs[num_rows] == values.len() == col_indices.len()`, and column
/// indices are unique within each row.
#[derive(Debug, Clone, PartialEq)]
pub struct CsrMatrix<T: RealField> {
    /// Number of rows
    pub num_rows: usize,
    /// Number of columns
    pub num_cols: usize,
    /// Non-zero values in row-major order
    pub values: Vec<T>,
    /// Column indices for each value
    pub col_indices: Vec<usize>,
    /// Row pointers: row_ptrs[i] is the start index in values/col_indices for row i
    /// row_ptrs[num_rows] = nnz (total number of non-zeros)
    pub row_ptrs: Vec<usize>,
}

impl<T: RealField> CsrMatrix<T> {
    /// Create a new empty CSR matrix
    pub fn new(num_rows: usize, num_cols: usize) -> Self {
        Self {
            num_rows,
            num_cols,
            values: Vec::new(),
            col_indices: Vec::new(),
            row_ptrs: vec![0; num_rows + 1],
        }
    }

    /// Create a CSR matrix from raw components, checking the CSR invariants
    pub fn from_raw_parts(
        num_rows: usize,
        num_cols: usize,
        row_ptrs: Vec<usize>,
        col_indices: Vec<usize>,
        values: Vec<T>,
    ) -> Result<Self> {
        check_len(num_rows + 1, row_ptrs.len())?;
        check_len(values.len(), col_indices.len())?;
        if row_ptrs[0] != 0 {
            return Err(SolverError::InvalidRowPointers {
                index: 0,
                value: row_ptrs[0],
            });
        }
        if let Some(i) = row_ptrs.windows(2).position(|w| w[0] > w[1]) {
            return Err(SolverError::InvalidRowPointers {
                index: i + 1,
                value: row_ptrs[i + 1],
            });
        }
        check_len(values.len(), row_ptrs[num_rows])?;

        for row in 0..num_rows {
            let cols = &col_indices[row_ptrs[row]..row_ptrs[row + 1]];
            if let Some(&col) = cols.iter().find(|&&c| c >= num_cols) {
                return Err(SolverError::IndexOutOfBounds {
                    row,
                    col,
                    dim: num_cols,
                });
            }
        }

        Ok(Self {
            num_rows,
            num_cols,
            row_ptrs,
            col_indices,
            values,
        })
    }

    /// Create a CSR matrix from a dense matrix
    ///
    /// Only stores entries with magnitude > threshold
    pub fn from_dense(dense: &Array2<T>, threshold: T) -> Self {
        let num_rows = dense.nrows();
        let num_cols = dense.ncols();

        let mut values = Vec::new();
        let mut col_indices = Vec::new();
        let mut row_ptrs = vec![0usize; num_rows + 1];

        for i in 0..num_rows {
            for j in 0..num_cols {
                let val = dense[[i, j]];
                if val.abs() > threshold {
                    values.push(val);
                    col_indices.push(j);
                }
            }
            row_ptrs[i + 1] = values.len();
        }

        Self {
            num_rows,
            num_cols,
            values,
            col_indices,
            row_ptrs,
        }
    }

    /// Create a CSR matrix from COO (Coordinate) format triplets
    ///
    /// Triplets are (row, col, value). Duplicate entries are summed.
    pub fn from_triplets(
        num_rows: usize,
        num_cols: usize,
        triplets: Vec<(usize, usize, T)>,
    ) -> Result<Self> {
        if let Some(&(row, col, _)) = triplets
            .iter()
            .find(|(r, c, _)| *r >= num_rows || *c >= num_cols)
        {
            return Err(SolverError::IndexOutOfBounds {
                row,
                col,
                dim: num_rows.max(num_cols),
            });
        }
        Ok(Self::from_sorted_aggregate(num_rows, num_cols, triplets))
    }

    /// Sort triplets by (row, col), sum duplicates and build row pointers.
    ///
    /// All coordinates must already be in range. The sort is stable, so
    /// duplicates are summed in insertion order.
    pub(crate) fn from_sorted_aggregate(
        num_rows: usize,
        num_cols: usize,
        mut triplets: Vec<(usize, usize, T)>,
    ) -> Self {
        triplets.sort_by_key(|&(row, col, _)| (row, col));

        let mut values: Vec<T> = Vec::with_capacity(triplets.len());
        let mut col_indices = Vec::with_capacity(triplets.len());
        let mut row_ptrs = vec![0usize; num_rows + 1];
        let mut last: Option<(usize, usize)> = None;

        for (row, col, val) in triplets {
            if last == Some((row, col)) {
                if let Some(acc) = values.last_mut() {
                    *acc += val;
                }
            } else {
                values.push(val);
                col_indices.push(col);
                row_ptrs[row + 1] += 1;
                last = Some((row, col));
            }
        }

        // Per-row counts to offsets
        for i in 0..num_rows {
            row_ptrs[i + 1] += row_ptrs[i];
        }

        Self {
            num_rows,
            num_cols,
            values,
            col_indices,
            row_ptrs,
        }
    }

    /// Number of non-zero entries
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Get the range of indices in values/col_indices for a given row
    pub fn row_range(&self, row: usize) -> Range<usize> {
        self.row_ptrs[row]..self.row_ptrs[row + 1]
    }

    /// Get the (col, value) pairs for a row
    pub fn row_entries(&self, row: usize) -> impl Iterator<Item = (usize, T)> + '_ {
        let range = self.row_range(row);
        self.col_indices[range.clone()]
            .iter()
            .copied()
            .zip(self.values[range].iter().copied())
    }

    /// Matrix-vector product: y = A * x
    ///
    /// Uses parallel processing when the `rayon` feature is enabled and the
    /// matrix is large enough to benefit from parallelization. Each row is
    /// summed sequentially in both paths, so the result does not depend on
    /// the feature.
    pub fn matvec(&self, x: &Array1<T>) -> Result<Array1<T>> {
        check_len(self.num_cols, x.len())?;

        #[cfg(feature = "rayon")]
        {
            if self.num_rows >= PARALLEL_ROW_THRESHOLD {
                if let Some(x_slice) = x.as_slice() {
                    return Ok(self.matvec_parallel(x_slice));
                }
            }
        }

        Ok(self.matvec_sequential(x))
    }

    fn row_dot(&self, row: usize, x: impl Fn(usize) -> T) -> T {
        let mut sum = T::zero();
        for idx in self.row_range(row) {
            sum += self.values[idx] * x(self.col_indices[idx]);
        }
        sum
    }

    fn matvec_sequential(&self, x: &Array1<T>) -> Array1<T> {
        Array1::from_iter((0..self.num_rows).map(|i| self.row_dot(i, |j| x[j])))
    }

    #[cfg(feature = "rayon")]
    fn matvec_parallel(&self, x: &[T]) -> Array1<T> {
        let results: Vec<T> = (0..self.num_rows)
            .into_par_iter()
            .map(|i| self.row_dot(i, |j| x[j]))
            .collect();

        Array1::from_vec(results)
    }

    /// Get element at (i, j), returns 0 if not stored
    pub fn get(&self, i: usize, j: usize) -> T {
        self.row_entries(i)
            .find(|&(col, _)| col == j)
            .map_or_else(T::zero, |(_, val)| val)
    }

    /// Extract diagonal elements
    pub fn diagonal(&self) -> Array1<T> {
        let n = self.num_rows.min(self.num_cols);
        Array1::from_iter((0..n).map(|i| self.get(i, i)))
    }

    /// Create identity matrix in CSR format
    pub fn identity(n: usize) -> Self {
        Self {
            num_rows: n,
            num_cols: n,
            values: vec![T::one(); n],
            col_indices: (0..n).collect(),
            row_ptrs: (0..=n).collect(),
        }
    }

    /// Create diagonal matrix from vector
    pub fn from_diagonal(diag: &Array1<T>) -> Self {
        let n = diag.len();
        Self {
            num_rows: n,
            num_cols: n,
            values: diag.to_vec(),
            col_indices: (0..n).collect(),
            row_ptrs: (0..=n).collect(),
        }
    }

    /// Convert to dense matrix (for debugging/small matrices)
    pub fn to_dense(&self) -> Array2<T> {
        let mut dense = Array2::from_elem((self.num_rows, self.num_cols), T::zero());

        for i in 0..self.num_rows {
            for (j, val) in self.row_entries(i) {
                dense[[i, j]] = val;
            }
        }

        dense
    }

    /// Check whether A equals its transpose up to `tol`
    pub fn is_symmetric(&self, tol: T) -> bool {
        self.num_rows == self.num_cols
            && (0..self.num_rows).all(|i| {
                self.row_entries(i)
                    .all(|(j, val)| (val - self.get(j, i)).abs() <= tol)
            })
    }
}

impl<T: RealField> LinearOperator<T> for CsrMatrix<T> {
    fn num_rows(&self) -> usize {
        self.num_rows
    }

    fn num_cols(&self) -> usize {
        self.num_cols
    }

    fn apply(&self, x: &Array1<T>) -> Result<Array1<T>> {
        self.matvec(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_csr_from_dense() {
        let dense = array![[1.0_f64, 0.0, 2.0], [0.0, 3.0, 0.0], [4.0, 0.0, 5.0],];

        let csr = CsrMatrix::from_dense(&dense, 1e-15);

        assert_eq!(csr.num_rows, 3);
        assert_eq!(csr.num_cols, 3);
        assert_eq!(csr.nnz(), 5);
        assert_eq!(csr.row_ptrs, vec![0, 2, 3, 5]);

        assert_relative_eq!(csr.get(0, 0), 1.0);
        assert_relative_eq!(csr.get(0, 2), 2.0);
        assert_relative_eq!(csr.get(1, 1), 3.0);
        assert_relative_eq!(csr.get(2, 0), 4.0);
        assert_relative_eq!(csr.get(2, 2), 5.0);
        assert_relative_eq!(csr.get(1, 0), 0.0);
    }

    #[test]
    fn test_csr_matvec() {
        let dense = array![[1.0_f64, 2.0], [3.0, 4.0]];
        let csr = CsrMatrix::from_dense(&dense, 1e-15);
        let x = array![1.0_f64, 2.0];

        let y = csr.matvec(&x).unwrap();

        // [1 2] * [1]   [5]
        // [3 4]   [2] = [11]
        assert_relative_eq!(y[0], 5.0, epsilon = 1e-12);
        assert_relative_eq!(y[1], 11.0, epsilon = 1e-12);
    }

    #[test]
    fn test_matvec_size_mismatch() {
        let csr: CsrMatrix<f64> = CsrMatrix::identity(3);
        let err = csr.matvec(&array![1.0, 2.0]).unwrap_err();
        assert!(err.is_dimension_error());
    }

    #[test]
    fn test_csr_from_triplets_duplicates_and_empty_rows() {
        let triplets = vec![
            (2, 2, 5.0_f64),
            (0, 0, 1.0),
            (0, 0, 2.0), // duplicate
            (2, 0, 4.0),
            (0, 2, 2.0),
            (2, 2, -1.0), // duplicate
        ];

        let csr = CsrMatrix::from_triplets(4, 3, triplets).unwrap();

        assert_eq!(csr.nnz(), 4);
        // Row 1 and row 3 are empty
        assert_eq!(csr.row_ptrs, vec![0, 2, 2, 4, 4]);
        assert_eq!(csr.col_indices, vec![0, 2, 0, 2]);
        assert_relative_eq!(csr.get(0, 0), 3.0);
        assert_relative_eq!(csr.get(2, 2), 4.0);
    }

    #[test]
    fn test_csr_from_triplets_rejects_out_of_range() {
        let err = CsrMatrix::from_triplets(2, 2, vec![(0, 0, 1.0_f64), (1, 2, 1.0)]).unwrap_err();
        assert!(matches!(err, SolverError::IndexOutOfBounds { row: 1, col: 2, .. }));
    }

    #[test]
    fn test_csr_from_triplets_empty() {
        let csr: CsrMatrix<f64> = CsrMatrix::from_triplets(3, 3, Vec::new()).unwrap();
        assert_eq!(csr.nnz(), 0);
        assert_eq!(csr.row_ptrs, vec![0, 0, 0, 0]);
        assert_eq!(csr.matvec(&array![1.0, 1.0, 1.0]).unwrap(), array![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_from_raw_parts_validation() {
        let ok = CsrMatrix::from_raw_parts(2, 2, vec![0, 1, 2], vec![0, 1], vec![1.0_f64, 2.0]);
        assert!(ok.is_ok());

        let bad_ptrs = CsrMatrix::from_raw_parts(2, 2, vec![0, 2, 1], vec![0, 1], vec![1.0_f64, 2.0]);
        assert!(matches!(
            bad_ptrs,
            Err(SolverError::InvalidRowPointers { index: 2, value: 1 })
        ));

        // Consistent nnz does not hide a decreasing pointer
        let bad_ptrs = CsrMatrix::from_raw_parts(2, 2, vec![0, 2, 1], vec![0], vec![1.0_f64]);
        assert!(matches!(
            bad_ptrs,
            Err(SolverError::InvalidRowPointers { index: 2, value: 1 })
        ));

        let bad_start = CsrMatrix::from_raw_parts(1, 2, vec![1, 1], vec![], Vec::<f64>::new());
        assert!(matches!(
            bad_start,
            Err(SolverError::InvalidRowPointers { index: 0, value: 1 })
        ));

        let bad_nnz = CsrMatrix::from_raw_parts(2, 2, vec![0, 1, 3], vec![0, 1], vec![1.0_f64, 2.0]);
        assert!(bad_nnz.is_err());

        let bad_col = CsrMatrix::from_raw_parts(2, 2, vec![0, 1, 2], vec![0, 2], vec![1.0_f64, 2.0]);
        assert!(matches!(
            bad_col,
            Err(SolverError::IndexOutOfBounds { row: 1, col: 2, .. })
        ));
    }

    #[test]
    fn test_csr_identity_and_diagonal() {
        let id: CsrMatrix<f64> = CsrMatrix::identity(3);
        assert_eq!(id.nnz(), 3);
        assert_relative_eq!(id.get(1, 1), 1.0);
        assert_relative_eq!(id.get(0, 1), 0.0);

        let d = CsrMatrix::from_diagonal(&array![2.0_f64, 3.0]);
        assert_eq!(d.diagonal(), array![2.0, 3.0]);
        assert!(d.is_symmetric(0.0));
    }

    #[test]
    fn test_csr_to_dense_roundtrip() {
        let original = array![[1.0_f64, 0.0], [2.0, 3.0]];
        let csr = CsrMatrix::from_dense(&original, 1e-15);
        assert_eq!(csr.to_dense(), original);
        assert!(!csr.is_symmetric(1e-12));
    }

    #[test]
    fn test_linear_operator_impl() {
        let dense = array![[1.0_f32, 2.0], [3.0, 4.0]];
        let csr = CsrMatrix::from_dense(&dense, 1e-7);
        let x = array![1.0_f32, 2.0];

        let y = csr.apply(&x).unwrap();
        assert_relative_eq!(y[0], 5.0, epsilon = 1e-6);
        assert_relative_eq!(y[1], 11.0, epsilon = 1e-6);

        assert!(csr.is_square());
        assert_eq!(LinearOperator::num_rows(&csr), 2);
        assert_eq!(LinearOperator::num_cols(&csr), 2);
    }
}
