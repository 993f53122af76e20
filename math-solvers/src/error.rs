//! Error types for sparse storage and iterative solves.
//!
//! Reaching the iteration cap is not an error: it is reported through
//! [`CgOutcome`](crate::iterative::CgOutcome). The variants here cover usage
//! errors (wrong sizes, wrong matrix state) and numerical breakdown.

use thiserror::Error;

/// Errors that can occur while building matrices or running a solver.
#[derive(Debug, Error)]
pub enum SolverError {
    /// Two operands have incompatible lengths.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Length required by the operation
        expected: usize,
        /// Length actually supplied
        got: usize,
    },

    /// A triplet refers to a row or column outside the matrix.
    #[error("entry ({row}, {col}) is outside a {dim}x{dim} matrix")]
    IndexOutOfBounds {
        /// Row index of the entry
        row: usize,
        /// Column index of the entry
        col: usize,
        /// Matrix dimension
        dim: usize,
    },

    /// CSR row pointers do not start at zero or decrease somewhere.
    #[error("row_ptrs[{index}] = {value} breaks the row pointer order (must start at 0 and never decrease)")]
    InvalidRowPointers {
        /// Position of the first offending pointer
        index: usize,
        /// Value found there
        value: usize,
    },

    /// A product was requested before the matrix was compressed.
    #[error("matrix is still in triplet form; compress it before multiplying")]
    NotCompressed,

    /// An entry was added after the matrix was compressed.
    #[error("matrix is already compressed; entries can no longer be added")]
    AlreadyCompressed,

    /// The CG step length denominator `p·Ap` was not strictly positive.
    #[error("CG breakdown at iteration {iteration}: p·Ap = {denominator:e} (matrix is not positive definite)")]
    Breakdown {
        /// Iteration at which the breakdown was detected
        iteration: usize,
        /// Offending value of `p·Ap`
        denominator: f64,
    },

    /// The snapshot sink failed to record an iterate.
    #[error("failed to write snapshot for iteration {iteration}: {source}")]
    Snapshot {
        /// Iteration being written
        iteration: usize,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },
}

/// A specialized `Result` type for solver operations.
pub type Result<T> = std::result::Result<T, SolverError>;

impl SolverError {
    /// Returns `true` for operand length mismatches.
    pub fn is_dimension_error(&self) -> bool {
        matches!(self, SolverError::DimensionMismatch { .. })
    }

    /// Returns `true` when the matrix was used in the wrong state.
    ///
    /// This includes `NotCompressed` and `AlreadyCompressed`.
    pub fn is_state_error(&self) -> bool {
        matches!(
            self,
            SolverError::NotCompressed | SolverError::AlreadyCompressed
        )
    }

    /// Returns `true` for numerical breakdown of the iteration.
    pub fn is_breakdown(&self) -> bool {
        matches!(self, SolverError::Breakdown { .. })
    }
}

/// Fail with `DimensionMismatch` unless `got == expected`.
#[inline]
pub(crate) fn check_len(expected: usize, got: usize) -> Result<()> {
    if expected == got {
        Ok(())
    } else {
        Err(SolverError::DimensionMismatch { expected, got })
    }
}
