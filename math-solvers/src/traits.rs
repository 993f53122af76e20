//! Core traits for the solver library
//!
//! This module defines the abstractions shared by storage and solvers:
//! - [`RealField`]: scalar types the solvers operate on
//! - [`LinearOperator`]: matrix-like objects that can perform matrix-vector products
//! - [`SnapshotSink`]: receiver for intermediate iterates of an iterative solve

use crate::error::Result;
use ndarray::Array1;
use num_traits::{Float, FromPrimitive, NumAssign};
use std::fmt::{Debug, Display, LowerExp};

/// Trait for real scalar types used in linear algebra operations.
///
/// Provided for `f64` (the default for heat problems) and `f32`.
pub trait RealField:
    Float + NumAssign + FromPrimitive + Send + Sync + Debug + Display + LowerExp + 'static
{
    /// Widen to `f64` for diagnostics and error reporting
    #[inline]
    fn as_f64(self) -> f64 {
        self.to_f64().unwrap_or(f64::NAN)
    }
}

impl RealField for f64 {}

impl RealField for f32 {}

/// Trait for linear operators (matrices) that can perform matrix-vector products.
///
/// Solvers only need `y = A * x`, so sparse matrices and matrix-free stencils
/// can be used interchangeably.
pub trait LinearOperator<T: RealField>: Send + Sync {
    /// Number of rows in the operator
    fn num_rows(&self) -> usize;

    /// Number of columns in the operator
    fn num_cols(&self) -> usize;

    /// Apply the operator: y = A * x
    ///
    /// Fails with a dimension error if `x.len() != num_cols()`.
    fn apply(&self, x: &Array1<T>) -> Result<Array1<T>>;

    /// Check if the operator is square
    fn is_square(&self) -> bool {
        self.num_rows() == self.num_cols()
    }
}

/// Receiver for solver iterates.
///
/// Iterative solvers call [`SnapshotSink::record`] with the current solution
/// after iteration 0, at a fixed cadence, and once after the last iteration.
pub trait SnapshotSink<T: RealField> {
    /// Record the iterate `x` reached after `iteration` iterations
    fn record(&mut self, iteration: usize, x: &Array1<T>) -> std::io::Result<()>;
}

/// Sink that keeps every recorded iterate in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySink<T> {
    /// Recorded `(iteration, iterate)` pairs in call order
    pub snapshots: Vec<(usize, Array1<T>)>,
}

impl<T> MemorySink<T> {
    pub fn new() -> Self {
        Self {
            snapshots: Vec::new(),
        }
    }

    /// Iteration numbers recorded so far
    pub fn iterations(&self) -> Vec<usize> {
        self.snapshots.iter().map(|(k, _)| *k).collect()
    }
}

impl<T: RealField> SnapshotSink<T> for MemorySink<T> {
    fn record(&mut self, iteration: usize, x: &Array1<T>) -> std::io::Result<()> {
        self.snapshots.push((iteration, x.clone()));
        Ok(())
    }
}
