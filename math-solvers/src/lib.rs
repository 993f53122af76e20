//! Sparse storage and Conjugate Gradient solver for SPD linear systems
//!
//! This crate provides the numerical core used by the heat-equation driver:
//! dense vector arithmetic, triplet-to-CSR sparse matrices, and an
//! unpreconditioned CG solver with snapshot hooks.
//!
//! # Features
//!
//! - **Vector operations**: length-checked add, subtract, scale, dot, 2-norm
//! - **Sparse matrices**: triplet accumulation with duplicate summing, CSR products
//! - **Conjugate Gradient**: explicit converged / not-converged outcome, breakdown detection
//! - **Generic scalar types**: works with f64 and f32
//!
//! # Example
//!
//! ```
//! use math_heat_solvers::{CgConfig, SparseMatrix, cg};
//! use ndarray::{Array1, array};
//!
//! let mut a = SparseMatrix::new(2);
//! a.add_entry(0, 0, 4.0).unwrap();
//! a.add_entry(0, 1, 1.0).unwrap();
//! a.add_entry(1, 0, 1.0).unwrap();
//! a.add_entry(1, 1, 3.0).unwrap();
//! a.compress();
//!
//! let b = array![1.0, 2.0];
//! let mut x = Array1::zeros(2);
//! let solution = cg(&a, &b, &mut x, &CgConfig::default(), None).unwrap();
//! assert!(solution.outcome.is_converged());
//! ```

pub mod error;
pub mod iterative;
pub mod sparse;
pub mod traits;
pub mod vecops;

// Re-export main types
pub use error::{Result, SolverError};
pub use sparse::{CsrMatrix, SparseMatrix, TripletMatrix};
pub use traits::{LinearOperator, MemorySink, RealField, SnapshotSink};

// Re-export iterative solvers
pub use iterative::{CgConfig, CgOutcome, CgSolution, cg};
