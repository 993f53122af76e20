//! Iterative solvers for linear systems
//!
//! - [`cg`]: Conjugate Gradient - for symmetric positive definite systems

mod cg;

pub use cg::{CgConfig, CgOutcome, CgSolution, cg};
