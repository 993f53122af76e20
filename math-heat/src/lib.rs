//! Steady-state heat equation on a periodic 2D strip
//!
//! This crate assembles the five-point finite-difference system for a strip
//! that is periodic in x and held at fixed temperatures on its bottom and top
//! edges, then solves it with the Conjugate Gradient solver from
//! `math-heat-solvers`.
//!
//! # Example
//!
//! ```
//! use math_heat::{HeatParameters, HeatProblem, SolveOptions};
//!
//! let params = HeatParameters::parse("1.0 1.0 0.25\n1.0 0.0\n").unwrap();
//! let problem = HeatProblem::setup(params).unwrap();
//! let solution = problem.solve(&SolveOptions::default()).unwrap();
//! assert!(solution.outcome.is_converged());
//! ```

pub mod config;
pub mod error;
pub mod postprocess;
pub mod problem;
pub mod snapshot;

pub use config::{HeatConfig, HeatParameters, SolveOptions};
pub use error::{HeatError, Result};
pub use problem::{HeatProblem, HeatSolution};
pub use snapshot::{SnapshotWriter, read_snapshot, snapshot_path};

/// Library version
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
