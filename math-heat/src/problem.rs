//! Five-point stencil assembly for the steady heat equation on a periodic strip
//!
//! Unknowns sit on an `m x n` grid: `m` cells along the periodic x direction
//! and `n` interior rows between the bottom and top Dirichlet edges. Cell
//! `(i, j)` has linear index `j * m + i`.
//!
//! Each cell contributes `4 u(i,j) - u(i-1,j) - u(i+1,j) - u(i,j-1) - u(i,j+1)`.
//! Neighbours across x wrap around; neighbours across a Dirichlet edge are
//! dropped from the matrix and their boundary value moves to the right-hand side.

use crate::config::{HeatParameters, SolveOptions};
use crate::error::Result;
use crate::postprocess;
use crate::snapshot::SnapshotWriter;
use ndarray::{Array1, Array2, s};
use solvers::{CgConfig, CgOutcome, SnapshotSink, SparseMatrix, cg};
use std::path::PathBuf;

/// Stencil weight of the cell itself
const CENTER_WEIGHT: f64 = 4.0;
/// Stencil weight of each of the four neighbours
const NEIGHBOR_WEIGHT: f64 = -1.0;

/// Assembled linear system `A u = b` for one set of parameters
#[derive(Debug, Clone)]
pub struct HeatProblem {
    params: HeatParameters,
    m: usize,
    n: usize,
    matrix: SparseMatrix<f64>,
    rhs: Array1<f64>,
}

impl HeatProblem {
    /// Validate the parameters and assemble the matrix and right-hand side
    pub fn setup(params: HeatParameters) -> Result<Self> {
        params.validate()?;
        let m = params.stencils_x();
        let n = params.stencils_y();
        let size = params.num_unknowns()?;

        let mut problem = Self {
            params,
            m,
            n,
            matrix: SparseMatrix::new(size),
            rhs: Array1::zeros(size),
        };
        problem.assemble()?;

        log::debug!(
            "assembled heat problem: m = {}, n = {}, {} unknowns",
            m,
            n,
            size
        );
        Ok(problem)
    }

    fn assemble(&mut self) -> Result<()> {
        let (m, n) = (self.m, self.n);
        for j in 0..n {
            for i in 0..m {
                let row = self.cell_index(i, j);
                let ii = i as isize;

                let mut entries = vec![
                    (self.periodic_index(ii, j), CENTER_WEIGHT),
                    (self.periodic_index(ii - 1, j), NEIGHBOR_WEIGHT),
                    (self.periodic_index(ii + 1, j), NEIGHBOR_WEIGHT),
                ];
                let mut boundary = 0.0;

                if j > 0 {
                    entries.push((self.periodic_index(ii, j - 1), NEIGHBOR_WEIGHT));
                } else {
                    let x = self.params.width * i as f64 / m as f64;
                    boundary += self.lower_boundary(x);
                }

                if j + 1 < n {
                    entries.push((self.periodic_index(ii, j + 1), NEIGHBOR_WEIGHT));
                } else {
                    boundary += self.upper_boundary();
                }

                for (col, weight) in entries {
                    self.matrix.add_entry(row, col, weight)?;
                }
                self.rhs[row] += boundary;
            }
        }
        Ok(())
    }

    /// Linear index of cell `(i, j)`
    #[inline]
    pub fn cell_index(&self, i: usize, j: usize) -> usize {
        j * self.m + i
    }

    /// Linear index of cell `(i, j)` with `i` wrapped into `[0, m)`
    ///
    /// `i = -1` maps to the last cell of row `j` and `i = m` to the first.
    #[inline]
    pub fn periodic_index(&self, i: isize, j: usize) -> usize {
        let wrapped = i.rem_euclid(self.m as isize) as usize;
        self.cell_index(wrapped, j)
    }

    /// Temperature of the bottom edge at position `x`
    ///
    /// A Gaussian hot spot centred at mid-width, scaled by `tc`.
    pub fn lower_boundary(&self, x: f64) -> f64 {
        let d = x - self.params.width / 2.0;
        -self.params.tc * ((-10.0 * d * d).exp() - 2.0)
    }

    /// Temperature of the top edge
    pub fn upper_boundary(&self) -> f64 {
        self.params.th
    }

    pub fn params(&self) -> &HeatParameters {
        &self.params
    }

    /// Unknowns along x
    pub fn stencils_x(&self) -> usize {
        self.m
    }

    /// Unknowns along y
    pub fn stencils_y(&self) -> usize {
        self.n
    }

    pub fn num_unknowns(&self) -> usize {
        self.m * self.n
    }

    pub fn matrix(&self) -> &SparseMatrix<f64> {
        &self.matrix
    }

    pub fn rhs(&self) -> &Array1<f64> {
        &self.rhs
    }

    /// First `m` entries of the right-hand side (bottom row contributions)
    pub fn bottom_boundary_values(&self) -> Array1<f64> {
        self.rhs.slice(s![..self.m]).to_owned()
    }

    /// Last `m` entries of the right-hand side (top row contributions)
    pub fn top_boundary_values(&self) -> Array1<f64> {
        let len = self.rhs.len();
        self.rhs.slice(s![len - self.m..]).to_owned()
    }

    /// Compress the matrix and run CG from a zero initial guess
    ///
    /// Snapshots are written when `options.snapshot_prefix` is set. Hitting the
    /// iteration cap is reported in [`HeatSolution::outcome`], not as an error.
    pub fn solve(self, options: &SolveOptions) -> Result<HeatSolution> {
        let bottom = self.bottom_boundary_values();
        let top = self.top_boundary_values();
        let Self {
            params,
            m,
            n,
            mut matrix,
            rhs,
        } = self;

        matrix.compress();

        let config = CgConfig {
            max_iterations: options.max_iterations,
            tolerance: options.tolerance,
            print_interval: 0,
            snapshot_interval: options.snapshot_interval,
        };

        let mut writer = options
            .snapshot_prefix
            .as_ref()
            .map(|prefix| SnapshotWriter::new(prefix, m, bottom.clone(), top.clone()));
        let sink = writer
            .as_mut()
            .map(|w| w as &mut dyn SnapshotSink<f64>);

        let mut x = Array1::zeros(m * n);
        let solution = cg(&matrix, &rhs, &mut x, &config, sink)?;

        Ok(HeatSolution {
            params,
            m,
            n,
            temperature: x,
            bottom,
            top,
            outcome: solution.outcome,
            residual: solution.residual,
            snapshots: writer.map(SnapshotWriter::into_written).unwrap_or_default(),
        })
    }
}

/// Result of solving a [`HeatProblem`]
#[derive(Debug, Clone)]
pub struct HeatSolution {
    /// Parameters the problem was built from
    pub params: HeatParameters,
    /// Unknowns along x
    pub m: usize,
    /// Unknowns along y
    pub n: usize,
    /// Interior temperatures, row-major with linear index `j * m + i`
    pub temperature: Array1<f64>,
    /// Bottom boundary row as written to snapshots
    pub bottom: Array1<f64>,
    /// Top boundary row as written to snapshots
    pub top: Array1<f64>,
    /// Whether CG converged, with its iteration count
    pub outcome: CgOutcome,
    /// Final relative residual
    pub residual: f64,
    /// Snapshot files written, in order
    pub snapshots: Vec<PathBuf>,
}

impl HeatSolution {
    /// Full `(n + 2) x m` field: bottom row, interior rows, top row
    pub fn field(&self) -> Array2<f64> {
        let mut field = Array2::zeros((self.n + 2, self.m));
        field.row_mut(0).assign(&self.bottom);
        for (j, row) in self.temperature.exact_chunks(self.m).into_iter().enumerate() {
            field.row_mut(j + 1).assign(&row);
        }
        field.row_mut(self.n + 1).assign(&self.top);
        field
    }

    /// Mean temperature of the periodically closed field
    pub fn mean_temperature(&self) -> Option<f64> {
        postprocess::mean_temperature(&self.field())
    }
}
