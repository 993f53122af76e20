//! CG (Conjugate Gradient) solver
//!
//! The Conjugate Gradient method for symmetric positive definite systems.
//! This is the method of choice for SPD matrices as it has optimal convergence.

use crate::error::{Result, SolverError, check_len};
use crate::traits::{LinearOperator, RealField, SnapshotSink};
use crate::vecops::{add, axpy, dot, scale, subtract};
use ndarray::Array1;

/// CG solver configuration
#[derive(Debug, Clone)]
pub struct CgConfig<R> {
    /// Maximum number of iterations (`None` = system dimension)
    pub max_iterations: Option<usize>,
    /// Relative residual tolerance ||r_k|| / ||r_0||
    pub tolerance: R,
    /// Log progress every N iterations (0 = no output)
    pub print_interval: usize,
    /// Record a snapshot every N iterations (0 = only first and last)
    pub snapshot_interval: usize,
}

impl Default for CgConfig<f64> {
    fn default() -> Self {
        Self::with_tolerance(1e-5)
    }
}

impl<R> CgConfig<R> {
    /// Default cadence and iteration cap with the given tolerance
    pub fn with_tolerance(tolerance: R) -> Self {
        Self {
            max_iterations: None,
            tolerance,
            print_interval: 0,
            snapshot_interval: 10,
        }
    }
}

/// How a CG run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CgOutcome {
    /// Relative residual dropped to or below the tolerance
    Converged {
        /// Iterations performed
        iterations: usize,
    },
    /// Iteration cap reached with the residual still above tolerance
    DidNotConverge {
        /// Iterations performed (equal to the cap)
        iterations: usize,
    },
}

impl CgOutcome {
    /// Iterations performed, whatever the outcome
    pub fn iterations(&self) -> usize {
        match *self {
            CgOutcome::Converged { iterations } | CgOutcome::DidNotConverge { iterations } => {
                iterations
            }
        }
    }

    pub fn is_converged(&self) -> bool {
        matches!(self, CgOutcome::Converged { .. })
    }
}

/// CG solver result
#[derive(Debug, Clone, Copy)]
pub struct CgSolution<R> {
    /// Termination status with iteration count
    pub outcome: CgOutcome,
    /// Final relative residual
    pub residual: R,
}

/// Solve Ax = b using the Conjugate Gradient method
///
/// `x` holds the initial guess on entry and the last iterate on return. The
/// iteration stops when ||r_k|| / ||r_0|| <= `tolerance` or when the cap is
/// reached. A zero initial residual counts as convergence after 0 iterations.
///
/// If `sink` is given it receives the iterate after iteration 0, after every
/// `snapshot_interval`-th iteration, and after the final iteration.
///
/// Note: This method is only correct for symmetric positive definite matrices.
/// A non-positive `p·Ap` aborts the solve with [`SolverError::Breakdown`].
pub fn cg<T, A>(
    operator: &A,
    b: &Array1<T>,
    x: &mut Array1<T>,
    config: &CgConfig<T>,
    mut sink: Option<&mut dyn SnapshotSink<T>>,
) -> Result<CgSolution<T>>
where
    T: RealField,
    A: LinearOperator<T> + ?Sized,
{
    let n = b.len();
    check_len(operator.num_rows(), n)?;
    check_len(operator.num_cols(), x.len())?;
    let cap = config.max_iterations.unwrap_or(n);

    // r0 = b - A x0
    let mut r = subtract(b, &operator.apply(x)?)?;
    let mut p = r.clone();
    let mut rho = dot(&r, &r)?;
    let norm0 = rho.sqrt();

    let relative = |rho: T| {
        if norm0 > T::zero() {
            rho.sqrt() / norm0
        } else {
            T::zero()
        }
    };
    let mut rel_residual = relative(rho);

    record(&mut sink, 0, x)?;
    let mut last_recorded = 0;
    let mut iterations = 0;

    while iterations < cap && rho > T::zero() && rel_residual > config.tolerance {
        iterations += 1;

        // q = A * p
        let q = operator.apply(&p)?;

        // alpha = rho / (p, q)
        let pq = dot(&p, &q)?;
        if !(pq > T::zero() && pq.is_finite()) {
            return Err(SolverError::Breakdown {
                iteration: iterations,
                denominator: pq.as_f64(),
            });
        }
        let alpha = rho / pq;

        // x = x + alpha * p
        axpy(alpha, &p, x)?;

        // r = r - alpha * q
        axpy(-alpha, &q, &mut r)?;

        let rho_new = dot(&r, &r)?;
        let beta = rho_new / rho;
        rho = rho_new;

        // p = r + beta * p
        p = add(&r, &scale(beta, &p))?;

        rel_residual = relative(rho);

        if config.print_interval > 0 && iterations % config.print_interval == 0 {
            log::info!(
                "CG iteration {}: relative residual = {:.6e}",
                iterations,
                rel_residual.as_f64()
            );
        }

        if config.snapshot_interval > 0 && iterations % config.snapshot_interval == 0 {
            record(&mut sink, iterations, x)?;
            last_recorded = iterations;
        }
    }

    if last_recorded != iterations {
        record(&mut sink, iterations, x)?;
    }

    let outcome = if rho == T::zero() || rel_residual <= config.tolerance {
        log::info!("CG converged in {} iterations", iterations);
        CgOutcome::Converged { iterations }
    } else {
        log::warn!(
            "CG did not converge within {} iterations (relative residual {:.3e})",
            iterations,
            rel_residual.as_f64()
        );
        CgOutcome::DidNotConverge { iterations }
    };

    Ok(CgSolution {
        outcome,
        residual: rel_residual,
    })
}

fn record<T: RealField>(
    sink: &mut Option<&mut dyn SnapshotSink<T>>,
    iteration: usize,
    x: &Array1<T>,
) -> Result<()> {
    if let Some(sink) = sink {
        sink.record(iteration, x)
            .map_err(|source| SolverError::Snapshot { iteration, source })?;
    }
    Ok(())
}
