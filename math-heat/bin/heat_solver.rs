//! Steady-state heat solver for a periodic strip
//!
//! Usage:
//!   cargo run --release --bin heat-solver -- solve input.txt solution
//!   cargo run --release --bin heat-solver -- stats input.txt solution012.txt
//!
//! `solve` writes `solution000.txt`, `solution010.txt`, ... and the final
//! iterate when a prefix is given.

use clap::{Parser, Subcommand};
use math_heat::postprocess::{mean_temperature, temperature_range};
use math_heat::{HeatConfig, HeatProblem, read_snapshot};
use solvers::CgOutcome;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "heat-solver")]
#[command(about = "Steady-state 2D heat equation solved with Conjugate Gradient")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Assemble the system and solve it
    Solve {
        /// Parameter file (`width height h` / `tc th`, or a `.json` config)
        input: PathBuf,

        /// Prefix of snapshot files; omit to skip snapshots
        prefix: Option<PathBuf>,

        /// Relative residual tolerance
        #[arg(short, long)]
        tolerance: Option<f64>,

        /// Iteration cap (default: number of unknowns)
        #[arg(long)]
        max_iterations: Option<usize>,

        /// Iterations between snapshots
        #[arg(long)]
        snapshot_interval: Option<usize>,
    },

    /// Report the mean temperature of a snapshot file
    Stats {
        /// Parameter file the snapshot was produced from
        input: PathBuf,

        /// Snapshot file to analyse
        solution: PathBuf,
    },
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    env_logger::init();

    let args = Args::parse();

    match args.command {
        Command::Solve {
            input,
            prefix,
            tolerance,
            max_iterations,
            snapshot_interval,
        } => {
            let HeatConfig {
                parameters,
                mut solver,
            } = HeatConfig::from_file(&input)?;

            if let Some(tolerance) = tolerance {
                solver.tolerance = tolerance;
            }
            if max_iterations.is_some() {
                solver.max_iterations = max_iterations;
            }
            if let Some(interval) = snapshot_interval {
                solver.snapshot_interval = interval;
            }
            if prefix.is_some() {
                solver.snapshot_prefix = prefix;
            }

            let problem = HeatProblem::setup(parameters)?;
            log::info!(
                "grid {} x {} ({} unknowns)",
                problem.stencils_x(),
                problem.stencils_y(),
                problem.num_unknowns()
            );

            let solution = problem.solve(&solver)?;
            match solution.outcome {
                CgOutcome::Converged { iterations } => {
                    println!("SUCCESS: CG solver converged in {} iterations.", iterations);
                    Ok(ExitCode::SUCCESS)
                }
                CgOutcome::DidNotConverge { iterations } => {
                    eprintln!(
                        "FAILURE: CG solver did not converge within {} iterations (relative residual {:.3e}).",
                        iterations, solution.residual
                    );
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        Command::Stats { input, solution } => {
            HeatConfig::from_file(&input)?;
            println!("Input file processed: {}", input.display());

            let field = read_snapshot(&solution)?;
            match mean_temperature(&field) {
                Some(mean) => println!("Mean Temperature: {:.5}", mean),
                None => println!("Mean Temperature: n/a (empty snapshot)"),
            }
            if let Some((lo, hi)) = temperature_range(&field) {
                log::info!("temperature range [{:.5}, {:.5}]", lo, hi);
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}
