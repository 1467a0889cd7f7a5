#![allow(non_snake_case)]

//! Choose the truncation `M` from the convergence of low-lying levels.
//!
//! `gen` samples parameter points and saves them; `collect` sweeps `M` over
//! the saved points and saves the worst relative error at each `M`.

use std::path::PathBuf;
use anyhow::{ Context, Result };
use clap::{ Parser, Subcommand };
use log::info;
use ndarray as nd;
use rand::{ SeedableRng, rngs::StdRng };
use transmon_sim::{ SolverConfig, convergence, nd_utils };
use lib::points::{ ParamRanges, gen_points, to_params };

#[derive(Debug, Parser)]
#[command(about = "Convergence of five-transmon levels with truncation M")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Sample parameter points.
    Gen {
        #[arg(long, default_value = "output/random_points_conv.npy")]
        out: PathBuf,

        /// Seed for the random points; drawn from the OS if absent.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Sweep M over saved parameter points.
    Collect {
        #[arg(long, default_value = "output/random_points_conv.npy")]
        points: PathBuf,

        #[arg(long, default_value = "output/converge_5T_maxed.npy")]
        out: PathBuf,

        /// Truncations to compare, ascending; the last is the reference.
        #[arg(long, value_delimiter = ',', default_value = "12,14,16,18,20")]
        ms: Vec<usize>,

        /// Half-width of the single-transmon charge basis.
        #[arg(short, long, default_value_t = 50)]
        c: usize,

        /// Number of levels above the ground state to compare.
        #[arg(short, long, default_value_t = 100)]
        levels: usize,

        /// Solver settings file (TOML) selecting the backend.
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    ).init();
    match Cli::parse().command {
        Command::Gen { out, seed } => {
            let mut rng
                = match seed {
                    Some(s) => StdRng::seed_from_u64(s),
                    None => StdRng::from_entropy(),
                };
            let points = gen_points(&ParamRanges::default(), &mut rng);
            nd_utils::write_npy(&out, &points)
                .with_context(|| format!("writing {}", out.display()))?;
            info!("wrote {} points to {}", points.nrows(), out.display());
        },
        Command::Collect { points, out, ms, c, levels, config } => {
            let raw: nd::Array2<f64> = nd_utils::read_npy2(&points)
                .with_context(|| format!("reading {}", points.display()))?;
            let params = to_params(&raw)?;
            let config
                = match &config {
                    Some(path) => SolverConfig::load(path)
                        .with_context(|| format!("loading {}", path.display()))?,
                    None => SolverConfig::default(),
                };
            let solver = config.solver()?;
            let report
                = convergence::sweep(&params, &ms, c, levels, solver.as_ref())?;
            nd_utils::write_npy(&out, &report.max_rel_err)
                .with_context(|| format!("writing {}", out.display()))?;
            for (m, err) in report.ms.iter().zip(report.max_rel_err.iter()) {
                println!("{:>4} {:.6e}", m, err);
            }
        },
    }
    println!("done");
    Ok(())
}
