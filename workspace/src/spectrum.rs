#![allow(non_snake_case)]

//! Compute the spectrum of a single five-transmon parameter set.

use std::path::PathBuf;
use anyhow::{ Context, Result };
use clap::Parser;
use log::info;
use transmon_sim::{ HBuilderFive, Problem, SolverConfig, TransmonParams };

/// Ec1..Ec5, Ej1..Ej5, E12, E23, E13, E34, E45, E35
const DEFAULT_PARAMS: [f64; 16] = [
    1.0, 1.0, 1.0, 1.0, 1.0,
    50.0, 50.0, 50.0, 50.0, 50.0,
    0.1, 0.1, 0.01, 0.1, 0.1, 0.01,
];

#[derive(Debug, Parser)]
#[command(about = "Diagonalize five coupled transmons in a truncated basis")]
struct Cli {
    /// Problem file (TOML) holding `[params]` and optionally `[solver]`.
    #[arg(short, long, conflicts_with = "config")]
    input: Option<PathBuf>,

    /// Solver settings file (TOML); command-line flags override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Maximum total excitation number.
    #[arg(short, long)]
    m: Option<usize>,

    /// Half-width of the single-transmon charge basis.
    #[arg(short, long)]
    c: Option<usize>,

    /// Parameters Ec1..Ec5, Ej1..Ej5, E12, E23, E13, E34, E45, E35.
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    params: Option<Vec<f64>>,

    /// Number of levels to print.
    #[arg(short, long, default_value_t = 20)]
    levels: usize,

    /// Also label each level by its dominant product state.
    #[arg(long)]
    states: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    ).init();
    let cli = Cli::parse();

    let (mut params, mut config)
        = match (&cli.input, &cli.config) {
            (Some(path), _) => {
                let problem = Problem::load(path)
                    .with_context(|| format!("loading {}", path.display()))?;
                (problem.params, problem.solver)
            },
            (None, Some(path)) => {
                let config = SolverConfig::load(path)
                    .with_context(|| format!("loading {}", path.display()))?;
                (TransmonParams::from_slice(&DEFAULT_PARAMS)?, config)
            },
            (None, None) => (
                TransmonParams::from_slice(&DEFAULT_PARAMS)?,
                SolverConfig::default(),
            ),
        };
    if let Some(p) = cli.params.as_deref() {
        params = TransmonParams::from_slice(p)?;
    }
    if let Some(m) = cli.m { config.m = m; }
    if let Some(c) = cli.c { config.c = c; }
    info!("M = {}, C = {}, backend = {:?}", config.m, config.c, config.backend);

    let builder = HBuilderFive::new(params, config)?;
    if cli.states {
        let spectrum = builder.diagonalize()?;
        let mut labeled: Vec<(f64, String)>
            = [&spectrum.even, &spectrum.odd].into_iter()
            .flat_map(|sector| {
                (0..sector.len()).map(move |k| {
                    let label
                        = sector.dominant_state(k)
                        .map(|(s, p)| format!("{:?} ({:.3})", s.0, p))
                        .unwrap_or_default();
                    (sector.energies[k], label)
                })
            })
            .collect();
        labeled.sort_by(|a, b| a.0.total_cmp(&b.0));
        let ground = labeled.first().map(|(e, _)| *e).unwrap_or(0.0);
        for (e, label) in labeled.iter().take(cli.levels) {
            println!("{:>14.6} {:>14.6}  {}", e, e - ground, label);
        }
    } else {
        let E = builder.eigenvalues()?;
        let ground = E.get(0).copied().unwrap_or(0.0);
        for e in E.iter().take(cli.levels) {
            println!("{:>14.6} {:>14.6}", e, e - ground);
        }
    }
    Ok(())
}
