//! SMC CLI: replay recorded OHLCV data and validate strategy configs.
//!
//! Commands:
//! - `replay`: run one or more instruments through independent pipelines
//! - `check-config`: validate a TOML config and print it with defaults filled in

mod load;
mod replay;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rayon::prelude::*;
use smc_core::StrategyConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::replay::{print_summary, run_instrument, InstrumentReport, InstrumentSpec};

#[derive(Parser)]
#[command(
    name = "smc",
    about = "SMC CLI: smart-money-concepts signal replay"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay base (and optional higher-timeframe) CSVs through the pipeline.
    Replay {
        /// Path to a TOML config file. Defaults apply when omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Instrument as NAME=BASE_CSV[,HTF_CSV]. Repeatable.
        #[arg(long = "instrument", required = true)]
        instruments: Vec<InstrumentSpec>,

        /// Output directory for tick, trade and summary files.
        #[arg(long, default_value = "results")]
        output_dir: PathBuf,

        /// Replay instruments one after another instead of in parallel.
        #[arg(long, default_value_t = false)]
        sequential: bool,
    },
    /// Validate a config file and print the effective configuration.
    CheckConfig {
        /// Path to a TOML config file. Prints the defaults when omitted.
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("smc_core=info,smc=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Replay {
            config,
            instruments,
            output_dir,
            sequential,
        } => run_replay(config.as_deref(), &instruments, &output_dir, sequential),
        Commands::CheckConfig { config } => run_check_config(config.as_deref()),
    }
}

fn load_config(path: Option<&Path>) -> Result<StrategyConfig> {
    match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            StrategyConfig::from_toml_str(&text)
                .with_context(|| format!("invalid config {}", path.display()))
        }
        None => Ok(StrategyConfig::default()),
    }
}

fn run_replay(
    config_path: Option<&Path>,
    instruments: &[InstrumentSpec],
    output_dir: &Path,
    sequential: bool,
) -> Result<()> {
    let config = load_config(config_path)?;
    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create {}", output_dir.display()))?;
    info!(
        instruments = instruments.len(),
        fingerprint = %config.fingerprint()?,
        "starting replay"
    );

    // Pipelines are independent per instrument
    let reports: Vec<InstrumentReport> = if sequential {
        instruments
            .iter()
            .map(|spec| run_instrument(spec, &config, output_dir))
            .collect::<Result<Vec<_>>>()?
    } else {
        instruments
            .par_iter()
            .map(|spec| run_instrument(spec, &config, output_dir))
            .collect::<Result<Vec<_>>>()?
    };

    print_summary(&reports);
    println!("Results saved to: {}", output_dir.display());
    Ok(())
}

fn run_check_config(path: Option<&Path>) -> Result<()> {
    let config = load_config(path)?;
    print!("{}", config.to_toml_string()?);
    println!("# fingerprint: {}", config.fingerprint()?);
    Ok(())
}
