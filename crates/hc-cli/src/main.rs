//! histconv CLI

mod config;
mod selftest;

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use config::SelftestConfig;

#[derive(Parser)]
#[command(name = "histconv")]
#[command(about = "histconv - configurable to legacy histogram conversion")]
#[command(version)]
struct Cli {
    /// Log verbosity level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: tracing::Level,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Randomized conversion self-test over every supported shape
    Selftest {
        /// JSON config with test tuning knobs
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Number of runs (overrides the config)
        #[arg(long)]
        runs: Option<usize>,

        /// RNG seed (overrides the config)
        #[arg(long)]
        seed: Option<u64>,

        /// Fills per histogram (overrides the config)
        #[arg(long)]
        fills: Option<usize>,

        /// Output file for the summary (pretty JSON). Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the effective self-test configuration
    Describe {
        /// JSON config with test tuning knobs
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt().with_max_level(cli.log_level).with_target(false).init();

    match cli.command {
        Commands::Selftest { config, runs, seed, fills, output } => {
            let mut config = SelftestConfig::load(config.as_deref())?;
            if let Some(runs) = runs {
                config.runs = runs;
            }
            if let Some(seed) = seed {
                config.seed = seed;
            }
            if let Some(fills) = fills {
                config.fills = fills;
            }
            cmd_selftest(&config, output.as_ref())
        }
        Commands::Describe { config } => {
            let config = SelftestConfig::load(config.as_deref())?;
            config.validate()?;
            write_json(None, serde_json::to_value(&config)?)
        }
    }
}

fn cmd_selftest(config: &SelftestConfig, output: Option<&PathBuf>) -> Result<()> {
    tracing::info!(runs = config.runs, seed = config.seed, fills = config.fills, "starting self-test");
    let summary = selftest::run(config)?;
    tracing::info!(
        conversions = summary.conversions,
        rejections = summary.expected_rejections,
        failures = summary.failures.len(),
        "self-test finished"
    );
    let failures = summary.failures.len();
    write_json(output, serde_json::to_value(&summary)?)?;
    if failures > 0 {
        bail!("{failures} self-test check(s) failed");
    }
    Ok(())
}

fn write_json(output: Option<&PathBuf>, value: serde_json::Value) -> Result<()> {
    if let Some(path) = output {
        std::fs::write(path, serde_json::to_string_pretty(&value)?)?;
    } else {
        println!("{}", serde_json::to_string_pretty(&value)?);
    }
    Ok(())
}
