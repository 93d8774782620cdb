//! Volt scenario simulator.
//!
//! Loads a JSON scenario, replays it against an in-memory energy engine on a
//! manual clock, and prints one JSON line per outcome to stdout.

mod scenario;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use volt_energy::LbaAccrualStart;

#[derive(Parser, Debug)]
#[command(
    name = "volt-sim",
    version,
    about = "Replay an energy accrual scenario and print the outcomes"
)]
struct Args {
    /// Path to the scenario JSON file
    scenario: PathBuf,

    /// Override where LBA accrual starts ("earliest", "release", or a Unix timestamp)
    #[arg(long)]
    lba_accrual_start: Option<LbaAccrualStart>,

    /// Pretty-print each outcome instead of one line per outcome
    #[arg(long)]
    pretty: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Log output format ("text" or "json")
    #[arg(long, default_value = "text")]
    log_format: String,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level, &args.log_format);

    info!("Volt Simulator v{}", env!("CARGO_PKG_VERSION"));

    let mut scenario = scenario::load(&args.scenario)?;
    if let Some(start) = args.lba_accrual_start {
        scenario.config.lba_accrual_start = start;
    }
    info!(config = ?scenario.config, "sim: effective config");

    for outcome in scenario::run(&scenario)? {
        let line = if args.pretty {
            serde_json::to_string_pretty(&outcome)
        } else {
            serde_json::to_string(&outcome)
        }
        .context("failed to encode outcome")?;
        println!("{line}");
    }
    Ok(())
}

/// Initialize tracing subscriber with the given level and format.
///
/// Logs go to stderr so stdout carries only outcomes.
fn init_logging(level_str: &str, format: &str) {
    use tracing_subscriber::filter::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_str));

    if format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}
