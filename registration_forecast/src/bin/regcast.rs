//! regcast - forecast total registrations of an event
//!
//! Loads the historical registration tables named in the configuration,
//! merges them with the current event's partial registrations and prints the
//! predicted number of registrations up to the target date.

use anyhow::{Context, Result};
use clap::Parser;
use registration_forecast::config::ForecastConfig;
use registration_forecast::export::write_plot_csv_file;
use registration_forecast::models::StrategyKind;
use registration_forecast::pipeline::Pipeline;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Forecast event registrations from partial and historical data
#[derive(Parser, Debug)]
#[command(name = "regcast", version, about)]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Registration table of the current event (.csv or .xlsx)
    #[arg(short, long)]
    file: PathBuf,

    /// Forecast end date, usually the event start
    #[arg(short, long)]
    target: String,

    /// Forecasting strategy, overriding the configuration
    #[arg(short, long)]
    strategy: Option<StrategyKind>,

    /// Write plot-ready rows to this CSV file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the summary as JSON instead of the display line
    #[arg(long)]
    json: bool,

    /// Log debug output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &args.config {
        Some(path) => ForecastConfig::from_file(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => ForecastConfig::default(),
    };
    if let Some(strategy) = args.strategy {
        config.strategy = strategy;
    }

    let pipeline = Pipeline::from_config(&config).context("failed to prepare historical registrations")?;
    info!(strategy = pipeline.strategy_name(), "pipeline ready");

    let report = pipeline
        .run_file(&args.file, &args.target)
        .with_context(|| format!("forecast failed for {}", args.file.display()))?;

    if args.json {
        let json = serde_json::to_string_pretty(report.summary()).context("failed to encode summary")?;
        println!("{}", json);
    } else {
        println!("{}", report.summary().display_line());
        println!("{}", report.summary().disclaimer());
    }

    if let Some(output) = &args.output {
        write_plot_csv_file(output, &report.plot_series())
            .with_context(|| format!("failed to write {}", output.display()))?;
        info!(path = %output.display(), rows = report.forecast().len(), "wrote plot series");
    }

    Ok(())
}
