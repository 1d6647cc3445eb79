//! Breadth CLI — compute market breadth from local CSV data.
//!
//! Commands:
//! - `run` — load a universe, run a breadth indicator, print a summary, write CSV
//! - `columns` — print the four output column names for an indicator/lookback

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::Dispatch;
use tracing_subscriber::EnvFilter;

use breadth_core::indicators::with_moving_average;
use breadth_core::ColumnNames;
use breadth_runner::{
    load_universe, parse_date, save_csv, BreadthConfig, BreadthEngine, BreadthReport,
    IndicatorKind, Side,
};

#[derive(Parser)]
#[command(name = "breadth", about = "Breadth CLI — daily market breadth indicators")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a breadth indicator from a TOML config file.
    Run {
        /// Path to a TOML config file.
        #[arg(long)]
        config: PathBuf,

        /// Indicator override: hilo or dma.
        #[arg(long)]
        indicator: Option<String>,

        /// Lookback override (bars).
        #[arg(long)]
        lookback: Option<usize>,

        /// First output date override (YYYY-MM-DD).
        #[arg(long)]
        from: Option<String>,

        /// Last output date override (YYYY-MM-DD).
        #[arg(long)]
        to: Option<String>,

        /// Concurrent instrument budget override.
        #[arg(long)]
        workers: Option<usize>,

        /// CSV output path override.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print the output column names for an indicator and lookback.
    Columns {
        /// Indicator: hilo or dma.
        #[arg(long)]
        indicator: String,

        /// Lookback (bars).
        #[arg(long)]
        lookback: usize,
    },
}

/// Overrides taken from the command line; `None` keeps the file value.
struct Overrides {
    indicator: Option<String>,
    lookback: Option<usize>,
    from: Option<String>,
    to: Option<String>,
    workers: Option<usize>,
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            indicator,
            lookback,
            from,
            to,
            workers,
            output,
        } => {
            let log = init_tracing()?;
            let overrides = Overrides {
                indicator,
                lookback,
                from,
                to,
                workers,
                output,
            };
            run_breadth_cmd(config, overrides, log)
        }
        Commands::Columns {
            indicator,
            lookback,
        } => run_columns(&indicator, lookback),
    }
}

/// Stderr subscriber filtered by `BREADTH_LOG` (default `info`).
fn init_tracing() -> Result<Dispatch> {
    let filter = std::env::var("BREADTH_LOG").unwrap_or_else(|_| "info".to_string());
    let env_filter = EnvFilter::try_new(&filter)
        .with_context(|| format!("invalid BREADTH_LOG filter '{filter}'"))?;

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();
    let dispatch = Dispatch::new(subscriber);
    tracing::dispatcher::set_global_default(dispatch.clone())
        .context("failed to install log subscriber")?;
    Ok(dispatch)
}

fn parse_indicator(name: &str) -> Result<IndicatorKind> {
    match IndicatorKind::parse(name) {
        Some(kind) => Ok(kind),
        None => bail!("unknown indicator '{name}'. Valid: hilo, dma"),
    }
}

fn apply_overrides(mut config: BreadthConfig, overrides: Overrides) -> Result<BreadthConfig> {
    if let Some(name) = overrides.indicator {
        config.indicator = parse_indicator(&name)?;
    }
    if let Some(lookback) = overrides.lookback {
        config.lookback = lookback;
    }
    if let Some(from) = overrides.from {
        config.from = parse_date(&from)?;
    }
    if let Some(to) = overrides.to {
        config.to = parse_date(&to)?;
    }
    if let Some(workers) = overrides.workers {
        config.workers = workers;
    }
    if let Some(output) = overrides.output {
        config.output = Some(output);
    }
    config.validate()?;
    Ok(config)
}

fn run_breadth_cmd(config_path: PathBuf, overrides: Overrides, log: Dispatch) -> Result<()> {
    let config = BreadthConfig::from_file(&config_path)
        .with_context(|| format!("failed to load config {}", config_path.display()))?;
    let config = apply_overrides(config, overrides)?;

    let mut universe = load_universe(&config.data_dir, config.symbols.as_deref())
        .with_context(|| format!("failed to load series from {}", config.data_dir.display()))?;

    if config.indicator.needs_moving_average() {
        universe = universe
            .into_iter()
            .map(|s| with_moving_average(s, config.lookback))
            .collect::<Result<_, _>>()
            .context("failed to attach moving averages")?;
    }

    let engine = BreadthEngine::new()
        .with_workers(config.workers)
        .with_log(log);
    let indicator = config.indicator.indicator();
    let report = engine.run(
        &universe,
        config.lookback,
        config.from,
        config.to,
        indicator.as_ref(),
    )?;

    print_summary(&config, &report);

    if let Some(path) = &config.output {
        save_csv(&report.table, path)?;
        println!("Table saved to: {}", path.display());
    }

    Ok(())
}

fn run_columns(indicator: &str, lookback: usize) -> Result<()> {
    if lookback == 0 {
        bail!("lookback must be >= 1");
    }
    let kind = parse_indicator(indicator)?;
    for name in ColumnNames::new(lookback, kind.name()).as_array() {
        println!("{name}");
    }
    Ok(())
}

fn print_summary(config: &BreadthConfig, report: &BreadthReport) {
    let table = &report.table;
    println!();
    println!("=== Breadth Result ===");
    println!("Indicator:      {} ({})", config.indicator.name(), config.lookback);
    println!("Period:         {} to {}", config.from, config.to);
    println!("Days:           {}", table.len());
    println!(
        "Instruments:    {} of {} succeeded",
        table.total_instruments(),
        report.requested
    );
    if let Some(peak) = table.peak(Side::Positive) {
        println!(
            "Peak positive:  {:.2}% on {} ({} instruments)",
            peak.positive_pct, peak.date, peak.positive
        );
    }
    if let Some(peak) = table.peak(Side::Negative) {
        println!(
            "Peak negative:  {:.2}% on {} ({} instruments)",
            peak.negative_pct, peak.date, peak.negative
        );
    }
    if !report.failures.is_empty() {
        println!();
        println!("--- Failures ({}) ---", report.failures.len());
        for failure in &report.failures {
            println!("{}: {}", failure.instrument, failure.cause);
        }
    }
}
