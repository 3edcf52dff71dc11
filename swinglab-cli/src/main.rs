//! SwingLab CLI: run and download commands.
//!
//! Commands:
//! - `run`: backtest one symbol from a TOML config and/or flags, write artifacts
//! - `download`: fetch daily bars from Yahoo Finance into the CSV cache

mod obs;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use swinglab_core::engine::{default_end_date, default_start_date};
use swinglab_core::metrics::Summary;
use swinglab_core::signals::StrategyKind;
use swinglab_runner::config::RunConfig;
use swinglab_runner::data::{CacheMode, CsvCache, DataProvider, YahooProvider};
use swinglab_runner::data_loader::{download_to_cache, LoadOptions};
use swinglab_runner::export::{save_artifacts, ArtifactPaths};
use swinglab_runner::runner::{run, RunOutcome};
use tracing::warn;

use crate::obs::LogFormat;

#[derive(Parser)]
#[command(
    name = "swinglab",
    about = "SwingLab CLI: moving-average swing strategy backtests"
)]
struct Cli {
    /// Log level or filter directive (overridden by SWINGLAB_LOG).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Log output format.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a backtest and write its artifacts.
    Run(RunArgs),
    /// Download daily bars from Yahoo Finance into the CSV cache.
    Download {
        /// Ticker symbol (e.g., AAPL).
        symbol: String,

        /// Start date (YYYY-MM-DD), inclusive. Defaults to 2022-01-01.
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD), exclusive. Defaults to 2023-01-01.
        #[arg(long)]
        end: Option<String>,

        /// Bar interval passed to the provider.
        #[arg(long, default_value = "1d")]
        interval: String,

        /// Cache directory.
        #[arg(long, default_value = "data/cache")]
        cache_dir: PathBuf,
    },
}

/// Flags for `run`. Every flag overrides the matching config file value.
#[derive(clap::Args)]
struct RunArgs {
    /// Path to a TOML config file. Without it, defaults are used.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    symbol: Option<String>,

    /// Start date (YYYY-MM-DD), inclusive.
    #[arg(long)]
    start: Option<String>,

    /// End date (YYYY-MM-DD), exclusive.
    #[arg(long)]
    end: Option<String>,

    /// Short moving-average window.
    #[arg(long)]
    short: Option<usize>,

    /// Long moving-average window.
    #[arg(long)]
    long: Option<usize>,

    /// Initial capital.
    #[arg(long)]
    capital: Option<f64>,

    /// Strategy: ma_crossover or pullback_trend.
    #[arg(long)]
    strategy: Option<StrategyKind>,

    /// Cache mode: on, refresh or off.
    #[arg(long)]
    use_cache: Option<CacheMode>,

    /// Offline mode: no network access.
    #[arg(long, default_value_t = false)]
    offline: bool,

    /// Fall back to synthetic bars when no real data is available.
    #[arg(long, default_value_t = false)]
    synthetic: bool,

    /// Output directory for artifacts.
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Print the summary as JSON instead of a table.
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    obs::init_tracing(&cli.log_level, cli.log_format)?;

    match cli.command {
        Commands::Run(args) => run_cmd(args),
        Commands::Download {
            symbol,
            start,
            end,
            interval,
            cache_dir,
        } => download_cmd(symbol, start, end, interval, cache_dir),
    }
}

fn parse_date(raw: &str, flag: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("invalid --{flag} '{raw}', expected YYYY-MM-DD"))
}

fn build_config(args: &RunArgs) -> Result<RunConfig> {
    let mut config = match &args.config {
        Some(path) => RunConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => RunConfig::default(),
    };

    if let Some(symbol) = &args.symbol {
        config.backtest.symbol = symbol.clone();
    }
    if let Some(start) = &args.start {
        config.backtest.start = parse_date(start, "start")?;
    }
    if let Some(end) = &args.end {
        config.backtest.end = parse_date(end, "end")?;
    }
    if let Some(short) = args.short {
        config.strategy.short_window = short;
    }
    if let Some(long) = args.long {
        config.strategy.long_window = long;
    }
    if let Some(capital) = args.capital {
        config.backtest.initial_capital = capital;
    }
    if let Some(kind) = args.strategy {
        config.strategy.kind = kind;
    }
    if let Some(mode) = args.use_cache {
        config.data.cache_mode = mode;
    }
    if let Some(dir) = &args.output_dir {
        config.output.dir = dir.clone();
    }
    config.data.offline |= args.offline;
    config.data.synthetic |= args.synthetic;

    Ok(config)
}

fn run_cmd(args: RunArgs) -> Result<()> {
    let config = build_config(&args)?;

    let provider = if config.data.offline {
        None
    } else {
        match YahooProvider::new() {
            Ok(p) => Some(p),
            Err(e) => {
                warn!(error = %e, "could not create Yahoo provider, continuing without download");
                None
            }
        }
    };
    let provider_ref = provider.as_ref().map(|p| p as &dyn DataProvider);

    let outcome = run(&config, provider_ref)?;
    let paths = save_artifacts(&outcome, &config.output.dir)
        .with_context(|| format!("writing artifacts to {}", config.output.dir.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome.result.summary)?);
    } else {
        print_summary(&outcome, &paths);
    }
    Ok(())
}

fn download_cmd(
    symbol: String,
    start: Option<String>,
    end: Option<String>,
    interval: String,
    cache_dir: PathBuf,
) -> Result<()> {
    let start = match start {
        Some(raw) => parse_date(&raw, "start")?,
        None => default_start_date(),
    };
    let end = match end {
        Some(raw) => parse_date(&raw, "end")?,
        None => default_end_date(),
    };
    anyhow::ensure!(start < end, "start ({start}) must be before end ({end})");

    let opts = LoadOptions {
        symbol,
        start,
        end,
        interval,
        cache_mode: CacheMode::Refresh,
        offline: false,
        synthetic: false,
        local_data_dir: None,
    };
    let provider = YahooProvider::new()?;
    let cache = CsvCache::new(cache_dir);

    let (path, count) = download_to_cache(&opts, &cache, &provider)
        .with_context(|| format!("downloading {}", opts.symbol))?;
    println!("Cached {count} bars for {} at {}", opts.symbol, path.display());
    Ok(())
}

fn print_summary(outcome: &RunOutcome, paths: &ArtifactPaths) {
    let s: &Summary = &outcome.result.summary;
    let strategy = &outcome.strategy;

    println!();
    println!(
        "=== {} | {} ({}/{}) ===",
        s.symbol, strategy.kind, strategy.short_window, strategy.long_window
    );
    println!("Period:         {} to {}", s.start, s.end);
    println!(
        "Data:           {} ({} bars){}",
        outcome.source,
        outcome.bar_count,
        if outcome.is_synthetic() {
            "  [SYNTHETIC]"
        } else {
            ""
        }
    );
    println!();
    println!("Total Return:   {:>10.2}%", s.total_return * 100.0);
    println!("Annual Return:  {:>10.2}%", s.annual_return * 100.0);
    println!("Volatility:     {:>10.2}%", s.volatility * 100.0);
    println!("Sharpe Ratio:   {:>10.4}", s.sharpe_ratio);
    println!("Max Drawdown:   {:>10.2}%", s.max_drawdown * 100.0);
    println!(
        "Trades:         {:>10}  ({} closed)",
        s.trades, s.completed_trades
    );
    println!("Win Rate:       {:>10.2}%", s.win_rate * 100.0);
    println!("Initial:        {:>10.2}", s.initial_capital);
    println!("Ending Equity:  {:>10.2}", s.ending_equity);
    println!();
    println!("Artifacts:");
    for path in paths.all() {
        println!("  {}", path.display());
    }
}
