//! Run orchestration: load data, generate signals, simulate, summarize.
//!
//! Two entry points:
//! - `run()`: resolves data through cache, provider and fallbacks, then runs. Used by CLI.
//! - `run_loaded()`: takes an already-loaded series. No I/O.

use std::path::PathBuf;

use swinglab_core::domain::SignalSeries;
use swinglab_core::engine::{run_backtest, BacktestResult};
use swinglab_core::error::CoreError;
use swinglab_core::signals::{generate_signals, StrategyConfig};
use thiserror::Error;
use tracing::info;

use crate::config::{ConfigError, RunConfig};
use crate::data::{CsvCache, DataProvider, DataSource};
use crate::data_loader::{load_price_series, LoadError, LoadedData};

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Load(#[from] LoadError),
    #[error("backtest error: {0}")]
    Core(#[from] CoreError),
}

/// Everything a single run produced, plus provenance.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub result: BacktestResult,
    pub signals: SignalSeries,
    pub strategy: StrategyConfig,
    pub source: DataSource,
    pub origin: Option<PathBuf>,
    pub bar_count: usize,
    pub dataset_hash: String,
    pub config_hash: String,
}

impl RunOutcome {
    pub fn is_synthetic(&self) -> bool {
        self.source == DataSource::Synthetic
    }
}

/// Load data for `config` and run it.
pub fn run(config: &RunConfig, provider: Option<&dyn DataProvider>) -> Result<RunOutcome, RunError> {
    config.validate()?;
    let cache = CsvCache::new(&config.data.cache_dir);
    let loaded = load_price_series(&config.load_options(), &cache, provider)?;
    run_loaded(config, loaded)
}

/// Run on pre-loaded data.
pub fn run_loaded(config: &RunConfig, loaded: LoadedData) -> Result<RunOutcome, RunError> {
    let config_hash = config.config_hash()?;
    let series = &loaded.series;

    let signals = generate_signals(series, &config.strategy)?;
    let result = run_backtest(series, &signals, &config.backtest)?;

    let summary = &result.summary;
    info!(
        symbol = %summary.symbol,
        strategy = %config.strategy.kind,
        source = %loaded.source,
        bars = series.len(),
        trades = summary.trades,
        total_return = summary.total_return,
        sharpe = summary.sharpe_ratio,
        max_drawdown = summary.max_drawdown,
        "backtest complete"
    );

    Ok(RunOutcome {
        bar_count: series.len(),
        result,
        signals,
        strategy: config.strategy.clone(),
        source: loaded.source,
        origin: loaded.origin,
        dataset_hash: loaded.dataset_hash,
        config_hash,
    })
}
