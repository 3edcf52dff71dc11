//! Signal generation: turns a price series into a long/flat intent per bar.
//!
//! Generators are portfolio-agnostic: they see bars and their own indicators,
//! never cash or position state. The signal at bar t only uses bars 0..=t.
//! The simulator applies it one bar later.

pub mod ma_crossover;
pub mod pullback_trend;

pub use ma_crossover::MaCrossover;
pub use pullback_trend::{PullbackTrend, TrendState};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{PriceSeries, SignalSeries};
use crate::error::CoreError;

/// Trait for signal generators.
pub trait SignalGenerator: Send + Sync {
    /// Human-readable name (e.g., "ma_crossover").
    fn name(&self) -> &str;

    /// Number of bars before the generator can leave FLAT.
    fn warmup_bars(&self) -> usize;

    /// Produce one signal row per bar, aligned with `series`.
    ///
    /// The first row is always FLAT.
    fn generate(&self, series: &PriceSeries) -> SignalSeries;
}

/// Which generator a run uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    MaCrossover,
    #[default]
    PullbackTrend,
}

impl StrategyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::MaCrossover => "ma_crossover",
            StrategyKind::PullbackTrend => "pullback_trend",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ma_crossover" => Ok(StrategyKind::MaCrossover),
            "pullback_trend" => Ok(StrategyKind::PullbackTrend),
            other => Err(format!(
                "unknown strategy '{other}'. Valid: ma_crossover, pullback_trend"
            )),
        }
    }
}

/// Strategy parameters for one run.
///
/// `short_window < long_window` is expected but not enforced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyConfig {
    pub kind: StrategyKind,
    pub short_window: usize,
    pub long_window: usize,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            kind: StrategyKind::default(),
            short_window: 10,
            long_window: 20,
        }
    }
}

/// Build the generator named by `config`.
pub fn build_generator(config: &StrategyConfig) -> Result<Box<dyn SignalGenerator>, CoreError> {
    match config.kind {
        StrategyKind::MaCrossover => Ok(Box::new(MaCrossover::new(
            config.short_window,
            config.long_window,
        )?)),
        StrategyKind::PullbackTrend => Ok(Box::new(PullbackTrend::new(
            config.short_window,
            config.long_window,
        )?)),
    }
}

/// Generate the signal sequence for `series` under `config`.
pub fn generate_signals(
    series: &PriceSeries,
    config: &StrategyConfig,
) -> Result<SignalSeries, CoreError> {
    if series.is_empty() {
        return Err(CoreError::EmptySeries);
    }
    let generator = build_generator(config)?;
    let signals = generator.generate(series);
    debug!(
        strategy = generator.name(),
        bars = signals.len(),
        long_bars = signals.long_count(),
        warmup = generator.warmup_bars(),
        "signals generated"
    );
    Ok(signals)
}
