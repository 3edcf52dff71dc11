//! Backtest configuration and run result types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{DrawdownPoint, EquityPoint, Position, TradeRecord};
use crate::error::CoreError;
use crate::metrics::Summary;

pub fn default_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2022, 1, 1).unwrap_or(NaiveDate::MIN)
}

pub fn default_end_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 1, 1).unwrap_or(NaiveDate::MAX)
}

/// Configuration for a single backtest run.
///
/// `symbol`, `start` and `end` are labels carried into the summary; the
/// simulator replays whatever series it is given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BacktestConfig {
    pub symbol: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub initial_capital: f64,
    /// Fraction of notional per fill (0.0001 = 1 bp).
    pub commission_rate: f64,
    /// Fraction of notional per fill.
    pub slippage_rate: f64,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            symbol: "AAPL".into(),
            start: default_start_date(),
            end: default_end_date(),
            initial_capital: 10_000.0,
            commission_rate: 0.0001,
            slippage_rate: 0.0005,
        }
    }
}

impl BacktestConfig {
    /// Combined per-fill cost rate applied to the open price.
    pub fn cost_rate(&self) -> f64 {
        self.commission_rate + self.slippage_rate
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if !self.initial_capital.is_finite() || self.initial_capital <= 0.0 {
            return Err(CoreError::InvalidConfig(format!(
                "initial_capital must be positive, got {}",
                self.initial_capital
            )));
        }
        for (name, rate) in [
            ("commission_rate", self.commission_rate),
            ("slippage_rate", self.slippage_rate),
        ] {
            if !rate.is_finite() || rate < 0.0 {
                return Err(CoreError::InvalidConfig(format!(
                    "{name} must be non-negative, got {rate}"
                )));
            }
        }
        Ok(())
    }
}

/// Everything a backtest produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestResult {
    /// One point per simulated bar (indices 1..N-1).
    pub equity_curve: Vec<EquityPoint>,
    pub drawdown_curve: Vec<DrawdownPoint>,
    pub trades: Vec<TradeRecord>,
    /// Realized profit of each closed round trip, in SELL order.
    pub trade_profits: Vec<f64>,
    /// Account state after the last bar. May still hold shares.
    pub final_position: Position,
    pub summary: Summary,
}
