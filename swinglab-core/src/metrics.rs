//! Performance metrics: pure functions that compute run statistics.
//!
//! Every metric is a pure function: equity curve and/or trade profits in,
//! scalar out. Degenerate inputs (no points, one point, zero volatility, no
//! completed trades) resolve to neutral values instead of NaN.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{DrawdownPoint, EquityPoint};
use crate::engine::BacktestConfig;

/// Bars per year used for annualization.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Scalar summary of one backtest run.
///
/// Ratios and returns are rounded to 4 decimals, currency to 2.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub symbol: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub total_return: f64,
    pub annual_return: f64,
    pub volatility: f64,
    pub sharpe_ratio: f64,
    pub max_drawdown: f64,
    /// Ledger length: BUY and SELL records together.
    pub trades: usize,
    /// Closed round trips.
    pub completed_trades: usize,
    pub win_rate: f64,
    pub initial_capital: f64,
    pub ending_equity: f64,
}

/// Compute the summary for a finished run.
pub fn summarize(
    equity: &[EquityPoint],
    drawdown: &[DrawdownPoint],
    trade_profits: &[f64],
    trade_count: usize,
    config: &BacktestConfig,
) -> Summary {
    let values: Vec<f64> = equity.iter().map(|p| p.equity).collect();
    let drawdowns: Vec<f64> = drawdown.iter().map(|p| p.drawdown).collect();
    let ending_equity = values.last().copied().unwrap_or(config.initial_capital);

    Summary {
        symbol: config.symbol.clone(),
        start: config.start,
        end: config.end,
        total_return: round_to(total_return(&values), 4),
        annual_return: round_to(annual_return(&values), 4),
        volatility: round_to(volatility(&values), 4),
        sharpe_ratio: round_to(sharpe_ratio(&values), 4),
        max_drawdown: round_to(max_drawdown(&drawdowns), 4),
        trades: trade_count,
        completed_trades: trade_profits.len(),
        win_rate: round_to(win_rate(trade_profits), 4),
        initial_capital: config.initial_capital,
        ending_equity: round_to(ending_equity, 2),
    }
}

// ─── Curves ─────────────────────────────────────────────────────────

/// Drawdown from the running peak, seeded by the first equity value.
///
/// Zero at every new peak, negative below it.
pub fn compute_drawdown(equity: &[EquityPoint]) -> Vec<DrawdownPoint> {
    let mut peak = f64::NEG_INFINITY;
    equity
        .iter()
        .map(|p| {
            peak = peak.max(p.equity);
            let drawdown = if peak > 0.0 {
                (p.equity - peak) / peak
            } else {
                0.0
            };
            DrawdownPoint {
                date: p.date,
                equity: p.equity,
                drawdown,
            }
        })
        .collect()
}

/// Percent change between consecutive equity values; the first is dropped.
pub fn daily_returns(equity: &[f64]) -> Vec<f64> {
    equity.windows(2).map(|w| w[1] / w[0] - 1.0).collect()
}

// ─── Individual metric functions ────────────────────────────────────

/// `last / first - 1`. Zero for an empty curve.
pub fn total_return(equity: &[f64]) -> f64 {
    match (equity.first(), equity.last()) {
        (Some(&first), Some(&last)) if first > 0.0 => last / first - 1.0,
        _ => 0.0,
    }
}

/// Geometric annualization assuming 252 bars per year.
///
/// Returns 0.0 with one point or fewer.
pub fn annual_return(equity: &[f64]) -> f64 {
    if equity.len() <= 1 {
        return 0.0;
    }
    (1.0 + total_return(equity)).powf(TRADING_DAYS_PER_YEAR / equity.len() as f64) - 1.0
}

/// Annualized sample standard deviation of daily returns.
pub fn volatility(equity: &[f64]) -> f64 {
    std_dev(&daily_returns(equity)) * TRADING_DAYS_PER_YEAR.sqrt()
}

/// `mean(returns) * 252 / volatility`; 0.0 when volatility is zero.
pub fn sharpe_ratio(equity: &[f64]) -> f64 {
    let vol = volatility(equity);
    if vol == 0.0 {
        return 0.0;
    }
    mean(&daily_returns(equity)) * TRADING_DAYS_PER_YEAR / vol
}

/// Most negative drawdown; 0.0 when equity never fell below its peak.
pub fn max_drawdown(drawdowns: &[f64]) -> f64 {
    drawdowns.iter().copied().fold(0.0_f64, f64::min)
}

/// Fraction of completed round trips with positive profit.
pub fn win_rate(trade_profits: &[f64]) -> f64 {
    if trade_profits.is_empty() {
        return 0.0;
    }
    let wins = trade_profits.iter().filter(|&&p| p > 0.0).count();
    wins as f64 / trade_profits.len() as f64
}

// ─── Helpers ────────────────────────────────────────────────────────

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n - 1 denominator). 0.0 below two values.
pub fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    var.sqrt()
}

/// Round half away from zero to `dp` decimals.
pub fn round_to(value: f64, dp: i32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let scale = 10_f64.powi(dp);
    (value * scale).round() / scale
}
