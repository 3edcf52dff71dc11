//! Long/flat bar replay with a one-bar execution lag.
//!
//! The signal observed at the close of bar i-1 is executed at the open of
//! bar i. Bar 0 is never traded and has no equity point.

use tracing::debug;

use crate::domain::{
    EquityPoint, Position, PriceSeries, Signal, SignalSeries, TradeAction, TradeRecord,
};
use crate::error::CoreError;
use crate::metrics::{compute_drawdown, round_to, summarize};

use super::state::{BacktestConfig, BacktestResult};

/// Replay `signals` over `series` and summarize the run.
///
/// Fails before simulating if the inputs are empty, misaligned, or the
/// config is invalid. A position still open after the last bar is left open
/// and contributes no trade profit.
pub fn run_backtest(
    series: &PriceSeries,
    signals: &SignalSeries,
    config: &BacktestConfig,
) -> Result<BacktestResult, CoreError> {
    if series.is_empty() {
        return Err(CoreError::EmptySeries);
    }
    signals.ensure_aligned(series)?;
    config.validate()?;

    let bars = series.bars();
    let rows = signals.rows();
    let costs = config.cost_rate();

    let mut position = Position::flat(config.initial_capital);
    let mut trades = Vec::new();
    let mut trade_profits = Vec::new();
    let mut equity_curve = Vec::with_capacity(bars.len().saturating_sub(1));

    for i in 1..bars.len() {
        let bar = &bars[i];
        let prior = rows[i - 1].signal;

        match prior {
            Signal::Long if position.is_flat() => {
                let trade_price = bar.open * (1.0 + costs);
                let shares = affordable_shares(position.cash, trade_price);
                if shares > 0 {
                    position.open(shares, trade_price);
                    debug!(date = %bar.date, shares, price = trade_price, cash = position.cash, "BUY");
                    trades.push(TradeRecord {
                        date: bar.date,
                        action: TradeAction::Buy,
                        price: round_to(trade_price, 4),
                        shares,
                        cash_after: round_to(position.cash, 2),
                    });
                }
            }
            Signal::Flat if !position.is_flat() => {
                let trade_price = bar.open * (1.0 - costs);
                let shares = position.shares_held;
                let profit = position.close(trade_price);
                trade_profits.push(profit);
                debug!(date = %bar.date, shares, price = trade_price, profit, "SELL");
                trades.push(TradeRecord {
                    date: bar.date,
                    action: TradeAction::Sell,
                    price: round_to(trade_price, 4),
                    shares,
                    cash_after: round_to(position.cash, 2),
                });
            }
            _ => {}
        }

        equity_curve.push(EquityPoint {
            date: bar.date,
            equity: position.equity(bar.close),
        });
    }

    let drawdown_curve = compute_drawdown(&equity_curve);
    let summary = summarize(
        &equity_curve,
        &drawdown_curve,
        &trade_profits,
        trades.len(),
        config,
    );

    Ok(BacktestResult {
        equity_curve,
        drawdown_curve,
        trades,
        trade_profits,
        final_position: position,
        summary,
    })
}

/// Largest whole share count whose cost does not exceed `cash`.
///
/// Exact floor division: the remainder is taken first so a quotient that
/// rounds up to an integer (`1.0 / 0.1`) does not buy an extra share.
pub fn affordable_shares(cash: f64, price: f64) -> u64 {
    if price.is_nan() || cash.is_nan() || price <= 0.0 || cash <= 0.0 {
        return 0;
    }
    let rem = cash % price;
    let quotient = (cash - rem) / price;
    let mut shares = quotient.floor();
    if quotient - shares > 0.5 {
        shares += 1.0;
    }
    if shares * price > cash {
        shares -= 1.0;
    }
    if shares < 1.0 {
        0
    } else {
        shares as u64
    }
}
