//! Pullback-in-trend: stay in cash until an uptrend is established, enter
//! when price recovers from a dip below the short average, and hold while the
//! trend filter holds.
//!
//! Indicators:
//! - `trend_up[t]`: long SMA rising and close above it.
//! - `pullback_recovery[t]`: yesterday's close below the short SMA, today's
//!   close back at or above it.
//!
//! Undefined averages make both flags false.

use serde::{Deserialize, Serialize};

use crate::domain::{PriceSeries, Signal, SignalRow, SignalSeries};
use crate::error::CoreError;
use crate::indicators::{ge, gt, lt, Indicator, Sma};

use super::SignalGenerator;

/// Position-intent state carried from bar to bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TrendState {
    #[default]
    Flat,
    Long,
}

impl TrendState {
    /// Apply one bar's conditions.
    pub fn step(self, trend_up: bool, pullback_recovery: bool, close_below_long: bool) -> Self {
        match self {
            TrendState::Flat if trend_up && pullback_recovery => TrendState::Long,
            TrendState::Flat => TrendState::Flat,
            TrendState::Long if !trend_up || close_below_long => TrendState::Flat,
            TrendState::Long => TrendState::Long,
        }
    }

    pub fn signal(self) -> Signal {
        match self {
            TrendState::Flat => Signal::Flat,
            TrendState::Long => Signal::Long,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PullbackTrend {
    short: Sma,
    long: Sma,
}

impl PullbackTrend {
    pub fn new(short_window: usize, long_window: usize) -> Result<Self, CoreError> {
        if short_window == 0 {
            return Err(CoreError::InvalidWindow {
                name: "short_window",
                value: short_window,
            });
        }
        if long_window == 0 {
            return Err(CoreError::InvalidWindow {
                name: "long_window",
                value: long_window,
            });
        }
        Ok(Self {
            short: Sma::new(short_window)?,
            long: Sma::new(long_window)?,
        })
    }
}

impl SignalGenerator for PullbackTrend {
    fn name(&self) -> &str {
        "pullback_trend"
    }

    fn warmup_bars(&self) -> usize {
        // trend_up compares long_ma with its previous value
        (self.long.lookback() + 1).max(self.short.lookback() + 1)
    }

    fn generate(&self, series: &PriceSeries) -> SignalSeries {
        let bars = series.bars();
        let short_ma = self.short.compute(bars);
        let long_ma = self.long.compute(bars);
        let close = |t: usize| Some(bars[t].close);

        let trend_up: Vec<bool> = (0..bars.len())
            .map(|t| t > 0 && gt(long_ma[t], long_ma[t - 1]) && gt(close(t), long_ma[t]))
            .collect();

        let pullback_recovery: Vec<bool> = (0..bars.len())
            .map(|t| t > 0 && lt(close(t - 1), short_ma[t - 1]) && ge(close(t), short_ma[t]))
            .collect();

        // Bar 0 is a placeholder: the machine starts FLAT and takes no decision.
        let states = (0..bars.len()).scan(TrendState::Flat, |state, t| {
            if t > 0 {
                *state = state.step(
                    trend_up[t],
                    pullback_recovery[t],
                    lt(close(t), long_ma[t]),
                );
            }
            Some(*state)
        });

        let rows = states
            .enumerate()
            .map(|(t, state)| SignalRow {
                date: bars[t].date,
                signal: state.signal(),
                short_ma: short_ma[t],
                long_ma: long_ma[t],
                trend_up: Some(trend_up[t]),
                pullback_recovery: Some(pullback_recovery[t]),
            })
            .collect();

        SignalSeries::new(rows)
    }
}
