//! Moving average crossover: long while the short SMA is above the long SMA.
//!
//! Memoryless: each bar's signal depends only on that bar's two averages.
//! Warm-up bars (either average undefined) are FLAT.

use crate::domain::{PriceSeries, Signal, SignalRow, SignalSeries};
use crate::error::CoreError;
use crate::indicators::{gt, Indicator, Sma};

use super::SignalGenerator;

#[derive(Debug, Clone)]
pub struct MaCrossover {
    short: Sma,
    long: Sma,
}

impl MaCrossover {
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

impl SignalGenerator for MaCrossover {
    fn name(&self) -> &str {
        "ma_crossover"
    }

    fn warmup_bars(&self) -> usize {
        self.short.lookback().max(self.long.lookback())
    }

    fn generate(&self, series: &PriceSeries) -> SignalSeries {
        let short_ma = self.short.compute(series.bars());
        let long_ma = self.long.compute(series.bars());

        let rows = series
            .bars()
            .iter()
            .zip(short_ma.into_iter().zip(long_ma))
            .map(|(bar, (short, long))| SignalRow {
                date: bar.date,
                signal: if gt(short, long) {
                    Signal::Long
                } else {
                    Signal::Flat
                },
                short_ma: short,
                long_ma: long,
                trend_up: None,
                pullback_recovery: None,
            })
            .collect();

        SignalSeries::new(rows)
    }
}
