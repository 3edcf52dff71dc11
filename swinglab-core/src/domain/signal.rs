//! Position-intent signals produced by the signal generators.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::bar::PriceSeries;
use crate::error::CoreError;

/// Binary position intent. Serialized as `0` (flat) / `1` (long).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Signal {
    #[default]
    Flat,
    Long,
}

impl Signal {
    pub fn is_long(self) -> bool {
        matches!(self, Signal::Long)
    }
}

impl From<Signal> for u8 {
    fn from(signal: Signal) -> u8 {
        match signal {
            Signal::Flat => 0,
            Signal::Long => 1,
        }
    }
}

impl TryFrom<u8> for Signal {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Signal::Flat),
            1 => Ok(Signal::Long),
            other => Err(format!("signal must be 0 or 1, got {other}")),
        }
    }
}

/// One row of signal output, aligned with a bar of the price series.
///
/// Moving averages are `None` during warm-up. The trend flags are only
/// populated by the pullback-in-trend generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalRow {
    pub date: NaiveDate,
    pub signal: Signal,
    pub short_ma: Option<f64>,
    pub long_ma: Option<f64>,
    #[serde(default)]
    pub trend_up: Option<bool>,
    #[serde(default)]
    pub pullback_recovery: Option<bool>,
}

/// Signal sequence for a whole price series.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SignalSeries {
    rows: Vec<SignalRow>,
}

impl SignalSeries {
    pub fn new(rows: Vec<SignalRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[SignalRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn signal_at(&self, index: usize) -> Option<Signal> {
        self.rows.get(index).map(|r| r.signal)
    }

    /// Number of bars with a long intent.
    pub fn long_count(&self) -> usize {
        self.rows.iter().filter(|r| r.signal.is_long()).count()
    }

    /// Check that this sequence has the same length and date index as `prices`.
    pub fn ensure_aligned(&self, prices: &PriceSeries) -> Result<(), CoreError> {
        if self.rows.len() != prices.len() {
            return Err(CoreError::LengthMismatch {
                prices: prices.len(),
                signals: self.rows.len(),
            });
        }
        for (index, (row, bar)) in self.rows.iter().zip(prices.bars()).enumerate() {
            if row.date != bar.date {
                return Err(CoreError::DateMismatch {
                    index,
                    price_date: bar.date,
                    signal_date: row.date,
                });
            }
        }
        Ok(())
    }

    pub fn into_rows(self) -> Vec<SignalRow> {
        self.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Bar;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn row(day: u32, signal: Signal) -> SignalRow {
        SignalRow {
            date: date(day),
            signal,
            short_ma: None,
            long_ma: None,
            trend_up: None,
            pullback_recovery: None,
        }
    }

    fn prices(days: &[u32]) -> PriceSeries {
        let bars = days
            .iter()
            .map(|&d| Bar {
                date: date(d),
                open: 10.0,
                high: 10.0,
                low: 10.0,
                close: 10.0,
                volume: 0,
            })
            .collect();
        PriceSeries::new("TEST", bars).unwrap()
    }

    #[test]
    fn signal_serializes_as_integer() {
        assert_eq!(serde_json::to_string(&Signal::Long).unwrap(), "1");
        assert_eq!(serde_json::to_string(&Signal::Flat).unwrap(), "0");
        let parsed: Signal = serde_json::from_str("1").unwrap();
        assert_eq!(parsed, Signal::Long);
        assert!(serde_json::from_str::<Signal>("2").is_err());
    }

    #[test]
    fn aligned_series_passes() {
        let signals = SignalSeries::new(vec![row(2, Signal::Flat), row(3, Signal::Long)]);
        assert!(signals.ensure_aligned(&prices(&[2, 3])).is_ok());
        assert_eq!(signals.long_count(), 1);
    }

    #[test]
    fn length_mismatch_is_rejected() {
        let signals = SignalSeries::new(vec![row(2, Signal::Flat)]);
        let err = signals.ensure_aligned(&prices(&[2, 3])).unwrap_err();
        assert_eq!(
            err,
            CoreError::LengthMismatch {
                prices: 2,
                signals: 1
            }
        );
    }

    #[test]
    fn date_mismatch_is_rejected() {
        let signals = SignalSeries::new(vec![row(2, Signal::Flat), row(4, Signal::Flat)]);
        let err = signals.ensure_aligned(&prices(&[2, 3])).unwrap_err();
        assert!(matches!(err, CoreError::DateMismatch { index: 1, .. }));
    }
}
