//! Input-validation errors raised by the core entry points.
//!
//! Degenerate computations (zero volatility, no completed trades, a single
//! equity point) and insufficient capital are *not* errors; they resolve to
//! neutral values inside the engine and metrics.

use chrono::NaiveDate;
use thiserror::Error;

/// Caller-contract violations. Never retried.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    #[error("price series is empty")]
    EmptySeries,

    #[error("required field '{field}' is missing")]
    MissingField { field: String },

    #[error("bar dates must be strictly increasing: {previous} is followed by {next} at index {index}")]
    UnorderedDates {
        index: usize,
        previous: NaiveDate,
        next: NaiveDate,
    },

    #[error("signal length {signals} does not match price length {prices}")]
    LengthMismatch { prices: usize, signals: usize },

    #[error("signal date {signal_date} does not match price date {price_date} at index {index}")]
    DateMismatch {
        index: usize,
        price_date: NaiveDate,
        signal_date: NaiveDate,
    },

    #[error("window '{name}' must be >= 1 (got {value})")]
    InvalidWindow { name: &'static str, value: usize },

    #[error("invalid backtest config: {0}")]
    InvalidConfig(String),
}

impl CoreError {
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }
}
