//! Equity and drawdown curve points.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Marked-to-market account value at a bar's close.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    pub date: NaiveDate,
    pub equity: f64,
}

/// Equity with its fractional decline from the running peak (always <= 0).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrawdownPoint {
    pub date: NaiveDate,
    pub equity: f64,
    pub drawdown: f64,
}
