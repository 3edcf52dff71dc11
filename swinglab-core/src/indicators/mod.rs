//! Indicators: pure functions from bar history to a value series.
//!
//! Indicators are computed once before signal evaluation. Warm-up positions
//! are `None` rather than NaN so that every downstream comparison has to
//! decide explicitly what "undefined" means.
//!
//! # Look-ahead guard
//! No value at bar t may depend on bars after t. Computing on a truncated
//! series must reproduce the prefix of the full-series output.

pub mod sma;

pub use sma::Sma;

use crate::domain::Bar;

pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "sma_20").
    fn name(&self) -> &str;

    /// Number of leading bars whose value is undefined.
    fn lookback(&self) -> usize;

    /// Compute the indicator over the whole series. The output has the same
    /// length as `bars`; the first `lookback()` entries are `None`.
    fn compute(&self, bars: &[Bar]) -> Vec<Option<f64>>;
}

/// `a > b` with undefined operands resolving to false.
pub fn gt(a: Option<f64>, b: Option<f64>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a > b)
}

/// `a < b` with undefined operands resolving to false.
pub fn lt(a: Option<f64>, b: Option<f64>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a < b)
}

/// `a >= b` with undefined operands resolving to false.
pub fn ge(a: Option<f64>, b: Option<f64>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a >= b)
}

/// Create synthetic bars from close prices for testing.
///
/// open = close, high = close + 1.0, low = close - 1.0, volume = 1000.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<Bar> {
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| Bar {
            date: base_date + chrono::Duration::days(i as i64),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 1000,
        })
        .collect()
}

#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undefined_comparisons_are_false() {
        assert!(!gt(None, Some(1.0)));
        assert!(!gt(Some(1.0), None));
        assert!(!lt(None, None));
        assert!(!ge(None, Some(0.0)));
        assert!(gt(Some(2.0), Some(1.0)));
        assert!(lt(Some(1.0), Some(2.0)));
        assert!(ge(Some(2.0), Some(2.0)));
        assert!(!gt(Some(2.0), Some(2.0)));
    }
}
