//! Simple Moving Average (SMA).
//!
//! Rolling mean of close prices over a lookback window.
//! Lookback: period - 1 (first defined value at index period-1).

use super::Indicator;
use crate::domain::Bar;
use crate::error::CoreError;

#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    name: String,
}

impl Sma {
    pub fn new(period: usize) -> Result<Self, CoreError> {
        if period == 0 {
            return Err(CoreError::InvalidWindow {
                name: "sma_period",
                value: period,
            });
        }
        Ok(Self {
            period,
            name: format!("sma_{period}"),
        })
    }

    pub fn period(&self) -> usize {
        self.period
    }
}

impl Indicator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn compute(&self, bars: &[Bar]) -> Vec<Option<f64>> {
        // Each window is summed from scratch in index order, so two windows
        // over identical closes produce bit-identical means.
        (0..bars.len())
            .map(|i| {
                if i + 1 < self.period {
                    return None;
                }
                let window = &bars[i + 1 - self.period..=i];
                let sum: f64 = window.iter().map(|b| b.close).sum();
                Some(sum / self.period as f64)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    #[test]
    fn sma_5_basic() {
        let bars = make_bars(&[10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0]);
        let result = Sma::new(5).unwrap().compute(&bars);

        assert_eq!(result.len(), 7);
        for (i, v) in result.iter().take(4).enumerate() {
            assert!(v.is_none(), "expected warm-up at index {i}");
        }
        assert_approx(result[4].unwrap(), 12.0, DEFAULT_EPSILON);
        assert_approx(result[5].unwrap(), 13.0, DEFAULT_EPSILON);
        assert_approx(result[6].unwrap(), 14.0, DEFAULT_EPSILON);
    }

    #[test]
    fn sma_1_is_close() {
        let bars = make_bars(&[100.0, 200.0, 300.0]);
        let result = Sma::new(1).unwrap().compute(&bars);
        assert_eq!(result, vec![Some(100.0), Some(200.0), Some(300.0)]);
    }

    #[test]
    fn identical_windows_give_identical_means() {
        let bars = make_bars(&[0.1, 0.7, 0.3, 9.9, 0.1, 0.7, 0.3]);
        let result = Sma::new(3).unwrap().compute(&bars);
        assert_eq!(result[2], result[6]);
    }

    #[test]
    fn sma_lookback() {
        assert_eq!(Sma::new(20).unwrap().lookback(), 19);
        assert_eq!(Sma::new(1).unwrap().lookback(), 0);
        assert_eq!(Sma::new(20).unwrap().name(), "sma_20");
    }

    #[test]
    fn sma_zero_period_rejected() {
        assert!(matches!(
            Sma::new(0),
            Err(CoreError::InvalidWindow { value: 0, .. })
        ));
    }

    #[test]
    fn sma_too_few_bars() {
        let bars = make_bars(&[10.0, 11.0]);
        let result = Sma::new(5).unwrap().compute(&bars);
        assert!(result.iter().all(|v| v.is_none()));
    }

    #[test]
    fn sma_prefix_is_stable_under_truncation() {
        let closes: Vec<f64> = (0..50).map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0).collect();
        let bars = make_bars(&closes);
        let sma = Sma::new(7).unwrap();
        let full = sma.compute(&bars);
        let truncated = sma.compute(&bars[..25]);
        assert_eq!(&full[..25], truncated.as_slice());
    }
}
