//! Look-ahead contamination tests.
//!
//! No signal or indicator value at bar t may depend on bars after t, and the
//! simulator must not react to a signal before the following bar.
//!
//! Method: run on a truncated series (bars 0..100) and the full series
//! (bars 0..200). The overlapping prefix must be identical.

use chrono::NaiveDate;
use swinglab_core::domain::{Bar, PriceSeries};
use swinglab_core::engine::{run_backtest, BacktestConfig};
use swinglab_core::indicators::{Indicator, Sma};
use swinglab_core::signals::{generate_signals, StrategyConfig, StrategyKind};

/// Generate N bars of synthetic OHLCV data with realistic variation.
fn make_test_bars(n: usize) -> Vec<Bar> {
    let base_date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    let mut bars = Vec::with_capacity(n);
    let mut price = 100.0;

    for i in 0..n {
        // Deterministic pseudo-random walk using a simple LCG
        let seed = (i as u64).wrapping_mul(6364136223846793005).wrapping_add(1);
        let change = ((seed % 200) as f64 - 100.0) * 0.05;
        price = (price + change).max(10.0);

        let open = price - 0.5;
        let close = price + 0.3;
        bars.push(Bar {
            date: base_date + chrono::Duration::days(i as i64),
            open,
            high: open.max(close) + 2.0,
            low: open.min(close) - 2.0,
            close,
            volume: 1000 + i as u64 * 100,
        });
    }
    bars
}

fn strategies() -> Vec<StrategyConfig> {
    [StrategyKind::MaCrossover, StrategyKind::PullbackTrend]
        .into_iter()
        .map(|kind| StrategyConfig {
            kind,
            short_window: 5,
            long_window: 20,
        })
        .collect()
}

#[test]
fn sma_has_no_lookahead() {
    let bars = make_test_bars(200);
    let sma = Sma::new(20).unwrap();
    let full = sma.compute(&bars);
    let truncated = sma.compute(&bars[..100]);
    assert_eq!(&full[..100], truncated.as_slice());
}

#[test]
fn signals_have_no_lookahead() {
    let bars = make_test_bars(200);
    let full = PriceSeries::new("TEST", bars.clone()).unwrap();
    let truncated = PriceSeries::new("TEST", bars[..100].to_vec()).unwrap();

    for config in strategies() {
        let full_signals = generate_signals(&full, &config).unwrap();
        let truncated_signals = generate_signals(&truncated, &config).unwrap();
        assert_eq!(
            &full_signals.rows()[..100],
            truncated_signals.rows(),
            "{} leaks future bars",
            config.kind
        );
    }
}

#[test]
fn simulation_prefix_is_stable() {
    let bars = make_test_bars(200);
    let full = PriceSeries::new("TEST", bars.clone()).unwrap();
    let truncated = PriceSeries::new("TEST", bars[..100].to_vec()).unwrap();
    let config = BacktestConfig::default();

    for strategy in strategies() {
        let a = run_backtest(&full, &generate_signals(&full, &strategy).unwrap(), &config).unwrap();
        let b = run_backtest(
            &truncated,
            &generate_signals(&truncated, &strategy).unwrap(),
            &config,
        )
        .unwrap();

        assert_eq!(&a.equity_curve[..99], b.equity_curve.as_slice());
        let cutoff = bars[99].date;
        let prefix: Vec<_> = a.trades.iter().filter(|t| t.date <= cutoff).collect();
        assert_eq!(prefix, b.trades.iter().collect::<Vec<_>>());
    }
}

#[test]
fn trades_happen_the_bar_after_the_signal_changes() {
    let bars = make_test_bars(200);
    let series = PriceSeries::new("TEST", bars).unwrap();

    for strategy in strategies() {
        let signals = generate_signals(&series, &strategy).unwrap();
        let result = run_backtest(&series, &signals, &BacktestConfig::default()).unwrap();
        let rows = signals.rows();

        for trade in &result.trades {
            let i = rows.iter().position(|r| r.date == trade.date).unwrap();
            assert!(i >= 1, "bar 0 is never traded");
            let prior = rows[i - 1].signal;
            match trade.action {
                swinglab_core::TradeAction::Buy => assert!(prior.is_long()),
                swinglab_core::TradeAction::Sell => assert!(!prior.is_long()),
            }
        }
    }
}
