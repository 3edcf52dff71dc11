//! End-to-end scenarios through generate_signals → run_backtest → summary.

use chrono::NaiveDate;
use swinglab_core::domain::{Bar, PriceSeries, Signal, SignalRow, SignalSeries, TradeAction};
use swinglab_core::engine::{run_backtest, BacktestConfig};
use swinglab_core::error::CoreError;
use swinglab_core::signals::{generate_signals, StrategyConfig, StrategyKind};

fn day(i: usize) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 2).unwrap() + chrono::Duration::days(i as i64)
}

/// Bars with open == close.
fn series(closes: &[f64]) -> PriceSeries {
    let bars = closes
        .iter()
        .enumerate()
        .map(|(i, &c)| Bar {
            date: day(i),
            open: c,
            high: c,
            low: c,
            close: c,
            volume: 100,
        })
        .collect();
    PriceSeries::new("TEST", bars).unwrap()
}

fn frictionless(capital: f64) -> BacktestConfig {
    BacktestConfig {
        symbol: "TEST".into(),
        initial_capital: capital,
        commission_rate: 0.0,
        slippage_rate: 0.0,
        ..Default::default()
    }
}

fn crossover(short: usize, long: usize) -> StrategyConfig {
    StrategyConfig {
        kind: StrategyKind::MaCrossover,
        short_window: short,
        long_window: long,
    }
}

fn constant_signals(series: &PriceSeries, signal: Signal) -> SignalSeries {
    SignalSeries::new(
        series
            .dates()
            .map(|date| SignalRow {
                date,
                signal,
                short_ma: None,
                long_ma: None,
                trend_up: None,
                pullback_recovery: None,
            })
            .collect(),
    )
}

#[test]
fn crossover_round_trip() {
    let prices = series(&[10.0, 10.0, 12.0, 12.0, 14.0, 14.0, 8.0, 8.0]);
    let signals = generate_signals(&prices, &crossover(2, 3)).unwrap();
    let got: Vec<Signal> = signals.rows().iter().map(|r| r.signal).collect();
    use Signal::{Flat as F, Long as L};
    assert_eq!(got, vec![F, F, L, L, L, L, F, F]);

    let result = run_backtest(&prices, &signals, &frictionless(1000.0)).unwrap();

    assert_eq!(result.trades.len(), 2);
    let buy = &result.trades[0];
    assert_eq!(buy.action, TradeAction::Buy);
    assert_eq!(buy.date, day(3));
    assert_eq!(buy.shares, 83);
    assert_eq!(buy.price, 12.0);
    assert_eq!(buy.cash_after, 4.0);

    let sell = &result.trades[1];
    assert_eq!(sell.action, TradeAction::Sell);
    assert_eq!(sell.date, day(7));
    assert_eq!(sell.shares, 83);
    assert_eq!(sell.price, 8.0);
    assert_eq!(sell.cash_after, 668.0);

    assert_eq!(result.trade_profits, vec![-332.0]);
    let equity: Vec<f64> = result.equity_curve.iter().map(|p| p.equity).collect();
    assert_eq!(
        equity,
        vec![1000.0, 1000.0, 1000.0, 1166.0, 1166.0, 668.0, 668.0]
    );
    assert_eq!(result.equity_curve[0].date, day(1));

    let s = &result.summary;
    assert_eq!(s.trades, 2);
    assert_eq!(s.completed_trades, 1);
    assert_eq!(s.win_rate, 0.0);
    assert_eq!(s.ending_equity, 668.0);
    assert_eq!(s.total_return, -0.332);
    assert_eq!(s.max_drawdown, -0.4271);
    assert!(result.final_position.is_flat());
}

#[test]
fn insufficient_capital_is_a_no_op() {
    let prices = series(&[10.0, 10.0, 10.0, 10.0]);
    let signals = constant_signals(&prices, Signal::Long);
    let result = run_backtest(&prices, &signals, &frictionless(5.0)).unwrap();

    assert!(result.trades.is_empty());
    assert!(result.equity_curve.iter().all(|p| p.equity == 5.0));
    assert_eq!(result.summary.ending_equity, 5.0);
}

#[test]
fn all_flat_run_is_degenerate() {
    let closes: Vec<f64> = (0..30).map(|i| 100.0 + (i % 7) as f64).collect();
    let prices = series(&closes);
    let signals = constant_signals(&prices, Signal::Flat);
    let result = run_backtest(&prices, &signals, &BacktestConfig::default()).unwrap();

    assert!(result.trades.is_empty());
    assert!(result.equity_curve.iter().all(|p| p.equity == 10_000.0));
    let s = &result.summary;
    assert_eq!(s.total_return, 0.0);
    assert_eq!(s.volatility, 0.0);
    assert_eq!(s.sharpe_ratio, 0.0);
    assert_eq!(s.max_drawdown, 0.0);
    assert_eq!(s.win_rate, 0.0);
}

#[test]
fn misaligned_lengths_are_rejected() {
    let prices = series(&[10.0, 11.0, 12.0]);
    let shorter = series(&[10.0, 11.0]);
    let signals = constant_signals(&shorter, Signal::Flat);
    let err = run_backtest(&prices, &signals, &BacktestConfig::default()).unwrap_err();
    assert_eq!(
        err,
        CoreError::LengthMismatch {
            prices: 3,
            signals: 2
        }
    );
}

#[test]
fn misaligned_dates_are_rejected() {
    let prices = series(&[10.0, 11.0, 12.0]);
    let mut rows = constant_signals(&prices, Signal::Flat).into_rows();
    rows[2].date = day(9);
    let err = run_backtest(&prices, &SignalSeries::new(rows), &BacktestConfig::default())
        .unwrap_err();
    assert!(matches!(err, CoreError::DateMismatch { index: 2, .. }));
}

#[test]
fn empty_series_is_rejected() {
    let prices = PriceSeries::new("TEST", Vec::new()).unwrap();
    let signals = SignalSeries::default();
    let err = run_backtest(&prices, &signals, &BacktestConfig::default()).unwrap_err();
    assert_eq!(err, CoreError::EmptySeries);
}

#[test]
fn pullback_strategy_runs_end_to_end() {
    let closes = [
        10.0, 11.0, 12.0, 13.0, 14.0, 13.0, 15.0, 16.0, 17.0, 12.0, 11.0,
    ];
    let prices = series(&closes);
    let config = StrategyConfig {
        kind: StrategyKind::PullbackTrend,
        short_window: 2,
        long_window: 4,
    };
    let signals = generate_signals(&prices, &config).unwrap();
    let result = run_backtest(&prices, &signals, &frictionless(1000.0)).unwrap();

    // LONG on bars 6..=8: buy at open of 7, sell at open of 10.
    assert_eq!(signals.signal_at(8), Some(Signal::Long));
    assert_eq!(signals.signal_at(9), Some(Signal::Flat));
    assert_eq!(result.trades.len(), 2);
    assert_eq!(result.trades[0].date, day(7));
    assert_eq!(result.trades[0].shares, 62);
    assert_eq!(result.trades[1].date, day(10));
    assert_eq!(result.trades[1].price, 11.0);
    assert_eq!(result.trade_profits, vec![62.0 * (11.0 - 16.0)]);
}

#[test]
fn identical_inputs_give_identical_results() {
    let closes: Vec<f64> = (0..120)
        .map(|i| 50.0 + (i as f64 * 0.3).sin() * 6.0 + i as f64 * 0.05)
        .collect();
    let prices = series(&closes);
    let config = StrategyConfig {
        kind: StrategyKind::PullbackTrend,
        short_window: 5,
        long_window: 15,
    };
    let a = run_backtest(
        &prices,
        &generate_signals(&prices, &config).unwrap(),
        &BacktestConfig::default(),
    )
    .unwrap();
    let b = run_backtest(
        &prices,
        &generate_signals(&prices, &config).unwrap(),
        &BacktestConfig::default(),
    )
    .unwrap();
    assert_eq!(a, b);
}
