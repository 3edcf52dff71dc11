//! End-to-end runs from a local CSV through artifact export and reload.

use std::path::Path;

use chrono::NaiveDate;
use swinglab_core::signals::StrategyKind;
use swinglab_runner::config::RunConfig;
use swinglab_runner::data::{write_price_csv, CacheMode, DataSource};
use swinglab_runner::data_loader::generate_synthetic_bars;
use swinglab_runner::export::{
    read_drawdown_csv, read_equity_csv, read_manifest, read_signals_csv, read_summary_json,
    read_trades_csv, save_artifacts, SCHEMA_VERSION,
};
use swinglab_runner::runner::{run, RunError};
use swinglab_runner::LoadError;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

/// Offline config reading `SPY.csv` from `local_dir`.
fn offline_config(work: &Path, local_dir: &Path, kind: StrategyKind) -> RunConfig {
    let mut config = RunConfig::default();
    config.backtest.symbol = "SPY".into();
    config.backtest.start = d(2023, 1, 1);
    config.backtest.end = d(2024, 1, 1);
    config.strategy.kind = kind;
    config.data.offline = true;
    config.data.cache_mode = CacheMode::Off;
    config.data.cache_dir = work.join("cache");
    config.data.local_data_dir = Some(local_dir.to_path_buf());
    config.output.dir = work.join("outputs");
    config
}

fn seed_local(local_dir: &Path) {
    let bars = generate_synthetic_bars("SPY", d(2023, 1, 1), d(2024, 1, 1));
    write_price_csv(&local_dir.join("SPY.csv"), &bars).unwrap();
}

#[test]
fn run_and_export_roundtrip() {
    let work = tempfile::tempdir().unwrap();
    let local = tempfile::tempdir().unwrap();
    seed_local(local.path());

    for kind in [StrategyKind::MaCrossover, StrategyKind::PullbackTrend] {
        let config = offline_config(work.path(), local.path(), kind);
        let outcome = run(&config, None).unwrap();
        assert_eq!(outcome.source, DataSource::LocalCsv);
        assert!(!outcome.is_synthetic());

        let out_dir = config.output.dir.join(kind.as_str());
        let paths = save_artifacts(&outcome, &out_dir).unwrap();
        let result = &outcome.result;

        assert_eq!(read_equity_csv(&paths.equity).unwrap(), result.equity_curve);
        assert_eq!(
            read_drawdown_csv(&paths.drawdown).unwrap(),
            result.drawdown_curve
        );
        assert_eq!(read_trades_csv(&paths.trades).unwrap(), result.trades);
        assert_eq!(read_signals_csv(&paths.signals).unwrap(), outcome.signals);
        assert_eq!(read_summary_json(&paths.summary).unwrap(), result.summary);

        let manifest = read_manifest(&paths.manifest).unwrap();
        assert_eq!(manifest.schema_version, SCHEMA_VERSION);
        assert_eq!(manifest.symbol, "SPY");
        assert_eq!(manifest.strategy, kind.as_str());
        assert_eq!(manifest.data_source, "local_csv");
        assert!(!manifest.synthetic);
        assert_eq!(manifest.bar_count, outcome.bar_count);
        assert_eq!(manifest.dataset_hash, outcome.dataset_hash);
        assert_eq!(manifest.config_hash, config.config_hash().unwrap());
        assert_eq!(manifest.files.len(), 6);
    }
}

#[test]
fn summary_json_uses_flat_snake_case_keys() {
    let work = tempfile::tempdir().unwrap();
    let local = tempfile::tempdir().unwrap();
    seed_local(local.path());
    let config = offline_config(work.path(), local.path(), StrategyKind::PullbackTrend);

    let outcome = run(&config, None).unwrap();
    let paths = save_artifacts(&outcome, &config.output.dir).unwrap();
    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&paths.summary).unwrap()).unwrap();

    for key in [
        "total_return",
        "annual_return",
        "volatility",
        "sharpe_ratio",
        "max_drawdown",
        "trades",
        "win_rate",
        "ending_equity",
    ] {
        assert!(json.get(key).is_some(), "missing key {key}");
    }
    assert_eq!(json["symbol"], "SPY");
}

#[test]
fn synthetic_runs_are_tagged() {
    let work = tempfile::tempdir().unwrap();
    let empty = tempfile::tempdir().unwrap();
    let mut config = offline_config(work.path(), empty.path(), StrategyKind::MaCrossover);
    config.data.synthetic = true;

    let outcome = run(&config, None).unwrap();
    assert!(outcome.is_synthetic());

    let paths = save_artifacts(&outcome, &config.output.dir).unwrap();
    let manifest = read_manifest(&paths.manifest).unwrap();
    assert!(manifest.synthetic);
    assert_eq!(manifest.data_source, "synthetic");
}

#[test]
fn missing_data_surfaces_as_load_error() {
    let work = tempfile::tempdir().unwrap();
    let empty = tempfile::tempdir().unwrap();
    let config = offline_config(work.path(), empty.path(), StrategyKind::MaCrossover);

    let err = run(&config, None).unwrap_err();
    assert!(matches!(err, RunError::Load(LoadError::NoData { .. })));
}
