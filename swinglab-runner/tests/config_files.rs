//! The configs shipped in `configs/` parse and validate.

use std::path::PathBuf;

use swinglab_core::signals::StrategyKind;
use swinglab_runner::config::RunConfig;

fn configs_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("configs")
}

#[test]
fn shipped_configs_are_valid() {
    let mut seen = 0;
    for entry in std::fs::read_dir(configs_dir()).unwrap() {
        let path = entry.unwrap().path();
        if path.extension().and_then(|e| e.to_str()) != Some("toml") {
            continue;
        }
        let config = RunConfig::from_file(&path).unwrap();
        config
            .validate()
            .unwrap_or_else(|e| panic!("{}: {e}", path.display()));
        seen += 1;
    }
    assert!(seen >= 2);
}

#[test]
fn reference_config_matches_defaults_except_output() {
    let config = RunConfig::from_file(&configs_dir().join("aapl_pullback.toml")).unwrap();
    let mut expected = RunConfig::default();
    expected.output.dir = PathBuf::from("outputs/aapl_pullback");
    assert_eq!(config, expected);
    assert_eq!(config.strategy.kind, StrategyKind::PullbackTrend);
}
