//! SwingLab Runner: config, data acquisition, run orchestration, artifacts.
//!
//! This crate builds on `swinglab-core` to provide:
//! - TOML run configuration with defaults for every field
//! - Yahoo Finance download with retry, a CSV cache, and local/synthetic fallbacks
//! - Single-run orchestration (load, signal, simulate, summarize)
//! - CSV/JSON artifact export and reload

pub mod config;
pub mod data;
pub mod data_loader;
pub mod export;
pub mod runner;

pub use config::{ConfigError, DataConfig, OutputConfig, RunConfig};
pub use data::{CacheMode, CsvCache, DataError, DataProvider, DataSource, YahooProvider};
pub use data_loader::{download_to_cache, load_price_series, LoadError, LoadOptions, LoadedData};
pub use export::{save_artifacts, ArtifactError, ArtifactPaths, RunManifest};
pub use runner::{run, run_loaded, RunError, RunOutcome};
