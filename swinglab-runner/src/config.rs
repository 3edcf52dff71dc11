//! Serializable run configuration, loaded from TOML.
//!
//! ```toml
//! [backtest]
//! symbol = "AAPL"
//! start = "2022-01-01"
//! end = "2023-01-01"
//! initial_capital = 10000.0
//! commission_rate = 0.0001
//! slippage_rate = 0.0005
//!
//! [strategy]
//! kind = "pullback_trend"
//! short_window = 10
//! long_window = 20
//!
//! [data]
//! interval = "1d"
//! cache_mode = "on"
//! cache_dir = "data/cache"
//! local_data_dir = "sample_data"
//!
//! [output]
//! dir = "outputs"
//! ```
//!
//! Every section and field is optional and falls back to its default.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use swinglab_core::engine::BacktestConfig;
use swinglab_core::signals::StrategyConfig;
use thiserror::Error;

use crate::data::CacheMode;
use crate::data_loader::LoadOptions;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Full configuration of a single run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub backtest: BacktestConfig,
    pub strategy: StrategyConfig,
    pub data: DataConfig,
    pub output: OutputConfig,
}

/// Where bars come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub interval: String,
    pub cache_mode: CacheMode,
    pub cache_dir: PathBuf,
    /// Directory searched for `{SYMBOL}.csv` when download and cache fail.
    pub local_data_dir: Option<PathBuf>,
    /// Never make network requests.
    pub offline: bool,
    /// Fall back to generated bars when nothing else is available.
    pub synthetic: bool,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            interval: "1d".into(),
            cache_mode: CacheMode::On,
            cache_dir: PathBuf::from("data/cache"),
            local_data_dir: Some(PathBuf::from("sample_data")),
            offline: false,
            synthetic: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("outputs"),
        }
    }
}

impl RunConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let b = &self.backtest;
        if b.symbol.trim().is_empty() {
            return Err(ConfigError::Invalid("symbol must not be empty".into()));
        }
        if b.start >= b.end {
            return Err(ConfigError::Invalid(format!(
                "start ({}) must be before end ({})",
                b.start, b.end
            )));
        }
        if self.strategy.short_window == 0 || self.strategy.long_window == 0 {
            return Err(ConfigError::Invalid(format!(
                "windows must be >= 1 (short={}, long={})",
                self.strategy.short_window, self.strategy.long_window
            )));
        }
        if self.data.interval.trim().is_empty() {
            return Err(ConfigError::Invalid("interval must not be empty".into()));
        }
        b.validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// BLAKE3 over the canonical JSON form. Identical configs hash identically.
    pub fn config_hash(&self) -> Result<String, ConfigError> {
        let json = serde_json::to_string(self)?;
        Ok(blake3::hash(json.as_bytes()).to_hex().to_string())
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            symbol: self.backtest.symbol.clone(),
            start: self.backtest.start,
            end: self.backtest.end,
            interval: self.data.interval.clone(),
            cache_mode: self.data.cache_mode,
            offline: self.data.offline,
            synthetic: self.data.synthetic,
            local_data_dir: self.data.local_data_dir.clone(),
        }
    }
}
