//! CSV download cache.
//!
//! One file per request window: `{dir}/{symbol}_{start}_{end}_{interval}.csv`.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use swinglab_core::domain::Bar;

use super::csv_format::{read_price_csv, write_price_csv};
use super::provider::DataError;

/// How a run uses the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheMode {
    /// Read the cache when present, write after a download.
    #[default]
    On,
    /// Ignore an existing cache file, overwrite it after a download.
    Refresh,
    /// Never read nor write.
    Off,
}

impl CacheMode {
    pub fn reads(self) -> bool {
        matches!(self, CacheMode::On)
    }

    pub fn writes(self) -> bool {
        matches!(self, CacheMode::On | CacheMode::Refresh)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CacheMode::On => "on",
            CacheMode::Refresh => "refresh",
            CacheMode::Off => "off",
        }
    }
}

impl fmt::Display for CacheMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CacheMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "on" => Ok(CacheMode::On),
            "refresh" => Ok(CacheMode::Refresh),
            "off" => Ok(CacheMode::Off),
            other => Err(format!("unknown cache mode '{other}'. Valid: on, refresh, off")),
        }
    }
}

/// Identifies one cached request window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheKey {
    pub symbol: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub interval: String,
}

impl CacheKey {
    pub fn new(symbol: &str, start: NaiveDate, end: NaiveDate, interval: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            start,
            end,
            interval: interval.to_string(),
        }
    }

    pub fn file_name(&self) -> String {
        format!(
            "{}_{}_{}_{}.csv",
            self.symbol, self.start, self.end, self.interval
        )
    }
}

/// Directory of cached price CSVs.
#[derive(Debug, Clone)]
pub struct CsvCache {
    dir: PathBuf,
}

impl CsvCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, key: &CacheKey) -> PathBuf {
        self.dir.join(key.file_name())
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.path(key).is_file()
    }

    /// Cached bars for `key`, or `None` when no file exists.
    pub fn load(&self, key: &CacheKey) -> Result<Option<Vec<Bar>>, DataError> {
        let path = self.path(key);
        if !path.is_file() {
            return Ok(None);
        }
        read_price_csv(&path).map(Some)
    }

    /// Write `bars` for `key`, replacing any existing file.
    pub fn write(&self, key: &CacheKey, bars: &[Bar]) -> Result<PathBuf, DataError> {
        let path = self.path(key);
        write_price_csv(&path, bars)?;
        Ok(path)
    }
}
