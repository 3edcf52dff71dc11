//! Data provider trait and structured error types.
//!
//! The DataProvider trait abstracts over remote sources so the loader can be
//! exercised with a mock in tests. The cache sits above this trait.

use std::fmt;
use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use swinglab_core::domain::Bar;
use swinglab_core::error::CoreError;
use thiserror::Error;

/// Structured error types for data operations.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("authentication required: {0}")]
    AuthenticationRequired(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("HTTP {status} for {symbol}")]
    Http { status: u16, symbol: String },

    #[error("failed to read or write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV {path}: {message}")]
    Csv { path: PathBuf, message: String },

    #[error(transparent)]
    Schema(#[from] CoreError),

    #[error("data error: {0}")]
    Other(String),
}

impl DataError {
    /// Transient failures worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            DataError::NetworkUnreachable(_) | DataError::RateLimited { .. } => true,
            DataError::Http { status, .. } => *status >= 500,
            // An empty or garbled payload is sometimes returned under load.
            DataError::ResponseFormatChanged(_) => true,
            _ => false,
        }
    }
}

/// Result of a successful fetch for a single symbol.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub symbol: String,
    pub bars: Vec<Bar>,
    pub source: DataSource,
}

/// Where the bars of a run came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    YahooFinance,
    Cache,
    /// Cache file used after a failed download, regardless of cache mode.
    StaleCache,
    LocalCsv,
    Synthetic,
}

impl DataSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataSource::YahooFinance => "yahoo_finance",
            DataSource::Cache => "cache",
            DataSource::StaleCache => "stale_cache",
            DataSource::LocalCsv => "local_csv",
            DataSource::Synthetic => "synthetic",
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trait for remote data providers.
pub trait DataProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch OHLCV bars for `symbol` over `[start, end)` at `interval`.
    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
        interval: &str,
    ) -> Result<FetchResult, DataError>;

    /// Whether the provider should be tried at all.
    fn is_available(&self) -> bool {
        true
    }
}
