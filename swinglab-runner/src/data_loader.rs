//! Price series loading and data source resolution for the runner.
//!
//! Resolution order for one symbol and request window:
//! 1. Cache file (cache mode `on` only)
//! 2. Download from the provider (unless offline), then write the cache
//! 3. Stale cache file after a failed download, in any cache mode
//! 4. Local fallback CSV: `{dir}/{symbol}.csv`, lowercase, uppercase
//! 5. Synthetic bars (only when requested)
//! 6. Otherwise fail with `LoadError::NoData`
//!
//! Synthetic data is a developer-only debug mode. It is tagged in the
//! returned source and in the run manifest.

use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};
use swinglab_core::domain::{Bar, PriceSeries};
use swinglab_core::error::CoreError;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::data::{
    ingest, read_price_csv, CacheKey, CacheMode, CsvCache, DataError, DataProvider, DataSource,
    Ingested,
};

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(
        "no data for '{symbol}' in the requested window. Check the symbol and dates, \
         provide a local CSV, or use --synthetic"
    )]
    NoData { symbol: String },

    #[error("data error: {0}")]
    Data(#[from] DataError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Options controlling how bars are loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadOptions {
    pub symbol: String,
    /// Inclusive.
    pub start: NaiveDate,
    /// Exclusive.
    pub end: NaiveDate,
    pub interval: String,
    pub cache_mode: CacheMode,
    /// If true, never make network requests.
    pub offline: bool,
    /// If true, generate synthetic bars when nothing else is available.
    pub synthetic: bool,
    pub local_data_dir: Option<PathBuf>,
}

impl LoadOptions {
    fn cache_key(&self) -> CacheKey {
        CacheKey::new(&self.symbol, self.start, self.end, &self.interval)
    }
}

/// A loaded series with its provenance.
#[derive(Debug, Clone)]
pub struct LoadedData {
    pub series: PriceSeries,
    pub source: DataSource,
    /// File the bars were read from, if any.
    pub origin: Option<PathBuf>,
    /// BLAKE3 over symbol and every bar field.
    pub dataset_hash: String,
}

impl LoadedData {
    /// Wrap an in-memory series (tests, benchmarks, library callers).
    pub fn from_series(series: PriceSeries, source: DataSource) -> Self {
        let dataset_hash = compute_dataset_hash(&series);
        Self {
            series,
            source,
            origin: None,
            dataset_hash,
        }
    }
}

/// Load the price series described by `opts`.
pub fn load_price_series(
    opts: &LoadOptions,
    cache: &CsvCache,
    provider: Option<&dyn DataProvider>,
) -> Result<LoadedData, LoadError> {
    let key = opts.cache_key();
    let cache_path = cache.path(&key);

    // Step 1: cache
    if opts.cache_mode.reads() {
        if let Some(ingested) = read_cached(cache, &key, opts) {
            info!(symbol = %opts.symbol, path = %cache_path.display(), bars = ingested.bars.len(), "loaded cached data");
            return finish(opts, ingested, DataSource::Cache, Some(cache_path));
        }
    }

    // Step 2: download
    if opts.offline {
        debug!(symbol = %opts.symbol, "offline, skipping download");
    } else if let Some(provider) = provider.filter(|p| p.is_available()) {
        info!(symbol = %opts.symbol, provider = provider.name(), start = %opts.start, end = %opts.end, "downloading");
        match provider.fetch(&opts.symbol, opts.start, opts.end, &opts.interval) {
            Ok(fetched) => {
                let ingested = ingest(fetched.bars, opts.start, opts.end);
                if ingested.bars.is_empty() {
                    warn!(symbol = %opts.symbol, "download returned no usable bars");
                } else {
                    if opts.cache_mode.writes() {
                        match cache.write(&key, &ingested.bars) {
                            Ok(path) => info!(path = %path.display(), "cached download"),
                            Err(e) => warn!(error = %e, "failed to write cache"),
                        }
                    }
                    return finish(opts, ingested, fetched.source, None);
                }
            }
            Err(e) => warn!(symbol = %opts.symbol, error = %e, "download failed"),
        }
    }

    // Step 3: stale cache
    if cache.contains(&key) {
        if let Some(ingested) = read_cached(cache, &key, opts) {
            warn!(path = %cache_path.display(), "using cached data after failed download");
            return finish(opts, ingested, DataSource::StaleCache, Some(cache_path));
        }
    }

    // Step 4: local fallback
    if let Some(dir) = &opts.local_data_dir {
        for path in local_candidates(dir, &opts.symbol) {
            if !path.is_file() {
                continue;
            }
            let ingested = ingest(read_price_csv(&path)?, opts.start, opts.end);
            if ingested.bars.is_empty() {
                debug!(path = %path.display(), "local file has no bars in window");
                continue;
            }
            info!(path = %path.display(), bars = ingested.bars.len(), "loaded local fallback data");
            return finish(opts, ingested, DataSource::LocalCsv, Some(path));
        }
    }

    // Step 5: synthetic
    if opts.synthetic {
        warn!(symbol = %opts.symbol, "generating synthetic data; results are tagged as synthetic");
        let bars = generate_synthetic_bars(&opts.symbol, opts.start, opts.end);
        let ingested = ingest(bars, opts.start, opts.end);
        if !ingested.bars.is_empty() {
            return finish(opts, ingested, DataSource::Synthetic, None);
        }
    }

    Err(LoadError::NoData {
        symbol: opts.symbol.clone(),
    })
}

/// Download bars and overwrite the cache file for the window.
///
/// Backs the `download` command: no fallback, any failure is an error.
pub fn download_to_cache(
    opts: &LoadOptions,
    cache: &CsvCache,
    provider: &dyn DataProvider,
) -> Result<(PathBuf, usize), LoadError> {
    let fetched = provider.fetch(&opts.symbol, opts.start, opts.end, &opts.interval)?;
    let ingested = ingest(fetched.bars, opts.start, opts.end);
    if ingested.bars.is_empty() {
        return Err(LoadError::NoData {
            symbol: opts.symbol.clone(),
        });
    }
    let path = cache.write(&opts.cache_key(), &ingested.bars)?;
    info!(path = %path.display(), bars = ingested.bars.len(), "cached download");
    Ok((path, ingested.bars.len()))
}

fn read_cached(cache: &CsvCache, key: &CacheKey, opts: &LoadOptions) -> Option<Ingested> {
    match cache.load(key) {
        Ok(Some(bars)) => {
            let ingested = ingest(bars, opts.start, opts.end);
            if ingested.bars.is_empty() {
                debug!(symbol = %opts.symbol, "cache file has no bars in window");
                None
            } else {
                Some(ingested)
            }
        }
        Ok(None) => None,
        Err(e) => {
            warn!(error = %e, "ignoring unreadable cache file");
            None
        }
    }
}

fn finish(
    opts: &LoadOptions,
    ingested: Ingested,
    source: DataSource,
    origin: Option<PathBuf>,
) -> Result<LoadedData, LoadError> {
    if ingested.dropped_invalid > 0 || ingested.dropped_duplicates > 0 {
        warn!(
            symbol = %opts.symbol,
            invalid = ingested.dropped_invalid,
            duplicates = ingested.dropped_duplicates,
            "dropped bars during ingestion"
        );
    }
    let series = PriceSeries::new(opts.symbol.clone(), ingested.bars)?;
    let dataset_hash = compute_dataset_hash(&series);
    debug!(
        symbol = %opts.symbol,
        source = %source,
        first = ?series.first_date(),
        last = ?series.last_date(),
        clipped = ingested.clipped,
        "price series ready"
    );
    Ok(LoadedData {
        series,
        source,
        origin,
        dataset_hash,
    })
}

fn local_candidates(dir: &Path, symbol: &str) -> Vec<PathBuf> {
    let mut names: Vec<String> = Vec::with_capacity(3);
    for name in [
        format!("{symbol}.csv"),
        format!("{}.csv", symbol.to_lowercase()),
        format!("{}.csv", symbol.to_uppercase()),
    ] {
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names.into_iter().map(|n| dir.join(n)).collect()
}

/// Deterministic BLAKE3 hash over the symbol and all bar fields.
pub fn compute_dataset_hash(series: &PriceSeries) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(series.symbol().as_bytes());
    for bar in series.bars() {
        hasher.update(bar.date.to_string().as_bytes());
        hasher.update(&bar.open.to_le_bytes());
        hasher.update(&bar.high.to_le_bytes());
        hasher.update(&bar.low.to_le_bytes());
        hasher.update(&bar.close.to_le_bytes());
        hasher.update(&bar.volume.to_le_bytes());
    }
    hasher.finalize().to_hex().to_string()
}

/// Random-walk weekday bars over `[start, end)`, seeded from the symbol.
pub fn generate_synthetic_bars(symbol: &str, start: NaiveDate, end: NaiveDate) -> Vec<Bar> {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    let seed: [u8; 32] = *blake3::hash(symbol.as_bytes()).as_bytes();
    let mut rng = StdRng::from_seed(seed);

    let mut bars = Vec::new();
    let mut price = 100.0_f64;
    let mut current = start;

    while current < end {
        let weekday = current.weekday();
        if weekday == chrono::Weekday::Sat || weekday == chrono::Weekday::Sun {
            current += chrono::Duration::days(1);
            continue;
        }

        let daily_return: f64 = rng.gen_range(-0.03..0.03);
        let open = price;
        let close = price * (1.0 + daily_return);
        let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.01));
        let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.01));
        let volume = rng.gen_range(500_000..5_000_000u64);

        bars.push(Bar {
            date: current,
            open,
            high,
            low,
            close,
            volume,
        });

        price = close;
        current += chrono::Duration::days(1);
    }

    bars
}
