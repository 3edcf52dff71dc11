//! Artifact export: CSV curves and ledger, JSON summary and manifest.
//!
//! Every CSV artifact has a reader so results can be reloaded for analysis:
//! - `equity.csv`: `date,equity`
//! - `drawdown.csv`: `date,equity,drawdown`
//! - `trades.csv`: `date,action,price,shares,cash_after`
//! - `signals.csv`: `date,signal,short_ma,long_ma,trend_up,pullback_recovery`
//! - `summary.json`: flat summary record
//! - `manifest.json`: provenance of the run

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use swinglab_core::domain::{DrawdownPoint, EquityPoint, SignalRow, SignalSeries, TradeRecord};
use swinglab_core::error::CoreError;
use swinglab_core::metrics::Summary;
use thiserror::Error;
use tracing::info;

use crate::runner::RunOutcome;

/// Current schema version for `manifest.json`.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Core(#[from] CoreError),
}

fn io_error(path: &Path) -> impl Fn(std::io::Error) -> ArtifactError + '_ {
    move |source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Run provenance written next to the artifacts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunManifest {
    pub schema_version: u32,
    pub symbol: String,
    pub strategy: String,
    pub short_window: usize,
    pub long_window: usize,
    pub data_source: String,
    pub synthetic: bool,
    pub bar_count: usize,
    pub dataset_hash: String,
    pub config_hash: String,
    pub files: Vec<String>,
}

/// Paths of the files written by `save_artifacts`.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactPaths {
    pub equity: PathBuf,
    pub drawdown: PathBuf,
    pub trades: PathBuf,
    pub signals: PathBuf,
    pub summary: PathBuf,
    pub manifest: PathBuf,
}

impl ArtifactPaths {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            equity: dir.join("equity.csv"),
            drawdown: dir.join("drawdown.csv"),
            trades: dir.join("trades.csv"),
            signals: dir.join("signals.csv"),
            summary: dir.join("summary.json"),
            manifest: dir.join("manifest.json"),
        }
    }

    pub fn all(&self) -> [&Path; 6] {
        [
            &self.equity,
            &self.drawdown,
            &self.trades,
            &self.signals,
            &self.summary,
            &self.manifest,
        ]
    }
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Write the full artifact set for one run into `dir` (created if needed).
pub fn save_artifacts(outcome: &RunOutcome, dir: &Path) -> Result<ArtifactPaths, ArtifactError> {
    std::fs::create_dir_all(dir).map_err(io_error(dir))?;
    let paths = ArtifactPaths::in_dir(dir);
    let result = &outcome.result;

    write_equity_csv(&paths.equity, &result.equity_curve)?;
    write_drawdown_csv(&paths.drawdown, &result.drawdown_curve)?;
    write_trades_csv(&paths.trades, &result.trades)?;
    write_signals_csv(&paths.signals, &outcome.signals)?;
    write_summary_json(&paths.summary, &result.summary)?;

    let files = paths
        .all()
        .iter()
        .filter_map(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .collect();
    let manifest = RunManifest {
        schema_version: SCHEMA_VERSION,
        symbol: result.summary.symbol.clone(),
        strategy: outcome.strategy.kind.to_string(),
        short_window: outcome.strategy.short_window,
        long_window: outcome.strategy.long_window,
        data_source: outcome.source.to_string(),
        synthetic: outcome.is_synthetic(),
        bar_count: outcome.bar_count,
        dataset_hash: outcome.dataset_hash.clone(),
        config_hash: outcome.config_hash.clone(),
        files,
    };
    write_json(&paths.manifest, &manifest)?;

    info!(dir = %dir.display(), "artifacts written");
    Ok(paths)
}

// ─── CSV writers ────────────────────────────────────────────────────

fn write_csv<T: Serialize>(path: &Path, rows: &[T], header: &[&str]) -> Result<(), ArtifactError> {
    let file = File::create(path).map_err(io_error(path))?;
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(BufWriter::new(file));
    // Explicit header so an empty artifact still carries its columns.
    wtr.write_record(header)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush().map_err(io_error(path))?;
    Ok(())
}

pub fn write_equity_csv(path: &Path, points: &[EquityPoint]) -> Result<(), ArtifactError> {
    write_csv(path, points, &["date", "equity"])
}

pub fn write_drawdown_csv(path: &Path, points: &[DrawdownPoint]) -> Result<(), ArtifactError> {
    write_csv(path, points, &["date", "equity", "drawdown"])
}

pub fn write_trades_csv(path: &Path, trades: &[TradeRecord]) -> Result<(), ArtifactError> {
    write_csv(
        path,
        trades,
        &["date", "action", "price", "shares", "cash_after"],
    )
}

pub fn write_signals_csv(path: &Path, signals: &SignalSeries) -> Result<(), ArtifactError> {
    write_csv(
        path,
        signals.rows(),
        &[
            "date",
            "signal",
            "short_ma",
            "long_ma",
            "trend_up",
            "pullback_recovery",
        ],
    )
}

// ─── CSV readers ────────────────────────────────────────────────────

fn open(path: &Path) -> Result<File, ArtifactError> {
    File::open(path).map_err(io_error(path))
}

/// Deserialize every row after checking that `required` columns exist.
fn read_csv<T: DeserializeOwned, R: Read>(
    reader: R,
    required: &[&str],
) -> Result<Vec<T>, ArtifactError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = rdr.headers()?.clone();
    for column in required {
        if !headers.iter().any(|h| h == *column) {
            return Err(CoreError::missing_field(*column).into());
        }
    }
    rdr.deserialize()
        .collect::<Result<Vec<T>, _>>()
        .map_err(ArtifactError::from)
}

pub fn read_equity_csv(path: &Path) -> Result<Vec<EquityPoint>, ArtifactError> {
    read_csv(open(path)?, &["date", "equity"])
}

pub fn read_drawdown_csv(path: &Path) -> Result<Vec<DrawdownPoint>, ArtifactError> {
    read_csv(open(path)?, &["date", "equity", "drawdown"])
}

pub fn read_trades_csv(path: &Path) -> Result<Vec<TradeRecord>, ArtifactError> {
    read_csv(
        open(path)?,
        &["date", "action", "price", "shares", "cash_after"],
    )
}

/// Read a signals file. Only `date` and `signal` are required.
pub fn read_signals_csv(path: &Path) -> Result<SignalSeries, ArtifactError> {
    read_signals_from(open(path)?)
}

pub fn read_signals_from<R: Read>(reader: R) -> Result<SignalSeries, ArtifactError> {
    let rows: Vec<SignalRow> = read_csv(reader, &["date", "signal"])?;
    Ok(SignalSeries::new(rows))
}

// ─── JSON ───────────────────────────────────────────────────────────

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), ArtifactError> {
    let file = File::create(path).map_err(io_error(path))?;
    let mut out = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut out, value)?;
    out.write_all(b"\n").map_err(io_error(path))?;
    out.flush().map_err(io_error(path))?;
    Ok(())
}

pub fn write_summary_json(path: &Path, summary: &Summary) -> Result<(), ArtifactError> {
    write_json(path, summary)
}

pub fn read_summary_json(path: &Path) -> Result<Summary, ArtifactError> {
    Ok(serde_json::from_reader(open(path)?)?)
}

pub fn read_manifest(path: &Path) -> Result<RunManifest, ArtifactError> {
    Ok(serde_json::from_reader(open(path)?)?)
}
