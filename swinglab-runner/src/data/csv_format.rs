//! OHLCV price CSV files: the cache format and local fallback datasets.
//!
//! Written as `Date,Open,High,Low,Close,Volume`. On read, headers are matched
//! case-insensitively and extra columns (e.g. `Adj Close`) are ignored.
//! `Date`, `Open` and `Close` are required; missing `High`/`Low` fall back to
//! the open/close envelope and missing `Volume` to zero. Unparseable prices
//! become NaN and are dropped during ingestion.

use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use swinglab_core::domain::Bar;
use swinglab_core::error::CoreError;

use super::provider::DataError;

const HEADER: [&str; 6] = ["Date", "Open", "High", "Low", "Close", "Volume"];

/// Read a price CSV from disk.
pub fn read_price_csv(path: &Path) -> Result<Vec<Bar>, DataError> {
    let file = std::fs::File::open(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_price_csv_from(file, path)
}

/// Read a price CSV from any reader. `origin` is only used in error messages.
pub fn read_price_csv_from<R: Read>(reader: R, origin: &Path) -> Result<Vec<Bar>, DataError> {
    let csv_err = |e: csv::Error| DataError::Csv {
        path: origin.to_path_buf(),
        message: e.to_string(),
    };

    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = rdr.headers().map_err(csv_err)?.clone();
    let column = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));

    let date_col = column("Date").ok_or_else(|| CoreError::missing_field("Date"))?;
    let open_col = column("Open").ok_or_else(|| CoreError::missing_field("Open"))?;
    let close_col = column("Close").ok_or_else(|| CoreError::missing_field("Close"))?;
    let high_col = column("High");
    let low_col = column("Low");
    let volume_col = column("Volume");

    let mut bars = Vec::new();
    for (line, record) in rdr.records().enumerate() {
        let record = record.map_err(csv_err)?;
        let field = |col: Option<usize>| col.and_then(|c| record.get(c)).unwrap_or("");

        let raw_date = field(Some(date_col));
        let date = parse_date(raw_date).ok_or_else(|| DataError::Csv {
            path: origin.to_path_buf(),
            message: format!("line {}: invalid date '{raw_date}'", line + 2),
        })?;

        let open = parse_price(field(Some(open_col)));
        let close = parse_price(field(Some(close_col)));
        let high = high_col
            .map(|c| parse_price(field(Some(c))))
            .unwrap_or_else(|| open.max(close));
        let low = low_col
            .map(|c| parse_price(field(Some(c))))
            .unwrap_or_else(|| open.min(close));
        let volume = parse_price(field(volume_col));
        let volume = if volume.is_finite() && volume > 0.0 {
            volume.round() as u64
        } else {
            0
        };

        bars.push(Bar {
            date,
            open,
            high,
            low,
            close,
            volume,
        });
    }
    Ok(bars)
}

/// Write bars to `path`, creating parent directories.
pub fn write_price_csv(path: &Path, bars: &[Bar]) -> Result<(), DataError> {
    let io_err = |source| DataError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    let csv_err = |e: csv::Error| DataError::Csv {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    let mut wtr = csv::Writer::from_path(path).map_err(csv_err)?;
    wtr.write_record(HEADER).map_err(csv_err)?;
    for bar in bars {
        wtr.write_record([
            bar.date.to_string(),
            bar.open.to_string(),
            bar.high.to_string(),
            bar.low.to_string(),
            bar.close.to_string(),
            bar.volume.to_string(),
        ])
        .map_err(csv_err)?;
    }
    wtr.flush().map_err(io_err)?;
    Ok(())
}

/// Accepts `YYYY-MM-DD` optionally followed by a time part.
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let day = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

fn parse_price(raw: &str) -> f64 {
    raw.parse::<f64>().unwrap_or(f64::NAN)
}
