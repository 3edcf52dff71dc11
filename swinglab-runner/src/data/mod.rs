//! Market data acquisition: providers, the CSV cache, and ingestion.

pub mod cache;
pub mod csv_format;
pub mod ingest;
pub mod provider;
pub mod yahoo;

pub use cache::{CacheKey, CacheMode, CsvCache};
pub use csv_format::{read_price_csv, read_price_csv_from, write_price_csv};
pub use ingest::{ingest, Ingested};
pub use provider::{DataError, DataProvider, DataSource, FetchResult};
pub use yahoo::YahooProvider;
