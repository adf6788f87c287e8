//! Data layer for Signal Board
//!
//! Loads one CSV file per stock into strongly typed price series and keeps
//! them in an explicit process-wide cache that reloads files when they change.

pub mod cache;
pub mod loader;
pub mod series;
pub mod source;

pub use cache::{LoadFailure, SeriesCache};
pub use loader::{load_series, parse_series};
pub use series::{PricePoint, PriceSeries, SeriesError};
pub use source::{discover_sources, StockSource};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A data row that is malformed: bad date, bad number, duplicate date.
    #[error("{path}, row {row}: {message}")]
    Format {
        path: String,
        row: usize,
        message: String,
    },

    /// A file-level schema problem: missing column, no data rows.
    #[error("{path}: {message}")]
    Schema { path: String, message: String },
}

impl DataError {
    /// True for every variant caused by file contents rather than the filesystem.
    pub fn is_format_error(&self) -> bool {
        matches!(self, DataError::Format { .. } | DataError::Schema { .. })
    }
}

pub type DataResult<T> = Result<T, DataError>;
