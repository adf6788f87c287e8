//! Where each stock's CSV lives

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::{DataError, DataResult};

/// A stock symbol and the CSV file holding its history
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StockSource {
    pub symbol: String,
    pub path: PathBuf,
}

impl StockSource {
    pub fn new(symbol: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            symbol: symbol.into(),
            path: path.into(),
        }
    }
}

/// Every `*.csv` file in `dir`, one stock per file named after the file stem,
/// sorted by symbol.
pub fn discover_sources(dir: impl AsRef<Path>) -> DataResult<Vec<StockSource>> {
    let dir = dir.as_ref();
    let io_error = |source| DataError::Io {
        path: dir.display().to_string(),
        source,
    };

    let mut sources = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_error)? {
        let path = entry.map_err(io_error)?.path();
        let is_csv = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
        if !is_csv || !path.is_file() {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            sources.push(StockSource::new(stem, path.clone()));
        }
    }

    sources.sort_by(|a, b| a.symbol.cmp(&b.symbol));
    Ok(sources)
}
