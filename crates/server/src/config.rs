//! Runtime configuration: data directory, stock sources, strategy parameters

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::Context;
use datastore::{discover_sources, StockSource};
use engine::SignalParams;

pub const DATA_DIR_ENV: &str = "SIGNAL_BOARD_DATA_DIR";
const DEFAULT_DATA_DIR: &str = "data";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    /// Explicit `SYMBOL=path` overrides; empty means discover every CSV in `data_dir`
    pub stocks: Vec<String>,
    pub params: SignalParams,
}

impl AppConfig {
    pub fn new(
        data_dir: Option<PathBuf>,
        stocks: Vec<String>,
        window: usize,
        k: f64,
    ) -> anyhow::Result<Self> {
        let data_dir = data_dir.unwrap_or_else(|| {
            std::env::var(DATA_DIR_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR))
        });
        let params = SignalParams::new(window, k)?;
        Ok(Self {
            data_dir,
            stocks,
            params,
        })
    }

    pub fn sources(&self) -> anyhow::Result<Vec<StockSource>> {
        if self.stocks.is_empty() {
            return discover_sources(&self.data_dir).with_context(|| {
                format!("Failed to list CSV files in {}", self.data_dir.display())
            });
        }
        let mut seen = HashSet::new();
        let mut sources = Vec::with_capacity(self.stocks.len());
        for spec in &self.stocks {
            let source = parse_stock_spec(spec, &self.data_dir)?;
            if !seen.insert(source.symbol.clone()) {
                anyhow::bail!("Stock {} is listed more than once", source.symbol);
            }
            sources.push(source);
        }
        Ok(sources)
    }
}

/// `SYMBOL=path` or a bare `SYMBOL` (meaning `<data_dir>/SYMBOL.csv`).
/// Relative paths are resolved against the data directory.
pub fn parse_stock_spec(spec: &str, data_dir: &Path) -> anyhow::Result<StockSource> {
    let (symbol, path) = match spec.split_once('=') {
        Some((symbol, path)) => (symbol.trim(), PathBuf::from(path.trim())),
        None => (spec.trim(), PathBuf::from(format!("{}.csv", spec.trim()))),
    };
    if symbol.is_empty() {
        anyhow::bail!("Invalid stock entry {:?}: symbol is empty", spec);
    }
    if path.as_os_str().is_empty() {
        anyhow::bail!("Invalid stock entry {:?}: path is empty", spec);
    }

    let path = if path.is_absolute() {
        path
    } else {
        data_dir.join(path)
    };
    Ok(StockSource::new(symbol, path))
}
