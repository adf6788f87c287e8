//! Process-wide series cache
//!
//! Each source is read once by [`SeriesCache::load`]. [`SeriesCache::refresh`]
//! re-reads only files whose modification time moved, plus any that failed
//! last time, so a fixed CSV becomes usable without a restart.
//! [`SeriesCache::sync`] does the same against a fresh source list, picking up
//! stocks added since startup and dropping those whose files went away.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use std::time::SystemTime;

use serde::Serialize;
use tracing::{info, warn};

use crate::loader::load_series;
use crate::series::PriceSeries;
use crate::source::StockSource;
use crate::DataError;

/// A stock whose file could not be loaded
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadFailure {
    pub symbol: String,
    pub path: String,
    pub message: String,
}

struct CacheEntry {
    source: StockSource,
    modified: Option<SystemTime>,
    state: Result<Arc<PriceSeries>, Arc<DataError>>,
}

impl CacheEntry {
    fn read(source: StockSource) -> Self {
        let modified = modified_time(&source.path);
        let state = match load_series(&source.symbol, &source.path) {
            Ok(series) => {
                info!(
                    symbol = %source.symbol,
                    rows = series.len(),
                    first = %series.first_date(),
                    last = %series.last_date(),
                    "Loaded price series"
                );
                Ok(Arc::new(series))
            }
            Err(e) => {
                warn!(symbol = %source.symbol, error = %e, "Failed to load price series");
                Err(Arc::new(e))
            }
        };
        Self {
            source,
            modified,
            state,
        }
    }

    fn is_stale(&self) -> bool {
        self.state.is_err() || modified_time(&self.source.path) != self.modified
    }
}

fn modified_time(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}

/// Loaded series keyed by symbol
pub struct SeriesCache {
    entries: BTreeMap<String, CacheEntry>,
}

impl SeriesCache {
    /// Read every source once. Failures are kept per stock, never fatal.
    pub fn load(sources: impl IntoIterator<Item = StockSource>) -> Self {
        let entries = sources
            .into_iter()
            .map(|source| (source.symbol.clone(), CacheEntry::read(source)))
            .collect();
        Self { entries }
    }

    /// Re-read stale sources; returns the symbols that were reloaded
    pub fn refresh(&mut self) -> Vec<String> {
        let mut reloaded = Vec::new();
        for (symbol, entry) in self.entries.iter_mut() {
            if entry.is_stale() {
                *entry = CacheEntry::read(entry.source.clone());
                reloaded.push(symbol.clone());
            }
        }
        if !reloaded.is_empty() {
            info!(symbols = ?reloaded, "Refreshed changed price files");
        }
        reloaded
    }

    /// Apply a new source list, then refresh whatever is stale.
    ///
    /// New symbols are read, vanished ones dropped, and a symbol whose path
    /// changed is re-read. Returns every symbol that was added, removed or
    /// reloaded.
    pub fn sync(&mut self, sources: impl IntoIterator<Item = StockSource>) -> Vec<String> {
        let wanted: BTreeMap<String, StockSource> = sources
            .into_iter()
            .map(|source| (source.symbol.clone(), source))
            .collect();
        let mut changed = Vec::new();

        self.entries.retain(|symbol, _| {
            let keep = wanted.contains_key(symbol);
            if !keep {
                changed.push(symbol.clone());
            }
            keep
        });
        if !changed.is_empty() {
            info!(symbols = ?changed, "Dropped price files no longer listed");
        }

        for (symbol, source) in wanted {
            let known = self
                .entries
                .get(&symbol)
                .is_some_and(|entry| entry.source.path == source.path);
            if !known {
                self.entries.insert(symbol.clone(), CacheEntry::read(source));
                changed.push(symbol);
            }
        }

        changed.extend(self.refresh());
        changed.sort();
        changed.dedup();
        changed
    }

    pub fn get(&self, symbol: &str) -> Option<Arc<PriceSeries>> {
        self.entries
            .get(symbol)
            .and_then(|e| e.state.as_ref().ok())
            .cloned()
    }

    /// Successfully loaded series, sorted by symbol
    pub fn series(&self) -> Vec<Arc<PriceSeries>> {
        self.entries
            .values()
            .filter_map(|e| e.state.as_ref().ok().cloned())
            .collect()
    }

    pub fn failures(&self) -> Vec<LoadFailure> {
        self.entries
            .values()
            .filter_map(|e| {
                e.state.as_ref().err().map(|err| LoadFailure {
                    symbol: e.source.symbol.clone(),
                    path: e.source.path.display().to_string(),
                    message: err.to_string(),
                })
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
