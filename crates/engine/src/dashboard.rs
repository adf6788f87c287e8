//! Cross-stock dashboard
//!
//! Holds one [`StockView`] per successfully loaded stock plus the stocks that
//! failed to load, and answers the daily "which stocks are Buy / Sell / Hold"
//! question for a selected date.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use datastore::{LoadFailure, PriceSeries};
use serde::Serialize;
use tracing::info;

use crate::error::{EngineError, EngineResult};
use crate::types::{Signal, SignalParams, SignalRecord};
use crate::view::StockView;

/// One stock's record on the board
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardEntry {
    pub symbol: String,
    #[serde(flatten)]
    pub record: SignalRecord,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SignalCounts {
    pub buy: usize,
    pub sell: usize,
    pub hold: usize,
    pub unknown: usize,
}

/// All stocks' signals for one date, grouped by signal
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalBoard {
    pub date: NaiveDate,
    pub buy: Vec<BoardEntry>,
    pub sell: Vec<BoardEntry>,
    pub hold: Vec<BoardEntry>,
    pub unknown: Vec<BoardEntry>,
    /// Loaded stocks with no row on this date
    pub missing: Vec<String>,
    pub counts: SignalCounts,
}

impl SignalBoard {
    fn new(date: NaiveDate) -> Self {
        Self {
            date,
            buy: Vec::new(),
            sell: Vec::new(),
            hold: Vec::new(),
            unknown: Vec::new(),
            missing: Vec::new(),
            counts: SignalCounts::default(),
        }
    }

    fn push(&mut self, symbol: &str, record: &SignalRecord) {
        let entry = BoardEntry {
            symbol: symbol.to_string(),
            record: record.clone(),
        };
        match record.signal {
            Signal::Buy => {
                self.counts.buy += 1;
                self.buy.push(entry);
            }
            Signal::Sell => {
                self.counts.sell += 1;
                self.sell.push(entry);
            }
            Signal::Hold => {
                self.counts.hold += 1;
                self.hold.push(entry);
            }
            Signal::Unknown => {
                self.counts.unknown += 1;
                self.unknown.push(entry);
            }
        }
    }

    /// True when no loaded stock has a row on this date
    pub fn is_empty(&self) -> bool {
        self.buy.is_empty()
            && self.sell.is_empty()
            && self.hold.is_empty()
            && self.unknown.is_empty()
    }
}

pub struct Dashboard {
    params: SignalParams,
    views: BTreeMap<String, StockView>,
    failures: Vec<LoadFailure>,
}

impl Dashboard {
    /// Compute every stock's signals once. Only invalid parameters fail.
    pub fn build<'a>(
        series: impl IntoIterator<Item = &'a PriceSeries>,
        failures: Vec<LoadFailure>,
        params: SignalParams,
    ) -> EngineResult<Self> {
        params.validate()?;
        let views = series
            .into_iter()
            .map(|s| -> EngineResult<(String, StockView)> {
                Ok((s.symbol().to_string(), StockView::build(s, &params)?))
            })
            .collect::<EngineResult<BTreeMap<_, _>>>()?;

        info!(
            stocks = views.len(),
            failed = failures.len(),
            window = params.window,
            k = params.k,
            "Dashboard built"
        );

        Ok(Self {
            params,
            views,
            failures,
        })
    }

    pub fn params(&self) -> &SignalParams {
        &self.params
    }

    pub fn symbols(&self) -> Vec<&str> {
        self.views.keys().map(String::as_str).collect()
    }

    pub fn stock(&self, symbol: &str) -> EngineResult<&StockView> {
        self.views
            .get(symbol)
            .ok_or_else(|| EngineError::UnknownSymbol(symbol.to_string()))
    }

    pub fn failures(&self) -> &[LoadFailure] {
        &self.failures
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    /// Every date on which at least one stock traded, ascending
    pub fn available_dates(&self) -> Vec<NaiveDate> {
        self.views
            .values()
            .flat_map(|v| v.records().iter().map(|r| r.date))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Default selection: the most recent date of any stock
    pub fn latest_date(&self) -> Option<NaiveDate> {
        self.views
            .values()
            .filter_map(|v| v.latest().map(|r| r.date))
            .max()
    }

    pub fn board(&self, date: NaiveDate) -> SignalBoard {
        let mut board = SignalBoard::new(date);
        for (symbol, view) in &self.views {
            match view.summary(date) {
                Ok(record) => board.push(symbol, record),
                Err(_) => board.missing.push(symbol.clone()),
            }
        }
        board
    }
}
