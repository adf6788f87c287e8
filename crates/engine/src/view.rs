//! Per-stock view over precomputed signals
//!
//! A `StockView` owns the signal records for one whole series, computed once
//! when the series is loaded. Lookups and chart slicing never recompute.

use chrono::{Days, NaiveDate};
use datastore::PriceSeries;
use serde::Serialize;

use crate::error::{EngineError, EngineResult};
use crate::signals::compute_signals;
use crate::types::{SignalParams, SignalRecord, TimePeriod};

#[derive(Debug, Clone, Serialize)]
pub struct StockView {
    symbol: String,
    records: Vec<SignalRecord>,
}

impl StockView {
    pub fn build(series: &PriceSeries, params: &SignalParams) -> EngineResult<Self> {
        Ok(Self {
            symbol: series.symbol().to_string(),
            records: compute_signals(series, params)?,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn records(&self) -> &[SignalRecord] {
        &self.records
    }

    /// The record for `date`, or `NotFound` if the stock did not trade that day
    pub fn summary(&self, date: NaiveDate) -> EngineResult<&SignalRecord> {
        self.records
            .binary_search_by_key(&date, |r| r.date)
            .map(|i| &self.records[i])
            .map_err(|_| EngineError::NotFound {
                symbol: self.symbol.clone(),
                date,
            })
    }

    /// Record for the most recent date
    pub fn latest(&self) -> Option<&SignalRecord> {
        self.records.last()
    }

    /// Records dated on or after `last date - N days` (All returns everything)
    pub fn chart_series(&self, period: TimePeriod) -> &[SignalRecord] {
        let (Some(days), Some(last)) = (period.lookback_days(), self.records.last()) else {
            return &self.records;
        };
        let Some(cutoff) = last.date.checked_sub_days(Days::new(days)) else {
            return &self.records;
        };
        let start = self.records.partition_point(|r| r.date < cutoff);
        &self.records[start..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Signal;
    use chrono::{Datelike, Weekday};
    use datastore::PricePoint;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    /// Weekday-only series: 2024-01-01 is a Monday
    fn trading_days(n: usize) -> Vec<NaiveDate> {
        let mut days = Vec::new();
        let mut d = date(1, 1);
        while days.len() < n {
            if !matches!(d.weekday(), Weekday::Sat | Weekday::Sun) {
                days.push(d);
            }
            d = d.succ_opt().unwrap();
        }
        days
    }

    fn view(n: usize) -> StockView {
        let points = trading_days(n)
            .into_iter()
            .enumerate()
            .map(|(i, date)| PricePoint {
                date,
                close: 100.0 + (i % 5) as f64,
            })
            .collect();
        let series = PriceSeries::new("DLF", points).unwrap();
        StockView::build(&series, &SignalParams::default()).unwrap()
    }

    #[test]
    fn test_summary_found() {
        let v = view(20);
        let record = v.summary(date(1, 16)).unwrap();
        assert_eq!(record.date, date(1, 16));
        assert_eq!(record.signal, Signal::Hold);
    }

    #[test]
    fn test_summary_not_found_on_weekend() {
        let v = view(20);
        let err = v.summary(date(1, 6)).unwrap_err();
        assert_eq!(
            err,
            EngineError::NotFound {
                symbol: "DLF".to_string(),
                date: date(1, 6),
            }
        );
    }

    #[test]
    fn test_chart_series_all() {
        let v = view(30);
        assert_eq!(v.chart_series(TimePeriod::All).len(), 30);
    }

    #[test]
    fn test_chart_series_trailing_windows() {
        // 30 weekdays from Jan 1 end on Friday Feb 9
        let v = view(30);
        assert_eq!(v.latest().map(|r| r.date), Some(date(2, 9)));

        // cutoff Feb 2 inclusive: Feb 2, 5, 6, 7, 8, 9
        let week = v.chart_series(TimePeriod::Last7Days);
        assert_eq!(week.first().map(|r| r.date), Some(date(2, 2)));
        assert_eq!(week.len(), 6);

        // cutoff Jan 26 inclusive: 11 weekdays
        let fortnight = v.chart_series(TimePeriod::Last14Days);
        assert_eq!(fortnight.first().map(|r| r.date), Some(date(1, 26)));
        assert_eq!(fortnight.len(), 11);
        assert_eq!(fortnight.last().map(|r| r.date), Some(date(2, 9)));
    }

    #[test]
    fn test_chart_series_shorter_than_period() {
        let v = view(3);
        assert_eq!(v.chart_series(TimePeriod::Last14Days).len(), 3);
    }
}
