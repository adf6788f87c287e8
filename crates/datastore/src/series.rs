//! Price series types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One daily closing price
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SeriesError {
    #[error("series has no data rows")]
    Empty,

    #[error("dates are not strictly ascending at {0}")]
    NotAscending(NaiveDate),

    #[error("close {close} on {date} is not a finite positive price")]
    InvalidClose { date: NaiveDate, close: f64 },
}

/// Ordered daily closes for one stock.
///
/// Always holds at least one point, dates strictly ascending, closes finite
/// and positive. Missing trading days are simply absent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    symbol: String,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(symbol: impl Into<String>, points: Vec<PricePoint>) -> Result<Self, SeriesError> {
        if points.is_empty() {
            return Err(SeriesError::Empty);
        }
        for point in &points {
            if !point.close.is_finite() || point.close <= 0.0 {
                return Err(SeriesError::InvalidClose {
                    date: point.date,
                    close: point.close,
                });
            }
        }
        if let Some(pair) = points.windows(2).find(|w| w[1].date <= w[0].date) {
            return Err(SeriesError::NotAscending(pair[1].date));
        }

        Ok(Self {
            symbol: symbol.into(),
            points,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first_date(&self) -> NaiveDate {
        self.points[0].date
    }

    pub fn last_date(&self) -> NaiveDate {
        self.points[self.points.len() - 1].date
    }

    pub fn closes(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.close)
    }

    /// Point for an exact date, if that day was traded
    pub fn get(&self, date: NaiveDate) -> Option<&PricePoint> {
        self.points
            .binary_search_by_key(&date, |p| p.date)
            .ok()
            .map(|i| &self.points[i])
    }
}
