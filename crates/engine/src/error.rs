use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("no data for {symbol} on {date}")]
    NotFound { symbol: String, date: NaiveDate },

    #[error("unknown stock symbol: {0}")]
    UnknownSymbol(String),

    #[error("invalid signal parameters: {0}")]
    InvalidParameters(String),

    #[error("unknown time period: {0:?} (expected all, 7d or 14d)")]
    InvalidPeriod(String),
}

pub type EngineResult<T> = Result<T, EngineError>;
