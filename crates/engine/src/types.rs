//! Types shared by the signal engine and the dashboard adapter

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Trading recommendation for one day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Signal {
    Buy,
    Sell,
    Hold,
    /// Not enough history yet to fill the window
    Unknown,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Signal::Buy => "BUY",
            Signal::Sell => "SELL",
            Signal::Hold => "HOLD",
            Signal::Unknown => "UNKNOWN",
        };
        f.write_str(label)
    }
}

/// One day of a stock with its band values and classification.
///
/// Band fields are `None` until the window is full. `deviation` is the number
/// of standard deviations the close sits from the moving average, `None` when
/// the window's standard deviation is zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalRecord {
    pub date: NaiveDate,
    pub close: f64,
    pub moving_average: Option<f64>,
    pub upper_band: Option<f64>,
    pub lower_band: Option<f64>,
    pub deviation: Option<f64>,
    pub signal: Signal,
}

impl SignalRecord {
    pub fn unknown(date: NaiveDate, close: f64) -> Self {
        Self {
            date,
            close,
            moving_average: None,
            upper_band: None,
            lower_band: None,
            deviation: None,
            signal: Signal::Unknown,
        }
    }
}

/// Band strategy parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalParams {
    /// Number of closes in the rolling window (default: 10)
    pub window: usize,
    /// Band width in standard deviations (default: 1.0)
    pub k: f64,
}

impl Default for SignalParams {
    fn default() -> Self {
        Self { window: 10, k: 1.0 }
    }
}

impl SignalParams {
    pub fn new(window: usize, k: f64) -> EngineResult<Self> {
        let params = Self { window, k };
        params.validate()?;
        Ok(params)
    }

    /// The sample deviation needs at least two closes; k must be a usable width.
    pub fn validate(&self) -> EngineResult<()> {
        if self.window < 2 {
            return Err(EngineError::InvalidParameters(format!(
                "window must be at least 2, got {}",
                self.window
            )));
        }
        if !self.k.is_finite() || self.k < 0.0 {
            return Err(EngineError::InvalidParameters(format!(
                "k must be a finite non-negative number, got {}",
                self.k
            )));
        }
        Ok(())
    }
}

/// Trailing chart range, measured back from a series' last date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimePeriod {
    #[default]
    All,
    Last7Days,
    Last14Days,
}

impl TimePeriod {
    pub fn lookback_days(&self) -> Option<u64> {
        match self {
            TimePeriod::All => None,
            TimePeriod::Last7Days => Some(7),
            TimePeriod::Last14Days => Some(14),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimePeriod::All => "All Data",
            TimePeriod::Last7Days => "Last 7 Days",
            TimePeriod::Last14Days => "Last 14 Days",
        }
    }
}

impl fmt::Display for TimePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TimePeriod {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "all" | "all_data" => Ok(TimePeriod::All),
            "7d" | "7" | "last7_days" | "last_7_days" | "last7days" => Ok(TimePeriod::Last7Days),
            "14d" | "14" | "last14_days" | "last_14_days" | "last14days" => Ok(TimePeriod::Last14Days),
            other => Err(EngineError::InvalidPeriod(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params_are_valid() {
        let params = SignalParams::default();
        assert_eq!(params.window, 10);
        assert_eq!(params.k, 1.0);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_invalid_params() {
        assert!(SignalParams::new(1, 1.0).is_err());
        assert!(SignalParams::new(0, 1.0).is_err());
        assert!(SignalParams::new(10, -0.5).is_err());
        assert!(SignalParams::new(10, f64::NAN).is_err());
        assert!(SignalParams::new(2, 0.0).is_ok());
    }

    #[test]
    fn test_period_parsing() {
        assert_eq!("all".parse::<TimePeriod>().unwrap(), TimePeriod::All);
        assert_eq!("7d".parse::<TimePeriod>().unwrap(), TimePeriod::Last7Days);
        assert_eq!(
            "Last_14_Days".parse::<TimePeriod>().unwrap(),
            TimePeriod::Last14Days
        );
        assert!(matches!(
            "30d".parse::<TimePeriod>(),
            Err(EngineError::InvalidPeriod(_))
        ));
    }

    #[test]
    fn test_signal_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Signal::Buy).unwrap(), "\"buy\"");
        assert_eq!(Signal::Sell.to_string(), "SELL");
    }
}
