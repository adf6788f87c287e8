//! Moving-average band signals
//!
//! Closes are fed bar-by-bar through a rolling window. Once the window is
//! full, the moving average and the *sample* standard deviation (divide by
//! window - 1) are both taken from the buffered closes, so a flat window always
//! collapses the bands onto the mean however long the history before it. Classification uses strict comparisons: above the upper
//! band is Sell, below the lower band is Buy, anything else (including a close
//! sitting exactly on a band) is Hold.

use std::collections::VecDeque;

use datastore::PriceSeries;
use tracing::debug;

use crate::error::EngineResult;
use crate::types::{Signal, SignalParams, SignalRecord};

/// Band values for one full window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bands {
    pub average: f64,
    pub upper: f64,
    pub lower: f64,
    pub std_dev: f64,
}

impl Bands {
    pub fn classify(&self, close: f64) -> Signal {
        if close > self.upper {
            Signal::Sell
        } else if close < self.lower {
            Signal::Buy
        } else {
            Signal::Hold
        }
    }

    /// Distance from the average in standard deviations
    pub fn deviation(&self, close: f64) -> Option<f64> {
        (self.std_dev > 0.0).then(|| (close - self.average) / self.std_dev)
    }
}

/// Bar-by-bar band calculator over a fixed trailing window
pub struct RollingBands {
    closes: VecDeque<f64>,
    window: usize,
    k: f64,
}

impl RollingBands {
    pub fn new(params: &SignalParams) -> EngineResult<Self> {
        params.validate()?;
        Ok(Self {
            closes: VecDeque::with_capacity(params.window),
            window: params.window,
            k: params.k,
        })
    }

    /// Push the next close; `None` until `window` closes have been seen
    pub fn next(&mut self, close: f64) -> Option<Bands> {
        self.closes.push_back(close);
        if self.closes.len() > self.window {
            self.closes.pop_front();
        }
        if self.closes.len() < self.window {
            return None;
        }

        // Recomputed from the buffer each bar; a running sum drifts
        let average = self.closes.iter().sum::<f64>() / self.window as f64;
        let variance = self
            .closes
            .iter()
            .map(|c| (c - average).powi(2))
            .sum::<f64>()
            / (self.window - 1) as f64;
        let std_dev = variance.sqrt();

        Some(Bands {
            average,
            upper: average + self.k * std_dev,
            lower: average - self.k * std_dev,
            std_dev,
        })
    }
}

/// Classify every day of `series`. Days before the window fills are Unknown.
pub fn compute_signals(
    series: &PriceSeries,
    params: &SignalParams,
) -> EngineResult<Vec<SignalRecord>> {
    let mut bands = RollingBands::new(params)?;

    let records: Vec<SignalRecord> = series
        .points()
        .iter()
        .map(|point| match bands.next(point.close) {
            Some(b) => SignalRecord {
                date: point.date,
                close: point.close,
                moving_average: Some(b.average),
                upper_band: Some(b.upper),
                lower_band: Some(b.lower),
                deviation: b.deviation(point.close),
                signal: b.classify(point.close),
            },
            None => SignalRecord::unknown(point.date, point.close),
        })
        .collect();

    debug!(
        symbol = series.symbol(),
        days = records.len(),
        window = params.window,
        k = params.k,
        "Computed band signals"
    );

    Ok(records)
}
