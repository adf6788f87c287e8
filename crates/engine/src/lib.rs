//! Signal Board engine: moving-average band signals and the dashboard views
//!
//! Provides:
//! - `compute_signals`: rolling mean ± k·σ band classification (Buy/Sell/Hold)
//! - `StockView`: per-stock summaries and chart slices over precomputed signals
//! - `Dashboard`: the cross-stock signal board for a selected date

pub mod dashboard;
pub mod error;
pub mod signals;
pub mod types;
pub mod view;

// Re-exports for convenience
pub use dashboard::{BoardEntry, Dashboard, SignalBoard, SignalCounts};
pub use datastore::{LoadFailure, PricePoint, PriceSeries};
pub use error::{EngineError, EngineResult};
pub use signals::{compute_signals, Bands, RollingBands};
pub use types::*;
pub use view::StockView;
