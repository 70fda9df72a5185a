//! Market data module
//!
//! Pulls historical close prices for every tradeable instrument and aligns
//! them into one timestamp-indexed matrix

mod aggregator;
mod matrix;
mod resolution;

pub use aggregator::MarketDataAggregator;
pub use matrix::{InstrumentSeries, PriceMatrix};
pub use resolution::{lookback_windows, Resolution, TimeWindow};
