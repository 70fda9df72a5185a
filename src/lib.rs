//! perp-statarb: Statistical-arbitrage screening for perpetual futures
//!
//! This library provides the core components for:
//! - Exchange access over REST, plus an in-memory paper exchange
//! - Historical close-price collection into an aligned price matrix
//! - Engle-Granger cointegration, hedge ratio and half-life estimation
//! - Pair screening with persisted results
//! - Flattening every open position on demand

pub mod cli;
pub mod cointegration;
pub mod config;
pub mod exchange;
pub mod flatten;
pub mod market_data;
pub mod pipeline;
pub mod screener;
pub mod telemetry;
