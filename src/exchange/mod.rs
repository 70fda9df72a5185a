//! Exchange collaborator module
//!
//! Market, account, position, candle, and order endpoints of a perpetuals
//! exchange behind one trait, with a REST implementation and an in-memory
//! paper implementation.

mod client;
mod error;
mod paper;
mod types;
mod wire;

pub use client::{RestExchange, DYDX_API_URL};
pub use error::ExchangeError;
pub use paper::{ExchangeCall, PaperExchange};
pub use types::{
    Candle, CandleQuery, ContractType, MarketInfo, MarketStatus, OrderRequest, OrderSide,
    OrderType, PlacedOrder, Position, PositionSide, PositionStatus, TimeInForce,
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Trait for exchange implementations
///
/// Calls are issued strictly one at a time; implementations need not
/// support overlapping requests.
#[async_trait]
pub trait Exchange: Send + Sync {
    /// All markets with status, contract type and tick size
    async fn get_markets(&self) -> Result<Vec<MarketInfo>, ExchangeError>;
    /// Exchange server time
    async fn get_server_time(&self) -> Result<DateTime<Utc>, ExchangeError>;
    /// Position id of the trading account
    async fn get_position_id(&self) -> Result<String, ExchangeError>;
    /// Positions filtered by status
    async fn get_positions(&self, status: PositionStatus) -> Result<Vec<Position>, ExchangeError>;
    /// Cancel every resting order on the account
    async fn cancel_all_orders(&self) -> Result<(), ExchangeError>;
    /// Historical candles for one market and window
    async fn get_candles(&self, query: &CandleQuery) -> Result<Vec<Candle>, ExchangeError>;
    /// Submit an order
    async fn create_order(&self, order: &OrderRequest) -> Result<PlacedOrder, ExchangeError>;
}
