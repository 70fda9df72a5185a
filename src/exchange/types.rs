//! Exchange domain types

use crate::market_data::Resolution;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Trading status of a market
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarketStatus {
    Online,
    Offline,
    PostOnly,
    CancelOnly,
    Initializing,
}

/// Contract type of a market
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContractType {
    /// Perpetual future
    Perpetual,
    /// Any other listing, kept verbatim
    Other(String),
}

/// A market listing with its tick size
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketInfo {
    /// Market identifier (e.g., "BTC-USD")
    pub market: String,
    pub status: MarketStatus,
    pub contract_type: ContractType,
    /// Minimum price increment
    pub tick_size: Decimal,
}

impl MarketInfo {
    /// Only online perpetual markets are screening candidates
    pub fn is_tradeable(&self) -> bool {
        self.status == MarketStatus::Online && self.contract_type == ContractType::Perpetual
    }
}

/// A single close price for one resolution bucket
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Bucket start time
    pub started_at: DateTime<Utc>,
    /// Close price
    pub close: f64,
}

/// Historical candle request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandleQuery {
    pub market: String,
    pub resolution: Resolution,
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    /// Maximum candles returned
    pub limit: u32,
}

/// Direction of an open position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PositionSide {
    Long,
    Short,
}

/// Position status filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PositionStatus {
    Open,
    Closed,
    Liquidated,
}

impl PositionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PositionStatus::Open => "OPEN",
            PositionStatus::Closed => "CLOSED",
            PositionStatus::Liquidated => "LIQUIDATED",
        }
    }
}

/// An open position as reported by the exchange
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub market: String,
    pub side: PositionSide,
    /// Total opened size
    pub size: Decimal,
    /// Average entry price
    pub entry_price: Decimal,
}

/// Order side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderSide::Buy => "BUY",
            OrderSide::Sell => "SELL",
        }
    }
}

/// Order type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderType {
    /// Market order (immediate execution)
    Market,
    /// Limit order (price specified)
    Limit,
}

/// Time in force
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeInForce {
    /// Good til time
    #[serde(rename = "GTT")]
    GoodTilTime,
    /// Fill or kill
    #[serde(rename = "FOK")]
    FillOrKill,
    /// Immediate or cancel
    #[serde(rename = "IOC")]
    ImmediateOrCancel,
}

/// An order to be submitted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    /// Client-side order identifier
    pub client_id: Uuid,
    /// Account position id the order is signed for
    pub position_id: String,
    pub market: String,
    pub side: OrderSide,
    pub order_type: OrderType,
    pub size: Decimal,
    /// Worst acceptable price
    pub price: Decimal,
    /// Maximum fee rate
    pub limit_fee: Decimal,
    pub expiration: DateTime<Utc>,
    pub time_in_force: TimeInForce,
    pub post_only: bool,
    pub reduce_only: bool,
}

/// Exchange acknowledgement of a submitted order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedOrder {
    /// Exchange order identifier
    pub id: String,
    pub market: String,
    pub side: OrderSide,
    pub size: Decimal,
    pub price: Decimal,
    /// Exchange status string (e.g., "PENDING")
    pub status: String,
}
