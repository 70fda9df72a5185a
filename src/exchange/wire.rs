//! Wire payloads and their validation into domain types
//!
//! Every response body is parsed here before it reaches numeric code.
//! Numeric fields arrive as strings and must parse to finite values.

use super::{
    Candle, ContractType, ExchangeError, MarketInfo, MarketStatus, OrderRequest, OrderSide,
    PlacedOrder, Position, PositionSide,
};
use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub(crate) const MARKETS: &str = "markets";
pub(crate) const TIME: &str = "time";
pub(crate) const ACCOUNT: &str = "account";
pub(crate) const POSITIONS: &str = "positions";
pub(crate) const CANDLES: &str = "candles";
pub(crate) const ORDERS: &str = "orders";

/// Raw market entry from `GET /v3/markets`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireMarket {
    status: String,
    #[serde(rename = "type")]
    contract_type: String,
    tick_size: String,
}

#[derive(Debug, Deserialize)]
struct WireTime {
    iso: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireAccount {
    position_id: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct WireAccountResponse {
    account: WireAccount,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WirePosition {
    market: String,
    side: String,
    sum_open: String,
    entry_price: String,
}

#[derive(Debug, Deserialize)]
struct WirePositionsResponse {
    positions: Vec<WirePosition>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireCandle {
    started_at: String,
    close: String,
}

#[derive(Debug, Deserialize)]
struct WireCandlesResponse {
    candles: Vec<WireCandle>,
}

#[derive(Debug, Deserialize)]
struct WirePlacedOrder {
    id: String,
    market: String,
    side: String,
    size: String,
    price: String,
    status: String,
}

#[derive(Debug, Deserialize)]
struct WireOrderResponse {
    order: WirePlacedOrder,
}

/// Request body for `POST /v3/orders`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireOrderRequest {
    market: String,
    side: &'static str,
    #[serde(rename = "type")]
    order_type: super::OrderType,
    post_only: bool,
    size: String,
    price: String,
    limit_fee: String,
    expiration: String,
    time_in_force: super::TimeInForce,
    reduce_only: bool,
    client_id: String,
    position_id: String,
}

impl From<&OrderRequest> for WireOrderRequest {
    fn from(order: &OrderRequest) -> Self {
        Self {
            market: order.market.clone(),
            side: order.side.as_str(),
            order_type: order.order_type,
            post_only: order.post_only,
            size: order.size.to_string(),
            price: order.price.to_string(),
            limit_fee: order.limit_fee.to_string(),
            expiration: order
                .expiration
                .to_rfc3339_opts(SecondsFormat::Millis, true),
            time_in_force: order.time_in_force,
            reduce_only: order.reduce_only,
            client_id: order.client_id.to_string(),
            position_id: order.position_id.clone(),
        }
    }
}

fn decode<'a, T: Deserialize<'a>>(endpoint: &str, body: &'a str) -> Result<T, ExchangeError> {
    serde_json::from_str(body).map_err(|e| ExchangeError::schema(endpoint, e.to_string()))
}

fn parse_decimal(endpoint: &str, field: &str, raw: &str) -> Result<Decimal, ExchangeError> {
    Decimal::from_str(raw)
        .map_err(|e| ExchangeError::schema(endpoint, format!("{field} {raw:?}: {e}")))
}

fn parse_positive_decimal(
    endpoint: &str,
    field: &str,
    raw: &str,
) -> Result<Decimal, ExchangeError> {
    let value = parse_decimal(endpoint, field, raw)?;
    if value <= Decimal::ZERO {
        return Err(ExchangeError::schema(
            endpoint,
            format!("{field} must be positive, got {value}"),
        ));
    }
    Ok(value)
}

fn parse_finite(endpoint: &str, field: &str, raw: &str) -> Result<f64, ExchangeError> {
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(ExchangeError::schema(
            endpoint,
            format!("{field} {raw:?} is not a finite number"),
        )),
    }
}

fn parse_timestamp(endpoint: &str, field: &str, raw: &str) -> Result<DateTime<Utc>, ExchangeError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| ExchangeError::schema(endpoint, format!("{field} {raw:?}: {e}")))
}

fn parse_market_status(raw: &str) -> Result<MarketStatus, ExchangeError> {
    match raw {
        "ONLINE" => Ok(MarketStatus::Online),
        "OFFLINE" => Ok(MarketStatus::Offline),
        "POST_ONLY" => Ok(MarketStatus::PostOnly),
        "CANCEL_ONLY" => Ok(MarketStatus::CancelOnly),
        "INITIALIZING" => Ok(MarketStatus::Initializing),
        other => Err(ExchangeError::schema(
            MARKETS,
            format!("unknown market status {other:?}"),
        )),
    }
}

fn parse_order_side(endpoint: &str, raw: &str) -> Result<OrderSide, ExchangeError> {
    match raw {
        "BUY" => Ok(OrderSide::Buy),
        "SELL" => Ok(OrderSide::Sell),
        other => Err(ExchangeError::schema(
            endpoint,
            format!("unknown order side {other:?}"),
        )),
    }
}

/// Parse the market table, preserving the exchange's listing order
pub(crate) fn parse_markets(body: &str) -> Result<Vec<MarketInfo>, ExchangeError> {
    #[derive(Deserialize)]
    struct WireMarketsResponse {
        markets: serde_json::Map<String, serde_json::Value>,
    }

    let response: WireMarketsResponse = decode(MARKETS, body)?;

    response
        .markets
        .into_iter()
        .map(|(id, value)| {
            let raw: WireMarket = serde_json::from_value(value)
                .map_err(|e| ExchangeError::schema(MARKETS, format!("{id}: {e}")))?;

            let contract_type = match raw.contract_type.as_str() {
                "PERPETUAL" => ContractType::Perpetual,
                other => ContractType::Other(other.to_string()),
            };

            Ok(MarketInfo {
                tick_size: parse_positive_decimal(MARKETS, "tickSize", &raw.tick_size)?,
                status: parse_market_status(&raw.status)?,
                contract_type,
                market: id,
            })
        })
        .collect()
}

pub(crate) fn parse_server_time(body: &str) -> Result<DateTime<Utc>, ExchangeError> {
    let time: WireTime = decode(TIME, body)?;
    parse_timestamp(TIME, "iso", &time.iso)
}

pub(crate) fn parse_position_id(body: &str) -> Result<String, ExchangeError> {
    let response: WireAccountResponse = decode(ACCOUNT, body)?;
    match response.account.position_id {
        serde_json::Value::String(id) if !id.is_empty() => Ok(id),
        serde_json::Value::Number(id) => Ok(id.to_string()),
        other => Err(ExchangeError::schema(
            ACCOUNT,
            format!("invalid positionId {other}"),
        )),
    }
}

pub(crate) fn parse_positions(body: &str) -> Result<Vec<Position>, ExchangeError> {
    let response: WirePositionsResponse = decode(POSITIONS, body)?;

    response
        .positions
        .into_iter()
        .map(|raw| {
            let side = match raw.side.as_str() {
                "LONG" => PositionSide::Long,
                "SHORT" => PositionSide::Short,
                other => {
                    return Err(ExchangeError::schema(
                        POSITIONS,
                        format!("unknown position side {other:?}"),
                    ))
                }
            };

            Ok(Position {
                size: parse_positive_decimal(POSITIONS, "sumOpen", &raw.sum_open)?,
                entry_price: parse_positive_decimal(POSITIONS, "entryPrice", &raw.entry_price)?,
                market: raw.market,
                side,
            })
        })
        .collect()
}

pub(crate) fn parse_candles(body: &str) -> Result<Vec<Candle>, ExchangeError> {
    let response: WireCandlesResponse = decode(CANDLES, body)?;

    response
        .candles
        .into_iter()
        .map(|raw| {
            Ok(Candle {
                started_at: parse_timestamp(CANDLES, "startedAt", &raw.started_at)?,
                close: parse_finite(CANDLES, "close", &raw.close)?,
            })
        })
        .collect()
}

pub(crate) fn parse_placed_order(body: &str) -> Result<PlacedOrder, ExchangeError> {
    let response: WireOrderResponse = decode(ORDERS, body)?;
    let raw = response.order;

    Ok(PlacedOrder {
        side: parse_order_side(ORDERS, &raw.side)?,
        size: parse_decimal(ORDERS, "size", &raw.size)?,
        price: parse_decimal(ORDERS, "price", &raw.price)?,
        id: raw.id,
        market: raw.market,
        status: raw.status,
    })
}
