//! In-memory exchange for dry runs and tests

use super::{
    Candle, CandleQuery, Exchange, ExchangeError, MarketInfo, OrderRequest, PlacedOrder, Position,
    PositionStatus,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

/// A call made against the paper exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExchangeCall {
    GetMarkets,
    GetServerTime,
    GetPositionId,
    GetPositions(PositionStatus),
    CancelAllOrders,
    GetCandles(String),
    CreateOrder(String),
}

/// Paper exchange with seeded state and a call journal
pub struct PaperExchange {
    markets: Vec<MarketInfo>,
    candles: HashMap<String, Vec<Candle>>,
    positions: Vec<Position>,
    server_time: DateTime<Utc>,
    position_id: String,
    failing_markets: HashSet<String>,
    reject_orders_after: Option<usize>,
    calls: Arc<RwLock<Vec<ExchangeCall>>>,
    orders: Arc<RwLock<Vec<OrderRequest>>>,
}

impl PaperExchange {
    /// Create an empty paper exchange with the given server time
    pub fn new(server_time: DateTime<Utc>) -> Self {
        Self {
            markets: vec![],
            candles: HashMap::new(),
            positions: vec![],
            server_time,
            position_id: "paper".to_string(),
            failing_markets: HashSet::new(),
            reject_orders_after: None,
            calls: Arc::new(RwLock::new(vec![])),
            orders: Arc::new(RwLock::new(vec![])),
        }
    }

    /// List a market
    pub fn with_market(mut self, market: MarketInfo) -> Self {
        self.markets.push(market);
        self
    }

    /// Seed candle history for a market
    pub fn with_candles(mut self, market: impl Into<String>, candles: Vec<Candle>) -> Self {
        self.candles.entry(market.into()).or_default().extend(candles);
        self
    }

    /// Add an open position
    pub fn with_position(mut self, position: Position) -> Self {
        self.positions.push(position);
        self
    }

    /// Make candle queries for a market fail
    pub fn with_failing_market(mut self, market: impl Into<String>) -> Self {
        self.failing_markets.insert(market.into());
        self
    }

    /// Accept this many orders, then reject every further one
    pub fn reject_orders_after(mut self, accepted: usize) -> Self {
        self.reject_orders_after = Some(accepted);
        self
    }

    /// All calls made so far, in order
    pub async fn calls(&self) -> Vec<ExchangeCall> {
        self.calls.read().await.clone()
    }

    /// All accepted orders, in submission order
    pub async fn orders(&self) -> Vec<OrderRequest> {
        self.orders.read().await.clone()
    }

    async fn record(&self, call: ExchangeCall) {
        self.calls.write().await.push(call);
    }
}

#[async_trait]
impl Exchange for PaperExchange {
    async fn get_markets(&self) -> Result<Vec<MarketInfo>, ExchangeError> {
        self.record(ExchangeCall::GetMarkets).await;
        Ok(self.markets.clone())
    }

    async fn get_server_time(&self) -> Result<DateTime<Utc>, ExchangeError> {
        self.record(ExchangeCall::GetServerTime).await;
        Ok(self.server_time)
    }

    async fn get_position_id(&self) -> Result<String, ExchangeError> {
        self.record(ExchangeCall::GetPositionId).await;
        Ok(self.position_id.clone())
    }

    async fn get_positions(&self, status: PositionStatus) -> Result<Vec<Position>, ExchangeError> {
        self.record(ExchangeCall::GetPositions(status)).await;
        match status {
            PositionStatus::Open => Ok(self.positions.clone()),
            _ => Ok(vec![]),
        }
    }

    async fn cancel_all_orders(&self) -> Result<(), ExchangeError> {
        self.record(ExchangeCall::CancelAllOrders).await;
        tracing::info!("Paper orders cancelled");
        Ok(())
    }

    async fn get_candles(&self, query: &CandleQuery) -> Result<Vec<Candle>, ExchangeError> {
        self.record(ExchangeCall::GetCandles(query.market.clone()))
            .await;

        if self.failing_markets.contains(&query.market) {
            return Err(ExchangeError::Status {
                endpoint: "candles".to_string(),
                status: 503,
                body: format!("{} unavailable", query.market),
            });
        }

        // Newest first, as the live API returns them
        let mut candles: Vec<Candle> = self
            .candles
            .get(&query.market)
            .map(|all| {
                all.iter()
                    .filter(|c| c.started_at >= query.from && c.started_at < query.to)
                    .copied()
                    .collect()
            })
            .unwrap_or_default();
        candles.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        candles.truncate(query.limit as usize);

        Ok(candles)
    }

    async fn create_order(&self, order: &OrderRequest) -> Result<PlacedOrder, ExchangeError> {
        self.record(ExchangeCall::CreateOrder(order.market.clone()))
            .await;

        let mut orders = self.orders.write().await;
        if let Some(limit) = self.reject_orders_after {
            if orders.len() >= limit {
                return Err(ExchangeError::OrderRejected {
                    market: order.market.clone(),
                    reason: "paper rejection".to_string(),
                });
            }
        }
        orders.push(order.clone());

        tracing::info!(market = %order.market, side = order.side.as_str(), "Paper order accepted");

        Ok(PlacedOrder {
            id: format!("paper-{}", orders.len()),
            market: order.market.clone(),
            side: order.side,
            size: order.size,
            price: order.price,
            status: "PENDING".to_string(),
        })
    }
}
