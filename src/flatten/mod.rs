//! Position flattener
//!
//! Cancels every resting order, then closes each open position with a
//! reduce-only fill-or-kill order priced far through the book. Orders are
//! submitted one at a time and the first failure aborts the pass; orders
//! already accepted stay live and the pending-order state is left intact.

mod pending_state;
mod pricing;

pub use pending_state::PendingOrderStore;
pub use pricing::{aggressive_price, close_price, closing_side, round_to_tick};

use crate::config::FlattenConfig;
use crate::exchange::{
    Exchange, ExchangeError, OrderRequest, OrderType, PlacedOrder, Position, PositionStatus,
    TimeInForce,
};
use chrono::Duration as ChronoDuration;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

/// Errors that stop a flattening pass
#[derive(Debug, Error)]
pub enum FlattenError {
    #[error(transparent)]
    Exchange(#[from] ExchangeError),
    #[error("No tick size known for market {0}")]
    UnknownMarket(String),
    #[error("Failed to reset pending-order state: {0}")]
    PendingState(#[source] std::io::Error),
}

/// Closes all open positions on the account
pub struct PositionFlattener<'a, E: Exchange + ?Sized> {
    exchange: &'a E,
    config: &'a FlattenConfig,
}

impl<'a, E: Exchange + ?Sized> PositionFlattener<'a, E> {
    pub fn new(exchange: &'a E, config: &'a FlattenConfig) -> Self {
        Self { exchange, config }
    }

    async fn pause(millis: u64) {
        if millis > 0 {
            tokio::time::sleep(Duration::from_millis(millis)).await;
        }
    }

    /// Cancel all orders and close every open position
    ///
    /// Returns the placed close orders in position order. With no open
    /// positions nothing is submitted and the pending-order state is not
    /// touched.
    pub async fn abort_all_positions(&self) -> Result<Vec<PlacedOrder>, FlattenError> {
        self.exchange.cancel_all_orders().await?;
        info!("Cancelled all resting orders");
        Self::pause(self.config.api_delay_ms).await;

        let ticks: HashMap<String, Decimal> = self
            .exchange
            .get_markets()
            .await?
            .into_iter()
            .map(|m| (m.market, m.tick_size))
            .collect();
        Self::pause(self.config.api_delay_ms).await;

        let positions = self.exchange.get_positions(PositionStatus::Open).await?;
        if positions.is_empty() {
            info!("No open positions to close");
            return Ok(Vec::new());
        }
        info!(count = positions.len(), "Closing open positions");

        let mut placed = Vec::with_capacity(positions.len());
        for position in &positions {
            let tick_size = ticks
                .get(&position.market)
                .copied()
                .ok_or_else(|| FlattenError::UnknownMarket(position.market.clone()))?;

            let order = self.close_order(position, tick_size).await?;
            let result = match self.exchange.create_order(&order).await {
                Ok(result) => result,
                Err(e) => {
                    warn!(
                        market = %position.market,
                        closed = placed.len(),
                        remaining = positions.len() - placed.len(),
                        error = %e,
                        "Close order failed, stopping"
                    );
                    return Err(e.into());
                }
            };

            info!(
                market = %result.market,
                side = result.side.as_str(),
                size = %result.size,
                price = %result.price,
                order_id = %result.id,
                "Submitted close order"
            );
            placed.push(result);
            Self::pause(self.config.order_delay_ms).await;
        }

        PendingOrderStore::new(&self.config.pending_state_path)
            .clear()
            .await
            .map_err(FlattenError::PendingState)?;
        info!(closed = placed.len(), "All positions closed, pending-order state reset");

        Ok(placed)
    }

    /// Build the reduce-only order closing `position`
    async fn close_order(
        &self,
        position: &Position,
        tick_size: Decimal,
    ) -> Result<OrderRequest, ExchangeError> {
        let position_id = self.exchange.get_position_id().await?;
        let server_time = self.exchange.get_server_time().await?;

        let side = closing_side(position.side);
        let price = close_price(
            position.entry_price,
            side,
            self.config.buy_price_multiplier,
            self.config.sell_price_multiplier,
            tick_size,
        );

        Ok(OrderRequest {
            client_id: Uuid::new_v4(),
            position_id,
            market: position.market.clone(),
            side,
            order_type: OrderType::Market,
            size: position.size,
            price,
            limit_fee: self.config.limit_fee,
            expiration: server_time + ChronoDuration::seconds(self.config.expiration_offset_secs),
            time_in_force: TimeInForce::FillOrKill,
            post_only: false,
            reduce_only: true,
        })
    }
}
