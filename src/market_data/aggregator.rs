//! Historical price aggregation across all tradeable instruments

use super::{lookback_windows, InstrumentSeries, PriceMatrix, TimeWindow};
use crate::config::MarketDataConfig;
use crate::exchange::{CandleQuery, Exchange, ExchangeError};
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Fetches close prices and assembles them into a [`PriceMatrix`]
pub struct MarketDataAggregator<'a, E: Exchange + ?Sized> {
    exchange: &'a E,
    config: &'a MarketDataConfig,
}

impl<'a, E: Exchange + ?Sized> MarketDataAggregator<'a, E> {
    pub fn new(exchange: &'a E, config: &'a MarketDataConfig) -> Self {
        Self { exchange, config }
    }

    /// Online perpetual markets, in exchange listing order
    ///
    /// In test mode the list is capped before any candle is requested.
    pub async fn tradeable_markets(&self) -> Result<Vec<String>, ExchangeError> {
        let markets = self.exchange.get_markets().await?;
        let cap = self.config.market_cap().unwrap_or(usize::MAX);

        let tradeable: Vec<String> = markets
            .into_iter()
            .filter(|m| m.is_tradeable())
            .map(|m| m.market)
            .take(cap)
            .collect();

        tracing::info!(
            tradeable = tradeable.len(),
            test_mode = self.config.test_mode,
            "Resolved tradeable markets"
        );

        Ok(tradeable)
    }

    /// Fetch one instrument's closes across every window
    pub async fn fetch_closes(
        &self,
        market: &str,
        windows: &[TimeWindow],
    ) -> Result<InstrumentSeries, ExchangeError> {
        let mut closes = Vec::new();

        for window in windows {
            let query = CandleQuery {
                market: market.to_string(),
                resolution: self.config.resolution,
                from: window.from,
                to: window.to,
                limit: self.config.candle_limit,
            };

            let candles = self.exchange.get_candles(&query).await?;
            closes.extend(candles.into_iter().map(|c| (c.started_at, c.close)));

            if self.config.request_delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.config.request_delay_ms)).await;
            }
        }

        closes.sort_by_key(|(ts, _)| *ts);

        tracing::debug!(market = %market, candles = closes.len(), "Fetched close prices");

        Ok(InstrumentSeries {
            market: market.to_string(),
            closes,
        })
    }

    /// Build a fresh price matrix for the lookback ending at `now`
    ///
    /// Any failed query aborts the whole build.
    pub async fn build_price_matrix(&self, now: DateTime<Utc>) -> Result<PriceMatrix, ExchangeError> {
        let markets = self.tradeable_markets().await?;
        let windows = lookback_windows(
            now,
            self.config.resolution,
            self.config.candle_limit,
            self.config.window_count,
        );

        let mut series = Vec::with_capacity(markets.len());
        for market in &markets {
            series.push(self.fetch_closes(market, &windows).await?);
        }

        let matrix = PriceMatrix::align(series);

        tracing::info!(
            requested = markets.len(),
            retained = matrix.width(),
            rows = matrix.len(),
            "Price matrix assembled"
        );

        Ok(matrix)
    }
}
