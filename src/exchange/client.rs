//! REST client for a dYdX-v3-style perpetuals API

use super::wire::{self, WireOrderRequest};
use super::{
    Candle, CandleQuery, Exchange, ExchangeError, MarketInfo, OrderRequest, PlacedOrder, Position,
    PositionStatus,
};
use crate::config::ExchangeConfig;
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::{Client, Method, RequestBuilder};

/// Default API base URL
pub const DYDX_API_URL: &str = "https://api.dydx.exchange";

const API_KEY_HEADER: &str = "DYDX-API-KEY";
const PASSPHRASE_HEADER: &str = "DYDX-PASSPHRASE";
const API_KEY_ENV: &str = "DYDX_API_KEY";
const PASSPHRASE_ENV: &str = "DYDX_API_PASSPHRASE";

/// HTTP implementation of [`Exchange`]
///
/// Private endpoints carry the API key and passphrase headers; order
/// signing is performed by the gateway at `base_url`.
pub struct RestExchange {
    base_url: String,
    account_id: Option<String>,
    api_key: Option<String>,
    api_passphrase: Option<String>,
    client: Client,
}

impl RestExchange {
    /// Create a client from configuration, preferring credentials from the environment
    pub fn new(config: &ExchangeConfig) -> Result<Self, ExchangeError> {
        let client = Client::builder().timeout(config.timeout()).build()?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            account_id: config.account_id.clone(),
            api_key: std::env::var(API_KEY_ENV).ok().or(config.api_key.clone()),
            api_passphrase: std::env::var(PASSPHRASE_ENV)
                .ok()
                .or(config.api_passphrase.clone()),
            client,
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%method, url = %url, "Exchange request");
        self.client.request(method, url)
    }

    fn private(&self, method: Method, path: &str) -> RequestBuilder {
        let mut builder = self.request(method, path);
        if let Some(key) = &self.api_key {
            builder = builder.header(API_KEY_HEADER, key);
        }
        if let Some(passphrase) = &self.api_passphrase {
            builder = builder.header(PASSPHRASE_HEADER, passphrase);
        }
        builder
    }

    /// Send a request and return the body of a successful response
    async fn send(&self, endpoint: &str, builder: RequestBuilder) -> Result<String, ExchangeError> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ExchangeError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }
}

fn iso(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[async_trait]
impl Exchange for RestExchange {
    async fn get_markets(&self) -> Result<Vec<MarketInfo>, ExchangeError> {
        let body = self
            .send(wire::MARKETS, self.request(Method::GET, "/v3/markets"))
            .await?;
        wire::parse_markets(&body)
    }

    async fn get_server_time(&self) -> Result<DateTime<Utc>, ExchangeError> {
        let body = self
            .send(wire::TIME, self.request(Method::GET, "/v3/time"))
            .await?;
        wire::parse_server_time(&body)
    }

    async fn get_position_id(&self) -> Result<String, ExchangeError> {
        let account_id = self
            .account_id
            .as_deref()
            .ok_or_else(|| ExchangeError::schema(wire::ACCOUNT, "no account_id configured"))?;

        let path = format!("/v3/accounts/{account_id}");
        let body = self
            .send(wire::ACCOUNT, self.private(Method::GET, &path))
            .await?;
        wire::parse_position_id(&body)
    }

    async fn get_positions(&self, status: PositionStatus) -> Result<Vec<Position>, ExchangeError> {
        let builder = self
            .private(Method::GET, "/v3/positions")
            .query(&[("status", status.as_str())]);
        let body = self.send(wire::POSITIONS, builder).await?;
        wire::parse_positions(&body)
    }

    async fn cancel_all_orders(&self) -> Result<(), ExchangeError> {
        self.send(wire::ORDERS, self.private(Method::DELETE, "/v3/orders"))
            .await?;
        Ok(())
    }

    async fn get_candles(&self, query: &CandleQuery) -> Result<Vec<Candle>, ExchangeError> {
        let path = format!("/v3/candles/{}", query.market);
        let builder = self.request(Method::GET, &path).query(&[
            ("resolution", query.resolution.as_str().to_string()),
            ("fromISO", iso(&query.from)),
            ("toISO", iso(&query.to)),
            ("limit", query.limit.to_string()),
        ]);
        let body = self.send(wire::CANDLES, builder).await?;
        wire::parse_candles(&body)
    }

    async fn create_order(&self, order: &OrderRequest) -> Result<PlacedOrder, ExchangeError> {
        let builder = self
            .private(Method::POST, "/v3/orders")
            .json(&WireOrderRequest::from(order));

        let body = match self.send(wire::ORDERS, builder).await {
            Ok(body) => body,
            Err(ExchangeError::Status { status, body, .. }) => {
                return Err(ExchangeError::OrderRejected {
                    market: order.market.clone(),
                    reason: format!("HTTP {status}: {body}"),
                })
            }
            Err(e) => return Err(e),
        };

        wire::parse_placed_order(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn config(base_url: &str) -> ExchangeConfig {
        ExchangeConfig {
            base_url: base_url.to_string(),
            timeout_secs: 3,
            account_id: None,
            api_key: Some("key".to_string()),
            api_passphrase: None,
        }
    }

    #[test]
    fn test_rest_exchange_trims_base_url() {
        let client = RestExchange::new(&config("https://api.example.com/")).unwrap();
        assert_eq!(client.base_url, "https://api.example.com");
    }

    #[test]
    fn test_iso_format() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap();
        assert_eq!(iso(&ts), "2024-01-15T10:00:00.000Z");
    }

    #[tokio::test]
    async fn test_position_id_requires_account() {
        let client = RestExchange::new(&config(DYDX_API_URL)).unwrap();
        let result = client.get_position_id().await;
        assert!(matches!(result, Err(ExchangeError::Schema { .. })));
    }
}
