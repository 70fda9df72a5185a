//! Exchange error types

use thiserror::Error;

/// Errors raised by exchange collaborators
#[derive(Debug, Error)]
pub enum ExchangeError {
    /// Transport-level failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Non-success HTTP status
    #[error("{endpoint} returned {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// Response did not match the expected schema
    #[error("Malformed {endpoint} response: {reason}")]
    Schema { endpoint: String, reason: String },
    /// Exchange declined an order
    #[error("Order on {market} rejected: {reason}")]
    OrderRejected { market: String, reason: String },
}

impl ExchangeError {
    pub fn schema(endpoint: impl Into<String>, reason: impl Into<String>) -> Self {
        ExchangeError::Schema {
            endpoint: endpoint.into(),
            reason: reason.into(),
        }
    }
}
