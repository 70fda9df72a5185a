//! Top-level operations
//!
//! Each operation runs under [`run_reported`], which logs the operation
//! name on entry and wraps any failure in a [`PipelineError`] carrying that
//! name. Stages hand their outputs to the next stage as plain values.

use crate::config::Config;
use crate::exchange::{Exchange, PlacedOrder};
use crate::flatten::PositionFlattener;
use crate::market_data::MarketDataAggregator;
use crate::screener::{screen_pairs, AcceptedPairStore, ScreenReport};
use chrono::{DateTime, Utc};
use std::future::Future;
use thiserror::Error;

/// Failure of a top-level operation
#[derive(Debug, Error)]
#[error("{operation} failed: {source:#}")]
pub struct PipelineError {
    pub operation: &'static str,
    #[source]
    pub source: anyhow::Error,
}

impl PipelineError {
    pub fn new(operation: &'static str, source: impl Into<anyhow::Error>) -> Self {
        Self {
            operation,
            source: source.into(),
        }
    }
}

/// Run `operation`, logging its start and any failure
pub async fn run_reported<T, F>(operation: &'static str, fut: F) -> Result<T, PipelineError>
where
    F: Future<Output = anyhow::Result<T>>,
{
    tracing::info!(operation, "Running {operation}...");
    match fut.await {
        Ok(value) => {
            tracing::info!(operation, "Finished {operation}");
            Ok(value)
        }
        Err(e) => {
            tracing::error!(operation, error = %format!("{e:#}"), "Error running {operation}");
            Err(PipelineError::new(operation, e))
        }
    }
}

/// Fetch prices, screen every pair and persist the accepted ones
pub async fn screen<E: Exchange + ?Sized>(
    exchange: &E,
    config: &Config,
    now: DateTime<Utc>,
) -> Result<ScreenReport, PipelineError> {
    run_reported("find cointegrated pairs", async {
        let matrix = MarketDataAggregator::new(exchange, &config.market_data)
            .build_price_matrix(now)
            .await?;

        let width = matrix.width();
        let accepted = screen_pairs(&matrix, config.screening.max_half_life);

        let store = AcceptedPairStore::new(&config.screening.output_path);
        store.save(&accepted).await?;

        let report = ScreenReport {
            instruments_screened: width,
            pairs_tested: width * width.saturating_sub(1) / 2,
            pairs_accepted: accepted.len(),
            output_path: store.path().to_path_buf(),
        };
        tracing::info!(
            instruments = report.instruments_screened,
            tested = report.pairs_tested,
            accepted = report.pairs_accepted,
            output = %report.output_path.display(),
            "Cointegrated pairs saved"
        );
        Ok::<_, anyhow::Error>(report)
    })
    .await
}

/// Cancel all orders and close every open position
pub async fn flatten<E: Exchange + ?Sized>(
    exchange: &E,
    config: &Config,
) -> Result<Vec<PlacedOrder>, PipelineError> {
    run_reported("abort all positions", async {
        let placed = PositionFlattener::new(exchange, &config.flatten)
            .abort_all_positions()
            .await?;
        Ok::<_, anyhow::Error>(placed)
    })
    .await
}
