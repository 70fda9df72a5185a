//! Run command implementation

use crate::config::Config;
use crate::exchange::Exchange;
use crate::pipeline::{self, PipelineError};
use chrono::Utc;
use clap::Args;

#[derive(Args, Debug)]
pub struct RunArgs {}

impl RunArgs {
    /// Flatten first when enabled, then screen when enabled
    pub async fn execute<E: Exchange + ?Sized>(
        &self,
        exchange: &E,
        config: &Config,
    ) -> Result<(), PipelineError> {
        if config.pipeline.abort_all_positions {
            pipeline::flatten(exchange, config).await?;
        }

        if config.pipeline.find_cointegrated {
            pipeline::screen(exchange, config, Utc::now()).await?;
        }

        Ok(())
    }
}
