//! Flatten command implementation

use crate::config::Config;
use crate::exchange::Exchange;
use crate::pipeline::{self, PipelineError};
use clap::Args;

#[derive(Args, Debug)]
pub struct FlattenArgs {
    /// Confirm closing every open position
    #[arg(long)]
    pub confirm: bool,
}

impl FlattenArgs {
    pub async fn execute<E: Exchange + ?Sized>(
        &self,
        exchange: &E,
        config: &Config,
    ) -> Result<(), PipelineError> {
        if !self.confirm {
            return Err(PipelineError::new(
                "abort all positions",
                anyhow::anyhow!("refusing to close positions without --confirm"),
            ));
        }

        let placed = pipeline::flatten(exchange, config).await?;
        println!("Submitted {} close orders", placed.len());
        for order in &placed {
            println!(
                "  {} {} {} @ {} ({})",
                order.market,
                order.side.as_str(),
                order.size,
                order.price,
                order.id
            );
        }
        Ok(())
    }
}
