//! Screen command implementation

use crate::config::Config;
use crate::exchange::Exchange;
use crate::pipeline::{self, PipelineError};
use chrono::Utc;
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ScreenArgs {
    /// Cap the instrument universe for a quick run
    #[arg(long)]
    pub test_mode: bool,

    /// Override the accepted-pairs output file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl ScreenArgs {
    /// Configuration with command-line overrides applied
    pub fn apply(&self, config: &Config) -> Config {
        let mut config = config.clone();
        if self.test_mode {
            config.market_data.test_mode = true;
        }
        if let Some(output) = &self.output {
            config.screening.output_path = output.clone();
        }
        config
    }

    pub async fn execute<E: Exchange + ?Sized>(
        &self,
        exchange: &E,
        config: &Config,
    ) -> Result<(), PipelineError> {
        let config = self.apply(config);
        let report = pipeline::screen(exchange, &config, Utc::now()).await?;

        println!(
            "Screened {} instruments ({} pairs): {} cointegrated, saved to {}",
            report.instruments_screened,
            report.pairs_tested,
            report.pairs_accepted,
            report.output_path.display()
        );
        Ok(())
    }
}
