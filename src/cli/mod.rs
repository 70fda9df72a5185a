//! CLI interface for perp-statarb
//!
//! Provides subcommands for:
//! - `run`: Run the pipelines enabled in configuration
//! - `screen`: Find cointegrated pairs
//! - `flatten`: Cancel all orders and close every position
//! - `status`: Show persisted state
//! - `config`: Show effective configuration

mod flatten;
mod run;
mod screen;
mod status;

pub use flatten::FlattenArgs;
pub use run::RunArgs;
pub use screen::ScreenArgs;
pub use status::show_status;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "perp-statarb")]
#[command(about = "Cointegration pair screener and position flattener for perpetual futures")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the pipelines enabled in configuration
    Run(RunArgs),
    /// Screen all instrument pairs for cointegration
    Screen(ScreenArgs),
    /// Cancel all orders and close every open position
    Flatten(FlattenArgs),
    /// Show accepted pairs and pending-order state
    Status,
    /// Show effective configuration
    Config,
}
