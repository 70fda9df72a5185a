use clap::Parser;
use perp_statarb::cli::{show_status, Cli, Commands};
use perp_statarb::config::Config;
use perp_statarb::exchange::RestExchange;
use perp_statarb::pipeline::PipelineError;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Load configuration
    let config = match Config::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: Could not load config from {}: {}", cli.config, e);
            eprintln!("Using default configuration");
            match Config::example() {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Invalid default configuration: {e}");
                    return ExitCode::FAILURE;
                }
            }
        }
    };

    // Initialize telemetry
    if let Err(e) = perp_statarb::telemetry::init_telemetry(&config.telemetry) {
        eprintln!("Failed to initialize telemetry: {e}");
        return ExitCode::FAILURE;
    }

    match execute(cli.command, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(operation = e.operation, error = %format!("{:#}", e.source), "Exiting");
            ExitCode::FAILURE
        }
    }
}

async fn execute(command: Commands, config: &Config) -> Result<(), PipelineError> {
    match command {
        Commands::Run(args) => {
            let exchange = connect(config)?;
            args.execute(&exchange, config).await
        }
        Commands::Screen(args) => {
            let exchange = connect(config)?;
            args.execute(&exchange, config).await
        }
        Commands::Flatten(args) => {
            let exchange = connect(config)?;
            args.execute(&exchange, config).await
        }
        Commands::Status => show_status(config)
            .await
            .map_err(|e| PipelineError::new("status", e)),
        Commands::Config => {
            let rendered =
                toml::to_string_pretty(config).map_err(|e| PipelineError::new("config", e))?;
            println!("Current configuration:");
            println!("{rendered}");
            Ok(())
        }
    }
}

fn connect(config: &Config) -> Result<RestExchange, PipelineError> {
    RestExchange::new(&config.exchange).map_err(|e| PipelineError::new("connect", e))
}
