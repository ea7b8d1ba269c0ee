//! PortfolioHub CLI binary.
//!
//! - Inspect the credit package catalog
//! - Try the moderation gateway on a comment
//! - Run the economy scenario in memory
//! - Print the effective configuration

use clap::Parser;
use portfoliohub::{HubConfig, ObservabilityConfig, init_observability};

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, moderate_text, print_config, print_packages, simulate};

    // Load environment variables before configuration
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => HubConfig::from_file(path)?,
        None => HubConfig::load()?,
    };

    let mut observability = ObservabilityConfig::from(&config.logging);
    if cli.verbose {
        observability = observability.with_log_level("debug");
    }
    init_observability(&observability)?;

    match cli.command {
        Commands::Packages => print_packages(),
        Commands::Moderate { text } => moderate_text(&config, &text).await?,
        Commands::Simulate => simulate(config).await?,
        Commands::Config => print_config(&config)?,
    }

    Ok(())
}
