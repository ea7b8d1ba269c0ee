//! CLI command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// PortfolioHub - portfolio listings with a points and credits economy
#[derive(Parser, Debug)]
#[command(name = "portfoliohub")]
#[command(about = "Portfolio listings with a points and credits economy and moderated comments", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Load this file instead of the layered configuration
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the credit packages and their exchange rates
    Packages,

    /// Run a comment through the moderation gateway
    Moderate {
        /// Comment text
        text: String,
    },

    /// Run the buy, publish, like and comment scenario in memory
    Simulate,

    /// Print the effective configuration with secrets redacted
    Config,
}
