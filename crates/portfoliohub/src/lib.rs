//! PortfolioHub: time-limited portfolio listings paid for with credits,
//! a points economy fed by likes, views and moderated comments, and
//! administrator overrides.
//!
//! # Architecture
//!
//! PortfolioHub is organized as a workspace with focused crates:
//!
//! - `portfoliohub_error` - Error types
//! - `portfoliohub_core` - Documents, balances, packages and verdicts
//! - `portfoliohub_interface` - Store, moderator and identity traits
//! - `portfoliohub_storage` - In-memory backend
//! - `portfoliohub_moderation` - Classifier client and fallback heuristic
//! - `portfoliohub_services` - Ledger, listings, comments, exchange and admin workflows
//!
//! This crate re-exports everything and adds configuration loading, service
//! assembly and logging setup.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use portfoliohub::{HubConfig, PortfolioHub, run_scenario};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let hub = PortfolioHub::in_memory(HubConfig::load()?);
//!     let report = run_scenario(&hub).await?;
//!     println!("Artist has {} points", report.artist.points);
//!     hub.shutdown().await;
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod hub;
mod observability;
mod scenario;

pub use config::{HubConfig, LoggingConfig};
pub use hub::PortfolioHub;
pub use observability::{ObservabilityConfig, init_observability};
pub use scenario::{SCENARIO_COMMENT, ScenarioReport, run_scenario};

pub use portfoliohub_core::*;
pub use portfoliohub_error::*;
pub use portfoliohub_interface::*;
pub use portfoliohub_moderation::*;
pub use portfoliohub_services::*;
pub use portfoliohub_storage::*;
