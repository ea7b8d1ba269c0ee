//! Error types for PortfolioHub.
//!
//! This crate provides the foundation error types used throughout the PortfolioHub workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use portfoliohub_error::{HubResult, LedgerError, LedgerErrorKind};
//!
//! fn spend() -> HubResult<()> {
//!     Err(LedgerError::new(LedgerErrorKind::InsufficientCredits {
//!         required: 4,
//!         available: 1,
//!     }))?
//! }
//!
//! let err = spend().unwrap_err();
//! assert!(err.user_message().contains("Insufficient credits"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod auth;
mod config;
mod error;
mod ledger;
mod moderation;
mod permission;
mod store;
mod validation;

pub use auth::{AuthError, AuthErrorKind};
pub use config::ConfigError;
pub use error::{HubError, HubErrorKind, HubResult};
pub use ledger::{LedgerError, LedgerErrorKind};
pub use moderation::{ModerationError, ModerationErrorKind};
pub use permission::{PermissionError, PermissionErrorKind};
pub use store::{StoreError, StoreErrorKind};
pub use validation::{ValidationError, ValidationErrorKind};
