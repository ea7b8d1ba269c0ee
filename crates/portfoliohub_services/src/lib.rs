//! PortfolioHub workflows.
//!
//! Each service is an explicitly constructed object holding the collaborators
//! it needs as trait objects:
//!
//! - [`Ledger`]: atomic balance adjustments, awards and guarded spends
//! - [`CommentWorkflow`] and [`ModerationWorker`]: two-phase comment moderation
//! - [`ListingService`]: credit-paid publication and the visible feed
//! - [`InteractionService`]: likes, views and their rewards
//! - [`ExchangeService`]: points-to-credits packages
//! - [`AdminService`]: role-gated overrides and maintenance
//! - [`AccountService`]: sign-in and account creation

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod accounts;
mod admin;
mod comments;
mod config;
mod exchange;
mod interactions;
mod ledger;
mod listings;

pub use accounts::AccountService;
pub use admin::{AdminCredentials, AdminService, BulkGrantReport, require_admin, require_founder};
pub use comments::{
    CommentWorkflow, MANUAL_APPROVAL_REASON, MODERATION_FAILED_REASON, ModerationMessage,
    ModerationWorker,
};
pub use config::{AuthConfig, CommentsConfig, ViewPolicyKind, ViewsConfig};
pub use exchange::{ExchangeService, Purchase};
pub use interactions::{
    InteractionService, ProbabilisticViewAward, ThrottledViewAward, ViewAwardPolicy,
    ViewOutcome, ViewerSession, view_policy_from_config,
};
pub use ledger::Ledger;
pub use listings::{ListingOrder, ListingService, visible_at};
