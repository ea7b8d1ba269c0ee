//! Core data types for PortfolioHub.
//!
//! This crate provides the documents shared by every PortfolioHub component:
//! accounts and their balances, time-limited portfolio listings, moderated
//! comments, the credit package catalog and the maintenance singleton.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod account;
mod comment;
mod ids;
mod listing;
mod maintenance;
mod moderation;
mod package;
mod reward;
mod role;

pub use account::{Account, AccountUpdate, BalanceDelta, BalanceField, Balances};
pub use comment::{Comment, CommentStatus, MAX_COMMENT_CHARS};
pub use ids::{AccountId, CommentId, ListingId};
pub use listing::{
    Listing, ListingDraft, ListingDraftBuilder, ListingDuration, ListingStatus, RemainingTime,
    TRENDING_THRESHOLD, parse_tags,
};
pub use maintenance::{BackupMarker, MaintenanceConfig, MaintenanceUpdate};
pub use moderation::ModerationVerdict;
pub use package::{CreditPackage, credit_catalog, find_package};
pub use reward::{RewardAction, RewardTable};
pub use role::Role;
