//! Point rewards for member activity.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Activity that earns points.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RewardAction {
    /// Someone liked the member's listing
    LikeReceived,
    /// The member's comment was approved
    CommentPosted,
    /// Someone viewed the member's listing (throttled)
    PortfolioViewed,
    /// New account
    SignupBonus,
}

/// Points paid per [`RewardAction`].
///
/// # Examples
///
/// ```
/// use portfoliohub_core::{RewardAction, RewardTable};
///
/// let table = RewardTable::default();
/// assert_eq!(table.points_for(RewardAction::LikeReceived), 1);
/// assert_eq!(table.points_for(RewardAction::CommentPosted), 2);
/// assert_eq!(table.points_for(RewardAction::SignupBonus), 25);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Getters)]
pub struct RewardTable {
    /// Points for a like received
    #[serde(default = "default_like_received")]
    like_received: i64,
    /// Points for an approved comment
    #[serde(default = "default_comment_posted")]
    comment_posted: i64,
    /// Points for an awarded view
    #[serde(default = "default_portfolio_viewed")]
    portfolio_viewed: i64,
    /// Points granted at sign-up
    #[serde(default = "default_signup_bonus")]
    signup_bonus: i64,
}

fn default_like_received() -> i64 {
    1
}

fn default_comment_posted() -> i64 {
    2
}

fn default_portfolio_viewed() -> i64 {
    1
}

fn default_signup_bonus() -> i64 {
    25
}

impl Default for RewardTable {
    fn default() -> Self {
        Self {
            like_received: default_like_received(),
            comment_posted: default_comment_posted(),
            portfolio_viewed: default_portfolio_viewed(),
            signup_bonus: default_signup_bonus(),
        }
    }
}

impl RewardTable {
    /// Table with explicit values.
    pub fn new(
        like_received: i64,
        comment_posted: i64,
        portfolio_viewed: i64,
        signup_bonus: i64,
    ) -> Self {
        Self {
            like_received,
            comment_posted,
            portfolio_viewed,
            signup_bonus,
        }
    }

    /// Points paid for `action`.
    pub fn points_for(&self, action: RewardAction) -> i64 {
        match action {
            RewardAction::LikeReceived => self.like_received,
            RewardAction::CommentPosted => self.comment_posted,
            RewardAction::PortfolioViewed => self.portfolio_viewed,
            RewardAction::SignupBonus => self.signup_bonus,
        }
    }
}
