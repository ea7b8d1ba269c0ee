//! Moderated comments.

use crate::{AccountId, CommentId, ListingId, ModerationVerdict, Role};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Longest accepted comment, in characters.
pub const MAX_COMMENT_CHARS: usize = 500;

/// Moderation state of a comment.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CommentStatus {
    /// Awaiting automatic or manual moderation
    Pending,
    /// Visible to listing viewers
    Approved,
    /// Hidden
    Rejected,
}

/// A comment on a listing.
///
/// Stored in the `comments` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Comment id
    pub id: CommentId,
    /// Listing the comment belongs to
    pub portfolio_id: ListingId,
    /// Author account
    pub author_id: AccountId,
    /// Author display name at submission time
    pub author_name: String,
    /// Author role at submission time
    pub author_role: Role,
    /// Comment text
    pub content: String,
    /// Submission time
    pub created_at: DateTime<Utc>,
    /// Moderation state
    pub status: CommentStatus,
    /// Why the comment was rejected or left pending
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moderation_reason: Option<String>,
    /// Classifier confidence in `[0, 1]`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moderation_confidence: Option<f64>,
    /// Last moderation decision time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moderated_at: Option<DateTime<Utc>>,
    /// Set once the author has been paid for this comment
    #[serde(default)]
    pub points_awarded: bool,
}

impl Comment {
    /// New pending comment.
    pub fn pending(
        id: CommentId,
        portfolio_id: ListingId,
        author_id: AccountId,
        author_name: impl Into<String>,
        author_role: Role,
        content: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            portfolio_id,
            author_id,
            author_name: author_name.into(),
            author_role,
            content: content.into(),
            created_at: now,
            status: CommentStatus::Pending,
            moderation_reason: None,
            moderation_confidence: None,
            moderated_at: None,
            points_awarded: false,
        }
    }

    /// Record a classifier decision.
    pub fn apply_verdict(&mut self, verdict: &ModerationVerdict, now: DateTime<Utc>) {
        self.status = if verdict.approved {
            CommentStatus::Approved
        } else {
            CommentStatus::Rejected
        };
        self.moderation_reason = verdict.reason.clone();
        self.moderation_confidence = Some(verdict.confidence);
        self.moderated_at = Some(now);
    }

    /// Whether approving this comment now should pay its author.
    pub fn owes_points(&self) -> bool {
        self.status == CommentStatus::Approved && !self.points_awarded
    }
}
