//! Moderation decisions.

use serde::{Deserialize, Serialize};

/// Outcome of classifying a comment.
///
/// # Examples
///
/// ```
/// use portfoliohub_core::ModerationVerdict;
///
/// let verdict = ModerationVerdict::rejected("Message too short", 0.8);
/// assert!(!verdict.approved);
/// assert_eq!(verdict.reason.as_deref(), Some("Message too short"));
///
/// let clamped = ModerationVerdict::approved(1.7);
/// assert_eq!(clamped.confidence, 1.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModerationVerdict {
    /// Whether the comment may be shown
    pub approved: bool,
    /// Explanation, usually given on rejection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Confidence in `[0, 1]`
    pub confidence: f64,
}

impl ModerationVerdict {
    /// Approval without a reason.
    pub fn approved(confidence: f64) -> Self {
        Self {
            approved: true,
            reason: None,
            confidence: clamp_confidence(confidence),
        }
    }

    /// Rejection with a reason.
    pub fn rejected(reason: impl Into<String>, confidence: f64) -> Self {
        Self {
            approved: false,
            reason: Some(reason.into()),
            confidence: clamp_confidence(confidence),
        }
    }
}

fn clamp_confidence(confidence: f64) -> f64 {
    if confidence.is_nan() {
        0.0
    } else {
        confidence.clamp(0.0, 1.0)
    }
}
