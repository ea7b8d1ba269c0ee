//! Deterministic fallback heuristic.

use crate::ModerationConfig;
use async_trait::async_trait;
use portfoliohub_core::ModerationVerdict;
use portfoliohub_error::HubResult;
use portfoliohub_interface::Moderator;

/// Keyword and shape rules applied when the classifier cannot answer.
///
/// Rules are checked in order: blocked term, excessive capitals, too short,
/// too long. The first match rejects; otherwise the comment is approved with
/// confidence 0.5.
///
/// # Examples
///
/// ```
/// use portfoliohub_moderation::FallbackModerator;
///
/// let fallback = FallbackModerator::default();
/// assert!(fallback.evaluate("You're so talented, love the color palette!").approved);
///
/// let shouting = fallback.evaluate("PERFECT PERFECT PERFECT");
/// assert!(!shouting.approved);
/// assert!(shouting.reason.unwrap().contains("capital"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackModerator {
    blocked_terms: Vec<String>,
    caps_ratio: f64,
    caps_min_length: usize,
    min_length: usize,
    max_length: usize,
}

impl FallbackModerator {
    /// Build the heuristic from moderation settings.
    pub fn from_config(config: &ModerationConfig) -> Self {
        Self {
            blocked_terms: config
                .blocked_terms
                .iter()
                .map(|term| term.trim().to_lowercase())
                .filter(|term| !term.is_empty())
                .collect(),
            caps_ratio: config.caps_ratio,
            caps_min_length: config.caps_min_length,
            min_length: config.min_length,
            max_length: config.max_length,
        }
    }

    /// Classify `text`. Pure: the same text always yields the same verdict.
    pub fn evaluate(&self, text: &str) -> ModerationVerdict {
        let lowered = text.to_lowercase();
        if self
            .blocked_terms
            .iter()
            .any(|term| lowered.contains(term.as_str()))
        {
            return ModerationVerdict::rejected(
                "Inappropriate content detected (fallback moderation)",
                0.7,
            );
        }

        let length = text.chars().count();
        let uppercase = text.chars().filter(char::is_ascii_uppercase).count();
        if length > self.caps_min_length && uppercase as f64 / length as f64 > self.caps_ratio {
            return ModerationVerdict::rejected("Excessive capital letters (possible spam)", 0.6);
        }

        if text.trim().chars().count() < self.min_length {
            return ModerationVerdict::rejected("Message too short", 0.8);
        }

        if length > self.max_length {
            return ModerationVerdict::rejected("Message too long", 0.7);
        }

        ModerationVerdict::approved(0.5)
    }
}

impl Default for FallbackModerator {
    fn default() -> Self {
        Self::from_config(&ModerationConfig::default())
    }
}

#[async_trait]
impl Moderator for FallbackModerator {
    async fn moderate(&self, text: &str) -> HubResult<ModerationVerdict> {
        Ok(self.evaluate(text))
    }
}
