//! Classifier with heuristic fallback.

use crate::{ChatCompletionClassifier, FallbackModerator, ModerationConfig};
use async_trait::async_trait;
use portfoliohub_core::ModerationVerdict;
use portfoliohub_error::HubResult;
use portfoliohub_interface::{Classifier, Moderator};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// The moderation gateway used by the comment workflow.
///
/// Classifier failures never reach the caller: they are logged and the
/// fallback heuristic decides instead.
#[derive(Clone)]
pub struct ModerationGateway {
    primary: Option<Arc<dyn Classifier>>,
    fallback: FallbackModerator,
}

impl ModerationGateway {
    /// Gateway with an explicit classifier.
    pub fn new(primary: Arc<dyn Classifier>, fallback: FallbackModerator) -> Self {
        Self {
            primary: Some(primary),
            fallback,
        }
    }

    /// Gateway that only runs the heuristic.
    pub fn fallback_only(fallback: FallbackModerator) -> Self {
        Self {
            primary: None,
            fallback,
        }
    }

    /// Build from settings. Without an API key the gateway runs heuristic-only.
    pub fn from_config(config: &ModerationConfig) -> Self {
        let fallback = FallbackModerator::from_config(config);
        match ChatCompletionClassifier::from_config(config) {
            Ok(classifier) => Self::new(Arc::new(classifier), fallback),
            Err(e) => {
                info!(reason = %e.user_message(), "Classifier disabled, using fallback heuristic only");
                Self::fallback_only(fallback)
            }
        }
    }

    /// Whether an external classifier is wired in.
    pub fn has_classifier(&self) -> bool {
        self.primary.is_some()
    }
}

impl std::fmt::Debug for ModerationGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModerationGateway")
            .field("primary", &self.primary.as_ref().map(|c| c.name().to_string()))
            .field("fallback", &self.fallback)
            .finish()
    }
}

#[async_trait]
impl Moderator for ModerationGateway {
    #[instrument(skip(self, text), fields(chars = text.chars().count()))]
    async fn moderate(&self, text: &str) -> HubResult<ModerationVerdict> {
        if let Some(classifier) = &self.primary {
            match classifier.classify(text).await {
                Ok(verdict) => return Ok(verdict),
                Err(e) => {
                    warn!(
                        classifier = classifier.name(),
                        error = %e,
                        "Classifier failed, using fallback heuristic"
                    );
                }
            }
        }
        let verdict = self.fallback.evaluate(text);
        debug!(approved = verdict.approved, "Fallback heuristic decided");
        Ok(verdict)
    }
}
