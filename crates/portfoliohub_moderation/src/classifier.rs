//! Chat-completion backed comment classifier.

use crate::{ChatMessage, ChatRequest, ChatResponse, ModerationConfig, VerdictPayload};
use async_trait::async_trait;
use portfoliohub_core::ModerationVerdict;
use portfoliohub_error::{HubResult, ModerationError, ModerationErrorKind};
use portfoliohub_interface::Classifier;
use reqwest::Client;
use tracing::{debug, error, instrument};

const DEFAULT_CONFIDENCE: f64 = 0.5;

/// Community policy sent as the system message of every classification.
pub const POLICY_PROMPT: &str = "You are the moderator of a platform where creatives share their portfolios.

Decide whether the comment you are given may be published.

APPROVE:
- constructive feedback about art or design
- encouragement and compliments
- relevant technical questions
- respectful, constructive criticism
- positive creative discussion

REJECT:
- insults, harassment or personal attacks
- explicit or inappropriate sexual content
- spam or advertising
- discriminatory speech (racism, sexism, ...)
- threats or incitement to violence
- off-topic or disruptive content

Answer ONLY with valid JSON in this exact shape:
{\"approved\": true or false, \"reason\": \"reason when rejected\", \"confidence\": 0.0 to 1.0}

Be moderate but firm. Community safety comes first.";

/// Classifier calling an OpenAI-compatible chat completions endpoint.
#[derive(Clone)]
pub struct ChatCompletionClassifier {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl ChatCompletionClassifier {
    /// Creates a classifier from moderation settings.
    ///
    /// # Errors
    ///
    /// `NotConfigured` when no API key is set.
    pub fn from_config(config: &ModerationConfig) -> HubResult<Self> {
        let api_key = config.api_key().ok_or_else(|| {
            ModerationError::new(ModerationErrorKind::NotConfigured(
                "moderation.api_key is not set".to_string(),
            ))
        })?;
        debug!(endpoint = %config.endpoint, model = %config.model, "Creating chat completion classifier");
        Ok(Self {
            client: Client::new(),
            endpoint: config.endpoint.clone(),
            api_key: api_key.to_string(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        })
    }

    /// Model used for classification.
    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request(&self, text: &str) -> HubResult<ChatRequest> {
        let builder_error = |e: String| {
            ModerationError::new(ModerationErrorKind::Unavailable(format!(
                "could not build request: {}",
                e
            )))
        };
        let system = ChatMessage::builder()
            .role("system")
            .content(POLICY_PROMPT)
            .build()
            .map_err(|e| builder_error(e.to_string()))?;
        let user = ChatMessage::builder()
            .role("user")
            .content(format!(
                "Analyze this comment and decide whether it should be approved:\n\n\"{}\"",
                text
            ))
            .build()
            .map_err(|e| builder_error(e.to_string()))?;
        Ok(ChatRequest::builder()
            .model(self.model.clone())
            .messages(vec![system, user])
            .max_tokens(self.max_tokens)
            .temperature(self.temperature)
            .build()
            .map_err(|e| builder_error(e.to_string()))?)
    }
}

impl std::fmt::Debug for ChatCompletionClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatCompletionClassifier")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

/// Parse the model's answer into a verdict.
///
/// The answer must be exactly the decision JSON; surrounding prose, missing
/// `approved` or extra fields are malformed.
///
/// # Examples
///
/// ```
/// use portfoliohub_moderation::parse_verdict;
///
/// let verdict = parse_verdict(r#"{"approved": false, "reason": "spam", "confidence": 1.4}"#).unwrap();
/// assert!(!verdict.approved);
/// assert_eq!(verdict.confidence, 1.0);
///
/// assert!(parse_verdict("Sure! It looks fine.").is_err());
/// ```
pub fn parse_verdict(content: &str) -> Result<ModerationVerdict, ModerationError> {
    let payload: VerdictPayload = serde_json::from_str(content.trim()).map_err(|e| {
        ModerationError::new(ModerationErrorKind::MalformedResponse(format!(
            "classifier answer is not decision JSON: {}",
            e
        )))
    })?;
    let confidence = payload.confidence.unwrap_or(DEFAULT_CONFIDENCE);
    let mut verdict = if payload.approved {
        ModerationVerdict::approved(confidence)
    } else {
        ModerationVerdict::rejected("", confidence)
    };
    verdict.reason = payload.reason.filter(|reason| !reason.trim().is_empty());
    Ok(verdict)
}

#[async_trait]
impl Classifier for ChatCompletionClassifier {
    #[instrument(skip(self, text), fields(model = %self.model, chars = text.chars().count()))]
    async fn classify(&self, text: &str) -> HubResult<ModerationVerdict> {
        let request = self.build_request(text)?;
        debug!("Sending classification request");

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .header("X-Title", "PortfolioHub Moderation")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "Failed to reach classifier");
                ModerationError::new(ModerationErrorKind::Http(format!("Request failed: {}", e)))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "Classifier returned error");
            return Err(ModerationError::new(ModerationErrorKind::Api {
                status: status.as_u16(),
                message: body,
            })
            .into());
        }

        let completion: ChatResponse = response.json().await.map_err(|e| {
            error!(error = ?e, "Failed to parse classifier response");
            ModerationError::new(ModerationErrorKind::MalformedResponse(format!(
                "Failed to parse response: {}",
                e
            )))
        })?;

        let content = completion.first_content().ok_or_else(|| {
            ModerationError::new(ModerationErrorKind::MalformedResponse(
                "response has no message content".to_string(),
            ))
        })?;

        let verdict = parse_verdict(content)?;
        debug!(approved = verdict.approved, confidence = verdict.confidence, "Classifier decided");
        Ok(verdict)
    }

    fn name(&self) -> &str {
        "chat-completions"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults_confidence() {
        let verdict = parse_verdict(r#"{"approved": true}"#).unwrap();
        assert!(verdict.approved);
        assert_eq!(verdict.confidence, 0.5);
        assert!(verdict.reason.is_none());
    }

    #[test]
    fn test_parse_keeps_rejection_reason() {
        let verdict =
            parse_verdict(r#" {"approved": false, "reason": "Personal attack", "confidence": 0.92} "#)
                .unwrap();
        assert!(!verdict.approved);
        assert_eq!(verdict.reason.as_deref(), Some("Personal attack"));
        assert_eq!(verdict.confidence, 0.92);
    }

    #[test]
    fn test_parse_rejects_other_shapes() {
        assert!(parse_verdict(r#"{"approved": "yes"}"#).is_err());
        assert!(parse_verdict(r#"{"reason": "fine"}"#).is_err());
        assert!(parse_verdict(r#"{"approved": true, "score": 3}"#).is_err());
        assert!(parse_verdict("```json\n{\"approved\": true}\n```").is_err());
    }

    #[test]
    fn test_missing_key_is_not_configured() {
        let err = ChatCompletionClassifier::from_config(&ModerationConfig::default()).unwrap_err();
        assert!(err.user_message().contains("not configured"));
    }
}
