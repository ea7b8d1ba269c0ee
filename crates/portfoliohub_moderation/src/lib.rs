//! Moderation gateway for PortfolioHub comments.
//!
//! The gateway asks an external chat-completion model to classify comment
//! text against a fixed community policy. When the model is unreachable,
//! unconfigured or answers with anything other than the decision JSON, the
//! gateway falls back to a deterministic keyword and shape heuristic.
//!
//! # Example
//!
//! ```
//! use portfoliohub_interface::Moderator;
//! use portfoliohub_moderation::{ModerationConfig, ModerationGateway};
//!
//! # #[tokio::main]
//! # async fn main() {
//! // No API key configured: every decision comes from the fallback heuristic.
//! let gateway = ModerationGateway::from_config(&ModerationConfig::default());
//! let verdict = gateway.moderate("Love the color palette!").await.unwrap();
//! assert!(verdict.approved);
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod classifier;
mod config;
mod dto;
mod fallback;
mod gateway;

pub use classifier::{ChatCompletionClassifier, POLICY_PROMPT, parse_verdict};
pub use config::{DEFAULT_BLOCKED_TERMS, ModerationConfig};
pub use dto::{
    ChatChoice, ChatChoiceMessage, ChatMessage, ChatMessageBuilder, ChatRequest,
    ChatRequestBuilder, ChatResponse, VerdictPayload,
};
pub use fallback::FallbackModerator;
pub use gateway::ModerationGateway;
