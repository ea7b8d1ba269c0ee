//! Moderation gateway error types.
//!
//! These errors never reach end users: the gateway recovers from them with the
//! fallback heuristic.

/// Ways the external classifier can fail.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ModerationErrorKind {
    /// Classifier could not be reached
    #[display("Classifier request failed: {}", _0)]
    Http(String),
    /// Classifier answered with a non-success status
    #[display("Classifier returned status {}: {}", status, message)]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body
        message: String,
    },
    /// Classifier answer did not match the decision contract
    #[display("Malformed classifier response: {}", _0)]
    MalformedResponse(String),
    /// No classifier configured (missing endpoint or API key)
    #[display("Classifier not configured: {}", _0)]
    NotConfigured(String),
    /// Moderation could not complete at all
    #[display("Moderation unavailable: {}", _0)]
    Unavailable(String),
}

/// Moderation error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Moderation Error: {} at line {} in {}", kind, line, file)]
pub struct ModerationError {
    /// The kind of error that occurred
    pub kind: ModerationErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ModerationError {
    /// Create a new moderation error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ModerationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ModerationErrorKind {
        &self.kind
    }
}
