//! Identity provider error types.

/// Authentication failures.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum AuthErrorKind {
    /// Sign-in did not complete within the allowed time
    #[display("Sign-in timed out after {} seconds", _0)]
    Timeout(u64),
    /// Identity provider rejected the sign-in or sign-up
    #[display("Sign-in failed: {}", _0)]
    SignInFailed(String),
    /// Operation needs a signed-in user
    #[display("No user is signed in")]
    NotSignedIn,
}

/// Authentication error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Auth Error: {} at line {} in {}", kind, line, file)]
pub struct AuthError {
    /// The specific error kind
    pub kind: AuthErrorKind,
    /// Line number where error occurred
    pub line: u32,
    /// File where error occurred
    pub file: &'static str,
}

impl AuthError {
    /// Create a new auth error with location tracking.
    #[track_caller]
    pub fn new(kind: AuthErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &AuthErrorKind {
        &self.kind
    }
}
