//! Privilege error types.

/// Specific privilege failures.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum PermissionErrorKind {
    /// Operation requires the admin or founder role
    #[display("Administrator access required for '{}'", _0)]
    AdminRequired(String),
    /// Operation requires the founder role
    #[display("Founder access required for '{}'", _0)]
    FounderRequired(String),
    /// Admin login rejected
    #[display("Incorrect administrator credentials")]
    InvalidAdminCredentials,
}

/// Permission error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Permission Error: {} at line {} in {}", kind, line, file)]
pub struct PermissionError {
    /// The specific error kind
    pub kind: PermissionErrorKind,
    /// Line number where error occurred
    pub line: u32,
    /// File where error occurred
    pub file: &'static str,
}

impl PermissionError {
    /// Create a new permission error with location tracking.
    #[track_caller]
    pub fn new(kind: PermissionErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &PermissionErrorKind {
        &self.kind
    }
}
