//! Validation error types.

/// Kinds of input validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ValidationErrorKind {
    /// Comment is empty or whitespace-only
    #[display("Comment cannot be empty")]
    EmptyComment,
    /// Comment exceeds the maximum length
    #[display("Comment exceeds {} characters (got {})", max, actual)]
    CommentTooLong {
        /// Maximum number of characters
        max: usize,
        /// Actual number of characters
        actual: usize,
    },
    /// Required field missing or blank
    #[display("Missing required field: {}", _0)]
    MissingField(String),
    /// Field is not a valid absolute http(s) URL
    #[display("Invalid URL for '{}': {}", field, value)]
    InvalidUrl {
        /// Field name
        field: String,
        /// Rejected value
        value: String,
    },
    /// Listing duration outside the allowed set
    #[display("Invalid listing duration: {} hour(s) (allowed: 1, 2, 4, 8, 12, 24)", _0)]
    InvalidDuration(u32),
    /// Credit package id not in the catalog
    #[display("Unknown credit package: {}", _0)]
    UnknownPackage(String),
}

/// Validation error with location tracking.
///
/// # Examples
///
/// ```
/// use portfoliohub_error::{ValidationError, ValidationErrorKind};
///
/// let err = ValidationError::new(ValidationErrorKind::EmptyComment);
/// assert!(format!("{}", err).contains("empty"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Validation Error: {} at line {} in {}", kind, line, file)]
pub struct ValidationError {
    /// The kind of error that occurred
    pub kind: ValidationErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ValidationError {
    /// Create a new validation error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ValidationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ValidationErrorKind {
        &self.kind
    }
}
