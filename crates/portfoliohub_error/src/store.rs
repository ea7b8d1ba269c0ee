//! Document store error types.

/// Kinds of document store errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum StoreErrorKind {
    /// Document does not exist
    #[display("{} document not found: {}", collection, id)]
    NotFound {
        /// Collection name (users, portfolios, comments, config, backups)
        collection: String,
        /// Document id
        id: String,
    },
    /// Document already exists
    #[display("{} document already exists: {}", collection, id)]
    Conflict {
        /// Collection name
        collection: String,
        /// Document id
        id: String,
    },
    /// Store backend is unavailable
    #[display("Store unavailable: {}", _0)]
    Unavailable(String),
}

/// Store error with location tracking.
///
/// # Examples
///
/// ```
/// use portfoliohub_error::{StoreError, StoreErrorKind};
///
/// let err = StoreError::new(StoreErrorKind::Unavailable("offline".to_string()));
/// assert!(format!("{}", err).contains("unavailable"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Store Error: {} at line {} in {}", kind, line, file)]
pub struct StoreError {
    /// The kind of error that occurred
    pub kind: StoreErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl StoreError {
    /// Create a new store error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StoreErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Shorthand for a missing document.
    #[track_caller]
    pub fn not_found(collection: impl Into<String>, id: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::NotFound {
            collection: collection.into(),
            id: id.into(),
        })
    }

    /// Get the error kind.
    pub fn kind(&self) -> &StoreErrorKind {
        &self.kind
    }
}
