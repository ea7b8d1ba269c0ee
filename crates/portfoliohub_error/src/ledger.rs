//! Ledger error types.

/// Kinds of ledger errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum LedgerErrorKind {
    /// Balance operation targeted an account that does not exist
    #[display("Account not found: {}", _0)]
    AccountNotFound(String),
    /// Account document already exists
    #[display("Account already exists: {}", _0)]
    AccountExists(String),
    /// Not enough credits to publish a listing
    #[display("Insufficient credits: need {} credit(s) but only {} available", required, available)]
    InsufficientCredits {
        /// Credits the operation needs
        required: i64,
        /// Credits currently held
        available: i64,
    },
    /// Not enough points to buy a credit package
    #[display("Insufficient points: need {} point(s) but only {} available", required, available)]
    InsufficientPoints {
        /// Points the operation needs
        required: i64,
        /// Points currently held
        available: i64,
    },
    /// Applying a delta would push a balance past the representable range
    #[display("Balance overflow: {} {} {:+}", field, current, delta)]
    BalanceOverflow {
        /// Counter that would overflow
        field: String,
        /// Value before the change
        current: i64,
        /// Requested change
        delta: i64,
    },
}

/// Ledger error with location tracking.
///
/// # Examples
///
/// ```
/// use portfoliohub_error::{LedgerError, LedgerErrorKind};
///
/// let err = LedgerError::new(LedgerErrorKind::AccountNotFound("u-1".to_string()));
/// assert!(format!("{}", err).contains("Account not found"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Ledger Error: {} at line {} in {}", kind, line, file)]
pub struct LedgerError {
    /// The kind of error that occurred
    pub kind: LedgerErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl LedgerError {
    /// Create a new ledger error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: LedgerErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &LedgerErrorKind {
        &self.kind
    }
}
