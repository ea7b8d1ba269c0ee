//! Top-level error wrapper types.

use crate::{
    AuthError, ConfigError, LedgerError, ModerationError, PermissionError, StoreError,
    ValidationError,
};

/// Every error family that can surface from a PortfolioHub operation.
///
/// # Examples
///
/// ```
/// use portfoliohub_error::{HubError, ValidationError, ValidationErrorKind};
///
/// let err: HubError = ValidationError::new(ValidationErrorKind::EmptyComment).into();
/// assert!(format!("{}", err).contains("Validation Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum HubErrorKind {
    /// Balance or account error
    #[from(LedgerError)]
    Ledger(LedgerError),
    /// Rejected user input
    #[from(ValidationError)]
    Validation(ValidationError),
    /// Classifier failure (recovered by the gateway fallback)
    #[from(ModerationError)]
    Moderation(ModerationError),
    /// Document store failure
    #[from(StoreError)]
    Store(StoreError),
    /// Missing privilege
    #[from(PermissionError)]
    Permission(PermissionError),
    /// Identity provider failure
    #[from(AuthError)]
    Auth(AuthError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
}

/// PortfolioHub error with kind discrimination.
///
/// # Examples
///
/// ```
/// use portfoliohub_error::{ConfigError, HubResult};
///
/// fn might_fail() -> HubResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// assert!(might_fail().is_err());
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("PortfolioHub Error: {}", _0)]
pub struct HubError(Box<HubErrorKind>);

impl HubError {
    /// Create a new error from a kind.
    pub fn new(kind: HubErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &HubErrorKind {
        &self.0
    }

    /// Message shown to the user whose action failed, without source locations.
    pub fn user_message(&self) -> String {
        match self.kind() {
            HubErrorKind::Ledger(e) => e.kind.to_string(),
            HubErrorKind::Validation(e) => e.kind.to_string(),
            HubErrorKind::Moderation(e) => e.kind.to_string(),
            HubErrorKind::Store(e) => e.kind.to_string(),
            HubErrorKind::Permission(e) => e.kind.to_string(),
            HubErrorKind::Auth(e) => e.kind.to_string(),
            HubErrorKind::Config(e) => e.message.clone(),
        }
    }

    /// Ledger error kind, if this is a ledger error.
    pub fn ledger_kind(&self) -> Option<&crate::LedgerErrorKind> {
        match self.kind() {
            HubErrorKind::Ledger(e) => Some(&e.kind),
            _ => None,
        }
    }

    /// Validation error kind, if this is a validation error.
    pub fn validation_kind(&self) -> Option<&crate::ValidationErrorKind> {
        match self.kind() {
            HubErrorKind::Validation(e) => Some(&e.kind),
            _ => None,
        }
    }

    /// Permission error kind, if this is a permission error.
    pub fn permission_kind(&self) -> Option<&crate::PermissionErrorKind> {
        match self.kind() {
            HubErrorKind::Permission(e) => Some(&e.kind),
            _ => None,
        }
    }

    /// Auth error kind, if this is an auth error.
    pub fn auth_kind(&self) -> Option<&crate::AuthErrorKind> {
        match self.kind() {
            HubErrorKind::Auth(e) => Some(&e.kind),
            _ => None,
        }
    }
}

// Generic From implementation for any type that converts to HubErrorKind
impl<T> From<T> for HubError
where
    T: Into<HubErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for PortfolioHub operations.
pub type HubResult<T> = std::result::Result<T, HubError>;
