//! Document identifiers.

use serde::{Deserialize, Serialize};

/// Opaque account id issued by the identity provider.
///
/// # Examples
///
/// ```
/// use portfoliohub_core::AccountId;
///
/// let id = AccountId::from("user-42");
/// assert_eq!(id.to_string(), "user-42");
/// ```
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(transparent)]
#[display("{}", _0)]
pub struct AccountId(pub String);

/// Portfolio listing id.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(transparent)]
#[display("{}", _0)]
pub struct ListingId(pub String);

/// Comment id.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(transparent)]
#[display("{}", _0)]
pub struct CommentId(pub String);

macro_rules! string_id {
    ($name:ident) => {
        impl $name {
            /// Borrow the raw id.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

string_id!(AccountId);
string_id!(ListingId);
string_id!(CommentId);

impl ListingId {
    /// Generate a fresh random listing id.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl CommentId {
    /// Generate a fresh random comment id.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}
