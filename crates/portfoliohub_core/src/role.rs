//! Account roles.

use serde::{Deserialize, Serialize};

/// Role held by an account.
///
/// Roles are snapshotted onto listings and comments at creation time so that
/// badges show the role held when the action happened.
///
/// # Examples
///
/// ```
/// use portfoliohub_core::Role;
/// use std::str::FromStr;
///
/// assert_eq!(Role::from_str("founder").unwrap(), Role::Founder);
/// assert!(Role::Admin.is_privileged());
/// assert!(!Role::Member.is_privileged());
/// assert_eq!(Role::Member.to_string(), "member");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    /// Regular member
    #[default]
    Member,
    /// Site administrator
    Admin,
    /// Site founder (superset of admin)
    Founder,
}

impl Role {
    /// Admins and founders may use the admin override paths.
    pub fn is_privileged(self) -> bool {
        matches!(self, Role::Admin | Role::Founder)
    }

    /// Founder-only operations (maintenance, founder role management).
    pub fn is_founder(self) -> bool {
        self == Role::Founder
    }
}
