//! Site-wide maintenance state.

use crate::{Account, AccountId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The `config/maintenance` singleton document.
///
/// # Examples
///
/// ```
/// use portfoliohub_core::{Account, AccountId, MaintenanceConfig, Role};
///
/// let mut config = MaintenanceConfig::default();
/// let member = Account::new_member(AccountId::from("m"), "Mo", None, 25, chrono::Utc::now());
/// assert!(config.admits(&member));
///
/// config.is_active = true;
/// assert!(!config.admits(&member));
/// config.allowed_users.insert(AccountId::from("m"));
/// assert!(config.admits(&member));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceConfig {
    /// Whether non-privileged traffic is blocked
    pub is_active: bool,
    /// Notice shown to blocked users
    pub message: String,
    /// Human-readable expected length
    pub estimated_duration: String,
    /// When maintenance was last activated
    pub start_time: DateTime<Utc>,
    /// Accounts admitted while active
    #[serde(default)]
    pub allowed_users: BTreeSet<AccountId>,
}

impl Default for MaintenanceConfig {
    fn default() -> Self {
        Self {
            is_active: false,
            message: "The site is currently under maintenance. We'll be back soon!".to_string(),
            estimated_duration: "30 minutes".to_string(),
            start_time: DateTime::<Utc>::default(),
            allowed_users: BTreeSet::new(),
        }
    }
}

impl MaintenanceConfig {
    /// Whether `account` may use the site under the current state.
    pub fn admits(&self, account: &Account) -> bool {
        !self.is_active || account.role.is_privileged() || self.allowed_users.contains(&account.id)
    }

    /// Time since activation, `None` while inactive.
    pub fn elapsed(&self, now: DateTime<Utc>) -> Option<chrono::Duration> {
        self.is_active.then(|| now - self.start_time)
    }

    /// Apply an edit, leaving unset fields untouched.
    pub fn apply(&mut self, update: &MaintenanceUpdate) {
        if let Some(message) = &update.message {
            self.message = message.clone();
        }
        if let Some(duration) = &update.estimated_duration {
            self.estimated_duration = duration.clone();
        }
        if let Some(users) = &update.allowed_users {
            self.allowed_users = users.clone();
        }
    }
}

/// Edit of the maintenance notice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceUpdate {
    /// New notice
    pub message: Option<String>,
    /// New expected length
    pub estimated_duration: Option<String>,
    /// New allow list
    pub allowed_users: Option<BTreeSet<AccountId>>,
}

/// Snapshot marker appended to `backups` right before maintenance starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupMarker {
    /// Marker id (`backup_<millis>`)
    pub id: String,
    /// When the marker was written
    pub timestamp: DateTime<Utc>,
    /// Why the marker was written
    pub description: String,
}

impl BackupMarker {
    /// Marker written before activating maintenance.
    pub fn before_maintenance(now: DateTime<Utc>) -> Self {
        Self {
            id: format!("backup_{}", now.timestamp_millis()),
            timestamp: now,
            description: "Automatic backup before maintenance".to_string(),
        }
    }
}
