//! Workflow settings (`[views]`, `[comments]` and `[auth]` tables).

use serde::{Deserialize, Serialize};

/// How awarded views are throttled.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ViewPolicyKind {
    /// Independent random draw per view
    #[default]
    Probabilistic,
    /// At most one award per creator per window
    Throttled,
}

/// View reward settings.
///
/// # Example
///
/// ```toml
/// [views]
/// policy = "probabilistic"
/// probability = 0.1
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewsConfig {
    /// Award mechanism
    #[serde(default)]
    pub policy: ViewPolicyKind,
    /// Chance that a view pays the creator
    #[serde(default = "default_probability")]
    pub probability: f64,
    /// Window for the throttled policy, in seconds
    #[serde(default = "default_throttle_secs")]
    pub throttle_secs: u64,
    /// Fixed RNG seed for reproducible runs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

fn default_probability() -> f64 {
    0.1
}

fn default_throttle_secs() -> u64 {
    600
}

impl Default for ViewsConfig {
    fn default() -> Self {
        Self {
            policy: ViewPolicyKind::default(),
            probability: default_probability(),
            throttle_secs: default_throttle_secs(),
            seed: None,
        }
    }
}

/// Comment settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentsConfig {
    /// Longest accepted comment, in characters
    #[serde(default = "default_comment_length")]
    pub max_length: usize,
}

fn default_comment_length() -> usize {
    portfoliohub_core::MAX_COMMENT_CHARS
}

impl Default for CommentsConfig {
    fn default() -> Self {
        Self {
            max_length: default_comment_length(),
        }
    }
}

/// Sign-in and admin console settings.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Identity provider sign-in timeout
    #[serde(default = "default_sign_in_timeout")]
    pub sign_in_timeout_secs: u64,
    /// Admin console username
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_username: Option<String>,
    /// Admin console password
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_password: Option<String>,
}

fn default_sign_in_timeout() -> u64 {
    30
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            sign_in_timeout_secs: default_sign_in_timeout(),
            admin_username: None,
            admin_password: None,
        }
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("sign_in_timeout_secs", &self.sign_in_timeout_secs)
            .field("admin_username", &self.admin_username)
            .field(
                "admin_password",
                &self.admin_password.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}
