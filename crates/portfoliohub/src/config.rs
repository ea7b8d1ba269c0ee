//! Layered application configuration.
//!
//! Sources, later overriding earlier:
//! - Bundled defaults (include_str! from portfoliohub.toml)
//! - `~/.config/portfoliohub/portfoliohub.toml`
//! - `./portfoliohub.toml`
//! - `PORTFOLIOHUB__<SECTION>__<KEY>` environment variables

use config::{Config, ConfigBuilder, Environment, File, FileFormat, builder::DefaultState};
use portfoliohub_core::RewardTable;
use portfoliohub_error::{ConfigError, HubError, HubResult};
use portfoliohub_moderation::ModerationConfig;
use portfoliohub_services::{AdminCredentials, AuthConfig, CommentsConfig, ViewsConfig};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

const DEFAULT_CONFIG: &str = include_str!("../portfoliohub.toml");
const REDACTED: &str = "<redacted>";

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset
    #[serde(default = "default_level")]
    pub level: String,
    /// Emit JSON lines instead of text
    #[serde(default)]
    pub json: bool,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
        }
    }
}

/// Complete PortfolioHub configuration.
///
/// Every section is optional in a file; missing sections take their defaults.
///
/// # Example
///
/// ```no_run
/// use portfoliohub::HubConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = HubConfig::load()?;
/// println!("Signup bonus: {}", config.rewards.signup_bonus());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HubConfig {
    /// Points paid per action
    #[serde(default)]
    pub rewards: RewardTable,
    /// View award policy
    #[serde(default)]
    pub views: ViewsConfig,
    /// Classifier and fallback heuristic
    #[serde(default)]
    pub moderation: ModerationConfig,
    /// Comment limits
    #[serde(default)]
    pub comments: CommentsConfig,
    /// Sign-in timeout and admin console login
    #[serde(default)]
    pub auth: AuthConfig,
    /// Log output
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl HubConfig {
    /// The defaults shipped with the crate.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled file does not parse.
    pub fn bundled() -> HubResult<Self> {
        Self::build(Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml)))
    }

    /// Load a single configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> HubResult<Self> {
        debug!("Loading configuration from file");
        Self::build(Config::builder().add_source(File::from(path.as_ref())))
    }

    /// Load every layer: bundled defaults, user files, then environment.
    ///
    /// User files are optional and skipped when absent. `OPENROUTER_API_KEY`
    /// supplies the classifier key when no layer sets one.
    ///
    /// # Errors
    ///
    /// Returns an error if any present layer does not parse.
    #[instrument]
    pub fn load() -> HubResult<Self> {
        debug!("Loading configuration: env > current dir > home dir > bundled defaults");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/portfoliohub/portfoliohub.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder
            .add_source(File::with_name("portfoliohub").required(false))
            .add_source(
                Environment::with_prefix("PORTFOLIOHUB")
                    .separator("__")
                    .try_parsing(true),
            );

        let mut config = Self::build(builder)?;
        if config.moderation.api_key().is_none() {
            if let Ok(key) = std::env::var("OPENROUTER_API_KEY") {
                debug!("Using OPENROUTER_API_KEY for the classifier");
                config.moderation.api_key = Some(key);
            }
        }
        Ok(config)
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> HubResult<Self> {
        builder
            .build()
            .map_err(|e| {
                HubError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                HubError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }

    /// Admin console login, when both halves are configured.
    pub fn admin_credentials(&self) -> Option<AdminCredentials> {
        match (&self.auth.admin_username, &self.auth.admin_password) {
            (Some(username), Some(password)) => {
                Some(AdminCredentials::new(username.clone(), password.clone()))
            }
            _ => None,
        }
    }

    /// Copy with every secret replaced by a placeholder.
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if config.moderation.api_key.is_some() {
            config.moderation.api_key = Some(REDACTED.to_string());
        }
        if config.auth.admin_password.is_some() {
            config.auth.admin_password = Some(REDACTED.to_string());
        }
        config
    }

    /// Render as TOML with secrets redacted.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_redacted_toml(&self) -> HubResult<String> {
        toml::to_string_pretty(&self.redacted()).map_err(|e| {
            HubError::from(ConfigError::new(format!(
                "Failed to render configuration: {}",
                e
            )))
        })
    }
}
