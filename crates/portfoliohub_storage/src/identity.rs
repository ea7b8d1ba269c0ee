//! Local development identity provider.

use async_trait::async_trait;
use portfoliohub_core::AccountId;
use portfoliohub_error::{AuthError, AuthErrorKind, HubResult};
use portfoliohub_interface::{Credentials, Identity, IdentityProvider};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{RwLock, watch};
use tracing::{debug, info, instrument};

const MIN_PASSWORD_CHARS: usize = 6;

#[derive(Debug, Clone)]
struct Registration {
    password: String,
    identity: Identity,
}

/// Email/password registry kept in memory, for development and tests.
///
/// An optional artificial latency lets callers exercise sign-in timeouts.
#[derive(Debug, Clone)]
pub struct LocalIdentityProvider {
    users: Arc<RwLock<HashMap<String, Registration>>>,
    current: Arc<watch::Sender<Option<Identity>>>,
    latency: Option<Duration>,
}

impl LocalIdentityProvider {
    /// Create an empty registry.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
            current: Arc::new(tx),
            latency: None,
        }
    }

    /// Delay every sign-in and sign-up by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    async fn simulate_latency(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }

    fn failed(reason: &str) -> AuthError {
        AuthError::new(AuthErrorKind::SignInFailed(reason.to_string()))
    }
}

impl Default for LocalIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityProvider for LocalIdentityProvider {
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    async fn sign_in(&self, credentials: &Credentials) -> HubResult<Identity> {
        self.simulate_latency().await;
        let users = self.users.read().await;
        let registration = users
            .get(&credentials.email)
            .filter(|registration| registration.password == credentials.password)
            .ok_or_else(|| Self::failed("invalid email or password"))?;
        let identity = registration.identity.clone();
        drop(users);

        self.current.send_replace(Some(identity.clone()));
        info!(account_id = %identity.id, "Signed in");
        Ok(identity)
    }

    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    async fn sign_up(&self, credentials: &Credentials, display_name: &str) -> HubResult<Identity> {
        self.simulate_latency().await;
        if credentials.email.trim().is_empty()
            || credentials.password.chars().count() < MIN_PASSWORD_CHARS
        {
            return Err(Self::failed("email and a password of at least 6 characters are required").into());
        }

        let mut users = self.users.write().await;
        if users.contains_key(&credentials.email) {
            return Err(Self::failed("email already registered").into());
        }
        let identity = Identity {
            id: AccountId::from(format!("dev-{}", uuid::Uuid::new_v4())),
            display_name: display_name.to_string(),
            photo_url: None,
            email: Some(credentials.email.clone()),
        };
        users.insert(
            credentials.email.clone(),
            Registration {
                password: credentials.password.clone(),
                identity: identity.clone(),
            },
        );
        drop(users);

        self.current.send_replace(Some(identity.clone()));
        debug!(account_id = %identity.id, "Registered");
        Ok(identity)
    }

    async fn sign_out(&self) -> HubResult<()> {
        self.current.send_replace(None);
        Ok(())
    }

    fn current_user(&self) -> Option<Identity> {
        self.current.borrow().clone()
    }

    fn watch_auth(&self) -> watch::Receiver<Option<Identity>> {
        self.current.subscribe()
    }
}
