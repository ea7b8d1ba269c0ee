//! Sign-up, sign-in and account documents.

use portfoliohub_core::{Account, RewardAction, RewardTable};
use portfoliohub_error::{AuthError, AuthErrorKind, HubResult, LedgerErrorKind};
use portfoliohub_interface::{AccountStore, Clock, Credentials, Identity, IdentityProvider};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument};

/// Bridges the identity provider and the `users` collection.
#[derive(Clone)]
pub struct AccountService {
    identity: Arc<dyn IdentityProvider>,
    accounts: Arc<dyn AccountStore>,
    clock: Arc<dyn Clock>,
    signup_bonus: i64,
    sign_in_timeout: Duration,
}

impl AccountService {
    /// Creates the service.
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        accounts: Arc<dyn AccountStore>,
        clock: Arc<dyn Clock>,
        rewards: &RewardTable,
        sign_in_timeout: Duration,
    ) -> Self {
        Self {
            identity,
            accounts,
            clock,
            signup_bonus: rewards.points_for(RewardAction::SignupBonus),
            sign_in_timeout,
        }
    }

    /// Register with the identity provider and create the account document.
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn sign_up(&self, credentials: &Credentials, display_name: &str) -> HubResult<Account> {
        let identity = self.identity.sign_up(credentials, display_name).await?;
        self.ensure_account(&identity).await
    }

    /// Sign in, giving up after the configured timeout.
    ///
    /// The account document is created on first sign-in.
    ///
    /// # Errors
    ///
    /// `AuthError::Timeout` when the provider does not answer in time, and
    /// any provider error.
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn sign_in(&self, credentials: &Credentials) -> HubResult<Account> {
        let identity = tokio::time::timeout(self.sign_in_timeout, self.identity.sign_in(credentials))
            .await
            .map_err(|_| {
                error!(timeout_secs = self.sign_in_timeout.as_secs(), "Sign-in timed out");
                AuthError::new(AuthErrorKind::Timeout(self.sign_in_timeout.as_secs()))
            })??;
        self.ensure_account(&identity).await
    }

    /// End the current session.
    pub async fn sign_out(&self) -> HubResult<()> {
        self.identity.sign_out().await?;
        debug!("Signed out");
        Ok(())
    }

    /// Account of the signed-in user.
    ///
    /// # Errors
    ///
    /// `NotSignedIn` when nobody is signed in.
    pub async fn current_account(&self) -> HubResult<Account> {
        let identity = self
            .identity
            .current_user()
            .ok_or_else(|| AuthError::new(AuthErrorKind::NotSignedIn))?;
        self.ensure_account(&identity).await
    }

    /// Load the identity's account, creating it with the signup bonus if missing.
    #[instrument(skip(self, identity), fields(account_id = %identity.id))]
    pub async fn ensure_account(&self, identity: &Identity) -> HubResult<Account> {
        if let Some(account) = self.accounts.account(&identity.id).await? {
            return Ok(account);
        }

        let account = Account::new_member(
            identity.id.clone(),
            identity.display_name.clone(),
            None,
            self.signup_bonus,
            self.clock.now(),
        );
        match self.accounts.insert_account(&account).await {
            Ok(()) => {
                info!(points = account.points, "Account created");
                Ok(account)
            }
            // Created concurrently by another session.
            Err(e) if matches!(e.ledger_kind(), Some(LedgerErrorKind::AccountExists(_))) => {
                match self.accounts.account(&identity.id).await? {
                    Some(existing) => Ok(existing),
                    None => Err(e),
                }
            }
            Err(e) => Err(e),
        }
    }
}

impl std::fmt::Debug for AccountService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountService")
            .field("signup_bonus", &self.signup_bonus)
            .field("sign_in_timeout", &self.sign_in_timeout)
            .finish_non_exhaustive()
    }
}
