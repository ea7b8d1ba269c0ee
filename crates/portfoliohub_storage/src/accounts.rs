//! The `users` collection.

use crate::collection::Collection;
use async_trait::async_trait;
use portfoliohub_core::{Account, AccountId, AccountUpdate, BalanceDelta};
use portfoliohub_error::{HubResult, LedgerError, LedgerErrorKind};
use portfoliohub_interface::{AccountStore, Snapshot};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, instrument};

/// In-memory account documents.
#[derive(Debug, Clone)]
pub struct InMemoryAccountStore {
    accounts: Arc<Collection<AccountId, Account>>,
}

impl InMemoryAccountStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            accounts: Arc::new(Collection::new("users")),
        }
    }
}

impl Default for InMemoryAccountStore {
    fn default() -> Self {
        Self::new()
    }
}

fn not_found(id: &AccountId) -> LedgerError {
    LedgerError::new(LedgerErrorKind::AccountNotFound(id.to_string()))
}

/// Reject `delta` if any counter it decrements would end below zero.
fn check_guard(account: &Account, delta: &BalanceDelta) -> Result<(), LedgerError> {
    if would_go_negative(account.credits, delta.credits) {
        return Err(LedgerError::new(LedgerErrorKind::InsufficientCredits {
            required: delta.credits.saturating_neg(),
            available: account.credits,
        }));
    }
    if would_go_negative(account.points, delta.points) {
        return Err(LedgerError::new(LedgerErrorKind::InsufficientPoints {
            required: delta.points.saturating_neg(),
            available: account.points,
        }));
    }
    Ok(())
}

fn would_go_negative(balance: i64, change: i64) -> bool {
    change < 0 && balance.checked_add(change).is_none_or(|next| next < 0)
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    #[instrument(skip(self, account), fields(account_id = %account.id))]
    async fn insert_account(&self, account: &Account) -> HubResult<()> {
        self.accounts
            .insert_new(account.id.clone(), account.clone())
            .await
            .map_err(|_| LedgerError::new(LedgerErrorKind::AccountExists(account.id.to_string())))?;
        debug!(collection = self.accounts.name(), "Account created");
        Ok(())
    }

    async fn account(&self, id: &AccountId) -> HubResult<Option<Account>> {
        Ok(self.accounts.get(id).await)
    }

    async fn accounts(&self) -> HubResult<Vec<Account>> {
        Ok(self.accounts.all().await)
    }

    #[instrument(skip(self), fields(account_id = %id))]
    async fn increment(&self, id: &AccountId, delta: BalanceDelta) -> HubResult<Account> {
        self.accounts
            .modify(id, |account| {
                account.apply(&delta)?;
                Ok(account.clone())
            })
            .await?
            .ok_or_else(|| not_found(id).into())
    }

    #[instrument(skip(self), fields(account_id = %id))]
    async fn increment_guarded(&self, id: &AccountId, delta: BalanceDelta) -> HubResult<Account> {
        self.accounts
            .modify(id, |account| {
                check_guard(account, &delta)?;
                account.apply(&delta)?;
                Ok(account.clone())
            })
            .await?
            .ok_or_else(|| not_found(id).into())
    }

    #[instrument(skip(self, update), fields(account_id = %id))]
    async fn update_account(&self, id: &AccountId, update: &AccountUpdate) -> HubResult<Account> {
        self.accounts
            .modify(id, |account| {
                account.apply_update(update);
                Ok(account.clone())
            })
            .await?
            .ok_or_else(|| not_found(id).into())
    }

    fn watch_accounts(&self) -> watch::Receiver<Snapshot<Account>> {
        self.accounts.subscribe()
    }
}
