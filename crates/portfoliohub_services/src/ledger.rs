//! Balance mutations on account documents.

use portfoliohub_core::{Account, AccountId, BalanceDelta, BalanceField, RewardAction, RewardTable};
use portfoliohub_error::{HubResult, LedgerError, LedgerErrorKind};
use portfoliohub_interface::AccountStore;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Every balance change in the system goes through a `Ledger`.
///
/// Awards and admin grants use plain atomic increments. Spends use the
/// store's guarded increment so that a balance never drops below zero, even
/// under concurrent spends.
#[derive(Clone)]
pub struct Ledger {
    accounts: Arc<dyn AccountStore>,
    rewards: RewardTable,
}

impl Ledger {
    /// Creates a ledger over an account store.
    pub fn new(accounts: Arc<dyn AccountStore>, rewards: RewardTable) -> Self {
        Self { accounts, rewards }
    }

    /// Point values paid per action.
    pub fn rewards(&self) -> &RewardTable {
        &self.rewards
    }

    /// Underlying account store.
    pub fn accounts(&self) -> &Arc<dyn AccountStore> {
        &self.accounts
    }

    /// Read an account that must exist.
    pub async fn account(&self, id: &AccountId) -> HubResult<Account> {
        self.accounts
            .account(id)
            .await?
            .ok_or_else(|| LedgerError::new(LedgerErrorKind::AccountNotFound(id.to_string())).into())
    }

    /// Atomically add `delta` to one counter. Not clamped at zero.
    ///
    /// # Errors
    ///
    /// `AccountNotFound` when the account does not exist.
    #[instrument(skip(self), fields(account_id = %id))]
    pub async fn adjust_balance(
        &self,
        id: &AccountId,
        field: BalanceField,
        delta: i64,
    ) -> HubResult<Account> {
        self.apply(id, BalanceDelta::of(field, delta)).await
    }

    /// Atomically add a two-field delta. Not clamped at zero.
    #[instrument(skip(self), fields(account_id = %id))]
    pub async fn apply(&self, id: &AccountId, delta: BalanceDelta) -> HubResult<Account> {
        let account = self.accounts.increment(id, delta).await?;
        debug!(
            points = account.points,
            credits = account.credits,
            "Balance adjusted"
        );
        Ok(account)
    }

    /// Atomically apply `delta` only if no decremented counter would go negative.
    ///
    /// # Errors
    ///
    /// `InsufficientCredits` or `InsufficientPoints`; nothing is written.
    #[instrument(skip(self), fields(account_id = %id))]
    pub async fn spend(&self, id: &AccountId, delta: BalanceDelta) -> HubResult<Account> {
        let account = self.accounts.increment_guarded(id, delta).await?;
        debug!(
            points = account.points,
            credits = account.credits,
            "Guarded spend committed"
        );
        Ok(account)
    }

    /// Pay the points `action` is worth.
    #[instrument(skip(self), fields(account_id = %id))]
    pub async fn award(&self, id: &AccountId, action: RewardAction) -> HubResult<Account> {
        let points = self.rewards.points_for(action);
        debug!(%action, points, "Awarding points");
        self.apply(id, BalanceDelta::points(points)).await
    }
}

impl std::fmt::Debug for Ledger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ledger")
            .field("rewards", &self.rewards)
            .finish_non_exhaustive()
    }
}
