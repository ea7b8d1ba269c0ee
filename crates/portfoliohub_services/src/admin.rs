//! Privileged overrides.
//!
//! Every operation takes the acting account and checks its role first.
//! Writes are unconditional once the role check passes: no balance or
//! lifecycle rule applies.

use crate::comments::MANUAL_APPROVAL_REASON;
use crate::{CommentWorkflow, Ledger};
use futures::future::join_all;
use portfoliohub_core::{
    Account, AccountId, AccountUpdate, BackupMarker, BalanceDelta, Comment, CommentId, Listing,
    ListingId, ListingStatus, MaintenanceConfig, MaintenanceUpdate, ModerationVerdict, Role,
};
use portfoliohub_error::{HubError, HubResult, PermissionError, PermissionErrorKind};
use portfoliohub_interface::{AccountStore, Clock, ConfigStore, ListingStore};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Require an admin or founder.
pub fn require_admin(actor: &Account, operation: &str) -> Result<(), PermissionError> {
    if actor.role.is_privileged() {
        Ok(())
    } else {
        warn!(actor_id = %actor.id, operation, "Admin access denied");
        Err(PermissionError::new(PermissionErrorKind::AdminRequired(
            operation.to_string(),
        )))
    }
}

/// Require the founder.
pub fn require_founder(actor: &Account, operation: &str) -> Result<(), PermissionError> {
    if actor.role.is_founder() {
        Ok(())
    } else {
        warn!(actor_id = %actor.id, operation, "Founder access denied");
        Err(PermissionError::new(PermissionErrorKind::FounderRequired(
            operation.to_string(),
        )))
    }
}

/// Outcome of a bulk grant, per account.
#[derive(Debug, Default)]
pub struct BulkGrantReport {
    /// Accounts after a successful grant
    pub granted: Vec<Account>,
    /// Accounts whose grant failed
    pub failed: Vec<(AccountId, HubError)>,
}

/// Console credentials configured for the admin login.
#[derive(Clone, PartialEq, Eq)]
pub struct AdminCredentials {
    username: String,
    password: String,
}

impl AdminCredentials {
    /// Pair the console accepts.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Admin console operations.
#[derive(Clone)]
pub struct AdminService {
    accounts: Arc<dyn AccountStore>,
    listings: Arc<dyn ListingStore>,
    config: Arc<dyn ConfigStore>,
    comments: CommentWorkflow,
    ledger: Ledger,
    clock: Arc<dyn Clock>,
    credentials: Option<AdminCredentials>,
}

impl AdminService {
    /// Creates the service.
    pub fn new(
        listings: Arc<dyn ListingStore>,
        config: Arc<dyn ConfigStore>,
        comments: CommentWorkflow,
        ledger: Ledger,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            accounts: Arc::clone(ledger.accounts()),
            listings,
            config,
            comments,
            ledger,
            clock,
            credentials: None,
        }
    }

    /// Enable the admin console login.
    pub fn with_credentials(mut self, credentials: AdminCredentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Check an admin console login by exact comparison.
    ///
    /// # Errors
    ///
    /// `InvalidAdminCredentials` on any mismatch, or when no credentials are configured.
    pub fn verify_admin_credentials(&self, username: &str, password: &str) -> HubResult<()> {
        match &self.credentials {
            Some(expected) if expected.username == username && expected.password == password => {
                info!(username, "Admin console login accepted");
                Ok(())
            }
            _ => {
                warn!(username, "Admin console login rejected");
                Err(PermissionError::new(PermissionErrorKind::InvalidAdminCredentials).into())
            }
        }
    }

    // Accounts

    /// All accounts, richest first.
    pub async fn accounts_by_points(&self, actor: &Account) -> HubResult<Vec<Account>> {
        require_admin(actor, "list accounts")?;
        let mut accounts = self.accounts.accounts().await?;
        accounts.sort_by(|a, b| b.points.cmp(&a.points));
        Ok(accounts)
    }

    /// Accounts whose display name contains `query`, ignoring case.
    pub async fn search_accounts(&self, actor: &Account, query: &str) -> HubResult<Vec<Account>> {
        require_admin(actor, "search accounts")?;
        let needle = query.trim().to_lowercase();
        let mut accounts: Vec<Account> = self
            .accounts
            .accounts()
            .await?
            .into_iter()
            .filter(|account| account.display_name.to_lowercase().contains(&needle))
            .collect();
        accounts.sort_by(|a, b| a.display_name.cmp(&b.display_name));
        Ok(accounts)
    }

    /// Overwrite role, balances or profile fields of an account.
    ///
    /// Only the founder may grant the founder role or edit the founder's account.
    #[instrument(skip(self, actor, update), fields(actor_id = %actor.id, target_id = %target))]
    pub async fn set_account(
        &self,
        actor: &Account,
        target: &AccountId,
        update: &AccountUpdate,
    ) -> HubResult<Account> {
        require_admin(actor, "edit account")?;
        if update.role == Some(Role::Founder) {
            require_founder(actor, "assign founder role")?;
        }
        let current = self.ledger.account(target).await?;
        if current.role.is_founder() {
            require_founder(actor, "edit founder account")?;
        }

        let account = self.accounts.update_account(target, update).await?;
        info!(role = %account.role, points = account.points, credits = account.credits, "Account overwritten");
        Ok(account)
    }

    /// Add points and/or credits to one account. Zero grants write nothing.
    #[instrument(skip(self, actor), fields(actor_id = %actor.id, target_id = %target))]
    pub async fn grant(
        &self,
        actor: &Account,
        target: &AccountId,
        delta: BalanceDelta,
    ) -> HubResult<Account> {
        require_admin(actor, "grant balance")?;
        if delta.is_zero() {
            debug!("Zero grant skipped");
            return self.ledger.account(target).await;
        }
        let account = self.ledger.apply(target, delta).await?;
        info!(points = delta.points, credits = delta.credits, "Balance granted");
        Ok(account)
    }

    /// Apply the same grant to many accounts concurrently.
    #[instrument(skip(self, actor, targets), fields(actor_id = %actor.id, targets = targets.len()))]
    pub async fn bulk_grant(
        &self,
        actor: &Account,
        targets: &[AccountId],
        delta: BalanceDelta,
    ) -> HubResult<BulkGrantReport> {
        require_admin(actor, "bulk grant")?;
        if delta.is_zero() {
            debug!("Zero bulk grant skipped");
            return Ok(BulkGrantReport::default());
        }

        let results = join_all(targets.iter().map(|target| async move {
            (target.clone(), self.ledger.apply(target, delta).await)
        }))
        .await;

        let mut report = BulkGrantReport::default();
        for (target, result) in results {
            match result {
                Ok(account) => report.granted.push(account),
                Err(e) => {
                    warn!(target_id = %target, error = %e, "Grant failed");
                    report.failed.push((target, e));
                }
            }
        }
        info!(
            granted = report.granted.len(),
            failed = report.failed.len(),
            "Bulk grant finished"
        );
        Ok(report)
    }

    // Listings

    /// Every listing newest first, optionally only those with `status`.
    pub async fn all_listings(
        &self,
        actor: &Account,
        status: Option<ListingStatus>,
    ) -> HubResult<Vec<Listing>> {
        require_admin(actor, "list listings")?;
        let mut listings = match status {
            Some(status) => self.listings.listings_with_status(status).await?,
            None => self.listings.listings().await?,
        };
        listings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(listings)
    }

    /// Overwrite a listing's stored status.
    #[instrument(skip(self, actor), fields(actor_id = %actor.id, listing_id = %id))]
    pub async fn set_listing_status(
        &self,
        actor: &Account,
        id: &ListingId,
        status: ListingStatus,
    ) -> HubResult<Listing> {
        require_admin(actor, "set listing status")?;
        let listing = self.listings.set_status(id, status).await?;
        info!(%status, "Listing status overwritten");
        Ok(listing)
    }

    /// Remove a listing.
    #[instrument(skip(self, actor), fields(actor_id = %actor.id, listing_id = %id))]
    pub async fn delete_listing(&self, actor: &Account, id: &ListingId) -> HubResult<()> {
        require_admin(actor, "delete listing")?;
        self.listings.delete_listing(id).await?;
        info!("Listing deleted");
        Ok(())
    }

    // Comments

    /// The review queue, newest first.
    pub async fn pending_comments(&self, actor: &Account) -> HubResult<Vec<Comment>> {
        require_admin(actor, "review comments")?;
        self.comments.pending_comments().await
    }

    /// Approve a comment, paying its author if it was never paid.
    #[instrument(skip(self, actor), fields(actor_id = %actor.id, comment_id = %id))]
    pub async fn approve_comment(&self, actor: &Account, id: &CommentId) -> HubResult<Comment> {
        require_admin(actor, "approve comment")?;
        let verdict = ModerationVerdict {
            reason: Some(MANUAL_APPROVAL_REASON.to_string()),
            ..ModerationVerdict::approved(1.0)
        };
        self.comments.override_decision(id, &verdict).await
    }

    /// Reject a comment with the admin's reason.
    #[instrument(skip(self, actor, reason), fields(actor_id = %actor.id, comment_id = %id))]
    pub async fn reject_comment(
        &self,
        actor: &Account,
        id: &CommentId,
        reason: &str,
    ) -> HubResult<Comment> {
        require_admin(actor, "reject comment")?;
        self.comments
            .override_decision(id, &ModerationVerdict::rejected(reason, 1.0))
            .await
    }

    /// Run automatic moderation again on a pending comment.
    pub async fn rerun_moderation(&self, actor: &Account, id: &CommentId) -> HubResult<Comment> {
        require_admin(actor, "rerun moderation")?;
        self.comments.moderate_now(id).await
    }

    // Maintenance

    /// Current maintenance state (defaults when never written).
    pub async fn maintenance(&self) -> HubResult<MaintenanceConfig> {
        Ok(self.config.maintenance().await?.unwrap_or_default())
    }

    /// Flip maintenance on or off.
    ///
    /// Activation writes a backup marker first, then the config with a new
    /// start time. Deactivation keeps the previous start time.
    #[instrument(skip(self, actor), fields(actor_id = %actor.id))]
    pub async fn toggle_maintenance(&self, actor: &Account) -> HubResult<MaintenanceConfig> {
        require_founder(actor, "toggle maintenance")?;
        let mut config = self.maintenance().await?;
        let now = self.clock.now();

        config.is_active = !config.is_active;
        if config.is_active {
            let marker = BackupMarker::before_maintenance(now);
            self.config.append_backup(&marker).await?;
            debug!(backup_id = %marker.id, "Backup marker written");
            config.start_time = now;
        }
        self.config.put_maintenance(&config).await?;
        info!(active = config.is_active, "Maintenance toggled");
        Ok(config)
    }

    /// Edit the maintenance notice or allow list.
    #[instrument(skip(self, actor, update), fields(actor_id = %actor.id))]
    pub async fn update_maintenance(
        &self,
        actor: &Account,
        update: &MaintenanceUpdate,
    ) -> HubResult<MaintenanceConfig> {
        require_founder(actor, "edit maintenance")?;
        let mut config = self.maintenance().await?;
        config.apply(update);
        self.config.put_maintenance(&config).await?;
        info!("Maintenance settings updated");
        Ok(config)
    }
}

impl std::fmt::Debug for AdminService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminService")
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}
