//! Trait definitions for document stores, moderation and identity.

use crate::{Credentials, Identity, Snapshot};
use async_trait::async_trait;
use portfoliohub_core::{
    Account, AccountId, AccountUpdate, BackupMarker, BalanceDelta, Comment, CommentId,
    CommentStatus, Listing, ListingId, ListingStatus, MaintenanceConfig, ModerationVerdict,
};
use portfoliohub_error::HubResult;
use tokio::sync::watch;

/// The `users` collection.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Create an account document. Fails with a conflict if the id is taken.
    async fn insert_account(&self, account: &Account) -> HubResult<()>;

    /// Read one account.
    async fn account(&self, id: &AccountId) -> HubResult<Option<Account>>;

    /// Read every account.
    async fn accounts(&self) -> HubResult<Vec<Account>>;

    /// Atomically add `delta` to the account's counters.
    ///
    /// Concurrent increments compose; no clamping at zero.
    ///
    /// # Errors
    ///
    /// `AccountNotFound` when the account does not exist.
    async fn increment(&self, id: &AccountId, delta: BalanceDelta) -> HubResult<Account>;

    /// Atomically add `delta` only if no decremented counter would end below zero.
    ///
    /// # Errors
    ///
    /// `AccountNotFound`, or `InsufficientCredits`/`InsufficientPoints` naming
    /// the first counter that would go negative. Nothing is written on error.
    async fn increment_guarded(&self, id: &AccountId, delta: BalanceDelta) -> HubResult<Account>;

    /// Overwrite fields directly.
    async fn update_account(&self, id: &AccountId, update: &AccountUpdate) -> HubResult<Account>;

    /// Snapshot channel for subscriptions.
    fn watch_accounts(&self) -> watch::Receiver<Snapshot<Account>>;
}

/// The `portfolios` collection.
#[async_trait]
pub trait ListingStore: Send + Sync {
    /// Persist a new listing.
    async fn insert_listing(&self, listing: &Listing) -> HubResult<()>;

    /// Read one listing.
    async fn listing(&self, id: &ListingId) -> HubResult<Option<Listing>>;

    /// Read every listing.
    async fn listings(&self) -> HubResult<Vec<Listing>>;

    /// Equality query on the stored status.
    async fn listings_with_status(&self, status: ListingStatus) -> HubResult<Vec<Listing>>;

    /// Atomically add to the like and view counters.
    async fn increment_counters(&self, id: &ListingId, likes: u64, views: u64)
    -> HubResult<Listing>;

    /// Overwrite the stored status.
    async fn set_status(&self, id: &ListingId, status: ListingStatus) -> HubResult<Listing>;

    /// Remove a listing.
    async fn delete_listing(&self, id: &ListingId) -> HubResult<()>;

    /// Snapshot channel for subscriptions.
    fn watch_listings(&self) -> watch::Receiver<Snapshot<Listing>>;
}

/// The `comments` collection.
#[async_trait]
pub trait CommentStore: Send + Sync {
    /// Persist a new comment.
    async fn insert_comment(&self, comment: &Comment) -> HubResult<()>;

    /// Read one comment.
    async fn comment(&self, id: &CommentId) -> HubResult<Option<Comment>>;

    /// Comments on one listing with the given status.
    async fn comments_for_listing(
        &self,
        listing: &ListingId,
        status: CommentStatus,
    ) -> HubResult<Vec<Comment>>;

    /// Comments with the given status across all listings.
    async fn comments_with_status(&self, status: CommentStatus) -> HubResult<Vec<Comment>>;

    /// Replace the moderation fields of a stored comment.
    async fn update_comment(&self, comment: &Comment) -> HubResult<()>;

    /// Replace the moderation fields only while the stored comment is still
    /// pending, as one atomic step.
    ///
    /// Returns the stored comment after the write, or `None` when it had
    /// already been decided and was left untouched.
    async fn update_comment_if_pending(&self, comment: &Comment) -> HubResult<Option<Comment>>;

    /// Atomically set `points_awarded`, returning `true` only for the call that flipped it.
    async fn mark_points_awarded(&self, id: &CommentId) -> HubResult<bool>;

    /// Snapshot channel for subscriptions.
    fn watch_comments(&self) -> watch::Receiver<Snapshot<Comment>>;
}

/// The `config` singleton and the `backups` collection.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Read the maintenance document, if it was ever written.
    async fn maintenance(&self) -> HubResult<Option<MaintenanceConfig>>;

    /// Overwrite the maintenance document.
    async fn put_maintenance(&self, config: &MaintenanceConfig) -> HubResult<()>;

    /// Append a backup marker.
    async fn append_backup(&self, marker: &BackupMarker) -> HubResult<()>;

    /// Every backup marker, oldest first.
    async fn backups(&self) -> HubResult<Vec<BackupMarker>>;

    /// Channel following the maintenance document.
    fn watch_maintenance(&self) -> watch::Receiver<Option<MaintenanceConfig>>;
}

/// External text classifier (the primary moderation path).
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classify comment text.
    ///
    /// # Errors
    ///
    /// Any transport failure or response that does not match the decision
    /// contract.
    async fn classify(&self, text: &str) -> HubResult<ModerationVerdict>;

    /// Classifier name for logs (e.g., "openrouter").
    fn name(&self) -> &str;
}

/// The moderation gateway contract used by the comment workflow.
#[async_trait]
pub trait Moderator: Send + Sync {
    /// Decide whether `text` may be published.
    ///
    /// # Errors
    ///
    /// Only when no decision could be reached at all; the comment then stays
    /// pending for manual review.
    async fn moderate(&self, text: &str) -> HubResult<ModerationVerdict>;
}

/// Identity provider the account flows authenticate against.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Sign in with email and password.
    async fn sign_in(&self, credentials: &Credentials) -> HubResult<Identity>;

    /// Register a new identity and sign it in.
    async fn sign_up(&self, credentials: &Credentials, display_name: &str) -> HubResult<Identity>;

    /// End the current session.
    async fn sign_out(&self) -> HubResult<()>;

    /// Currently signed-in user.
    fn current_user(&self) -> Option<Identity>;

    /// Channel notified on every sign-in and sign-out.
    fn watch_auth(&self) -> watch::Receiver<Option<Identity>>;
}
