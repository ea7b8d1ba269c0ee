//! Test utilities for PortfolioHub workflow tests.
//!
//! Wires every service against in-memory stores, a manual clock and a
//! scriptable moderator.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use portfoliohub_core::{
    Account, AccountId, Listing, ListingDraft, ListingId, ListingStatus, ModerationVerdict,
    RewardTable, Role,
};
use portfoliohub_error::{HubResult, ModerationError, ModerationErrorKind, StoreError, StoreErrorKind};
use portfoliohub_interface::{AccountStore, Clock, ListingStore, Moderator, Snapshot};
use portfoliohub_moderation::{FallbackModerator, ModerationGateway};
use portfoliohub_services::{
    AdminCredentials, AdminService, CommentWorkflow, ExchangeService, InteractionService, Ledger,
    ListingService, ProbabilisticViewAward, ViewAwardPolicy,
};
use portfoliohub_storage::{
    InMemoryAccountStore, InMemoryCommentStore, InMemoryConfigStore, InMemoryListingStore,
    ManualClock,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::{Notify, watch};

/// Fixed start instant for deterministic timestamps.
pub fn epoch() -> DateTime<Utc> {
    DateTime::from_timestamp(1_750_000_000, 0).unwrap()
}

/// What a [`ScriptedModerator`] answers.
#[derive(Debug, Clone)]
pub enum ModeratorScript {
    /// Approve everything
    Approve,
    /// Reject everything with the reason
    Reject(String),
    /// Fail every call
    Fail,
}

/// Moderator double that counts calls.
#[derive(Debug)]
pub struct ScriptedModerator {
    script: ModeratorScript,
    calls: AtomicUsize,
}

impl ScriptedModerator {
    pub fn new(script: ModeratorScript) -> Self {
        Self {
            script,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Moderator for ScriptedModerator {
    async fn moderate(&self, _text: &str) -> HubResult<ModerationVerdict> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.script {
            ModeratorScript::Approve => Ok(ModerationVerdict::approved(0.9)),
            ModeratorScript::Reject(reason) => Ok(ModerationVerdict::rejected(reason.clone(), 0.9)),
            ModeratorScript::Fail => Err(ModerationError::new(ModerationErrorKind::Unavailable(
                "scripted outage".to_string(),
            ))
            .into()),
        }
    }
}

/// Moderator that signals when a call starts and answers only when released.
#[derive(Debug)]
pub struct GatedModerator {
    verdict: ModerationVerdict,
    pub started: Notify,
    pub release: Notify,
}

impl GatedModerator {
    pub fn new(verdict: ModerationVerdict) -> Self {
        Self {
            verdict,
            started: Notify::new(),
            release: Notify::new(),
        }
    }
}

#[async_trait]
impl Moderator for GatedModerator {
    async fn moderate(&self, _text: &str) -> HubResult<ModerationVerdict> {
        self.started.notify_one();
        self.release.notified().await;
        Ok(self.verdict.clone())
    }
}

/// Listing store whose inserts always fail.
#[derive(Debug, Default)]
pub struct FailingListingStore {
    inner: InMemoryListingStore,
}

#[async_trait]
impl ListingStore for FailingListingStore {
    async fn insert_listing(&self, _listing: &Listing) -> HubResult<()> {
        Err(StoreError::new(StoreErrorKind::Unavailable("write rejected".to_string())).into())
    }

    async fn listing(&self, id: &ListingId) -> HubResult<Option<Listing>> {
        self.inner.listing(id).await
    }

    async fn listings(&self) -> HubResult<Vec<Listing>> {
        self.inner.listings().await
    }

    async fn listings_with_status(&self, status: ListingStatus) -> HubResult<Vec<Listing>> {
        self.inner.listings_with_status(status).await
    }

    async fn increment_counters(&self, id: &ListingId, likes: u64, views: u64) -> HubResult<Listing> {
        self.inner.increment_counters(id, likes, views).await
    }

    async fn set_status(&self, id: &ListingId, status: ListingStatus) -> HubResult<Listing> {
        self.inner.set_status(id, status).await
    }

    async fn delete_listing(&self, id: &ListingId) -> HubResult<()> {
        self.inner.delete_listing(id).await
    }

    fn watch_listings(&self) -> watch::Receiver<Snapshot<Listing>> {
        self.inner.watch_listings()
    }
}

/// Every service over shared in-memory stores.
pub struct TestHub {
    pub clock: ManualClock,
    pub accounts: Arc<InMemoryAccountStore>,
    pub listing_store: Arc<dyn ListingStore>,
    pub comment_store: Arc<InMemoryCommentStore>,
    pub config_store: Arc<InMemoryConfigStore>,
    pub ledger: Ledger,
    pub listings: ListingService,
    pub comments: CommentWorkflow,
    pub interactions: InteractionService,
    pub exchange: ExchangeService,
    pub admin: AdminService,
}

impl TestHub {
    /// Fallback-only moderation, views never paid.
    pub fn new() -> Self {
        Self::build(
            Arc::new(ModerationGateway::fallback_only(FallbackModerator::default())),
            Arc::new(ProbabilisticViewAward::new(0.0, Some(1))),
            Arc::new(InMemoryListingStore::new()),
        )
    }

    pub fn with_moderator(moderator: Arc<dyn Moderator>) -> Self {
        Self::build(
            moderator,
            Arc::new(ProbabilisticViewAward::new(0.0, Some(1))),
            Arc::new(InMemoryListingStore::new()),
        )
    }

    pub fn with_view_policy(policy: Arc<dyn ViewAwardPolicy>) -> Self {
        Self::build(
            Arc::new(ModerationGateway::fallback_only(FallbackModerator::default())),
            policy,
            Arc::new(InMemoryListingStore::new()),
        )
    }

    pub fn with_listing_store(store: Arc<dyn ListingStore>) -> Self {
        Self::build(
            Arc::new(ModerationGateway::fallback_only(FallbackModerator::default())),
            Arc::new(ProbabilisticViewAward::new(0.0, Some(1))),
            store,
        )
    }

    /// Must be called inside a Tokio runtime: spawns the moderation worker.
    pub fn build(
        moderator: Arc<dyn Moderator>,
        policy: Arc<dyn ViewAwardPolicy>,
        listing_store: Arc<dyn ListingStore>,
    ) -> Self {
        let clock = ManualClock::at(epoch());
        let shared_clock: Arc<dyn Clock> = Arc::new(clock.clone());
        let accounts = Arc::new(InMemoryAccountStore::new());
        let comment_store = Arc::new(InMemoryCommentStore::new());
        let config_store = Arc::new(InMemoryConfigStore::new());
        let ledger = Ledger::new(accounts.clone(), RewardTable::default());

        let (comments, worker) = CommentWorkflow::new(
            comment_store.clone(),
            moderator,
            ledger.clone(),
            Arc::clone(&shared_clock),
            500,
        );
        worker.spawn();

        let listings = ListingService::new(
            Arc::clone(&listing_store),
            ledger.clone(),
            Arc::clone(&shared_clock),
        );
        let interactions = InteractionService::new(
            Arc::clone(&listing_store),
            ledger.clone(),
            policy,
            Arc::clone(&shared_clock),
        );
        let exchange = ExchangeService::new(ledger.clone());
        let admin = AdminService::new(
            Arc::clone(&listing_store),
            config_store.clone(),
            comments.clone(),
            ledger.clone(),
            shared_clock,
        )
        .with_credentials(AdminCredentials::new("root", "hunter22"));

        Self {
            clock,
            accounts,
            listing_store,
            comment_store,
            config_store,
            ledger,
            listings,
            comments,
            interactions,
            exchange,
            admin,
        }
    }

    /// Insert an account with explicit balances and role.
    pub async fn account(&self, id: &str, role: Role, points: i64, credits: i64) -> Account {
        let mut account =
            Account::new_member(AccountId::from(id), id.to_uppercase(), None, points, self.clock.now());
        account.role = role;
        account.credits = credits;
        self.accounts.insert_account(&account).await.unwrap();
        account
    }

    pub async fn member(&self, id: &str, points: i64, credits: i64) -> Account {
        self.account(id, Role::Member, points, credits).await
    }

    /// Current (points, credits) of an account.
    pub async fn balances(&self, id: &AccountId) -> (i64, i64) {
        let account = self.ledger.account(id).await.unwrap();
        (account.points, account.credits)
    }
}

pub fn draft(title: &str) -> ListingDraft {
    ListingDraft::builder()
        .title(title)
        .description("Work in progress")
        .image_url("https://img.example/cover.png")
        .tags("illustration, , color ")
        .build()
        .unwrap()
}
