//! Service assembly over the in-memory backend.

use crate::HubConfig;
use derive_getters::Getters;
use portfoliohub_interface::{Clock, SystemClock};
use portfoliohub_moderation::ModerationGateway;
use portfoliohub_services::{
    AccountService, AdminService, CommentWorkflow, ExchangeService, InteractionService, Ledger,
    ListingService, view_policy_from_config,
};
use portfoliohub_storage::{
    InMemoryAccountStore, InMemoryCommentStore, InMemoryConfigStore, InMemoryListingStore,
    LocalIdentityProvider,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{error, info, instrument};

/// Every PortfolioHub service wired to shared stores.
///
/// Construction spawns the comment moderation worker, so it must happen
/// inside a Tokio runtime. Call [`PortfolioHub::shutdown`] to stop it.
#[derive(Getters)]
pub struct PortfolioHub {
    config: HubConfig,
    clock: Arc<dyn Clock>,
    identity: Arc<LocalIdentityProvider>,
    moderator: Arc<ModerationGateway>,
    ledger: Ledger,
    accounts: AccountService,
    listings: ListingService,
    comments: CommentWorkflow,
    interactions: InteractionService,
    exchange: ExchangeService,
    admin: AdminService,
    #[getter(skip)]
    worker: JoinHandle<()>,
}

impl PortfolioHub {
    /// Assemble against in-memory stores and the system clock.
    pub fn in_memory(config: HubConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Assemble against in-memory stores and the given clock.
    #[instrument(skip_all)]
    pub fn with_clock(config: HubConfig, clock: Arc<dyn Clock>) -> Self {
        let account_store = Arc::new(InMemoryAccountStore::new());
        let listing_store = Arc::new(InMemoryListingStore::new());
        let comment_store = Arc::new(InMemoryCommentStore::new());
        let config_store = Arc::new(InMemoryConfigStore::new());
        let identity = Arc::new(LocalIdentityProvider::new());

        let moderator = Arc::new(ModerationGateway::from_config(&config.moderation));
        let ledger = Ledger::new(account_store.clone(), config.rewards);

        let (comments, worker) = CommentWorkflow::new(
            comment_store,
            moderator.clone(),
            ledger.clone(),
            Arc::clone(&clock),
            config.comments.max_length,
        );
        let worker = worker.spawn();

        let accounts = AccountService::new(
            identity.clone(),
            account_store,
            Arc::clone(&clock),
            &config.rewards,
            Duration::from_secs(config.auth.sign_in_timeout_secs),
        );
        let listings =
            ListingService::new(listing_store.clone(), ledger.clone(), Arc::clone(&clock));
        let interactions = InteractionService::new(
            listing_store.clone(),
            ledger.clone(),
            view_policy_from_config(&config.views),
            Arc::clone(&clock),
        );
        let exchange = ExchangeService::new(ledger.clone());

        let mut admin = AdminService::new(
            listing_store,
            config_store,
            comments.clone(),
            ledger.clone(),
            Arc::clone(&clock),
        );
        if let Some(credentials) = config.admin_credentials() {
            admin = admin.with_credentials(credentials);
        }

        info!(
            classifier = moderator.has_classifier(),
            view_policy = %config.views.policy,
            "PortfolioHub assembled"
        );

        Self {
            config,
            clock,
            identity,
            moderator,
            ledger,
            accounts,
            listings,
            comments,
            interactions,
            exchange,
            admin,
            worker,
        }
    }

    /// Stop the moderation worker after it drains queued comments.
    pub async fn shutdown(self) {
        self.comments.shutdown();
        if let Err(e) = self.worker.await {
            error!(error = %e, "Moderation worker ended abnormally");
        }
    }
}

impl std::fmt::Debug for PortfolioHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortfolioHub")
            .field("config", &self.config)
            .field("classifier", &self.moderator.has_classifier())
            .finish_non_exhaustive()
    }
}
