//! Likes and views.

use crate::{Ledger, ViewPolicyKind, ViewsConfig};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use portfoliohub_core::{AccountId, Listing, ListingId, RewardAction};
use portfoliohub_error::HubResult;
use portfoliohub_interface::{Clock, ListingStore};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, instrument};

/// Decides whether a view pays the listing's creator.
#[async_trait]
pub trait ViewAwardPolicy: Send + Sync {
    /// Called once per counted view by someone other than the creator.
    async fn should_award(&self, creator: &AccountId, now: DateTime<Utc>) -> bool;
}

/// Pays each view with a fixed probability.
#[derive(Debug)]
pub struct ProbabilisticViewAward {
    probability: f64,
    rng: Mutex<StdRng>,
}

impl ProbabilisticViewAward {
    /// Draw from OS entropy, or from `seed` for reproducible runs.
    pub fn new(probability: f64, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            probability: if probability.is_nan() {
                0.0
            } else {
                probability.clamp(0.0, 1.0)
            },
            rng: Mutex::new(rng),
        }
    }
}

#[async_trait]
impl ViewAwardPolicy for ProbabilisticViewAward {
    async fn should_award(&self, _creator: &AccountId, _now: DateTime<Utc>) -> bool {
        self.rng.lock().await.gen_bool(self.probability)
    }
}

/// Pays at most one view per creator per window.
#[derive(Debug)]
pub struct ThrottledViewAward {
    window: chrono::Duration,
    last_award: Mutex<HashMap<AccountId, DateTime<Utc>>>,
}

impl ThrottledViewAward {
    /// Creates the throttle.
    pub fn new(window: chrono::Duration) -> Self {
        Self {
            window,
            last_award: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl ViewAwardPolicy for ThrottledViewAward {
    async fn should_award(&self, creator: &AccountId, now: DateTime<Utc>) -> bool {
        let mut last_award = self.last_award.lock().await;
        match last_award.get(creator) {
            Some(last) if now - *last < self.window => false,
            _ => {
                last_award.insert(creator.clone(), now);
                true
            }
        }
    }
}

/// Build the policy named by the settings.
pub fn view_policy_from_config(config: &ViewsConfig) -> Arc<dyn ViewAwardPolicy> {
    match config.policy {
        ViewPolicyKind::Probabilistic => {
            Arc::new(ProbabilisticViewAward::new(config.probability, config.seed))
        }
        ViewPolicyKind::Throttled => Arc::new(ThrottledViewAward::new(chrono::Duration::seconds(
            i64::try_from(config.throttle_secs).unwrap_or(i64::MAX),
        ))),
    }
}

/// One viewer's open detail view of a listing.
///
/// Likes and views count at most once per session. Nothing is persisted, so
/// a new session may like the same listing again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerSession {
    viewer: AccountId,
    listing: ListingId,
    liked: bool,
    viewed: bool,
}

impl ViewerSession {
    /// Open a fresh session.
    pub fn open(viewer: AccountId, listing: ListingId) -> Self {
        Self {
            viewer,
            listing,
            liked: false,
            viewed: false,
        }
    }

    /// Viewing account.
    pub fn viewer(&self) -> &AccountId {
        &self.viewer
    }

    /// Listing on display.
    pub fn listing(&self) -> &ListingId {
        &self.listing
    }

    /// Whether this session already liked the listing.
    pub fn has_liked(&self) -> bool {
        self.liked
    }

    /// Whether this session's view was counted.
    pub fn has_viewed(&self) -> bool {
        self.viewed
    }
}

/// Result of a counted view.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewOutcome {
    /// Listing after the increment
    pub listing: Listing,
    /// Whether the creator was paid for this view
    pub awarded: bool,
}

/// Like and view counters with their point awards.
#[derive(Clone)]
pub struct InteractionService {
    listings: Arc<dyn ListingStore>,
    ledger: Ledger,
    policy: Arc<dyn ViewAwardPolicy>,
    clock: Arc<dyn Clock>,
}

impl InteractionService {
    /// Creates the service.
    pub fn new(
        listings: Arc<dyn ListingStore>,
        ledger: Ledger,
        policy: Arc<dyn ViewAwardPolicy>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            listings,
            ledger,
            policy,
            clock,
        }
    }

    /// Like the session's listing and pay its creator.
    ///
    /// Returns `None` when this session already liked it.
    #[instrument(skip(self, session), fields(listing_id = %session.listing, viewer_id = %session.viewer))]
    pub async fn like_listing(&self, session: &mut ViewerSession) -> HubResult<Option<Listing>> {
        if session.liked {
            debug!("Already liked in this session");
            return Ok(None);
        }
        let listing = self
            .listings
            .increment_counters(&session.listing, 1, 0)
            .await?;
        session.liked = true;
        self.ledger
            .award(&listing.creator_id, RewardAction::LikeReceived)
            .await?;
        debug!(likes = listing.likes, "Listing liked");
        Ok(Some(listing))
    }

    /// Count the session's first view and maybe pay the creator.
    ///
    /// Views by the creator are counted but never paid. Returns `None` when
    /// this session's view was already counted.
    #[instrument(skip(self, session), fields(listing_id = %session.listing, viewer_id = %session.viewer))]
    pub async fn view_listing(&self, session: &mut ViewerSession) -> HubResult<Option<ViewOutcome>> {
        if session.viewed {
            return Ok(None);
        }
        let listing = self
            .listings
            .increment_counters(&session.listing, 0, 1)
            .await?;
        session.viewed = true;

        let awarded = listing.creator_id != session.viewer
            && self
                .policy
                .should_award(&listing.creator_id, self.clock.now())
                .await;
        if awarded {
            self.ledger
                .award(&listing.creator_id, RewardAction::PortfolioViewed)
                .await?;
        }
        debug!(views = listing.views, awarded, "Listing viewed");
        Ok(Some(ViewOutcome { listing, awarded }))
    }
}

impl std::fmt::Debug for InteractionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InteractionService").finish_non_exhaustive()
    }
}
