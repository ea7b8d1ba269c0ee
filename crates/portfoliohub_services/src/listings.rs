//! Listing publication and visibility.

use crate::Ledger;
use chrono::{DateTime, Utc};
use portfoliohub_core::{
    AccountId, BalanceDelta, Listing, ListingDraft, ListingDuration, ListingId, ListingStatus,
    RemainingTime,
};
use portfoliohub_error::{HubResult, LedgerError, LedgerErrorKind};
use portfoliohub_interface::{Clock, ListingStore, Subscription};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// Ordering of the visible listing feed.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString,
)]
#[strum(serialize_all = "lowercase")]
pub enum ListingOrder {
    /// Newest first
    #[default]
    Newest,
    /// Most likes plus views first, ties newest first
    Trending,
}

/// The effectively visible listings of `all` at `now`, in `order`.
///
/// # Examples
///
/// ```
/// use portfoliohub_services::{ListingOrder, visible_at};
///
/// assert!(visible_at(&[], chrono::Utc::now(), ListingOrder::Newest).is_empty());
/// ```
pub fn visible_at(all: &[Listing], now: DateTime<Utc>, order: ListingOrder) -> Vec<Listing> {
    let mut visible: Vec<Listing> = all
        .iter()
        .filter(|listing| listing.is_visible_at(now))
        .cloned()
        .collect();
    match order {
        ListingOrder::Newest => visible.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        ListingOrder::Trending => visible.sort_by(|a, b| {
            b.popularity()
                .cmp(&a.popularity())
                .then(b.created_at.cmp(&a.created_at))
        }),
    }
    visible
}

/// Creates listings against a credit balance and serves the public feed.
#[derive(Clone)]
pub struct ListingService {
    listings: Arc<dyn ListingStore>,
    ledger: Ledger,
    clock: Arc<dyn Clock>,
}

impl ListingService {
    /// Creates the service.
    pub fn new(listings: Arc<dyn ListingStore>, ledger: Ledger, clock: Arc<dyn Clock>) -> Self {
        Self {
            listings,
            ledger,
            clock,
        }
    }

    /// Publish a listing for `duration`, paying one credit per hour.
    ///
    /// The debit is a guarded update, so concurrent creations can never
    /// overdraw the account. If storing the listing fails after the debit,
    /// the credits are refunded.
    ///
    /// # Errors
    ///
    /// Validation errors for the draft, `AccountNotFound`, and
    /// `InsufficientCredits` when the balance is below the cost (nothing is
    /// debited).
    #[instrument(skip(self, draft), fields(creator_id = %creator, hours = duration.hours()))]
    pub async fn create_listing(
        &self,
        creator: &AccountId,
        draft: &ListingDraft,
        duration: ListingDuration,
    ) -> HubResult<Listing> {
        draft.validate()?;

        let account = self.ledger.account(creator).await?;
        let cost = duration.credit_cost();
        if account.credits < cost {
            debug!(credits = account.credits, cost, "Not enough credits");
            return Err(LedgerError::new(LedgerErrorKind::InsufficientCredits {
                required: cost,
                available: account.credits,
            })
            .into());
        }

        let account = self.ledger.spend(creator, BalanceDelta::credits(-cost)).await?;

        let listing = Listing::publish(
            ListingId::generate(),
            draft,
            &account,
            duration,
            self.clock.now(),
        );
        if let Err(e) = self.listings.insert_listing(&listing).await {
            warn!(error = %e, cost, "Listing write failed, refunding credits");
            if let Err(refund) = self.ledger.apply(creator, BalanceDelta::credits(cost)).await {
                error!(error = %refund, cost, "Credit refund failed");
            }
            return Err(e);
        }

        info!(
            listing_id = %listing.id,
            expires_at = %listing.expires_at,
            credits_left = account.credits,
            "Listing created"
        );
        Ok(listing)
    }

    /// Read one listing.
    pub async fn listing(&self, id: &ListingId) -> HubResult<Option<Listing>> {
        self.listings.listing(id).await
    }

    /// Active, unexpired listings.
    pub async fn visible_listings(&self, order: ListingOrder) -> HubResult<Vec<Listing>> {
        let active = self
            .listings
            .listings_with_status(ListingStatus::Active)
            .await?;
        Ok(visible_at(&active, self.clock.now(), order))
    }

    /// Live view of the visible feed. Expiry is evaluated against the clock
    /// each time the view is read.
    pub fn subscribe_visible(&self, order: ListingOrder) -> Subscription<Listing> {
        let clock = Arc::clone(&self.clock);
        Subscription::new(self.listings.watch_listings(), move |all| {
            visible_at(all, clock.now(), order)
        })
    }

    /// Number of visible listings that count as trending.
    pub async fn trending_count(&self) -> HubResult<usize> {
        Ok(self
            .visible_listings(ListingOrder::Newest)
            .await?
            .iter()
            .filter(|listing| listing.is_trending())
            .count())
    }

    /// Time left before `listing` expires.
    pub fn remaining_time(&self, listing: &Listing) -> RemainingTime {
        listing.remaining_at(self.clock.now())
    }
}

impl std::fmt::Debug for ListingService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListingService").finish_non_exhaustive()
    }
}
