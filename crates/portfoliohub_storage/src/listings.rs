//! The `portfolios` collection.

use crate::collection::Collection;
use async_trait::async_trait;
use portfoliohub_core::{Listing, ListingId, ListingStatus};
use portfoliohub_error::{HubResult, StoreError};
use portfoliohub_interface::{ListingStore, Snapshot};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, instrument};

/// In-memory listing documents.
#[derive(Debug, Clone)]
pub struct InMemoryListingStore {
    listings: Arc<Collection<ListingId, Listing>>,
}

impl InMemoryListingStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            listings: Arc::new(Collection::new("portfolios")),
        }
    }

    fn not_found(&self, id: &ListingId) -> StoreError {
        StoreError::not_found(self.listings.name(), id.as_str())
    }
}

impl Default for InMemoryListingStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ListingStore for InMemoryListingStore {
    #[instrument(skip(self, listing), fields(listing_id = %listing.id))]
    async fn insert_listing(&self, listing: &Listing) -> HubResult<()> {
        self.listings
            .insert_new(listing.id.clone(), listing.clone())
            .await?;
        debug!(expires_at = %listing.expires_at, "Listing stored");
        Ok(())
    }

    async fn listing(&self, id: &ListingId) -> HubResult<Option<Listing>> {
        Ok(self.listings.get(id).await)
    }

    async fn listings(&self) -> HubResult<Vec<Listing>> {
        Ok(self.listings.all().await)
    }

    async fn listings_with_status(&self, status: ListingStatus) -> HubResult<Vec<Listing>> {
        Ok(self
            .listings
            .filter(|listing| listing.status == status)
            .await)
    }

    #[instrument(skip(self), fields(listing_id = %id))]
    async fn increment_counters(
        &self,
        id: &ListingId,
        likes: u64,
        views: u64,
    ) -> HubResult<Listing> {
        self.listings
            .modify(id, |listing| {
                listing.likes += likes;
                listing.views += views;
                Ok(listing.clone())
            })
            .await?
            .ok_or_else(|| self.not_found(id).into())
    }

    #[instrument(skip(self), fields(listing_id = %id))]
    async fn set_status(&self, id: &ListingId, status: ListingStatus) -> HubResult<Listing> {
        self.listings
            .modify(id, |listing| {
                listing.status = status;
                Ok(listing.clone())
            })
            .await?
            .ok_or_else(|| self.not_found(id).into())
    }

    #[instrument(skip(self), fields(listing_id = %id))]
    async fn delete_listing(&self, id: &ListingId) -> HubResult<()> {
        self.listings
            .remove(id)
            .await
            .map(|_| ())
            .ok_or_else(|| self.not_found(id).into())
    }

    fn watch_listings(&self) -> watch::Receiver<Snapshot<Listing>> {
        self.listings.subscribe()
    }
}
