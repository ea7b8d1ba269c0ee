//! The `comments` collection.

use crate::collection::Collection;
use async_trait::async_trait;
use portfoliohub_core::{Comment, CommentId, CommentStatus, ListingId};
use portfoliohub_error::{HubResult, StoreError};
use portfoliohub_interface::{CommentStore, Snapshot};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::instrument;

/// In-memory comment documents.
#[derive(Debug, Clone)]
pub struct InMemoryCommentStore {
    comments: Arc<Collection<CommentId, Comment>>,
}

impl InMemoryCommentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            comments: Arc::new(Collection::new("comments")),
        }
    }

    fn not_found(&self, id: &CommentId) -> StoreError {
        StoreError::not_found(self.comments.name(), id.as_str())
    }
}

impl Default for InMemoryCommentStore {
    fn default() -> Self {
        Self::new()
    }
}

fn copy_moderation(stored: &mut Comment, from: &Comment) {
    stored.status = from.status;
    stored.moderation_reason = from.moderation_reason.clone();
    stored.moderation_confidence = from.moderation_confidence;
    stored.moderated_at = from.moderated_at;
}

#[async_trait]
impl CommentStore for InMemoryCommentStore {
    #[instrument(skip(self, comment), fields(comment_id = %comment.id))]
    async fn insert_comment(&self, comment: &Comment) -> HubResult<()> {
        self.comments
            .insert_new(comment.id.clone(), comment.clone())
            .await
    }

    async fn comment(&self, id: &CommentId) -> HubResult<Option<Comment>> {
        Ok(self.comments.get(id).await)
    }

    async fn comments_for_listing(
        &self,
        listing: &ListingId,
        status: CommentStatus,
    ) -> HubResult<Vec<Comment>> {
        Ok(self
            .comments
            .filter(|comment| &comment.portfolio_id == listing && comment.status == status)
            .await)
    }

    async fn comments_with_status(&self, status: CommentStatus) -> HubResult<Vec<Comment>> {
        Ok(self
            .comments
            .filter(|comment| comment.status == status)
            .await)
    }

    /// Writes the moderation fields only; `points_awarded` is owned by
    /// [`CommentStore::mark_points_awarded`].
    #[instrument(skip(self, comment), fields(comment_id = %comment.id, status = %comment.status))]
    async fn update_comment(&self, comment: &Comment) -> HubResult<()> {
        self.comments
            .modify(&comment.id, |stored| {
                copy_moderation(stored, comment);
                Ok(())
            })
            .await?
            .ok_or_else(|| self.not_found(&comment.id).into())
    }

    #[instrument(skip(self, comment), fields(comment_id = %comment.id, status = %comment.status))]
    async fn update_comment_if_pending(&self, comment: &Comment) -> HubResult<Option<Comment>> {
        self.comments
            .modify_when(
                &comment.id,
                |stored| stored.status == CommentStatus::Pending,
                |stored| {
                    copy_moderation(stored, comment);
                    Ok(stored.clone())
                },
            )
            .await?
            .ok_or_else(|| self.not_found(&comment.id).into())
    }

    #[instrument(skip(self), fields(comment_id = %id))]
    async fn mark_points_awarded(&self, id: &CommentId) -> HubResult<bool> {
        self.comments
            .modify(id, |stored| {
                let flipped = !stored.points_awarded;
                stored.points_awarded = true;
                Ok(flipped)
            })
            .await?
            .ok_or_else(|| self.not_found(id).into())
    }

    fn watch_comments(&self) -> watch::Receiver<Snapshot<Comment>> {
        self.comments.subscribe()
    }
}
