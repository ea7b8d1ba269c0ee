//! Comment submission and two-phase moderation.
//!
//! Phase one validates and stores the comment as pending, then returns.
//! Phase two runs on the [`ModerationWorker`]: it asks the moderator for a
//! verdict, writes the outcome and pays the author on approval.

use crate::Ledger;
use portfoliohub_core::{
    Account, Comment, CommentId, CommentStatus, ListingId, ModerationVerdict, RewardAction,
};
use portfoliohub_error::{HubResult, StoreError, ValidationError, ValidationErrorKind};
use portfoliohub_interface::{Clock, CommentStore, Moderator, Subscription};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

/// Reason recorded when no moderation decision could be reached.
pub const MODERATION_FAILED_REASON: &str = "automatic moderation failed - manual review required";

/// Reason recorded on manual approval.
pub const MANUAL_APPROVAL_REASON: &str = "Manually approved by an administrator";

/// Jobs for the moderation worker.
#[derive(Debug)]
pub enum ModerationMessage {
    /// Moderate a pending comment
    Moderate(CommentId),
    /// Reply once every earlier job is finished
    Flush(oneshot::Sender<()>),
    /// Stop the worker
    Shutdown,
}

/// Moderation and finalization shared by the workflow and its worker.
struct Finalizer {
    comments: Arc<dyn CommentStore>,
    moderator: Arc<dyn Moderator>,
    ledger: Ledger,
    clock: Arc<dyn Clock>,
}

impl Finalizer {
    async fn load(&self, id: &CommentId) -> HubResult<Comment> {
        self.comments
            .comment(id)
            .await?
            .ok_or_else(|| StoreError::not_found("comments", id.as_str()).into())
    }

    /// Automatic moderation of a pending comment. Decided comments are left alone.
    #[instrument(skip(self), fields(comment_id = %id))]
    async fn moderate(&self, id: &CommentId) -> HubResult<Comment> {
        let comment = self.load(id).await?;
        if comment.status != CommentStatus::Pending {
            debug!(status = %comment.status, "Comment already decided, skipping");
            return Ok(comment);
        }

        match self.moderator.moderate(&comment.content).await {
            Ok(verdict) => self.finalize_pending(comment, &verdict).await,
            Err(e) => {
                error!(error = %e, "Moderation failed, holding comment for manual review");
                self.hold_for_review(comment).await
            }
        }
    }

    async fn hold_for_review(&self, mut comment: Comment) -> HubResult<Comment> {
        comment.status = CommentStatus::Pending;
        comment.moderation_reason = Some(MODERATION_FAILED_REASON.to_string());
        comment.moderation_confidence = None;
        comment.moderated_at = Some(self.clock.now());
        match self.comments.update_comment_if_pending(&comment).await? {
            Some(stored) => Ok(stored),
            None => self.decided_meanwhile(&comment.id).await,
        }
    }

    /// Write an automatic verdict unless the comment was decided while the
    /// moderator was working. Only a verdict that lands can pay the author.
    async fn finalize_pending(
        &self,
        mut comment: Comment,
        verdict: &ModerationVerdict,
    ) -> HubResult<Comment> {
        comment.apply_verdict(verdict, self.clock.now());
        match self.comments.update_comment_if_pending(&comment).await? {
            Some(stored) => self.settle(stored, verdict).await,
            None => self.decided_meanwhile(&comment.id).await,
        }
    }

    async fn decided_meanwhile(&self, id: &CommentId) -> HubResult<Comment> {
        let current = self.load(id).await?;
        info!(
            comment_id = %id,
            status = %current.status,
            "Comment decided during moderation, automatic verdict dropped"
        );
        Ok(current)
    }

    /// Write a verdict over whatever is stored.
    async fn finalize(&self, mut comment: Comment, verdict: &ModerationVerdict) -> HubResult<Comment> {
        comment.apply_verdict(verdict, self.clock.now());
        self.comments.update_comment(&comment).await?;
        self.settle(comment, verdict).await
    }

    /// Pay the author the first time the comment is approved.
    async fn settle(&self, mut comment: Comment, verdict: &ModerationVerdict) -> HubResult<Comment> {
        if comment.owes_points() && self.comments.mark_points_awarded(&comment.id).await? {
            comment.points_awarded = true;
            if let Err(e) = self
                .ledger
                .award(&comment.author_id, RewardAction::CommentPosted)
                .await
            {
                error!(error = %e, author_id = %comment.author_id, "Comment award failed");
            }
        }

        info!(
            comment_id = %comment.id,
            status = %comment.status,
            confidence = verdict.confidence,
            "Comment moderated"
        );
        Ok(comment)
    }
}

/// Background task draining the moderation queue in submission order.
pub struct ModerationWorker {
    finalizer: Arc<Finalizer>,
    rx: mpsc::UnboundedReceiver<ModerationMessage>,
}

impl ModerationWorker {
    /// Run until shutdown or until every workflow handle is dropped.
    #[instrument(skip(self))]
    pub async fn run(mut self) {
        info!("Moderation worker started");

        while let Some(msg) = self.rx.recv().await {
            match msg {
                ModerationMessage::Moderate(id) => {
                    if let Err(e) = self.finalizer.moderate(&id).await {
                        error!(comment_id = %id, error = %e, "Moderation job failed");
                    }
                }
                ModerationMessage::Flush(done) => {
                    let _ = done.send(());
                }
                ModerationMessage::Shutdown => {
                    info!("Moderation worker shutting down");
                    break;
                }
            }
        }
    }

    /// Spawn the worker on the current runtime.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }
}

impl std::fmt::Debug for ModerationWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModerationWorker").finish_non_exhaustive()
    }
}

/// Comment submission, queries and moderation overrides.
#[derive(Clone)]
pub struct CommentWorkflow {
    finalizer: Arc<Finalizer>,
    jobs: mpsc::UnboundedSender<ModerationMessage>,
    max_length: usize,
}

impl CommentWorkflow {
    /// Creates the workflow and the worker that must be spawned to drain it.
    pub fn new(
        comments: Arc<dyn CommentStore>,
        moderator: Arc<dyn Moderator>,
        ledger: Ledger,
        clock: Arc<dyn Clock>,
        max_length: usize,
    ) -> (Self, ModerationWorker) {
        let (jobs, rx) = mpsc::unbounded_channel();
        let finalizer = Arc::new(Finalizer {
            comments,
            moderator,
            ledger,
            clock,
        });
        let workflow = Self {
            finalizer: Arc::clone(&finalizer),
            jobs,
            max_length,
        };
        (workflow, ModerationWorker { finalizer, rx })
    }

    /// Store a pending comment and queue it for moderation.
    ///
    /// Returns as soon as the pending comment is stored; the verdict arrives
    /// later through the comment subscriptions.
    ///
    /// # Errors
    ///
    /// `EmptyComment` for blank content and `CommentTooLong` past the limit.
    #[instrument(skip(self, author, content), fields(listing_id = %listing, author_id = %author.id))]
    pub async fn submit_comment(
        &self,
        listing: &ListingId,
        author: &Account,
        content: &str,
    ) -> HubResult<Comment> {
        let content = content.trim();
        if content.is_empty() {
            return Err(ValidationError::new(ValidationErrorKind::EmptyComment).into());
        }
        let chars = content.chars().count();
        if chars > self.max_length {
            return Err(ValidationError::new(ValidationErrorKind::CommentTooLong {
                max: self.max_length,
                actual: chars,
            })
            .into());
        }

        let comment = Comment::pending(
            CommentId::generate(),
            listing.clone(),
            author.id.clone(),
            author.display_name.clone(),
            author.role,
            content,
            self.finalizer.clock.now(),
        );
        self.finalizer.comments.insert_comment(&comment).await?;
        debug!(comment_id = %comment.id, "Pending comment stored");

        if self
            .jobs
            .send(ModerationMessage::Moderate(comment.id.clone()))
            .is_err()
        {
            warn!(comment_id = %comment.id, "Moderation worker is gone");
            return self.finalizer.hold_for_review(comment).await;
        }
        Ok(comment)
    }

    /// Run automatic moderation inline on a pending comment.
    pub async fn moderate_now(&self, id: &CommentId) -> HubResult<Comment> {
        self.finalizer.moderate(id).await
    }

    /// Overwrite a comment's decision regardless of its current state.
    pub(crate) async fn override_decision(
        &self,
        id: &CommentId,
        verdict: &ModerationVerdict,
    ) -> HubResult<Comment> {
        let comment = self.finalizer.load(id).await?;
        self.finalizer.finalize(comment, verdict).await
    }

    /// Wait until every comment submitted so far has been processed.
    pub async fn flush(&self) {
        let (tx, rx) = oneshot::channel();
        if self.jobs.send(ModerationMessage::Flush(tx)).is_ok() {
            let _ = rx.await;
        }
    }

    /// Ask the worker to stop after the jobs already queued.
    pub fn shutdown(&self) {
        let _ = self.jobs.send(ModerationMessage::Shutdown);
    }

    /// Read one comment.
    pub async fn comment(&self, id: &CommentId) -> HubResult<Option<Comment>> {
        self.finalizer.comments.comment(id).await
    }

    /// Approved comments on a listing, newest first.
    pub async fn approved_comments(&self, listing: &ListingId) -> HubResult<Vec<Comment>> {
        let mut comments = self
            .finalizer
            .comments
            .comments_for_listing(listing, CommentStatus::Approved)
            .await?;
        newest_first(&mut comments);
        Ok(comments)
    }

    /// Live view of the approved comments on a listing, newest first.
    pub fn subscribe_approved(&self, listing: &ListingId) -> Subscription<Comment> {
        let listing = listing.clone();
        Subscription::new(self.finalizer.comments.watch_comments(), move |all| {
            select(all, |c| {
                c.portfolio_id == listing && c.status == CommentStatus::Approved
            })
        })
    }

    /// Comments awaiting a decision, newest first.
    pub async fn pending_comments(&self) -> HubResult<Vec<Comment>> {
        let mut comments = self
            .finalizer
            .comments
            .comments_with_status(CommentStatus::Pending)
            .await?;
        newest_first(&mut comments);
        Ok(comments)
    }

    /// Live view of the review queue, newest first.
    pub fn subscribe_pending(&self) -> Subscription<Comment> {
        Subscription::new(self.finalizer.comments.watch_comments(), |all| {
            select(all, |c| c.status == CommentStatus::Pending)
        })
    }
}

impl std::fmt::Debug for CommentWorkflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommentWorkflow")
            .field("max_length", &self.max_length)
            .finish_non_exhaustive()
    }
}

fn newest_first(comments: &mut [Comment]) {
    comments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

fn select(all: &[Comment], keep: impl Fn(&Comment) -> bool) -> Vec<Comment> {
    let mut selected: Vec<Comment> = all.iter().filter(|c| keep(c)).cloned().collect();
    newest_first(&mut selected);
    selected
}
