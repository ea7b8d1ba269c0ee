//! Scripted walk through the economy: buy credits, publish, like, comment.

use crate::PortfolioHub;
use portfoliohub_core::{Account, Comment, Listing, ListingDraft, ListingDuration};
use portfoliohub_error::{HubResult, StoreError};
use portfoliohub_interface::Credentials;
use portfoliohub_services::{Purchase, ViewerSession};
use tracing::{info, instrument};

/// Comment the viewer leaves on the artist's listing.
pub const SCENARIO_COMMENT: &str = "Great work!";

/// State after [`run_scenario`].
#[derive(Debug, Clone)]
pub struct ScenarioReport {
    /// Package purchase by the artist
    pub purchase: Purchase,
    /// Listing as of the end of the run
    pub listing: Listing,
    /// Viewer's comment after moderation
    pub comment: Comment,
    /// Artist account at the end
    pub artist: Account,
    /// Viewer account at the end
    pub viewer: Account,
}

/// Run the two-member scenario against `hub`.
///
/// The artist signs up, buys the basic package and publishes a one-hour
/// listing. The viewer signs up, likes it and comments. Returns once the
/// comment has been moderated.
///
/// # Errors
///
/// Any service error along the way.
#[instrument(skip(hub))]
pub async fn run_scenario(hub: &PortfolioHub) -> HubResult<ScenarioReport> {
    let artist = hub
        .accounts()
        .sign_up(&Credentials::new("artist@portfoliohub.dev", "artist-pass"), "Artist")
        .await?;
    let viewer = hub
        .accounts()
        .sign_up(&Credentials::new("viewer@portfoliohub.dev", "viewer-pass"), "Viewer")
        .await?;

    let purchase = hub.exchange().purchase_package(&artist.id, "basic").await?;
    info!(points = purchase.account.points, credits = purchase.account.credits, "Artist bought credits");

    let draft = ListingDraft {
        title: "Desert light".to_string(),
        description: "Colour studies from a week in the dunes".to_string(),
        image_url: "https://images.portfoliohub.dev/desert-light.png".to_string(),
        tags: "painting, landscape".to_string(),
    };
    let listing = hub
        .listings()
        .create_listing(&artist.id, &draft, ListingDuration::OneHour)
        .await?;

    let mut session = ViewerSession::open(viewer.id.clone(), listing.id.clone());
    hub.interactions().view_listing(&mut session).await?;
    hub.interactions().like_listing(&mut session).await?;

    let comment = hub
        .comments()
        .submit_comment(&listing.id, &viewer, SCENARIO_COMMENT)
        .await?;
    hub.comments().flush().await;

    let comment = hub
        .comments()
        .comment(&comment.id)
        .await?
        .ok_or_else(|| StoreError::not_found("comments", comment.id.as_str()))?;
    let listing = hub
        .listings()
        .listing(&listing.id)
        .await?
        .ok_or_else(|| StoreError::not_found("portfolios", listing.id.as_str()))?;

    Ok(ScenarioReport {
        purchase,
        listing,
        comment,
        artist: hub.ledger().account(&artist.id).await?,
        viewer: hub.ledger().account(&viewer.id).await?,
    })
}
