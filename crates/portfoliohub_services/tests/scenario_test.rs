//! End-to-end flow across exchange, listings, likes and comments.

mod test_utils;

use portfoliohub_core::{CommentStatus, ListingDuration};
use portfoliohub_services::{ListingOrder, ViewerSession};
use test_utils::{TestHub, draft};

#[tokio::test]
async fn test_buy_publish_like_comment() {
    let hub = TestHub::new();
    let a = hub.member("a", 25, 0).await;
    let b = hub.member("b", 25, 0).await;

    let purchase = hub.exchange.purchase_package(&a.id, "basic").await.unwrap();
    assert_eq!((purchase.account.points, purchase.account.credits), (20, 1));

    let listing = hub
        .listings
        .create_listing(&a.id, &draft("Dunes"), ListingDuration::OneHour)
        .await
        .unwrap();
    assert_eq!(hub.balances(&a.id).await, (20, 0));
    assert_eq!(
        hub.listings.visible_listings(ListingOrder::Newest).await.unwrap().len(),
        1
    );

    let mut session = ViewerSession::open(b.id.clone(), listing.id.clone());
    let liked = hub.interactions.like_listing(&mut session).await.unwrap().unwrap();
    assert_eq!(liked.likes, 1);
    assert_eq!(hub.balances(&a.id).await, (21, 0));

    let comment = hub
        .comments
        .submit_comment(&listing.id, &b, "Great work!")
        .await
        .unwrap();
    assert_eq!(comment.status, CommentStatus::Pending);

    hub.comments.flush().await;
    let approved = hub.comments.approved_comments(&listing.id).await.unwrap();
    assert_eq!(approved.len(), 1);
    assert_eq!(approved[0].content, "Great work!");
    assert_eq!(hub.balances(&b.id).await, (27, 0));

    hub.clock.advance(chrono::Duration::hours(1));
    assert!(
        hub.listings
            .visible_listings(ListingOrder::Newest)
            .await
            .unwrap()
            .is_empty()
    );
}
