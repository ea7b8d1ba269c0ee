//! Ledger, package exchange and listing creation tests.
//!
//! Spends are verified against the guarded update: concurrent spends can
//! never drive a balance negative.

mod test_utils;

use chrono::Duration;
use portfoliohub_core::{AccountId, BalanceField, ListingDuration, ListingStatus, RewardAction};
use portfoliohub_error::{LedgerErrorKind, ValidationErrorKind};
use portfoliohub_interface::ListingStore;
use portfoliohub_services::ListingOrder;
use std::sync::Arc;
use test_utils::{FailingListingStore, TestHub, draft};

#[tokio::test]
async fn test_adjust_balance_is_unclamped() {
    let hub = TestHub::new();
    let a = hub.member("a", 3, 0).await;

    let account = hub
        .ledger
        .adjust_balance(&a.id, BalanceField::Points, -5)
        .await
        .unwrap();
    assert_eq!(account.points, -2);

    let account = hub
        .ledger
        .adjust_balance(&a.id, BalanceField::Credits, 4)
        .await
        .unwrap();
    assert_eq!(account.credits, 4);
}

#[tokio::test]
async fn test_adjust_balance_missing_account() {
    let hub = TestHub::new();
    let err = hub
        .ledger
        .adjust_balance(&AccountId::from("ghost"), BalanceField::Points, 1)
        .await
        .unwrap_err();
    assert_eq!(
        err.ledger_kind(),
        Some(&LedgerErrorKind::AccountNotFound("ghost".to_string()))
    );
}

#[tokio::test]
async fn test_award_uses_reward_table() {
    let hub = TestHub::new();
    let a = hub.member("a", 0, 0).await;
    hub.ledger.award(&a.id, RewardAction::CommentPosted).await.unwrap();
    hub.ledger.award(&a.id, RewardAction::LikeReceived).await.unwrap();
    assert_eq!(hub.balances(&a.id).await, (3, 0));
}

#[tokio::test]
async fn test_purchase_standard_package() {
    let hub = TestHub::new();
    let a = hub.member("a", 20, 2).await;

    let purchase = hub.exchange.purchase_package(&a.id, "standard").await.unwrap();
    assert_eq!(purchase.package.total_credits(), 6);
    assert_eq!((purchase.account.points, purchase.account.credits), (0, 8));
    assert_eq!(hub.balances(&a.id).await, (0, 8));
}

#[tokio::test]
async fn test_purchase_insufficient_points_writes_nothing() {
    let hub = TestHub::new();
    let a = hub.member("a", 39, 0).await;

    let err = hub.exchange.purchase_package(&a.id, "premium").await.unwrap_err();
    assert_eq!(
        err.ledger_kind(),
        Some(&LedgerErrorKind::InsufficientPoints {
            required: 40,
            available: 39
        })
    );
    assert!(err.user_message().contains("Insufficient points"));
    assert_eq!(hub.balances(&a.id).await, (39, 0));
}

#[tokio::test]
async fn test_purchase_unknown_package() {
    let hub = TestHub::new();
    let a = hub.member("a", 100, 0).await;
    let err = hub.exchange.purchase_package(&a.id, "mega").await.unwrap_err();
    assert_eq!(
        err.validation_kind(),
        Some(&ValidationErrorKind::UnknownPackage("mega".to_string()))
    );
}

#[tokio::test]
async fn test_concurrent_purchases_never_overdraw() {
    let hub = Arc::new(TestHub::new());
    let a = hub.member("a", 10, 0).await;

    let tasks: Vec<_> = (0..5)
        .map(|_| {
            let hub = Arc::clone(&hub);
            let id = a.id.clone();
            tokio::spawn(async move { hub.exchange.purchase_package(&id, "basic").await.is_ok() })
        })
        .collect();
    let mut bought = 0;
    for task in tasks {
        if task.await.unwrap() {
            bought += 1;
        }
    }
    assert_eq!(bought, 2);
    assert_eq!(hub.balances(&a.id).await, (0, 2));
}

#[tokio::test]
async fn test_create_listing_spends_last_credit() {
    let hub = TestHub::new();
    let a = hub.member("a", 0, 1).await;

    let listing = hub
        .listings
        .create_listing(&a.id, &draft("Dunes"), ListingDuration::OneHour)
        .await
        .unwrap();
    assert_eq!(listing.status, ListingStatus::Active);
    assert_eq!(listing.expires_at - listing.created_at, Duration::hours(1));
    assert_eq!(listing.tags, vec!["illustration", "color"]);
    assert_eq!(listing.creator_name, "A");
    assert_eq!(hub.balances(&a.id).await, (0, 0));
}

#[tokio::test]
async fn test_create_listing_without_credits() {
    let hub = TestHub::new();
    let a = hub.member("a", 50, 0).await;

    let err = hub
        .listings
        .create_listing(&a.id, &draft("Dunes"), ListingDuration::OneHour)
        .await
        .unwrap_err();
    assert_eq!(
        err.ledger_kind(),
        Some(&LedgerErrorKind::InsufficientCredits {
            required: 1,
            available: 0
        })
    );
    assert_eq!(hub.balances(&a.id).await, (50, 0));
    assert!(hub.listing_store.listings().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_listing_rejects_bad_draft_before_debit() {
    let hub = TestHub::new();
    let a = hub.member("a", 0, 4).await;
    let mut bad = draft("Dunes");
    bad.image_url = "not a url".to_string();

    let err = hub
        .listings
        .create_listing(&a.id, &bad, ListingDuration::FourHours)
        .await
        .unwrap_err();
    assert!(matches!(
        err.validation_kind(),
        Some(ValidationErrorKind::InvalidUrl { .. })
    ));
    assert_eq!(hub.balances(&a.id).await, (0, 4));
}

#[tokio::test]
async fn test_concurrent_listing_creation_never_overdraws() {
    let hub = Arc::new(TestHub::new());
    let a = hub.member("a", 0, 3).await;

    let tasks: Vec<_> = (0..6)
        .map(|i| {
            let hub = Arc::clone(&hub);
            let id = a.id.clone();
            tokio::spawn(async move {
                hub.listings
                    .create_listing(&id, &draft(&format!("Piece {}", i)), ListingDuration::OneHour)
                    .await
                    .is_ok()
            })
        })
        .collect();
    let mut created = 0;
    for task in tasks {
        if task.await.unwrap() {
            created += 1;
        }
    }
    assert_eq!(created, 3);
    assert_eq!(hub.balances(&a.id).await, (0, 0));
    assert_eq!(hub.listing_store.listings().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_failed_listing_write_refunds_credits() {
    let hub = TestHub::with_listing_store(Arc::new(FailingListingStore::default()));
    let a = hub.member("a", 0, 8).await;

    let err = hub
        .listings
        .create_listing(&a.id, &draft("Dunes"), ListingDuration::EightHours)
        .await
        .unwrap_err();
    assert!(err.user_message().contains("write rejected"));
    assert_eq!(hub.balances(&a.id).await, (0, 8));
}

#[tokio::test]
async fn test_visibility_follows_clock() {
    let hub = TestHub::new();
    let a = hub.member("a", 0, 1).await;
    let listing = hub
        .listings
        .create_listing(&a.id, &draft("Dunes"), ListingDuration::OneHour)
        .await
        .unwrap();

    hub.clock.set(listing.expires_at - Duration::seconds(1));
    assert_eq!(hub.listings.visible_listings(ListingOrder::Newest).await.unwrap().len(), 1);
    assert_eq!(hub.listings.remaining_time(&listing).to_string(), "0m");

    hub.clock.set(listing.expires_at + Duration::seconds(1));
    assert!(hub.listings.visible_listings(ListingOrder::Newest).await.unwrap().is_empty());
    assert_eq!(hub.listings.remaining_time(&listing).to_string(), "expired");

    // Stored status is untouched by expiry.
    let stored = hub.listing_store.listing(&listing.id).await.unwrap().unwrap();
    assert_eq!(stored.status, ListingStatus::Active);
}

#[tokio::test]
async fn test_feed_orders_and_trending() {
    let hub = TestHub::new();
    let a = hub.member("a", 0, 10).await;

    let older = hub
        .listings
        .create_listing(&a.id, &draft("Older"), ListingDuration::FourHours)
        .await
        .unwrap();
    hub.clock.advance(Duration::minutes(5));
    let newer = hub
        .listings
        .create_listing(&a.id, &draft("Newer"), ListingDuration::FourHours)
        .await
        .unwrap();
    hub.listing_store.increment_counters(&older.id, 2, 4).await.unwrap();

    let newest: Vec<_> = hub
        .listings
        .visible_listings(ListingOrder::Newest)
        .await
        .unwrap()
        .into_iter()
        .map(|l| l.id)
        .collect();
    assert_eq!(newest, vec![newer.id.clone(), older.id.clone()]);

    let trending: Vec<_> = hub
        .listings
        .visible_listings(ListingOrder::Trending)
        .await
        .unwrap()
        .into_iter()
        .map(|l| l.id)
        .collect();
    assert_eq!(trending, vec![older.id.clone(), newer.id.clone()]);
    assert_eq!(hub.listings.trending_count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_feed_subscription_tracks_new_listings_and_expiry() {
    let hub = TestHub::new();
    let a = hub.member("a", 0, 2).await;
    let mut feed = hub.listings.subscribe_visible(ListingOrder::Newest);
    assert!(feed.current().is_empty());

    let listing = hub
        .listings
        .create_listing(&a.id, &draft("Dunes"), ListingDuration::TwoHours)
        .await
        .unwrap();
    let seen = feed.changed().await.unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].id, listing.id);

    hub.clock.advance(Duration::hours(2));
    assert!(feed.current().is_empty());
}
