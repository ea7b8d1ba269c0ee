//! Tests for the in-memory document stores.

use chrono::Utc;
use portfoliohub_core::{
    Account, AccountId, AccountUpdate, BalanceDelta, Comment, CommentId, CommentStatus, Listing,
    ListingDraft, ListingDuration, ListingId, ListingStatus, MaintenanceConfig, ModerationVerdict,
    Role,
};
use portfoliohub_error::LedgerErrorKind;
use portfoliohub_interface::{
    AccountStore, CommentStore, ConfigStore, Credentials, IdentityProvider, ListingStore,
    Subscription,
};
use portfoliohub_storage::{
    InMemoryAccountStore, InMemoryCommentStore, InMemoryConfigStore, InMemoryListingStore,
    LocalIdentityProvider,
};
use std::sync::Arc;

async fn store_with(id: &str, points: i64, credits: i64) -> InMemoryAccountStore {
    let store = InMemoryAccountStore::new();
    let mut account = Account::new_member(AccountId::from(id), id, None, points, Utc::now());
    account.credits = credits;
    store.insert_account(&account).await.unwrap();
    store
}

fn listing(creator: &str) -> Listing {
    let draft = ListingDraft::builder()
        .title("Dunes")
        .description("Sand studies")
        .image_url("https://img.example/dunes.png")
        .build()
        .unwrap();
    let creator = Account::new_member(AccountId::from(creator), creator, None, 25, Utc::now());
    Listing::publish(
        ListingId::generate(),
        &draft,
        &creator,
        ListingDuration::OneHour,
        Utc::now(),
    )
}

#[tokio::test]
async fn test_duplicate_account_rejected() {
    let store = store_with("a", 25, 0).await;
    let again = Account::new_member(AccountId::from("a"), "a", None, 25, Utc::now());
    let err = store.insert_account(&again).await.unwrap_err();
    assert_eq!(
        err.ledger_kind(),
        Some(&LedgerErrorKind::AccountExists("a".to_string()))
    );
}

#[tokio::test]
async fn test_increment_missing_account() {
    let store = InMemoryAccountStore::new();
    let err = store
        .increment(&AccountId::from("ghost"), BalanceDelta::points(1))
        .await
        .unwrap_err();
    assert!(matches!(
        err.ledger_kind(),
        Some(LedgerErrorKind::AccountNotFound(_))
    ));
}

#[tokio::test]
async fn test_concurrent_increments_compose() {
    let store = store_with("a", 0, 0).await;
    let id = AccountId::from("a");
    let tasks: Vec<_> = (0..50)
        .map(|_| {
            let store = store.clone();
            let id = id.clone();
            tokio::spawn(async move { store.increment(&id, BalanceDelta::points(1)).await })
        })
        .collect();
    for task in futures::future::join_all(tasks).await {
        task.unwrap().unwrap();
    }
    assert_eq!(store.account(&id).await.unwrap().unwrap().points, 50);
}

#[tokio::test]
async fn test_concurrent_guarded_debits_never_overdraw() {
    let store = store_with("a", 0, 3).await;
    let id = AccountId::from("a");
    let tasks: Vec<_> = (0..10)
        .map(|_| {
            let store = store.clone();
            let id = id.clone();
            tokio::spawn(async move {
                store
                    .increment_guarded(&id, BalanceDelta::credits(-1))
                    .await
                    .is_ok()
            })
        })
        .collect();
    let successes = futures::future::join_all(tasks)
        .await
        .into_iter()
        .filter(|ok| *ok.as_ref().unwrap())
        .count();
    assert_eq!(successes, 3);
    assert_eq!(store.account(&id).await.unwrap().unwrap().credits, 0);
}

#[tokio::test]
async fn test_failed_guard_writes_nothing() {
    let store = store_with("a", 10, 0).await;
    let id = AccountId::from("a");
    let err = store
        .increment_guarded(&id, BalanceDelta::points(-20).and_credits(6))
        .await
        .unwrap_err();
    assert_eq!(
        err.ledger_kind(),
        Some(&LedgerErrorKind::InsufficientPoints {
            required: 20,
            available: 10
        })
    );
    let account = store.account(&id).await.unwrap().unwrap();
    assert_eq!((account.points, account.credits), (10, 0));
}

#[tokio::test]
async fn test_increment_overflow_writes_nothing() {
    let store = store_with("a", i64::MAX - 1, 0).await;
    let err = store
        .increment(&AccountId::from("a"), BalanceDelta::points(2))
        .await
        .unwrap_err();
    assert!(matches!(
        err.ledger_kind(),
        Some(LedgerErrorKind::BalanceOverflow { .. })
    ));
    let account = store.account(&AccountId::from("a")).await.unwrap().unwrap();
    assert_eq!(account.points, i64::MAX - 1);
}

#[tokio::test]
async fn test_update_overwrites_fields() {
    let store = store_with("a", 10, 0).await;
    let updated = store
        .update_account(
            &AccountId::from("a"),
            &AccountUpdate {
                role: Some(Role::Admin),
                points: Some(-4),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.role, Role::Admin);
    assert_eq!(updated.points, -4);
    assert_eq!(updated.credits, 0);
}

#[tokio::test]
async fn test_account_subscription_sees_writes() {
    let store = store_with("a", 10, 0).await;
    let mut richest = Subscription::new(store.watch_accounts(), |all: &[Account]| {
        all.iter().map(|a| a.points).collect()
    });
    assert_eq!(richest.current(), vec![10]);

    store
        .increment(&AccountId::from("a"), BalanceDelta::points(5))
        .await
        .unwrap();
    assert_eq!(richest.changed().await, Some(vec![15]));
}

#[tokio::test]
async fn test_listing_counters_and_status() {
    let store = InMemoryListingStore::new();
    let listing = listing("a");
    store.insert_listing(&listing).await.unwrap();

    let updated = store.increment_counters(&listing.id, 1, 2).await.unwrap();
    assert_eq!((updated.likes, updated.views), (1, 2));

    store
        .set_status(&listing.id, ListingStatus::Expired)
        .await
        .unwrap();
    assert!(
        store
            .listings_with_status(ListingStatus::Active)
            .await
            .unwrap()
            .is_empty()
    );

    store.delete_listing(&listing.id).await.unwrap();
    assert!(store.listing(&listing.id).await.unwrap().is_none());
    assert!(store.delete_listing(&listing.id).await.is_err());
}

#[tokio::test]
async fn test_points_awarded_flips_once() {
    let store = Arc::new(InMemoryCommentStore::new());
    let comment = Comment::pending(
        CommentId::generate(),
        ListingId::from("l"),
        AccountId::from("b"),
        "Bea",
        Role::Member,
        "Great work!",
        Utc::now(),
    );
    store.insert_comment(&comment).await.unwrap();

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let store = Arc::clone(&store);
            let id = comment.id.clone();
            tokio::spawn(async move { store.mark_points_awarded(&id).await.unwrap() })
        })
        .collect();
    let flips = futures::future::join_all(tasks)
        .await
        .into_iter()
        .filter(|flipped| *flipped.as_ref().unwrap())
        .count();
    assert_eq!(flips, 1);
}

#[tokio::test]
async fn test_update_comment_keeps_award_flag() {
    let store = InMemoryCommentStore::new();
    let mut comment = Comment::pending(
        CommentId::generate(),
        ListingId::from("l"),
        AccountId::from("b"),
        "Bea",
        Role::Member,
        "Nice",
        Utc::now(),
    );
    store.insert_comment(&comment).await.unwrap();
    store.mark_points_awarded(&comment.id).await.unwrap();

    comment.apply_verdict(&ModerationVerdict::approved(0.9), Utc::now());
    store.update_comment(&comment).await.unwrap();

    let stored = store.comment(&comment.id).await.unwrap().unwrap();
    assert_eq!(stored.status, CommentStatus::Approved);
    assert!(stored.points_awarded);
    assert_eq!(
        store
            .comments_for_listing(&ListingId::from("l"), CommentStatus::Approved)
            .await
            .unwrap()
            .len(),
        1
    );
}

#[tokio::test]
async fn test_conditional_update_leaves_decided_comments() {
    let store = InMemoryCommentStore::new();
    let mut comment = Comment::pending(
        CommentId::generate(),
        ListingId::from("l"),
        AccountId::from("b"),
        "Bea",
        Role::Member,
        "Nice",
        Utc::now(),
    );
    store.insert_comment(&comment).await.unwrap();

    let mut decided = comment.clone();
    decided.apply_verdict(&ModerationVerdict::rejected("spam", 1.0), Utc::now());
    store.update_comment(&decided).await.unwrap();

    let mut rx = store.watch_comments();
    rx.borrow_and_update();
    comment.apply_verdict(&ModerationVerdict::approved(0.9), Utc::now());
    assert!(store.update_comment_if_pending(&comment).await.unwrap().is_none());
    assert!(!rx.has_changed().unwrap());

    let stored = store.comment(&comment.id).await.unwrap().unwrap();
    assert_eq!(stored.status, CommentStatus::Rejected);
    assert_eq!(stored.moderation_reason.as_deref(), Some("spam"));

    let fresh = Comment::pending(
        CommentId::generate(),
        ListingId::from("l"),
        AccountId::from("b"),
        "Bea",
        Role::Member,
        "Nice",
        Utc::now(),
    );
    store.insert_comment(&fresh).await.unwrap();
    let mut approved = fresh.clone();
    approved.apply_verdict(&ModerationVerdict::approved(0.9), Utc::now());
    let written = store.update_comment_if_pending(&approved).await.unwrap().unwrap();
    assert_eq!(written.status, CommentStatus::Approved);

    let ghost = Comment { id: CommentId::generate(), ..fresh };
    assert!(store.update_comment_if_pending(&ghost).await.is_err());
}

#[tokio::test]
async fn test_config_store_round_trip() {
    let store = InMemoryConfigStore::new();
    assert!(store.maintenance().await.unwrap().is_none());

    let mut rx = store.watch_maintenance();
    let config = MaintenanceConfig {
        is_active: true,
        ..Default::default()
    };
    store.put_maintenance(&config).await.unwrap();
    rx.changed().await.unwrap();
    assert_eq!(rx.borrow().as_ref(), Some(&config));
}

#[tokio::test]
async fn test_local_identity_flow() {
    let auth = LocalIdentityProvider::new();
    let credentials = Credentials::new("ada@example.com", "secret-pass");

    assert!(
        auth.sign_up(&Credentials::new("x@example.com", "123"), "X")
            .await
            .is_err()
    );

    let registered = auth.sign_up(&credentials, "Ada").await.unwrap();
    assert_eq!(auth.current_user(), Some(registered.clone()));

    auth.sign_out().await.unwrap();
    assert!(auth.current_user().is_none());

    let wrong = Credentials::new("ada@example.com", "nope-nope");
    assert!(auth.sign_in(&wrong).await.is_err());

    let signed_in = auth.sign_in(&credentials).await.unwrap();
    assert_eq!(signed_in.id, registered.id);
}
