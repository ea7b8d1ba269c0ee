//! Admin override tests.

mod test_utils;

use portfoliohub_core::{
    AccountId, AccountUpdate, BalanceDelta, CommentStatus, ListingDuration, ListingId,
    ListingStatus, MaintenanceUpdate, RewardAction, Role,
};
use portfoliohub_error::{LedgerErrorKind, PermissionErrorKind};
use portfoliohub_interface::{Clock, ConfigStore};
use portfoliohub_services::ListingOrder;
use std::collections::BTreeSet;
use std::sync::Arc;
use test_utils::{ModeratorScript, ScriptedModerator, TestHub, draft};

#[tokio::test]
async fn test_members_are_refused() {
    let hub = TestHub::new();
    let m = hub.member("m", 25, 0).await;

    let err = hub.admin.accounts_by_points(&m).await.unwrap_err();
    assert!(matches!(
        err.permission_kind(),
        Some(PermissionErrorKind::AdminRequired(_))
    ));
    assert!(hub.admin.grant(&m, &m.id, BalanceDelta::points(100)).await.is_err());
    assert_eq!(hub.balances(&m.id).await, (25, 0));
}

#[tokio::test]
async fn test_set_account_is_unchecked() {
    let hub = TestHub::new();
    let admin = hub.account("admin", Role::Admin, 0, 0).await;
    let m = hub.member("m", 25, 0).await;

    let updated = hub
        .admin
        .set_account(
            &admin,
            &m.id,
            &AccountUpdate {
                role: Some(Role::Admin),
                points: Some(-10),
                credits: Some(3),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.role, Role::Admin);
    assert_eq!((updated.points, updated.credits), (-10, 3));
}

#[tokio::test]
async fn test_founder_rules() {
    let hub = TestHub::new();
    let admin = hub.account("admin", Role::Admin, 0, 0).await;
    let founder = hub.account("founder", Role::Founder, 0, 0).await;
    let m = hub.member("m", 25, 0).await;

    let promote = AccountUpdate {
        role: Some(Role::Founder),
        ..Default::default()
    };
    let err = hub.admin.set_account(&admin, &m.id, &promote).await.unwrap_err();
    assert!(matches!(
        err.permission_kind(),
        Some(PermissionErrorKind::FounderRequired(_))
    ));

    let demote = AccountUpdate {
        role: Some(Role::Member),
        ..Default::default()
    };
    assert!(hub.admin.set_account(&admin, &founder.id, &demote).await.is_err());

    assert_eq!(
        hub.admin
            .set_account(&founder, &m.id, &promote)
            .await
            .unwrap()
            .role,
        Role::Founder
    );
}

#[tokio::test]
async fn test_grants() {
    let hub = TestHub::new();
    let admin = hub.account("admin", Role::Admin, 0, 0).await;
    let a = hub.member("a", 1, 0).await;
    let b = hub.member("b", 2, 0).await;

    let account = hub
        .admin
        .grant(&admin, &a.id, BalanceDelta::points(10).and_credits(2))
        .await
        .unwrap();
    assert_eq!((account.points, account.credits), (11, 2));

    let unchanged = hub.admin.grant(&admin, &a.id, BalanceDelta::default()).await.unwrap();
    assert_eq!((unchanged.points, unchanged.credits), (11, 2));

    let report = hub
        .admin
        .bulk_grant(
            &admin,
            &[a.id.clone(), b.id.clone(), AccountId::from("ghost")],
            BalanceDelta::credits(5),
        )
        .await
        .unwrap();
    assert_eq!(report.granted.len(), 2);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, AccountId::from("ghost"));
    assert_eq!(hub.balances(&a.id).await, (11, 7));
    assert_eq!(hub.balances(&b.id).await, (2, 5));

    let empty = hub
        .admin
        .bulk_grant(&admin, &[a.id.clone()], BalanceDelta::default())
        .await
        .unwrap();
    assert!(empty.granted.is_empty() && empty.failed.is_empty());
}

#[tokio::test]
async fn test_grant_past_balance_limit_is_refused() {
    let hub = TestHub::new();
    let admin = hub.account("admin", Role::Admin, 0, 0).await;
    let rich = hub.member("rich", 0, 0).await;
    hub.admin
        .set_account(
            &admin,
            &rich.id,
            &AccountUpdate {
                points: Some(i64::MAX),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let err = hub
        .admin
        .grant(&admin, &rich.id, BalanceDelta::points(1).and_credits(4))
        .await
        .unwrap_err();
    assert_eq!(
        err.ledger_kind(),
        Some(&LedgerErrorKind::BalanceOverflow {
            field: "points".to_string(),
            current: i64::MAX,
            delta: 1,
        })
    );
    assert_eq!(hub.balances(&rich.id).await, (i64::MAX, 0));

    let report = hub
        .admin
        .bulk_grant(&admin, &[rich.id.clone(), admin.id.clone()], BalanceDelta::points(1))
        .await
        .unwrap();
    assert_eq!(report.granted.len(), 1);
    assert_eq!(report.failed[0].0, rich.id);

    assert!(hub.ledger.award(&rich.id, RewardAction::LikeReceived).await.is_err());
    assert_eq!(hub.balances(&rich.id).await, (i64::MAX, 0));
}

#[tokio::test]
async fn test_comment_approval_survives_award_overflow() {
    let hub = TestHub::with_moderator(Arc::new(ScriptedModerator::new(ModeratorScript::Fail)));
    let admin = hub.account("admin", Role::Admin, 0, 0).await;
    let rich = hub.account("rich", Role::Member, i64::MAX, 0).await;

    let comment = hub
        .comments
        .submit_comment(&ListingId::from("l1"), &rich, "Lovely palette")
        .await
        .unwrap();
    hub.comments.flush().await;

    let approved = hub.admin.approve_comment(&admin, &comment.id).await.unwrap();
    assert_eq!(approved.status, CommentStatus::Approved);
    assert_eq!(hub.balances(&rich.id).await, (i64::MAX, 0));

    let stored = hub.comments.comment(&comment.id).await.unwrap().unwrap();
    assert!(stored.points_awarded);
}

#[tokio::test]
async fn test_account_queries() {
    let hub = TestHub::new();
    let admin = hub.account("admin", Role::Admin, 0, 0).await;
    hub.member("alice", 5, 0).await;
    hub.member("bob", 50, 0).await;
    hub.member("malika", 20, 0).await;

    let ranked: Vec<i64> = hub
        .admin
        .accounts_by_points(&admin)
        .await
        .unwrap()
        .iter()
        .map(|a| a.points)
        .collect();
    assert_eq!(ranked, vec![50, 20, 5, 0]);

    let found: Vec<String> = hub
        .admin
        .search_accounts(&admin, "li")
        .await
        .unwrap()
        .into_iter()
        .map(|a| a.display_name)
        .collect();
    assert_eq!(found, vec!["ALICE", "MALIKA"]);
}

#[tokio::test]
async fn test_listing_overrides() {
    let hub = TestHub::new();
    let admin = hub.account("admin", Role::Admin, 0, 0).await;
    let a = hub.member("a", 0, 2).await;
    let first = hub
        .listings
        .create_listing(&a.id, &draft("One"), ListingDuration::OneHour)
        .await
        .unwrap();
    let second = hub
        .listings
        .create_listing(&a.id, &draft("Two"), ListingDuration::OneHour)
        .await
        .unwrap();

    hub.admin
        .set_listing_status(&admin, &first.id, ListingStatus::Pending)
        .await
        .unwrap();
    let visible = hub.listings.visible_listings(ListingOrder::Newest).await.unwrap();
    assert_eq!(visible.len(), 1);

    let pending = hub
        .admin
        .all_listings(&admin, Some(ListingStatus::Pending))
        .await
        .unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, first.id);

    hub.admin.delete_listing(&admin, &second.id).await.unwrap();
    assert_eq!(hub.admin.all_listings(&admin, None).await.unwrap().len(), 1);
    assert!(hub.listings.visible_listings(ListingOrder::Newest).await.unwrap().is_empty());

    assert!(hub.admin.delete_listing(&a, &first.id).await.is_err());
}

#[tokio::test]
async fn test_maintenance_toggle_writes_backup_first() {
    let hub = TestHub::new();
    let admin = hub.account("admin", Role::Admin, 0, 0).await;
    let founder = hub.account("founder", Role::Founder, 0, 0).await;

    assert!(hub.admin.toggle_maintenance(&admin).await.is_err());
    assert!(hub.config_store.backups().await.unwrap().is_empty());

    let started = hub.clock.now();
    let on = hub.admin.toggle_maintenance(&founder).await.unwrap();
    assert!(on.is_active);
    assert_eq!(on.start_time, started);

    let backups = hub.config_store.backups().await.unwrap();
    assert_eq!(backups.len(), 1);
    assert_eq!(backups[0].id, format!("backup_{}", started.timestamp_millis()));
    assert_eq!(backups[0].description, "Automatic backup before maintenance");

    hub.clock.advance(chrono::Duration::minutes(15));
    let off = hub.admin.toggle_maintenance(&founder).await.unwrap();
    assert!(!off.is_active);
    assert_eq!(off.start_time, started);
    assert_eq!(hub.config_store.backups().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_maintenance_admission() {
    let hub = TestHub::new();
    let founder = hub.account("founder", Role::Founder, 0, 0).await;
    let admin = hub.account("admin", Role::Admin, 0, 0).await;
    let m = hub.member("m", 25, 0).await;
    let guest = hub.member("guest", 25, 0).await;

    let config = hub
        .admin
        .update_maintenance(
            &founder,
            &MaintenanceUpdate {
                message: Some("Back at noon".to_string()),
                allowed_users: Some(BTreeSet::from([guest.id.clone()])),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(config.message, "Back at noon");
    assert!(!config.is_active);

    let config = hub.admin.toggle_maintenance(&founder).await.unwrap();
    assert_eq!(config.message, "Back at noon");
    assert!(config.admits(&admin));
    assert!(config.admits(&guest));
    assert!(!config.admits(&m));

    hub.clock.advance(chrono::Duration::minutes(7));
    let current = hub.admin.maintenance().await.unwrap();
    assert_eq!(
        current.elapsed(hub.clock.now()),
        Some(chrono::Duration::minutes(7))
    );
}

#[tokio::test]
async fn test_admin_console_credentials() {
    let hub = TestHub::new();
    assert!(hub.admin.verify_admin_credentials("root", "hunter22").is_ok());
    let err = hub
        .admin
        .verify_admin_credentials("root", "hunter22 ")
        .unwrap_err();
    assert_eq!(
        err.permission_kind(),
        Some(&PermissionErrorKind::InvalidAdminCredentials)
    );
    assert!(hub.admin.verify_admin_credentials("Root", "hunter22").is_err());
}
