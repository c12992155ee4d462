//! Integration tests for Group repository using in-memory SurrealDB.

use agora_core::error::AgoraError;
use agora_core::models::group::{CreateGroup, UpdateGroup};
use agora_core::models::group_membership::CreateGroupMembership;
use agora_core::models::user::{CreateUser, UserStatus};
use agora_core::repository::{GroupRepository, Pagination, UserRepository};
use agora_db::repository::{SurrealGroupRepository, SurrealUserRepository};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use uuid::Uuid;

/// Helper: spin up in-memory DB, run migrations, create 2 users.
async fn setup() -> (
    Surreal<Db>,
    Uuid, // user_a_id
    Uuid, // user_b_id
) {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    agora_db::run_migrations(&db).await.unwrap();

    let user_repo = SurrealUserRepository::new(db.clone());
    let user_a = user_repo
        .create(user_input("alice"))
        .await
        .unwrap();
    let user_b = user_repo
        .create(user_input("bob"))
        .await
        .unwrap();

    (db, user_a.id, user_b.id)
}

fn user_input(username: &str) -> CreateUser {
    CreateUser {
        username: username.into(),
        email: format!("{username}@example.com"),
        display_name: username.into(),
        status: UserStatus::Enabled,
        language: None,
        registration_group_id: None,
    }
}

fn group_input(name: &str) -> CreateGroup {
    CreateGroup {
        name: name.into(),
        ..Default::default()
    }
}

fn membership(group_id: Uuid, user_id: Uuid, is_group_manager: bool) -> CreateGroupMembership {
    CreateGroupMembership {
        group_id,
        user_id,
        is_group_manager,
        created_by: None,
    }
}

#[tokio::test]
async fn create_and_get_group() {
    let (db, user_a, _) = setup().await;
    let repo = SurrealGroupRepository::new(db);

    let group = repo
        .create(CreateGroup {
            name: "Developers".into(),
            description: "Software developers".into(),
            show_at_directory: true,
            created_by: Some(user_a),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(group.name, "Developers");
    assert_eq!(group.description, "Software developers");
    assert_eq!(group.sort_order, 100);
    assert!(group.show_at_directory);
    assert_eq!(group.created_by, Some(user_a));

    let fetched = repo.get_by_id(group.id).await.unwrap();
    assert_eq!(fetched, group);
}

#[tokio::test]
async fn zero_sort_order_is_stored_as_default() {
    let (db, _, _) = setup().await;
    let repo = SurrealGroupRepository::new(db);

    let group = repo
        .create(CreateGroup {
            name: "Zero".into(),
            sort_order: Some(0),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(group.sort_order, 100);

    let updated = repo
        .update(
            group.id,
            UpdateGroup {
                sort_order: Some(7),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.sort_order, 7);
}

#[tokio::test]
async fn update_group() {
    let (db, _, user_b) = setup().await;
    let repo = SurrealGroupRepository::new(db);

    let group = repo
        .create(CreateGroup {
            name: "Original".into(),
            description: "Original desc".into(),
            ..Default::default()
        })
        .await
        .unwrap();

    let space_id = Uuid::new_v4();
    let updated = repo
        .update(
            group.id,
            UpdateGroup {
                name: Some("Renamed".into()),
                space_id: Some(Some(space_id)),
                updated_by: Some(user_b),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "Renamed");
    assert_eq!(updated.description, "Original desc"); // unchanged
    assert_eq!(updated.space_id, Some(space_id));
    assert_eq!(updated.updated_by, Some(user_b));

    let cleared = repo
        .update(
            group.id,
            UpdateGroup {
                space_id: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(cleared.space_id, None);
}

#[tokio::test]
async fn over_long_name_is_rejected() {
    let (db, _, _) = setup().await;
    let repo = SurrealGroupRepository::new(db);

    let result = repo.create(group_input(&"x".repeat(46))).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn admin_group_cannot_be_offered_at_registration() {
    let (db, _, _) = setup().await;
    let repo = SurrealGroupRepository::new(db);

    let created = repo
        .create(CreateGroup {
            name: "Admins".into(),
            is_admin_group: true,
            show_at_registration: true,
            ..Default::default()
        })
        .await;
    assert!(matches!(created, Err(AgoraError::Validation { .. })));

    let admin = repo
        .create(CreateGroup {
            name: "Admins".into(),
            is_admin_group: true,
            ..Default::default()
        })
        .await
        .unwrap();
    let updated = repo
        .update(
            admin.id,
            UpdateGroup {
                show_at_registration: Some(true),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(updated, Err(AgoraError::Validation { .. })));

    let open = repo
        .create(CreateGroup {
            name: "Open".into(),
            show_at_registration: true,
            ..Default::default()
        })
        .await
        .unwrap();
    let promoted = repo
        .update(
            open.id,
            UpdateGroup {
                is_admin_group: Some(true),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(promoted, Err(AgoraError::Validation { .. })));

    let stored = repo.get_by_id(admin.id).await.unwrap();
    assert!(!stored.show_at_registration);
    assert!(!repo.get_by_id(open.id).await.unwrap().is_admin_group);
}

#[tokio::test]
async fn delete_group_removes_memberships() {
    let (db, user_a, _) = setup().await;
    let repo = SurrealGroupRepository::new(db);

    let group = repo.create(group_input("ToDelete")).await.unwrap();
    repo.add_member(membership(group.id, user_a, false))
        .await
        .unwrap();

    repo.delete(group.id).await.unwrap();

    assert!(repo.find_by_id(group.id).await.unwrap().is_none());
    assert!(matches!(
        repo.get_by_id(group.id).await,
        Err(AgoraError::NotFound { .. })
    ));
    assert!(repo.get_user_groups(user_a).await.unwrap().is_empty());
}

#[tokio::test]
async fn list_groups_with_pagination() {
    let (db, _, _) = setup().await;
    let repo = SurrealGroupRepository::new(db);

    for i in 0..5 {
        repo.create(group_input(&format!("group-{i}"))).await.unwrap();
    }

    let page1 = repo
        .list(Pagination {
            offset: 0,
            limit: 3,
        })
        .await
        .unwrap();
    assert_eq!(page1.items.len(), 3);
    assert_eq!(page1.total, 5);

    let page2 = repo
        .list(Pagination {
            offset: 3,
            limit: 3,
        })
        .await
        .unwrap();
    assert_eq!(page2.items.len(), 2);
}

// -----------------------------------------------------------------------
// Listings
// -----------------------------------------------------------------------

#[tokio::test]
async fn directory_groups_by_sort_order_then_name() {
    let (db, _, _) = setup().await;
    let repo = SurrealGroupRepository::new(db);

    for (name, sort_order, show) in [
        ("Beta", Some(10), true),
        ("Alpha", Some(10), true),
        ("First", Some(1), true),
        ("Hidden", Some(0), false),
        ("Default", None, true),
    ] {
        repo.create(CreateGroup {
            name: name.into(),
            sort_order,
            show_at_directory: show,
            ..Default::default()
        })
        .await
        .unwrap();
    }

    let names: Vec<String> = repo
        .list_directory_groups()
        .await
        .unwrap()
        .into_iter()
        .map(|g| g.name)
        .collect();
    assert_eq!(names, ["First", "Alpha", "Beta", "Default"]);
}

#[tokio::test]
async fn registration_groups_exclude_admin_group() {
    let (db, _, _) = setup().await;
    let repo = SurrealGroupRepository::new(db);

    for (name, show_at_registration, is_admin_group) in [
        ("Volunteers", true, false),
        ("Admins", false, true),
        ("Members", true, false),
        ("Internal", false, false),
    ] {
        repo.create(CreateGroup {
            name: name.into(),
            show_at_registration,
            is_admin_group,
            ..Default::default()
        })
        .await
        .unwrap();
    }

    let names: Vec<String> = repo
        .list_registration_groups()
        .await
        .unwrap()
        .into_iter()
        .map(|g| g.name)
        .collect();
    assert_eq!(names, ["Members", "Volunteers"]);
}

#[tokio::test]
async fn find_admin_group() {
    let (db, _, _) = setup().await;
    let repo = SurrealGroupRepository::new(db);

    assert!(repo.find_admin_group().await.unwrap().is_none());

    repo.create(group_input("Users")).await.unwrap();
    let admins = repo
        .create(CreateGroup {
            name: "Administrators".into(),
            is_admin_group: true,
            ..Default::default()
        })
        .await
        .unwrap();

    let found = repo.find_admin_group().await.unwrap().unwrap();
    assert_eq!(found.id, admins.id);
}

// -----------------------------------------------------------------------
// Membership
// -----------------------------------------------------------------------

#[tokio::test]
async fn add_and_get_membership() {
    let (db, user_a, user_b) = setup().await;
    let repo = SurrealGroupRepository::new(db);
    let group = repo.create(group_input("Team")).await.unwrap();

    let link = repo
        .add_member(CreateGroupMembership {
            group_id: group.id,
            user_id: user_a,
            is_group_manager: true,
            created_by: Some(user_b),
        })
        .await
        .unwrap();

    assert_eq!(link.group_id, group.id);
    assert_eq!(link.user_id, user_a);
    assert!(link.is_group_manager);
    assert_eq!(link.created_by, Some(user_b));

    let fetched = repo.get_membership(group.id, user_a).await.unwrap().unwrap();
    assert_eq!(fetched.user_id, user_a);
    assert!(fetched.is_group_manager);

    assert!(repo.get_membership(group.id, user_b).await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_membership_rejected() {
    let (db, user_a, _) = setup().await;
    let repo = SurrealGroupRepository::new(db);
    let group = repo.create(group_input("Team")).await.unwrap();

    repo.add_member(membership(group.id, user_a, false))
        .await
        .unwrap();
    let second = repo.add_member(membership(group.id, user_a, true)).await;

    assert!(
        matches!(second, Err(AgoraError::AlreadyExists { .. })),
        "expected AlreadyExists, got {second:?}"
    );
    assert_eq!(repo.count_members(group.id).await.unwrap(), 1);
    assert_eq!(repo.count_managers(group.id, None).await.unwrap(), 0);
}

#[tokio::test]
async fn add_member_requires_existing_records() {
    let (db, user_a, _) = setup().await;
    let repo = SurrealGroupRepository::new(db);
    let group = repo.create(group_input("Team")).await.unwrap();

    let unknown_user = repo
        .add_member(membership(group.id, Uuid::new_v4(), false))
        .await;
    assert!(matches!(unknown_user, Err(AgoraError::NotFound { .. })));

    let unknown_group = repo
        .add_member(membership(Uuid::new_v4(), user_a, false))
        .await;
    assert!(matches!(unknown_group, Err(AgoraError::NotFound { .. })));
}

#[tokio::test]
async fn remove_member() {
    let (db, user_a, user_b) = setup().await;
    let repo = SurrealGroupRepository::new(db);
    let group = repo.create(group_input("Team")).await.unwrap();

    repo.add_member(membership(group.id, user_a, false))
        .await
        .unwrap();

    assert!(!repo.remove_member(group.id, user_b).await.unwrap());
    assert_eq!(repo.count_members(group.id).await.unwrap(), 1);

    assert!(repo.remove_member(group.id, user_a).await.unwrap());
    assert_eq!(repo.count_members(group.id).await.unwrap(), 0);
    assert!(!repo.remove_member(group.id, user_a).await.unwrap());
}

#[tokio::test]
async fn counts_and_member_listings() {
    let (db, user_a, user_b) = setup().await;
    let repo = SurrealGroupRepository::new(db);
    let group = repo.create(group_input("Team")).await.unwrap();

    assert_eq!(repo.count_members(group.id).await.unwrap(), 0);
    assert_eq!(repo.count_managers(group.id, None).await.unwrap(), 0);

    repo.add_member(membership(group.id, user_b, false))
        .await
        .unwrap();
    repo.add_member(membership(group.id, user_a, true))
        .await
        .unwrap();

    assert_eq!(repo.count_members(group.id).await.unwrap(), 2);
    assert_eq!(repo.count_managers(group.id, None).await.unwrap(), 1);
    assert_eq!(
        repo.count_managers(group.id, Some(user_a)).await.unwrap(),
        1
    );
    assert_eq!(
        repo.count_managers(group.id, Some(user_b)).await.unwrap(),
        0
    );

    let members = repo
        .get_members(group.id, Pagination::default())
        .await
        .unwrap();
    assert_eq!(members.total, 2);
    let usernames: Vec<&str> = members.items.iter().map(|u| u.username.as_str()).collect();
    assert_eq!(usernames, ["alice", "bob"]);

    let managers = repo.get_managers(group.id).await.unwrap();
    assert_eq!(managers.len(), 1);
    assert_eq!(managers[0].id, user_a);
}

#[tokio::test]
async fn user_groups_lists_every_membership() {
    let (db, user_a, user_b) = setup().await;
    let repo = SurrealGroupRepository::new(db);

    let first = repo
        .create(CreateGroup {
            name: "First".into(),
            sort_order: Some(1),
            ..Default::default()
        })
        .await
        .unwrap();
    let second = repo.create(group_input("Second")).await.unwrap();
    repo.create(group_input("Other")).await.unwrap();

    repo.add_member(membership(second.id, user_a, false))
        .await
        .unwrap();
    repo.add_member(membership(first.id, user_a, true))
        .await
        .unwrap();

    let ids: Vec<Uuid> = repo
        .get_user_groups(user_a)
        .await
        .unwrap()
        .into_iter()
        .map(|g| g.id)
        .collect();
    assert_eq!(ids, [first.id, second.id]);

    assert!(repo.get_user_groups(user_b).await.unwrap().is_empty());
}
