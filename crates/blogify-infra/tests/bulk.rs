mod common;

use blogify_core::DomainError;
use blogify_core::domain::{PostStatus, Role};
use blogify_core::ports::PostRepository;
use uuid::Uuid;

use common::World;

#[tokio::test]
async fn bulk_approve_updates_every_post() {
    let world = World::new();
    let admin = world.user("Root", Role::Admin).await;
    let author = world.user("Alice", Role::User).await;
    let a = world.post(author, PostStatus::Pending).await;
    let b = world.post(author, PostStatus::Rejected).await;
    let c = world.post(author, PostStatus::Pending).await;
    let ids = vec![a.id, b.id, c.id];

    let outcome = world
        .bulk
        .bulk_set_status(admin, ids.clone(), "APPROVED")
        .await
        .unwrap();

    assert_eq!(outcome.affected, 3);
    assert_eq!(outcome.post_ids, ids);
    for id in ids {
        let post = world.reread(id).await.unwrap();
        assert_eq!(post.status, PostStatus::Approved);
        assert!(post.updated_at >= post.created_at);
    }
}

#[tokio::test]
async fn one_missing_id_fails_the_whole_batch() {
    let world = World::new();
    let admin = world.user("Root", Role::Admin).await;
    let author = world.user("Alice", Role::User).await;
    let a = world.post(author, PostStatus::Pending).await;
    let b = world.post(author, PostStatus::Rejected).await;

    let result = world
        .bulk
        .bulk_set_status(admin, vec![a.id, Uuid::new_v4(), b.id], "APPROVED")
        .await;

    assert!(matches!(
        result,
        Err(DomainError::MissingFromSet {
            missing: 1,
            requested: 3,
            ..
        })
    ));
    assert_eq!(world.reread(a.id).await.unwrap().status, PostStatus::Pending);
    assert_eq!(world.reread(b.id).await.unwrap().status, PostStatus::Rejected);
}

#[tokio::test]
async fn bulk_delete_removes_only_the_listed_posts() {
    let world = World::new();
    let admin = world.user("Root", Role::Admin).await;
    let author = world.user("Alice", Role::User).await;
    let a = world.post(author, PostStatus::Pending).await;
    let b = world.post(author, PostStatus::Approved).await;
    let c = world.post(author, PostStatus::Rejected).await;

    let outcome = world
        .bulk
        .bulk_delete(admin, vec![a.id, b.id])
        .await
        .unwrap();

    assert_eq!(outcome.affected, 2);
    let remaining = world.moderation.list_posts(admin, None).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].post.id, c.id);
}

#[tokio::test]
async fn bulk_delete_with_missing_id_deletes_nothing() {
    let world = World::new();
    let admin = world.user("Root", Role::Admin).await;
    let a = world.post(admin, PostStatus::Pending).await;

    let result = world.bulk.bulk_delete(admin, vec![a.id, Uuid::new_v4()]).await;

    assert!(matches!(result, Err(DomainError::MissingFromSet { .. })));
    assert!(world.reread(a.id).await.is_some());
}

#[tokio::test]
async fn bulk_operations_are_admin_only() {
    let world = World::new();
    let author = world.user("Alice", Role::User).await;
    let a = world.post(author, PostStatus::Pending).await;

    let update = world
        .bulk
        .bulk_set_status(author, vec![a.id], "APPROVED")
        .await;
    let delete = world.bulk.bulk_delete(author, vec![a.id]).await;

    assert!(matches!(update, Err(DomainError::Unauthorized)));
    assert!(matches!(delete, Err(DomainError::Unauthorized)));
    assert_eq!(world.reread(a.id).await.unwrap().status, PostStatus::Pending);
}

#[tokio::test]
async fn malformed_batches_are_invalid_arguments() {
    let world = World::new();
    let admin = world.user("Root", Role::Admin).await;
    let a = world.post(admin, PostStatus::Pending).await;

    let empty = world.bulk.bulk_set_status(admin, vec![], "APPROVED").await;
    let repeated = world
        .bulk
        .bulk_set_status(admin, vec![a.id, a.id], "APPROVED")
        .await;
    let bad_status = world.bulk.bulk_set_status(admin, vec![a.id], "LIVE").await;
    let empty_delete = world.bulk.bulk_delete(admin, vec![]).await;

    for result in [empty, repeated, bad_status, empty_delete] {
        assert!(matches!(result, Err(DomainError::InvalidArgument(_))));
    }
}

#[tokio::test]
async fn concurrent_delete_only_lowers_the_affected_count() {
    let world = World::new();
    let admin = world.user("Root", Role::Admin).await;
    let a = world.post(admin, PostStatus::Pending).await;
    let b = world.post(admin, PostStatus::Pending).await;

    // Simulates a row vanishing after validation: the set-based update just skips it.
    world.store.delete_many(&[b.id]).await.unwrap();
    let affected = world
        .store
        .update_status_many(&[a.id, b.id], PostStatus::Approved, chrono::Utc::now())
        .await
        .unwrap();

    assert_eq!(affected, 1);
}
