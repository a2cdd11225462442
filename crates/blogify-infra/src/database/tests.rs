#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Arc;

    use crate::database::entity::{post, user};
    use crate::database::postgres_repo::{PostgresPostRepository, PostgresUserRepository};
    use blogify_core::domain::{Actor, Post, PostStatus, Role};
    use blogify_core::error::{DomainError, RepoError};
    use blogify_core::ports::{BaseRepository, PostFilter, PostRepository, UserRepository};
    use blogify_core::services::ModerationService;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Value};

    fn post_model(id: uuid::Uuid, status: post::Status) -> post::Model {
        let now = chrono::Utc::now();
        post::Model {
            id,
            author_id: uuid::Uuid::new_v4(),
            title: "Test Post".to_owned(),
            content: "Content".to_owned(),
            status,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[tokio::test]
    async fn test_find_post_by_id() {
        let post_id = uuid::Uuid::new_v4();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![post_model(post_id, post::Status::Approved)]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        let result: Option<Post> = repo.find_by_id(post_id).await.unwrap();

        let post = result.unwrap();
        assert_eq!(post.title, "Test Post");
        assert_eq!(post.id, post_id);
        assert_eq!(post.status, PostStatus::Approved);
    }

    #[tokio::test]
    async fn test_edit_of_post_deleted_mid_request_is_not_found() {
        let author = Actor::new(uuid::Uuid::new_v4(), Role::User);
        let mut model = post_model(uuid::Uuid::new_v4(), post::Status::Approved);
        model.author_id = author.id;
        let post_id = model.id;

        // The ownership lookup still sees the row, the UPDATE ... RETURNING no longer does.
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![model], Vec::<post::Model>::new()])
            .into_connection();

        let moderation = ModerationService::new(Arc::new(PostgresPostRepository::new(db)));
        let err = moderation
            .edit_post(author, post_id, "New title", "New content")
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_update_never_falls_back_to_insert() {
        let post = Post::new(uuid::Uuid::new_v4(), "Gone".into(), "Body".into());

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<post::Model>::new()])
            .into_connection();

        let repo = PostgresPostRepository::new(db);
        let result: Result<Post, RepoError> = repo.update(post).await;

        assert!(matches!(result, Err(RepoError::NotFound)));
    }

    #[tokio::test]
    async fn test_existing_ids_returns_only_stored_rows() {
        let kept = uuid::Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[BTreeMap::from([("id", Value::from(kept))])]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);
        let found = repo
            .existing_ids(&[kept, uuid::Uuid::new_v4()])
            .await
            .unwrap();

        assert_eq!(found, vec![kept]);
    }

    #[tokio::test]
    async fn test_top_authors_reads_grouped_counts() {
        let (ada, bob) = (uuid::Uuid::new_v4(), uuid::Uuid::new_v4());
        let row = |id: uuid::Uuid, name: &str, count: i64| {
            BTreeMap::from([
                ("id", Value::from(id)),
                ("name", Value::from(name)),
                ("email", Value::from(format!("{}@example.com", name.to_lowercase()))),
                ("post_count", Value::BigInt(Some(count))),
            ])
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[row(ada, "Ada", 7), row(bob, "Bob", 2)]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);
        let ranked = repo.top_authors(5).await.unwrap();

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].id, ada);
        assert_eq!(ranked[0].email, "ada@example.com");
        assert_eq!(ranked[0].post_count, 7);
        assert_eq!(ranked[1].post_count, 2);
    }

    #[tokio::test]
    async fn test_content_stats_reads_aggregate_row() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[BTreeMap::from([
                ("posts", Value::BigInt(Some(3))),
                ("total_chars", Value::BigInt(Some(120))),
            ])]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);
        let stats = repo.content_stats().await.unwrap();

        assert_eq!(stats.posts, 3);
        assert_eq!(stats.total_chars, 120);
    }

    #[tokio::test]
    async fn test_bulk_status_update_reports_rows_affected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 2,
            }])
            .into_connection();

        let repo = PostgresPostRepository::new(db);
        let ids = [uuid::Uuid::new_v4(), uuid::Uuid::new_v4(), uuid::Uuid::new_v4()];

        let affected = repo
            .update_status_many(&ids, PostStatus::Approved, chrono::Utc::now())
            .await
            .unwrap();

        // One of the three vanished before the statement ran.
        assert_eq!(affected, 2);
    }

    #[tokio::test]
    async fn test_delete_missing_post_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        let result = BaseRepository::<Post, uuid::Uuid>::delete(&repo, uuid::Uuid::new_v4()).await;
        assert!(matches!(result, Err(RepoError::NotFound)));
    }

    #[tokio::test]
    async fn test_count_posts() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[BTreeMap::from([("num_items", Value::BigInt(Some(4)))])]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);
        let count = PostRepository::count(
            &repo,
            PostFilter::all().with_status(PostStatus::Pending),
        )
        .await
        .unwrap();

        assert_eq!(count, 4);
    }

    #[tokio::test]
    async fn test_find_user_by_email_maps_role() {
        let now = chrono::Utc::now();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![user::Model {
                id: uuid::Uuid::new_v4(),
                name: "Ada".to_owned(),
                email: "ada@example.com".to_owned(),
                password_hash: "hash".to_owned(),
                role: user::UserRole::Admin,
                created_at: now.into(),
                updated_at: now.into(),
            }]])
            .into_connection();

        let repo = PostgresUserRepository::new(db);
        let user = repo.find_by_email("ada@example.com").await.unwrap().unwrap();

        assert_eq!(user.role, Role::Admin);
        assert_eq!(user.email, "ada@example.com");
    }
}
