//! PostgreSQL repository implementations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, FromQueryResult, JoinType, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Select,
};
use uuid::Uuid;

use blogify_core::domain::{
    AuthorPostCount, AuthorRef, ContentStats, Post, PostStatus, PostWithAuthor, Role, User,
    mask_email,
};
use blogify_core::error::RepoError;
use blogify_core::ports::{PostFilter, PostRepository, UserRepository};

use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity, UserRole};
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn count(&self, role: Option<Role>) -> Result<u64, RepoError> {
        let mut query = UserEntity::find();
        if let Some(role) = role {
            query = query.filter(user::Column::Role.eq(UserRole::from(role)));
        }
        query.count(&self.db).await.map_err(map_db_err)
    }
}

fn post_condition(filter: &PostFilter) -> Condition {
    let mut cond = Condition::all();
    if let Some(status) = filter.status {
        cond = cond.add(post::Column::Status.eq(post::Status::from(status)));
    }
    if let Some(from) = filter.created_from {
        cond = cond.add(post::Column::CreatedAt.gte(from.fixed_offset()));
    }
    if let Some(before) = filter.created_before {
        cond = cond.add(post::Column::CreatedAt.lt(before.fixed_offset()));
    }
    cond
}

fn with_author(
    (post, author): (post::Model, Option<user::Model>),
) -> Result<PostWithAuthor, RepoError> {
    // The foreign key guarantees an author; a missing one means the join itself is broken.
    let author = author.ok_or_else(|| {
        RepoError::Query(format!("Post {} has no author row", post.id))
    })?;
    Ok(PostWithAuthor {
        post: post.into(),
        author: AuthorRef {
            id: author.id,
            name: author.name,
            email: author.email,
        },
    })
}

#[derive(Debug, FromQueryResult)]
struct AuthorCountRow {
    id: Uuid,
    name: String,
    email: String,
    post_count: i64,
}

#[derive(Debug, FromQueryResult)]
struct ContentRow {
    posts: i64,
    total_chars: i64,
}

impl PostgresPostRepository {
    fn status_query(status: Option<PostStatus>) -> Select<PostEntity> {
        let query = PostEntity::find();
        match status {
            Some(status) => query.filter(post::Column::Status.eq(post::Status::from(status))),
            None => query,
        }
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_owned(&self, id: Uuid, author_id: Uuid) -> Result<Option<Post>, RepoError> {
        let result = PostEntity::find_by_id(id)
            .filter(post::Column::AuthorId.eq(author_id))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post::Column::AuthorId.eq(author_id))
            .order_by_desc(post::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_with_author(
        &self,
        id: Uuid,
        status: Option<PostStatus>,
    ) -> Result<Option<PostWithAuthor>, RepoError> {
        let row = Self::status_query(status)
            .filter(post::Column::Id.eq(id))
            .find_also_related(UserEntity)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        row.map(with_author).transpose()
    }

    async fn list_with_authors(
        &self,
        status: Option<PostStatus>,
    ) -> Result<Vec<PostWithAuthor>, RepoError> {
        let rows = Self::status_query(status)
            .order_by_desc(post::Column::CreatedAt)
            .find_also_related(UserEntity)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        rows.into_iter().map(with_author).collect()
    }

    async fn count(&self, filter: PostFilter) -> Result<u64, RepoError> {
        PostEntity::find()
            .filter(post_condition(&filter))
            .count(&self.db)
            .await
            .map_err(map_db_err)
    }

    async fn existing_ids(&self, ids: &[Uuid]) -> Result<Vec<Uuid>, RepoError> {
        PostEntity::find()
            .select_only()
            .column(post::Column::Id)
            .filter(post::Column::Id.is_in(ids.iter().copied()))
            .into_tuple::<Uuid>()
            .all(&self.db)
            .await
            .map_err(map_db_err)
    }

    async fn update_status_many(
        &self,
        ids: &[Uuid],
        status: PostStatus,
        at: DateTime<Utc>,
    ) -> Result<u64, RepoError> {
        let result = PostEntity::update_many()
            .col_expr(post::Column::Status, Expr::value(post::Status::from(status)))
            .col_expr(post::Column::UpdatedAt, Expr::value(at.fixed_offset()))
            .filter(post::Column::Id.is_in(ids.iter().copied()))
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.rows_affected)
    }

    async fn delete_many(&self, ids: &[Uuid]) -> Result<u64, RepoError> {
        let result = PostEntity::delete_many()
            .filter(post::Column::Id.is_in(ids.iter().copied()))
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.rows_affected)
    }

    async fn top_authors(&self, limit: u64) -> Result<Vec<AuthorPostCount>, RepoError> {
        let rows = UserEntity::find()
            .select_only()
            .column(user::Column::Id)
            .column(user::Column::Name)
            .column(user::Column::Email)
            .column_as(post::Column::Id.count(), "post_count")
            .join(JoinType::InnerJoin, user::Relation::Posts.def())
            .group_by(user::Column::Id)
            .group_by(user::Column::Name)
            .group_by(user::Column::Email)
            .order_by_desc(post::Column::Id.count())
            .order_by_asc(user::Column::Id)
            .limit(limit)
            .into_model::<AuthorCountRow>()
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(rows
            .into_iter()
            .map(|row| AuthorPostCount {
                id: row.id,
                name: row.name,
                email: row.email,
                post_count: u64::try_from(row.post_count).unwrap_or_default(),
            })
            .collect())
    }

    async fn content_stats(&self) -> Result<ContentStats, RepoError> {
        let row = PostEntity::find()
            .select_only()
            .column_as(post::Column::Id.count(), "posts")
            .column_as(
                Expr::cust("COALESCE(SUM(CHAR_LENGTH(content)), 0)::BIGINT"),
                "total_chars",
            )
            .into_model::<ContentRow>()
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(row
            .map(|row| ContentStats {
                posts: u64::try_from(row.posts).unwrap_or_default(),
                total_chars: u64::try_from(row.total_chars).unwrap_or_default(),
            })
            .unwrap_or_default())
    }
}
