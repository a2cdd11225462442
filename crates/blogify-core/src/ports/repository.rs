use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{AuthorPostCount, ContentStats, Post, PostStatus, PostWithAuthor, Role, User};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Insert a new entity. Fails with `Constraint` if a unique key is taken.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;

    /// Overwrite an existing entity. Fails with `NotFound` if the row is gone.
    async fn update(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their email address. Callers pass the normalized form.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    /// Count users, optionally restricted to one role.
    async fn count(&self, role: Option<Role>) -> Result<u64, RepoError>;
}

/// Filter for post counts. The creation range is half-open: `[created_from, created_before)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PostFilter {
    pub status: Option<PostStatus>,
    pub created_from: Option<DateTime<Utc>>,
    pub created_before: Option<DateTime<Utc>>,
}

impl PostFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_status(mut self, status: PostStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn created_between(
        mut self,
        from: Option<DateTime<Utc>>,
        before: Option<DateTime<Utc>>,
    ) -> Self {
        self.created_from = from;
        self.created_before = before;
        self
    }

    pub fn matches(&self, post: &Post) -> bool {
        self.status.is_none_or(|s| post.status == s)
            && self.created_from.is_none_or(|from| post.created_at >= from)
            && self.created_before.is_none_or(|before| post.created_at < before)
    }
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// Find a post only if it belongs to the given author.
    async fn find_owned(&self, id: Uuid, author_id: Uuid) -> Result<Option<Post>, RepoError>;

    /// All posts of one author, newest first.
    async fn find_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, RepoError>;

    /// One post joined with its author, optionally required to be in a given status.
    async fn find_with_author(
        &self,
        id: Uuid,
        status: Option<PostStatus>,
    ) -> Result<Option<PostWithAuthor>, RepoError>;

    /// Posts joined with their authors, newest first.
    async fn list_with_authors(
        &self,
        status: Option<PostStatus>,
    ) -> Result<Vec<PostWithAuthor>, RepoError>;

    async fn count(&self, filter: PostFilter) -> Result<u64, RepoError>;

    /// The subset of `ids` that currently exist.
    async fn existing_ids(&self, ids: &[Uuid]) -> Result<Vec<Uuid>, RepoError>;

    /// Set status and `updated_at` on every listed post in one statement. Returns rows affected.
    async fn update_status_many(
        &self,
        ids: &[Uuid],
        status: PostStatus,
        at: DateTime<Utc>,
    ) -> Result<u64, RepoError>;

    /// Delete every listed post in one statement. Returns rows affected.
    async fn delete_many(&self, ids: &[Uuid]) -> Result<u64, RepoError>;

    /// Authors with at least one post, by post count descending then id ascending.
    async fn top_authors(&self, limit: u64) -> Result<Vec<AuthorPostCount>, RepoError>;

    async fn content_stats(&self) -> Result<ContentStats, RepoError>;
}
