//! In-memory store - used when no database is configured, and in tests.
//!
//! Mirrors the relational constraints the SQL schema enforces: unique email,
//! posts must reference an existing author, deleting a user cascades to their posts.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use blogify_core::domain::{
    AuthorPostCount, AuthorRef, ContentStats, Post, PostStatus, PostWithAuthor, Role, User,
};
use blogify_core::error::RepoError;
use blogify_core::ports::{BaseRepository, PostFilter, PostRepository, UserRepository};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    posts: HashMap<Uuid, Post>,
}

impl Tables {
    fn join(&self, post: &Post) -> Result<PostWithAuthor, RepoError> {
        let author = self.users.get(&post.author_id).ok_or_else(|| {
            RepoError::Query(format!("Post {} has no author row", post.id))
        })?;
        Ok(PostWithAuthor {
            post: post.clone(),
            author: AuthorRef {
                id: author.id,
                name: author.name.clone(),
                email: author.email.clone(),
            },
        })
    }
}

fn newest_first(posts: &mut [Post]) {
    posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

/// In-memory implementation of both repositories over one shared set of tables.
///
/// Note: Data is lost on process restart.
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn insert(&self, user: User) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;
        if tables.users.contains_key(&user.id) {
            return Err(RepoError::Constraint("users_pkey".to_string()));
        }
        if tables.users.values().any(|other| other.email == user.email) {
            return Err(RepoError::Constraint("users_email_key".to_string()));
        }
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&user.id) {
            return Err(RepoError::NotFound);
        }
        let taken = tables
            .users
            .values()
            .any(|other| other.id != user.id && other.email == user.email);
        if taken {
            return Err(RepoError::Constraint("users_email_key".to_string()));
        }
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables.users.remove(&id).ok_or(RepoError::NotFound)?;
        tables.posts.retain(|_, post| post.author_id != id);
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn count(&self, role: Option<Role>) -> Result<u64, RepoError> {
        let tables = self.tables.read().await;
        let count = tables
            .users
            .values()
            .filter(|u| role.is_none_or(|r| u.role == r))
            .count();
        Ok(count as u64)
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.tables.read().await.posts.get(&id).cloned())
    }

    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        if tables.posts.contains_key(&post.id) {
            return Err(RepoError::Constraint("posts_pkey".to_string()));
        }
        if !tables.users.contains_key(&post.author_id) {
            return Err(RepoError::ForeignKey("posts_author_id_fkey".to_string()));
        }
        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        let slot = tables.posts.get_mut(&post.id).ok_or(RepoError::NotFound)?;
        *slot = post.clone();
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables.posts.remove(&id).map(|_| ()).ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn find_owned(&self, id: Uuid, author_id: Uuid) -> Result<Option<Post>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .posts
            .get(&id)
            .filter(|p| p.author_id == author_id)
            .cloned())
    }

    async fn find_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, RepoError> {
        let tables = self.tables.read().await;
        let mut posts: Vec<Post> = tables
            .posts
            .values()
            .filter(|p| p.author_id == author_id)
            .cloned()
            .collect();
        newest_first(&mut posts);
        Ok(posts)
    }

    async fn find_with_author(
        &self,
        id: Uuid,
        status: Option<PostStatus>,
    ) -> Result<Option<PostWithAuthor>, RepoError> {
        let tables = self.tables.read().await;
        tables
            .posts
            .get(&id)
            .filter(|p| status.is_none_or(|s| p.status == s))
            .map(|p| tables.join(p))
            .transpose()
    }

    async fn list_with_authors(
        &self,
        status: Option<PostStatus>,
    ) -> Result<Vec<PostWithAuthor>, RepoError> {
        let tables = self.tables.read().await;
        let mut posts: Vec<Post> = tables
            .posts
            .values()
            .filter(|p| status.is_none_or(|s| p.status == s))
            .cloned()
            .collect();
        newest_first(&mut posts);
        posts.iter().map(|p| tables.join(p)).collect()
    }

    async fn count(&self, filter: PostFilter) -> Result<u64, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.posts.values().filter(|p| filter.matches(p)).count() as u64)
    }

    async fn existing_ids(&self, ids: &[Uuid]) -> Result<Vec<Uuid>, RepoError> {
        let tables = self.tables.read().await;
        Ok(ids
            .iter()
            .filter(|id| tables.posts.contains_key(id))
            .copied()
            .collect())
    }

    async fn update_status_many(
        &self,
        ids: &[Uuid],
        status: PostStatus,
        at: DateTime<Utc>,
    ) -> Result<u64, RepoError> {
        let mut tables = self.tables.write().await;
        let mut affected = 0;
        for id in ids {
            if let Some(post) = tables.posts.get_mut(id) {
                post.status = status;
                post.updated_at = at;
                affected += 1;
            }
        }
        Ok(affected)
    }

    async fn delete_many(&self, ids: &[Uuid]) -> Result<u64, RepoError> {
        let mut tables = self.tables.write().await;
        Ok(ids
            .iter()
            .filter(|id| tables.posts.remove(id).is_some())
            .count() as u64)
    }

    async fn top_authors(&self, limit: u64) -> Result<Vec<AuthorPostCount>, RepoError> {
        let tables = self.tables.read().await;
        let mut counts: HashMap<Uuid, u64> = HashMap::new();
        for post in tables.posts.values() {
            *counts.entry(post.author_id).or_default() += 1;
        }

        let mut ranked: Vec<AuthorPostCount> = counts
            .into_iter()
            .filter_map(|(id, post_count)| {
                tables.users.get(&id).map(|u| AuthorPostCount {
                    id,
                    name: u.name.clone(),
                    email: u.email.clone(),
                    post_count,
                })
            })
            .collect();
        ranked.sort_by(|a, b| b.post_count.cmp(&a.post_count).then(a.id.cmp(&b.id)));
        ranked.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(ranked)
    }

    async fn content_stats(&self) -> Result<ContentStats, RepoError> {
        let tables = self.tables.read().await;
        Ok(ContentStats {
            posts: tables.posts.len() as u64,
            total_chars: tables
                .posts
                .values()
                .map(|p| p.content.chars().count() as u64)
                .sum(),
        })
    }
}
