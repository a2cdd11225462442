//! Author-facing post operations and the public feed.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Actor, Post, PostStatus, PostWithAuthor};
use crate::error::{DomainError, RepoError};
use crate::ports::{BaseRepository, PostRepository};

/// Trim and require both fields to be present.
pub(crate) fn validate_body(title: &str, content: &str) -> Result<(String, String), DomainError> {
    let title = title.trim();
    let content = content.trim();
    if title.is_empty() || content.is_empty() {
        return Err(DomainError::invalid("Title and content are required"));
    }
    Ok((title.to_string(), content.to_string()))
}

pub struct PostService {
    posts: Arc<dyn PostRepository>,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostRepository>) -> Self {
        Self { posts }
    }

    /// Create a post owned by `actor`. It always starts pending review.
    pub async fn create_post(
        &self,
        actor: Actor,
        title: &str,
        content: &str,
    ) -> Result<Post, DomainError> {
        let (title, content) = validate_body(title, content)?;
        let post = match self.posts.insert(Post::new(actor.id, title, content)).await {
            Ok(post) => post,
            // Principals without a stored account row, such as the static admin.
            Err(RepoError::ForeignKey(_)) => {
                return Err(DomainError::invalid("Posting requires a registered account"));
            }
            Err(e) => return Err(e.into()),
        };
        tracing::info!(post_id = %post.id, author = %actor.id, "Post submitted for review");
        Ok(post)
    }

    pub async fn list_own(&self, actor: Actor) -> Result<Vec<Post>, DomainError> {
        Ok(self.posts.find_by_author(actor.id).await?)
    }

    pub async fn get_own(&self, actor: Actor, post_id: Uuid) -> Result<Post, DomainError> {
        self.posts
            .find_owned(post_id, actor.id)
            .await?
            .ok_or_else(|| DomainError::post_not_found(post_id))
    }

    /// Approved posts only, newest first.
    pub async fn list_published(&self) -> Result<Vec<PostWithAuthor>, DomainError> {
        Ok(self
            .posts
            .list_with_authors(Some(PostStatus::Approved))
            .await?)
    }

    pub async fn get_published(&self, post_id: Uuid) -> Result<PostWithAuthor, DomainError> {
        self.posts
            .find_with_author(post_id, Some(PostStatus::Approved))
            .await?
            .ok_or_else(|| DomainError::post_not_found(post_id))
    }
}
