//! Moderation engine: single-post status transitions, edits and deletes.
//!
//! Status transitions are flat: any status may move to any other, including itself,
//! so repeating a transition is a no-op that still succeeds.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::{Actor, AuthorRef, Post, PostStatus, PostWithAuthor};
use crate::error::{DomainError, RepoError};
use crate::ports::{BaseRepository, PostRepository};
use crate::services::posts::validate_body;

/// Summary returned after a status change.
#[derive(Debug, Clone, Serialize)]
pub struct ModeratedPost {
    pub id: Uuid,
    pub title: String,
    pub status: PostStatus,
    pub author: AuthorRef,
    pub updated_at: DateTime<Utc>,
}

pub struct ModerationService {
    posts: Arc<dyn PostRepository>,
}

impl ModerationService {
    pub fn new(posts: Arc<dyn PostRepository>) -> Self {
        Self { posts }
    }

    /// Move one post to `status`. Admin only.
    pub async fn set_status(
        &self,
        actor: Actor,
        post_id: Uuid,
        status: &str,
    ) -> Result<ModeratedPost, DomainError> {
        actor.require_admin()?;
        let status: PostStatus = status.parse()?;

        let PostWithAuthor { mut post, author } = self
            .posts
            .find_with_author(post_id, None)
            .await?
            .ok_or_else(|| DomainError::post_not_found(post_id))?;

        post.set_status(status);

        // Existence is re-checked by the update itself, so a concurrent delete surfaces here.
        let affected = self
            .posts
            .update_status_many(&[post_id], status, post.updated_at)
            .await?;
        if affected == 0 {
            return Err(DomainError::post_not_found(post_id));
        }

        tracing::info!(post_id = %post_id, status = %status, actor = %actor.id, "Post status changed");

        Ok(ModeratedPost {
            id: post.id,
            title: post.title,
            status: post.status,
            author,
            updated_at: post.updated_at,
        })
    }

    /// Admin detail view of any post, whatever its status.
    pub async fn get_post(&self, actor: Actor, post_id: Uuid) -> Result<PostWithAuthor, DomainError> {
        actor.require_admin()?;
        self.posts
            .find_with_author(post_id, None)
            .await?
            .ok_or_else(|| DomainError::post_not_found(post_id))
    }

    /// The moderation queue, newest first.
    pub async fn list_posts(
        &self,
        actor: Actor,
        status: Option<PostStatus>,
    ) -> Result<Vec<PostWithAuthor>, DomainError> {
        actor.require_admin()?;
        Ok(self.posts.list_with_authors(status).await?)
    }

    /// Delete a post as an admin or as its author.
    ///
    /// A post the actor may not touch is reported exactly like a missing one.
    pub async fn delete_post(&self, actor: Actor, post_id: Uuid) -> Result<(), DomainError> {
        let post = self
            .posts
            .find_by_id(post_id)
            .await?
            .filter(|post| actor.can_modify(post))
            .ok_or_else(|| DomainError::post_not_found(post_id))?;

        match self.posts.delete(post.id).await {
            Ok(()) => {}
            Err(RepoError::NotFound) => return Err(DomainError::post_not_found(post_id)),
            Err(e) => return Err(e.into()),
        }

        tracing::info!(post_id = %post_id, actor = %actor.id, admin = actor.is_admin(), "Post deleted");
        Ok(())
    }

    /// Replace title and content of the actor's own post and send it back to review.
    pub async fn edit_post(
        &self,
        actor: Actor,
        post_id: Uuid,
        title: &str,
        content: &str,
    ) -> Result<Post, DomainError> {
        let (title, content) = validate_body(title, content)?;

        let mut post = self
            .posts
            .find_owned(post_id, actor.id)
            .await?
            .ok_or_else(|| DomainError::post_not_found(post_id))?;

        let previous = post.status;
        post.revise(title, content);
        let post = match self.posts.update(post).await {
            Ok(post) => post,
            Err(RepoError::NotFound) => return Err(DomainError::post_not_found(post_id)),
            Err(e) => return Err(e.into()),
        };

        tracing::info!(post_id = %post_id, previous = %previous, "Post edited, back to review");
        Ok(post)
    }
}
