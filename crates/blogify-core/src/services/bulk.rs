//! Bulk moderation: one status change or delete over a set of posts.
//!
//! Existence of every id is checked up front and the mutation is a single set-based
//! statement. The two steps are not wrapped in a transaction: a post deleted in between
//! only lowers the affected count, so callers treat `affected` as authoritative.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::{Actor, PostStatus};
use crate::error::DomainError;
use crate::ports::PostRepository;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BulkOutcome {
    pub affected: u64,
    pub post_ids: Vec<Uuid>,
}

pub struct BulkService {
    posts: Arc<dyn PostRepository>,
}

impl BulkService {
    pub fn new(posts: Arc<dyn PostRepository>) -> Self {
        Self { posts }
    }

    pub async fn bulk_set_status(
        &self,
        actor: Actor,
        post_ids: Vec<Uuid>,
        status: &str,
    ) -> Result<BulkOutcome, DomainError> {
        actor.require_admin()?;
        validate_ids(&post_ids)?;
        let status: PostStatus = status.parse()?;

        self.ensure_all_exist(&post_ids).await?;

        let affected = self
            .posts
            .update_status_many(&post_ids, status, Utc::now())
            .await?;
        warn_on_shortfall("update", affected, post_ids.len());

        tracing::info!(
            actor = %actor.id,
            status = %status,
            affected,
            "Bulk status change applied"
        );
        Ok(BulkOutcome { affected, post_ids })
    }

    pub async fn bulk_delete(
        &self,
        actor: Actor,
        post_ids: Vec<Uuid>,
    ) -> Result<BulkOutcome, DomainError> {
        actor.require_admin()?;
        validate_ids(&post_ids)?;

        self.ensure_all_exist(&post_ids).await?;

        let affected = self.posts.delete_many(&post_ids).await?;
        warn_on_shortfall("delete", affected, post_ids.len());

        tracing::info!(actor = %actor.id, affected, "Bulk delete applied");
        Ok(BulkOutcome { affected, post_ids })
    }

    async fn ensure_all_exist(&self, post_ids: &[Uuid]) -> Result<(), DomainError> {
        let existing = self.posts.existing_ids(post_ids).await?;
        if existing.len() < post_ids.len() {
            return Err(DomainError::MissingFromSet {
                entity_type: "Post",
                missing: post_ids.len() - existing.len(),
                requested: post_ids.len(),
            });
        }
        Ok(())
    }
}

fn warn_on_shortfall(op: &str, affected: u64, requested: usize) {
    if affected < requested as u64 {
        tracing::warn!(
            op,
            affected,
            requested,
            "Posts disappeared between validation and bulk mutation"
        );
    }
}

fn validate_ids(post_ids: &[Uuid]) -> Result<(), DomainError> {
    if post_ids.is_empty() {
        return Err(DomainError::invalid(
            "Post IDs array is required and cannot be empty.",
        ));
    }
    let distinct: HashSet<&Uuid> = post_ids.iter().collect();
    if distinct.len() != post_ids.len() {
        return Err(DomainError::invalid("Post IDs must not repeat."));
    }
    Ok(())
}
