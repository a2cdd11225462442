use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Moderation state of a post.
///
/// Any status may move to any other; there are no forbidden edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PostStatus {
    Pending,
    Approved,
    Rejected,
}

impl PostStatus {
    pub const ALL: [PostStatus; 3] = [Self::Pending, Self::Approved, Self::Rejected];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "APPROVED" => Ok(Self::Approved),
            "REJECTED" => Ok(Self::Rejected),
            _ => Err(DomainError::invalid(
                "Invalid status. Must be APPROVED, REJECTED, or PENDING.",
            )),
        }
    }
}

/// Post entity - one unit of user-generated content awaiting or past moderation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub content: String,
    pub status: PostStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post. New posts always start out pending review.
    pub fn new(author_id: Uuid, title: String, content: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            author_id,
            title,
            content,
            status: PostStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace title and content. Any edit sends the post back to review.
    pub fn revise(&mut self, title: String, content: String) {
        self.title = title;
        self.content = content;
        self.status = PostStatus::Pending;
        self.updated_at = Utc::now();
    }

    pub fn set_status(&mut self, status: PostStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.author_id == user_id
    }
}

/// Public author details attached to post listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorRef {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// A post joined with its author.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostWithAuthor {
    #[serde(flatten)]
    pub post: Post,
    pub author: AuthorRef,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_post_is_pending() {
        let post = Post::new(Uuid::new_v4(), "Title".into(), "Body".into());
        assert_eq!(post.status, PostStatus::Pending);
        assert_eq!(post.created_at, post.updated_at);
    }

    #[test]
    fn revise_resets_approved_post_to_pending() {
        let mut post = Post::new(Uuid::new_v4(), "Title".into(), "Body".into());
        post.set_status(PostStatus::Approved);
        let created = post.created_at;

        post.revise("New title".into(), "New body".into());

        assert_eq!(post.status, PostStatus::Pending);
        assert_eq!(post.title, "New title");
        assert_eq!(post.created_at, created);
        assert!(post.updated_at >= created);
    }

    #[test]
    fn status_parses_only_exact_wire_names() {
        assert_eq!("APPROVED".parse::<PostStatus>().unwrap(), PostStatus::Approved);
        assert_eq!("REJECTED".parse::<PostStatus>().unwrap(), PostStatus::Rejected);
        assert_eq!("PENDING".parse::<PostStatus>().unwrap(), PostStatus::Pending);

        for bad in ["approved", "PUBLISHED", ""] {
            let err = bad.parse::<PostStatus>().unwrap_err();
            assert!(matches!(err, DomainError::InvalidArgument(_)), "{bad}");
        }
    }

    #[test]
    fn status_serializes_upper_case() {
        let json = serde_json::to_string(&PostStatus::Rejected).unwrap();
        assert_eq!(json, "\"REJECTED\"");
    }
}
