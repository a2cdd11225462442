#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use blogify_core::domain::{Actor, Post, PostStatus, Role, User};
use blogify_core::ports::{BaseRepository, PasswordService, PostRepository, UserRepository};
use blogify_core::services::{
    AccountService, AnalyticsService, BulkService, ModerationService, PostService,
};
use blogify_infra::{Argon2PasswordService, InMemoryStore};

/// Services wired over one shared in-memory store.
pub struct World {
    pub store: Arc<InMemoryStore>,
    pub passwords: Arc<Argon2PasswordService>,
    pub moderation: ModerationService,
    pub bulk: BulkService,
    pub posts: PostService,
    pub analytics: AnalyticsService,
    pub accounts: AccountService,
}

impl World {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let passwords = Arc::new(Argon2PasswordService::with_cost(1024, 1).unwrap());
        let post_repo: Arc<dyn PostRepository> = store.clone();
        let user_repo: Arc<dyn UserRepository> = store.clone();

        Self {
            moderation: ModerationService::new(post_repo.clone()),
            bulk: BulkService::new(post_repo.clone()),
            posts: PostService::new(post_repo.clone()),
            analytics: AnalyticsService::new(post_repo, user_repo.clone()),
            accounts: AccountService::new(user_repo, passwords.clone()),
            store,
            passwords,
        }
    }

    pub async fn user(&self, name: &str, role: Role) -> Actor {
        let email = format!("{}@example.com", name.to_lowercase());
        let hash = self.passwords.hash("password123").unwrap();
        let user = User::new(name.to_string(), &email, hash, role);
        BaseRepository::<User, Uuid>::insert(&*self.store, user)
            .await
            .unwrap()
            .actor()
    }

    pub async fn post(&self, author: Actor, status: PostStatus) -> Post {
        self.post_at(author, status, Utc::now(), "content").await
    }

    pub async fn post_at(
        &self,
        author: Actor,
        status: PostStatus,
        created_at: DateTime<Utc>,
        content: &str,
    ) -> Post {
        let mut post = Post::new(author.id, "A title".into(), content.into());
        post.status = status;
        post.created_at = created_at;
        post.updated_at = created_at;
        BaseRepository::<Post, Uuid>::insert(&*self.store, post)
            .await
            .unwrap()
    }

    pub async fn reread(&self, id: Uuid) -> Option<Post> {
        BaseRepository::<Post, Uuid>::find_by_id(&*self.store, id)
            .await
            .unwrap()
    }
}
