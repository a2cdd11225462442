//! Application state - shared across all handlers.

use std::sync::Arc;

use uuid::Uuid;

use blogify_core::domain::Role;
use blogify_core::ports::{PasswordService, PostRepository, TokenService, UserRepository};
use blogify_core::services::{
    AccountService, AnalyticsService, BulkService, ModerationService, PostService, StaticPrincipal,
};
use blogify_infra::{Argon2PasswordService, InMemoryStore, JwtTokenService};

#[cfg(feature = "postgres")]
use blogify_infra::{DatabaseConnections, PostgresPostRepository, PostgresUserRepository};
#[cfg(feature = "postgres")]
use migration::{Migrator, MigratorTrait};

use crate::config::{AppConfig, StaticAdminConfig};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<AccountService>,
    pub posts: Arc<PostService>,
    pub moderation: Arc<ModerationService>,
    pub bulk: Arc<BulkService>,
    pub analytics: Arc<AnalyticsService>,
    pub tokens: Arc<dyn TokenService>,
    /// Which store backs the repositories, reported by the health check.
    pub storage: &'static str,
}

/// Repository pair every service is built from.
struct Repositories {
    users: Arc<dyn UserRepository>,
    posts: Arc<dyn PostRepository>,
    backend: &'static str,
}

impl Repositories {
    fn in_memory() -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self {
            users: store.clone(),
            posts: store,
            backend: "memory",
        }
    }
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let repos = Self::connect(config).await;
        let passwords: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());
        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(config.jwt.clone()));

        let static_principals = config
            .static_admin
            .as_ref()
            .and_then(|admin| static_admin(admin, passwords.as_ref()))
            .into_iter()
            .collect();

        let mut state =
            Self::from_parts(repos.users, repos.posts, passwords, tokens, static_principals);
        state.storage = repos.backend;
        tracing::info!(storage = state.storage, "Application state initialized");
        state
    }

    /// Wire services over already-built adapters.
    pub fn from_parts(
        users: Arc<dyn UserRepository>,
        posts: Arc<dyn PostRepository>,
        passwords: Arc<dyn PasswordService>,
        tokens: Arc<dyn TokenService>,
        static_principals: Vec<StaticPrincipal>,
    ) -> Self {
        Self {
            accounts: Arc::new(
                AccountService::new(users.clone(), passwords)
                    .with_static_principals(static_principals),
            ),
            posts: Arc::new(PostService::new(posts.clone())),
            moderation: Arc::new(ModerationService::new(posts.clone())),
            bulk: Arc::new(BulkService::new(posts.clone())),
            analytics: Arc::new(AnalyticsService::new(posts, users)),
            tokens,
            storage: "memory",
        }
    }

    #[cfg(feature = "postgres")]
    async fn connect(config: &AppConfig) -> Repositories {
        let Some(db_config) = config.database.as_ref() else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return Repositories::in_memory();
        };

        match DatabaseConnections::init(db_config).await {
            Ok(connections) => {
                if let Err(e) = Migrator::up(&connections.main, None).await {
                    tracing::error!("Pending migrations failed: {}", e);
                }
                Repositories {
                    users: Arc::new(PostgresUserRepository::new(connections.main.clone())),
                    posts: Arc::new(PostgresPostRepository::new(connections.main)),
                    backend: "postgres",
                }
            }
            Err(e) => {
                tracing::error!(
                    "Failed to connect to database: {}. Using in-memory fallback.",
                    e
                );
                Repositories::in_memory()
            }
        }
    }

    #[cfg(not(feature = "postgres"))]
    async fn connect(_config: &AppConfig) -> Repositories {
        tracing::info!("Running without postgres feature - using in-memory store");
        Repositories::in_memory()
    }
}

/// Hash the configured demo admin password once at startup.
fn static_admin(admin: &StaticAdminConfig, passwords: &dyn PasswordService) -> Option<StaticPrincipal> {
    match passwords.hash(&admin.password) {
        Ok(hash) => {
            tracing::info!("Static administrator enabled");
            Some(StaticPrincipal::new(
                Uuid::new_v4(),
                admin.name.clone(),
                &admin.email,
                hash,
                Role::Admin,
            ))
        }
        Err(e) => {
            tracing::error!("Static administrator disabled, hashing failed: {}", e);
            None
        }
    }
}
