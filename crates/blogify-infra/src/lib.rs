//! # Blogify Infrastructure
//!
//! Concrete implementations of the ports defined in `blogify-core`:
//! SeaORM repositories, an in-memory store, and credential/token services.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory store only
//! - `postgres` - PostgreSQL repositories via SeaORM
//! - `auth` - JWT + Argon2 authentication

pub mod database;
pub mod store;

#[cfg(feature = "auth")]
pub mod auth;

pub use database::DatabaseConfig;
pub use store::InMemoryStore;

#[cfg(feature = "postgres")]
pub use database::{DatabaseConnections, PostgresPostRepository, PostgresUserRepository};

#[cfg(feature = "auth")]
pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};
