//! Application configuration loaded from environment variables.

use std::env;

use blogify_infra::{DatabaseConfig, JwtConfig};

/// Credentials for the demo administrator checked before the user store.
#[derive(Debug, Clone)]
pub struct StaticAdminConfig {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl StaticAdminConfig {
    /// Enabled only when both `STATIC_ADMIN_EMAIL` and `STATIC_ADMIN_PASSWORD` are set.
    fn from_env() -> Option<Self> {
        let email = env::var("STATIC_ADMIN_EMAIL").ok().filter(|v| !v.trim().is_empty())?;
        let password = env::var("STATIC_ADMIN_PASSWORD").ok().filter(|v| !v.is_empty())?;

        Some(Self {
            name: env::var("STATIC_ADMIN_NAME").unwrap_or_else(|_| "Administrator".to_string()),
            email,
            password,
        })
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    pub jwt: JwtConfig,
    pub static_admin: Option<StaticAdminConfig>,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| {
            let mut config = DatabaseConfig::new(url);
            if let Some(max) = parse_var("DB_MAX_CONNECTIONS") {
                config.max_connections = max;
            }
            if let Some(min) = parse_var("DB_MIN_CONNECTIONS") {
                config.min_connections = min;
            }
            config
        });

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_var("PORT").unwrap_or(8080),
            database,
            jwt: JwtConfig::from_env(),
            static_admin: StaticAdminConfig::from_env(),
        }
    }
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.parse().ok())
}
