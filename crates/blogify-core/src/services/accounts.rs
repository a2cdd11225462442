//! Account registration and credential authentication.

use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::domain::{Actor, Role, User, mask_email, normalize_email};
use crate::error::DomainError;
use crate::ports::{AuthError, BaseRepository, PasswordService, UserRepository};

const MIN_NAME_LEN: usize = 2;
const MIN_PASSWORD_LEN: usize = 8;

/// A configuration-time account checked before the store, e.g. a demo administrator.
#[derive(Debug, Clone)]
pub struct StaticPrincipal {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

impl StaticPrincipal {
    pub fn new(id: Uuid, name: String, email: &str, password_hash: String, role: Role) -> Self {
        Self {
            id,
            name,
            email: normalize_email(email),
            password_hash,
            role,
        }
    }
}

/// Who a successful login resolved to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Principal {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl Principal {
    pub fn actor(&self) -> Actor {
        Actor::new(self.id, self.role)
    }
}

impl From<&StaticPrincipal> for Principal {
    fn from(p: &StaticPrincipal) -> Self {
        Self {
            id: p.id,
            name: p.name.clone(),
            email: p.email.clone(),
            role: p.role,
        }
    }
}

impl From<User> for Principal {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
        }
    }
}

fn hashing_failed(err: AuthError) -> DomainError {
    DomainError::Internal(err.to_string())
}

pub struct AccountService {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordService>,
    static_principals: Vec<StaticPrincipal>,
}

impl AccountService {
    pub fn new(users: Arc<dyn UserRepository>, passwords: Arc<dyn PasswordService>) -> Self {
        Self {
            users,
            passwords,
            static_principals: Vec::new(),
        }
    }

    pub fn with_static_principals(mut self, principals: Vec<StaticPrincipal>) -> Self {
        self.static_principals = principals;
        self
    }

    /// Register a regular account.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<User, DomainError> {
        self.create_account(name, email, password, Role::User).await
    }

    /// Register an administrator. Only existing administrators may do this.
    pub async fn register_admin(
        &self,
        actor: Actor,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<User, DomainError> {
        actor.require_admin()?;
        let user = self.create_account(name, email, password, Role::Admin).await?;
        tracing::info!(user_id = %user.id, created_by = %actor.id, "Administrator account created");
        Ok(user)
    }

    /// Resolve credentials to a principal. Static principals are consulted first.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<Principal, DomainError> {
        let email = normalize_email(email);
        if email.is_empty() || password.is_empty() {
            return Err(DomainError::InvalidCredentials);
        }

        if let Some(principal) = self.static_principals.iter().find(|p| p.email == email) {
            return if self.verify(password, &principal.password_hash)? {
                tracing::info!(user_email = %mask_email(&email), "Static principal authenticated");
                Ok(principal.into())
            } else {
                Err(DomainError::InvalidCredentials)
            };
        }

        let Some(user) = self.users.find_by_email(&email).await? else {
            tracing::debug!(user_email = %mask_email(&email), "Login for unknown email");
            return Err(DomainError::InvalidCredentials);
        };

        if !self.verify(password, &user.password_hash)? {
            tracing::debug!(user_id = %user.id, "Login with wrong password");
            return Err(DomainError::InvalidCredentials);
        }

        Ok(user.into())
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, DomainError> {
        self.passwords.verify(password, hash).map_err(hashing_failed)
    }

    async fn create_account(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<User, DomainError> {
        let name = name.trim();
        if name.chars().count() < MIN_NAME_LEN {
            return Err(DomainError::invalid(
                "Name must be at least 2 characters long",
            ));
        }
        let email = normalize_email(email);
        if !email.contains('@') {
            return Err(DomainError::invalid("Please provide a valid email address"));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(DomainError::invalid(
                "Password must be at least 8 characters long",
            ));
        }

        let taken = self.static_principals.iter().any(|p| p.email == email)
            || self.users.find_by_email(&email).await?.is_some();
        if taken {
            return Err(DomainError::Duplicate(
                "An account with this email already exists".to_string(),
            ));
        }

        let password_hash = self.passwords.hash(password).map_err(hashing_failed)?;
        let user = self
            .users
            .insert(User::new(name.to_string(), &email, password_hash, role))
            .await?;

        tracing::info!(user_id = %user.id, role = %user.role, "Account registered");
        Ok(user)
    }
}
