//! Domain-level error types.

use thiserror::Error;
use uuid::Uuid;

/// Coarse classification of a [`DomainError`], used by the boundary to pick a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Unauthorized,
    InvalidArgument,
    NotFound,
    Conflict,
    StoreUnavailable,
    Internal,
}

/// Domain errors - business logic failures.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Unauthorized access")]
    Unauthorized,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: &'static str, id: Uuid },

    #[error("{missing} of {requested} requested {entity_type} entities not found")]
    MissingFromSet {
        entity_type: &'static str,
        missing: usize,
        requested: usize,
    },

    #[error("Duplicate entity: {0}")]
    Duplicate(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn post_not_found(id: Uuid) -> Self {
        Self::NotFound {
            entity_type: "Post",
            id,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthorized | Self::InvalidCredentials => ErrorKind::Unauthorized,
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::NotFound { .. } | Self::MissingFromSet { .. } => ErrorKind::NotFound,
            Self::Duplicate(_) => ErrorKind::Conflict,
            Self::StoreUnavailable(_) => ErrorKind::StoreUnavailable,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    /// A unique key already holds the value. Carries the constraint name.
    #[error("Unique constraint violated: {0}")]
    Constraint(String),

    /// A referenced row does not exist. Carries the constraint name.
    #[error("Foreign key constraint violated: {0}")]
    ForeignKey(String),
}

impl From<RepoError> for DomainError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Connection(msg) | RepoError::Query(msg) => {
                DomainError::StoreUnavailable(msg)
            }
            // Constraint names stay in the logs.
            RepoError::Constraint(name) => {
                tracing::debug!(constraint = %name, "Unique constraint violated");
                DomainError::Duplicate("Entity already exists".into())
            }
            RepoError::ForeignKey(name) => {
                tracing::debug!(constraint = %name, "Foreign key constraint violated");
                DomainError::invalid("Referenced entity does not exist")
            }
            // Callers that know the id report NotFound themselves; this covers the rest.
            RepoError::NotFound => DomainError::Internal("Entity vanished during update".into()),
        }
    }
}
