//! Error handling middleware - RFC 7807 compliant responses.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use std::fmt;

use blogify_core::DomainError;
use blogify_core::error::ErrorKind;
use blogify_core::ports::AuthError;
use blogify_shared::ErrorResponse;

use crate::observability::current_request_id;

/// Application-level error type that converts to RFC 7807 responses.
#[derive(Debug)]
pub enum AppError {
    Domain(DomainError),
    /// Malformed input rejected before it reached a service.
    BadRequest(String),
    /// Missing, malformed or expired bearer token.
    Unauthenticated(AuthError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Domain(err) => write!(f, "{}", err),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Unauthenticated(err) => write!(f, "Unauthenticated: {}", err),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Domain(err) => match err.kind() {
                ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
                ErrorKind::InvalidArgument => StatusCode::BAD_REQUEST,
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::Conflict => StatusCode::CONFLICT,
                ErrorKind::StoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,
                ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthenticated(AuthError::HashingError(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AppError::Domain(err) => domain_problem(err),
            AppError::BadRequest(detail) => ErrorResponse::bad_request(detail),
            AppError::Unauthenticated(err) => auth_problem(err),
        };

        let error = match current_request_id() {
            Some(id) => error.with_request_id(id),
            None => error,
        };

        HttpResponse::build(self.status_code()).json(error)
    }
}

fn domain_problem(err: &DomainError) -> ErrorResponse {
    match err {
        DomainError::Unauthorized => ErrorResponse::unauthorized("Admin access required"),
        DomainError::InvalidCredentials => ErrorResponse::unauthorized("Invalid credentials"),
        DomainError::InvalidArgument(msg) => ErrorResponse::bad_request(msg),
        DomainError::NotFound { entity_type, .. } => {
            ErrorResponse::not_found(format!("{} not found", entity_type))
        }
        DomainError::MissingFromSet { .. } => ErrorResponse::not_found(err.to_string()),
        DomainError::Duplicate(msg) => ErrorResponse::conflict(msg),
        DomainError::StoreUnavailable(msg) => {
            tracing::error!("Store unavailable: {}", msg);
            ErrorResponse::service_unavailable()
        }
        DomainError::Internal(msg) => {
            tracing::error!("Internal error: {}", msg);
            ErrorResponse::internal_error()
        }
    }
}

fn auth_problem(err: &AuthError) -> ErrorResponse {
    match err {
        AuthError::TokenExpired => ErrorResponse::new(401, "Token Expired")
            .with_detail("Your authentication token has expired. Please login again."),
        AuthError::InvalidToken(msg) => {
            ErrorResponse::new(401, "Invalid Token").with_detail(msg.clone())
        }
        AuthError::MissingAuth => ErrorResponse::new(401, "Authentication Required")
            .with_detail("Please provide a valid Bearer token in the Authorization header."),
        AuthError::HashingError(msg) => {
            tracing::error!("Credential hashing failed: {}", msg);
            ErrorResponse::internal_error()
        }
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        AppError::Domain(err)
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        AppError::Unauthenticated(err)
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
