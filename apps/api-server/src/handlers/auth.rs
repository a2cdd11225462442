//! Authentication handlers.

use actix_web::{HttpResponse, web};

use blogify_core::DomainError;
use blogify_core::domain::{Role, User};
use blogify_shared::ApiResponse;
use blogify_shared::dto::{AuthResponse, LoginRequest, RegisterUserRequest, UserResponse};

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

fn user_response(user: &User) -> UserResponse {
    UserResponse {
        id: user.id,
        name: user.name.clone(),
        email: user.email.clone(),
        role: user.role.as_str().to_string(),
    }
}

fn issue_token(state: &AppState, user: UserResponse, role: Role) -> AppResult<AuthResponse> {
    let access_token = state
        .tokens
        .generate_token(user.id, &user.email, &user.name, role)
        .map_err(|e| DomainError::Internal(e.to_string()))?;

    Ok(AuthResponse {
        access_token,
        token_type: "Bearer".to_string(),
        expires_in: u64::try_from(state.tokens.expiration_seconds()).unwrap_or_default(),
        user,
    })
}

/// POST /api/auth/register
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterUserRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let user = state
        .accounts
        .register(&req.name, &req.email, &req.password)
        .await?;

    let auth = issue_token(&state, user_response(&user), user.role)?;
    Ok(HttpResponse::Created().json(ApiResponse::ok_with_message(auth, "Registration successful")))
}

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let principal = state.accounts.authenticate(&req.email, &req.password).await?;

    let user = UserResponse {
        id: principal.id,
        name: principal.name,
        email: principal.email,
        role: principal.role.as_str().to_string(),
    };
    let auth = issue_token(&state, user, principal.role)?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(auth, "Login successful")))
}

/// GET /api/auth/me - Protected route
pub async fn me(identity: Identity) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(ApiResponse::ok(UserResponse {
        id: identity.user_id,
        name: identity.name,
        email: identity.email,
        role: identity.role.as_str().to_string(),
    })))
}

/// POST /api/admin/users
pub async fn register_admin(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<RegisterUserRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let user = state
        .accounts
        .register_admin(identity.actor(), &req.name, &req.email, &req.password)
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok_with_message(
        user_response(&user),
        "Administrator created",
    )))
}

