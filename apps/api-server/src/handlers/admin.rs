//! Admin moderation and analytics handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use blogify_core::domain::PostStatus;
use blogify_core::services::{BulkOutcome, parse_window};
use blogify_shared::ApiResponse;
use blogify_shared::dto::{
    AnalyticsQuery, BulkDeleteRequest, BulkResponse, BulkStatusRequest, PostListQuery,
    StatusUpdateRequest,
};

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

fn bulk_response(outcome: BulkOutcome) -> BulkResponse {
    BulkResponse {
        affected: outcome.affected,
        post_ids: outcome.post_ids,
    }
}

/// GET /api/admin/posts?status=
pub async fn list_posts(
    state: web::Data<AppState>,
    identity: Identity,
    query: web::Query<PostListQuery>,
) -> AppResult<HttpResponse> {
    let status = query
        .status
        .as_deref()
        .map(str::parse::<PostStatus>)
        .transpose()?;

    let posts = state.moderation.list_posts(identity.actor(), status).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(posts)))
}

/// GET /api/admin/posts/{id}
pub async fn get_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = state
        .moderation
        .get_post(identity.actor(), path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(post)))
}

/// PATCH /api/admin/posts/{id}
pub async fn set_status(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<StatusUpdateRequest>,
) -> AppResult<HttpResponse> {
    let moderated = state
        .moderation
        .set_status(identity.actor(), path.into_inner(), &body.status)
        .await?;

    let message = format!("Post {} successfully", moderated.status.as_str().to_lowercase());
    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(moderated, message)))
}

/// DELETE /api/admin/posts/{id}
pub async fn delete_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state
        .moderation
        .delete_post(identity.actor(), path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("Post deleted successfully")))
}

/// PATCH /api/admin/posts/bulk
pub async fn bulk_set_status(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<BulkStatusRequest>,
) -> AppResult<HttpResponse> {
    let BulkStatusRequest { post_ids, status } = body.into_inner();
    let outcome = state
        .bulk
        .bulk_set_status(identity.actor(), post_ids, &status)
        .await?;

    let message = format!("{} posts updated", outcome.affected);
    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        bulk_response(outcome),
        message,
    )))
}

/// DELETE /api/admin/posts/bulk
pub async fn bulk_delete(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<BulkDeleteRequest>,
) -> AppResult<HttpResponse> {
    let outcome = state
        .bulk
        .bulk_delete(identity.actor(), body.into_inner().post_ids)
        .await?;

    let message = format!("{} posts deleted", outcome.affected);
    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        bulk_response(outcome),
        message,
    )))
}

/// GET /api/admin/analytics?days=
pub async fn analytics(
    state: web::Data<AppState>,
    identity: Identity,
    query: web::Query<AnalyticsQuery>,
) -> AppResult<HttpResponse> {
    identity.actor().require_admin()?;

    let days = parse_window(query.days.as_deref());
    let report = state.analytics.compute(days).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(report)))
}
