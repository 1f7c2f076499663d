//! Notification HTTP Handlers
//!
//! Listing, marking seen (one or all), and deletion. All operations are
//! scoped to the authenticated user's own notifications.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::backend::error::ApiError;
use crate::backend::middleware::auth::AuthUser;
use crate::backend::notifications::db;

/// Pagination query parameters
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

pub async fn list_notifications(
    State(pool): State<PgPool>,
    AuthUser(current): AuthUser,
    Query(params): Query<ListParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let limit = params.limit.unwrap_or(50).min(200) as i64;
    let offset = params.offset.unwrap_or(0) as i64;

    let notifications = db::list_for_user(&pool, current.user_id, limit, offset).await?;
    Ok(Json(serde_json::json!({ "notifications": notifications })))
}

pub async fn mark_notification_seen(
    State(pool): State<PgPool>,
    AuthUser(current): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let updated = db::mark_seen(&pool, id, current.user_id).await?;
    if !updated {
        return Err(ApiError::not_found("Notification"));
    }
    Ok(Json(serde_json::json!({ "success": true })))
}

pub async fn mark_all_notifications_seen(
    State(pool): State<PgPool>,
    AuthUser(current): AuthUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let updated = db::mark_all_seen(&pool, current.user_id).await?;
    Ok(Json(serde_json::json!({ "success": true, "updated": updated })))
}

pub async fn delete_notification(
    State(pool): State<PgPool>,
    AuthUser(current): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let deleted = db::delete(&pool, id, current.user_id).await?;
    if !deleted {
        return Err(ApiError::not_found("Notification"));
    }
    Ok(Json(serde_json::json!({ "success": true })))
}
