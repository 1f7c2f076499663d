//! Admin HTTP Handlers
//!
//! User moderation and the audit trail. Every privileged mutation here
//! goes through the outbox so it lands in the audit log.
//!
//! Note on delete: the original system gated deletion on a field that did
//! not exist on its schema, making the check dead; here the guard uses the
//! `role` column like every other admin route (see DESIGN.md).

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::backend::audit;
use crate::backend::auth::users::{self, get_user_by_id};
use crate::backend::error::ApiError;
use crate::backend::middleware::auth::{require_admin, AuthUser};
use crate::backend::outbox::{self, DomainEvent};

#[derive(Debug, Deserialize)]
pub struct PageParams {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

/// GET /api/admin/users
pub async fn list_users(
    State(pool): State<PgPool>,
    AuthUser(current): AuthUser,
    Query(params): Query<PageParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_admin(&current)?;

    let limit = params.limit.unwrap_or(50).min(200) as i64;
    let offset = params.offset.unwrap_or(0) as i64;

    let users = users::list_users(&pool, limit, offset).await?;
    Ok(Json(serde_json::json!({ "users": users })))
}

/// POST /api/admin/users/{id}/block
pub async fn block_user(
    State(pool): State<PgPool>,
    AuthUser(current): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_admin(&current)?;

    if id == current.user_id {
        return Err(ApiError::validation("Cannot block your own account"));
    }

    let user = get_user_by_id(&pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("User"))?;

    users::set_blocked(&pool, id, true).await?;

    outbox::dispatch(
        &pool,
        DomainEvent::UserBlocked {
            admin_id: current.user_id,
            user_id: id,
            username: user.username.clone(),
        },
    )
    .await;

    Ok(Json(serde_json::json!({ "success": true })))
}

/// POST /api/admin/users/{id}/unblock
pub async fn unblock_user(
    State(pool): State<PgPool>,
    AuthUser(current): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_admin(&current)?;

    let user = get_user_by_id(&pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("User"))?;

    users::set_blocked(&pool, id, false).await?;

    outbox::dispatch(
        &pool,
        DomainEvent::UserUnblocked {
            admin_id: current.user_id,
            user_id: id,
            username: user.username.clone(),
        },
    )
    .await;

    Ok(Json(serde_json::json!({ "success": true })))
}

/// DELETE /api/admin/users/{id}
pub async fn delete_user(
    State(pool): State<PgPool>,
    AuthUser(current): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_admin(&current)?;

    if id == current.user_id {
        return Err(ApiError::validation("Cannot delete your own account"));
    }

    let user = get_user_by_id(&pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("User"))?;

    // the audit row must exist before the FK nulls performed_by references
    outbox::dispatch(
        &pool,
        DomainEvent::UserDeleted {
            admin_id: current.user_id,
            user_id: id,
            username: user.username.clone(),
        },
    )
    .await;

    users::delete_user(&pool, id).await?;

    tracing::info!("User {} deleted by admin {}", user.username, current.username);
    Ok(Json(serde_json::json!({ "success": true })))
}

/// GET /api/admin/audit
pub async fn list_audit_logs(
    State(pool): State<PgPool>,
    AuthUser(current): AuthUser,
    Query(params): Query<PageParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_admin(&current)?;

    let limit = params.limit.unwrap_or(100).min(500) as i64;
    let offset = params.offset.unwrap_or(0) as i64;

    let logs = audit::db::list(&pool, limit, offset).await?;
    Ok(Json(serde_json::json!({ "audit_logs": logs })))
}
