//! Profile HTTP Handlers
//!
//! Public profile view, self-service profile editing with optimistic
//! concurrency, and the personal block list.

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::backend::auth::users::{
    self, block_user, get_user_by_id, unblock_user, ProfileUpdate,
};
use crate::backend::error::ApiError;
use crate::backend::middleware::auth::AuthUser;

/// Profile update payload; `version` is the value the client last read
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProfileRequest {
    pub version: i64,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

pub async fn get_profile(
    State(pool): State<PgPool>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let user = get_user_by_id(&pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("User"))?;

    // public view: no email, no block state, but the version so editors can
    // round-trip it
    Ok(Json(serde_json::json!({
        "id": user.id,
        "username": user.username,
        "display_name": user.display_name,
        "bio": user.bio,
        "avatar_url": user.avatar_url,
        "role": user.role,
        "version": user.version,
        "created_at": user.created_at,
    })))
}

/// PUT /api/users/{id} — self or admin; stale versions get 409 and the
/// caller retries with fresh data
pub async fn update_profile(
    State(pool): State<PgPool>,
    AuthUser(current): AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if id != current.user_id && !current.is_admin() {
        return Err(ApiError::forbidden("Cannot edit another user's profile"));
    }

    let update = ProfileUpdate {
        display_name: request.display_name,
        bio: request.bio,
        avatar_url: request.avatar_url,
    };

    match users::update_profile(&pool, id, request.version, &update).await? {
        Some(user) => Ok(Json(serde_json::json!({
            "id": user.id,
            "username": user.username,
            "display_name": user.display_name,
            "bio": user.bio,
            "avatar_url": user.avatar_url,
            "version": user.version,
        }))),
        None => {
            // stale version or missing row; tell them apart for the client
            if get_user_by_id(&pool, id).await?.is_some() {
                Err(ApiError::conflict(
                    "Profile was changed concurrently; reload and retry",
                ))
            } else {
                Err(ApiError::not_found("User"))
            }
        }
    }
}

/// POST /api/users/{id}/block — add to the caller's personal block list
pub async fn block(
    State(pool): State<PgPool>,
    AuthUser(current): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if id == current.user_id {
        return Err(ApiError::validation("Cannot block yourself"));
    }
    get_user_by_id(&pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("User"))?;

    block_user(&pool, current.user_id, id).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}

/// DELETE /api/users/{id}/block
pub async fn unblock(
    State(pool): State<PgPool>,
    AuthUser(current): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    unblock_user(&pool, current.user_id, id).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}
