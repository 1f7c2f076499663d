//! Current-User Handler
//!
//! GET /api/auth/me returns the authenticated account, refreshed from the
//! database so profile edits and role changes are reflected immediately.

use axum::extract::State;
use axum::Json;
use sqlx::PgPool;

use crate::backend::auth::handlers::types::UserResponse;
use crate::backend::auth::users::get_user_by_id;
use crate::backend::error::ApiError;
use crate::backend::middleware::auth::AuthUser;

pub async fn get_me(
    State(pool): State<PgPool>,
    AuthUser(current): AuthUser,
) -> Result<Json<UserResponse>, ApiError> {
    let user = get_user_by_id(&pool, current.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User"))?;

    Ok(Json(UserResponse::from(&user)))
}
