//! Login Handler
//!
//! This module implements the user authentication handler for
//! POST /api/auth/login.
//!
//! # Security
//!
//! - Passwords are verified using bcrypt
//! - Invalid credentials return 401 Unauthorized (no information leakage)
//! - Blocked accounts cannot obtain a fresh session

use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::response::{AppendHeaders, Json};
use bcrypt::verify;
use sqlx::PgPool;

use crate::backend::auth::handlers::types::{AuthResponse, LoginRequest, UserResponse};
use crate::backend::auth::sessions::{create_token, session_cookie};
use crate::backend::auth::users::{get_user_by_email, get_user_by_username};
use crate::backend::error::ApiError;

/// Login handler
///
/// Verifies the username (or email) and password, and installs the session
/// cookie when authentication succeeds.
pub async fn login(
    State(pool): State<PgPool>,
    Json(request): Json<LoginRequest>,
) -> Result<(AppendHeaders<[(axum::http::HeaderName, String); 1]>, Json<AuthResponse>), ApiError> {
    tracing::info!("Login request for: {}", request.username);

    // An '@' means the caller typed an email address
    let user = if request.username.contains('@') {
        get_user_by_email(&pool, &request.username).await?
    } else {
        get_user_by_username(&pool, &request.username).await?
    };

    let user = user.ok_or_else(|| {
        tracing::warn!("User not found: {}", request.username);
        ApiError::unauthorized("Invalid credentials")
    })?;

    let valid = verify(&request.password, &user.password_hash)
        .map_err(|e| ApiError::internal(format!("password verification failed: {}", e)))?;

    if !valid {
        tracing::warn!("Invalid password for user: {}", request.username);
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    if user.is_blocked {
        tracing::warn!("Blocked user attempted login: {}", request.username);
        return Err(ApiError::forbidden("Account is blocked"));
    }

    let token = create_token(user.id, user.email.clone())
        .map_err(|e| ApiError::internal(format!("token creation failed: {}", e)))?;

    tracing::info!("User logged in successfully: {} ({})", user.username, user.email);

    let headers = AppendHeaders([(SET_COOKIE, session_cookie(&token))]);
    let body = AuthResponse {
        token,
        user: UserResponse::from(&user),
    };
    Ok((headers, Json(body)))
}
