//! Signup Handler
//!
//! This module implements the user registration handler for
//! POST /api/auth/signup.
//!
//! # Registration Process
//!
//! 1. Validate username, email format, and password length
//! 2. Check username/email uniqueness
//! 3. Hash password using bcrypt
//! 4. Create user in database (always with the "user" role — admin
//!    accounts come only from the startup bootstrap)
//! 5. Generate JWT token and set the session cookie
//!
//! # Security
//!
//! - Passwords are hashed using bcrypt with DEFAULT_COST
//! - Passwords are never returned in responses
//! - The session cookie is HTTP-only and expires in 15 days

use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::response::{AppendHeaders, Json};
use bcrypt::{hash, DEFAULT_COST};
use sqlx::PgPool;

use crate::backend::auth::handlers::types::{AuthResponse, SignupRequest, UserResponse};
use crate::backend::auth::sessions::{create_token, session_cookie};
use crate::backend::auth::users::{create_user, get_user_by_email, get_user_by_username};
use crate::backend::error::ApiError;

/// Validate username format
///
/// Usernames must be:
/// - 3-30 characters long
/// - Contain only alphanumeric characters and underscores
/// - Start with a letter
fn is_valid_username(username: &str) -> bool {
    if username.len() < 3 || username.len() > 30 {
        return false;
    }

    let mut chars = username.chars();

    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }

    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Sign up handler
///
/// Validates the input, creates the account, and installs the session
/// cookie so the caller is immediately authenticated.
pub async fn signup(
    State(pool): State<PgPool>,
    Json(request): Json<SignupRequest>,
) -> Result<(AppendHeaders<[(axum::http::HeaderName, String); 1]>, Json<AuthResponse>), ApiError> {
    tracing::info!(
        "Signup request for username: {}, email: {}",
        request.username,
        request.email
    );

    if !is_valid_username(&request.username) {
        return Err(ApiError::validation(
            "Username must be 3-30 chars, start with a letter, and contain only letters, numbers, and underscores",
        ));
    }

    if !request.email.contains('@') {
        return Err(ApiError::validation("Invalid email format"));
    }

    if request.password.len() < 8 {
        return Err(ApiError::validation(
            "Password must be at least 8 characters",
        ));
    }

    if get_user_by_username(&pool, &request.username).await?.is_some() {
        return Err(ApiError::conflict("Username already taken"));
    }

    if get_user_by_email(&pool, &request.email).await?.is_some() {
        return Err(ApiError::conflict("Email already registered"));
    }

    let password_hash = hash(&request.password, DEFAULT_COST)
        .map_err(|e| ApiError::internal(format!("password hashing failed: {}", e)))?;

    let user = create_user(&pool, request.username.clone(), request.email.clone(), password_hash)
        .await?;

    let token = create_token(user.id, user.email.clone())
        .map_err(|e| ApiError::internal(format!("token creation failed: {}", e)))?;

    tracing::info!("User created successfully: {} ({})", user.username, user.email);

    let headers = AppendHeaders([(SET_COOKIE, session_cookie(&token))]);
    let body = AuthResponse {
        token,
        user: UserResponse::from(&user),
    };
    Ok((headers, Json(body)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_usernames() {
        assert!(is_valid_username("painter"));
        assert!(is_valid_username("art_corner_99"));
        assert!(is_valid_username("Abc"));
    }

    #[test]
    fn test_invalid_usernames() {
        assert!(!is_valid_username("ab"));
        assert!(!is_valid_username("9painter"));
        assert!(!is_valid_username("_painter"));
        assert!(!is_valid_username("pain ter"));
        assert!(!is_valid_username(&"x".repeat(31)));
    }
}
