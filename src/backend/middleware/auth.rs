//! Authentication Middleware
//!
//! This module provides middleware for protecting routes that require a
//! user session. The session token travels in the HTTP-only `jwt` cookie
//! (an `Authorization: Bearer` header is also accepted for API clients).
//! The middleware verifies the token, loads the user record, and rejects
//! blocked accounts with 403 while clearing their cookie.

use axum::extract::{Request, State};
use axum::http::header::{AUTHORIZATION, COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use uuid::Uuid;

use crate::backend::auth::sessions::{clear_session_cookie, token_from_cookie_header, verify_token};
use crate::backend::auth::users::get_user_by_id;
use crate::backend::error::ApiError;
use crate::backend::server::state::AppState;

/// Authenticated user data extracted from the session token
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    pub role: String,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

/// Pull the session token out of the request headers
///
/// The `jwt` cookie is the primary carrier; a `Bearer` Authorization header
/// is accepted as a fallback.
fn extract_token(headers: &HeaderMap) -> Option<String> {
    if let Some(cookie_header) = headers.get(COOKIE).and_then(|h| h.to_str().ok()) {
        if let Some(token) = token_from_cookie_header(cookie_header) {
            return Some(token.to_string());
        }
    }

    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(|t| t.to_string())
}

/// Response that both carries an error status and clears the session cookie
fn reject_and_clear(status: StatusCode, message: &str) -> Response {
    let mut response =
        (status, Json(serde_json::json!({ "error": message }))).into_response();
    if let Ok(value) = HeaderValue::from_str(&clear_session_cookie()) {
        response.headers_mut().insert(SET_COOKIE, value);
    }
    response
}

/// Authentication middleware
///
/// 1. Extracts the session token from the `jwt` cookie (or Bearer header)
/// 2. Verifies the token signature and expiry
/// 3. Loads the user record and rejects missing or blocked accounts
/// 4. Attaches [`CurrentUser`] to request extensions for handlers
pub async fn auth_middleware(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = match extract_token(request.headers()) {
        Some(token) => token,
        None => {
            tracing::debug!("Missing session token");
            return ApiError::unauthorized("Authentication required").into_response();
        }
    };

    let claims = match verify_token(&token) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::warn!("Invalid session token: {:?}", e);
            return reject_and_clear(StatusCode::UNAUTHORIZED, "Invalid or expired session");
        }
    };

    let user_id = match Uuid::parse_str(&claims.sub) {
        Ok(id) => id,
        Err(e) => {
            tracing::error!("Invalid user ID in token: {:?}", e);
            return ApiError::internal("bad token subject").into_response();
        }
    };

    let user = match get_user_by_id(&app_state.db_pool, user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            tracing::warn!("Session for deleted user {}", user_id);
            return reject_and_clear(StatusCode::UNAUTHORIZED, "Account no longer exists");
        }
        Err(e) => {
            tracing::error!("Failed to load user for session: {:?}", e);
            return ApiError::from(e).into_response();
        }
    };

    // A blocked account keeps a syntactically valid cookie; every protected
    // route answers 403 and drops the cookie.
    if user.is_blocked {
        tracing::warn!("Blocked user {} rejected", user.username);
        return reject_and_clear(StatusCode::FORBIDDEN, "Account is blocked");
    }

    request.extensions_mut().insert(CurrentUser {
        user_id: user.id,
        username: user.username,
        email: user.email,
        role: user.role,
    });

    next.run(request).await
}

/// Axum extractor for the authenticated user
///
/// Used as a handler parameter to pull the [`CurrentUser`] that the auth
/// middleware attached to the request.
#[derive(Clone, Debug)]
pub struct AuthUser(pub CurrentUser);

impl axum::extract::FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(|| {
                tracing::warn!("CurrentUser not found in request extensions");
                ApiError::unauthorized("Authentication required")
            })?;

        Ok(AuthUser(user))
    }
}

/// Guard for admin-only handlers
pub fn require_admin(user: &CurrentUser) -> Result<(), ApiError> {
    if user.is_admin() {
        Ok(())
    } else {
        Err(ApiError::forbidden("Admin access required"))
    }
}
