//! Logout Handler
//!
//! POST /api/auth/logout clears the session cookie. The JWT itself stays
//! valid until expiry; logout is purely a client-side session drop.

use axum::http::header::SET_COOKIE;
use axum::response::AppendHeaders;
use axum::Json;

use crate::backend::auth::sessions::clear_session_cookie;

pub async fn logout(
) -> (AppendHeaders<[(axum::http::HeaderName, String); 1]>, Json<serde_json::Value>) {
    let headers = AppendHeaders([(SET_COOKIE, clear_session_cookie())]);
    (headers, Json(serde_json::json!({ "success": true })))
}
