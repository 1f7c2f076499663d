//! Authentication API integration tests
//!
//! Signup/login flows, the session cookie, and the blocked-account
//! rejection. Requires `DATABASE_URL`; tests skip themselves without it.

mod common;

use axum::http::StatusCode;
use serial_test::serial;

use common::auth_helpers::{create_test_server, create_test_user};
use common::database::TestDatabase;

#[tokio::test]
#[serial]
async fn test_signup_sets_session_cookie() {
    let Some(db) = TestDatabase::try_new().await else { return };
    let server = create_test_server(db.url()).await;

    let response = server
        .post("/api/auth/signup")
        .json(&serde_json::json!({
            "username": "painter",
            "email": "painter@example.com",
            "password": "password123"
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);

    let cookie = response
        .headers()
        .get("set-cookie")
        .and_then(|v| v.to_str().ok())
        .expect("signup must set the session cookie");
    assert!(cookie.starts_with("jwt="));
    assert!(cookie.contains("HttpOnly"));

    let body: serde_json::Value = response.json();
    assert!(body.get("token").is_some());
    assert_eq!(body["user"]["username"], "painter");
}

#[tokio::test]
#[serial]
async fn test_signup_duplicate_username_conflicts() {
    let Some(db) = TestDatabase::try_new().await else { return };
    let server = create_test_server(db.url()).await;
    create_test_user(db.pool(), "painter").await;

    let response = server
        .post("/api/auth/signup")
        .json(&serde_json::json!({
            "username": "painter",
            "email": "other@example.com",
            "password": "password123"
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::CONFLICT);
}

#[tokio::test]
#[serial]
async fn test_login_with_wrong_password() {
    let Some(db) = TestDatabase::try_new().await else { return };
    let server = create_test_server(db.url()).await;
    create_test_user(db.pool(), "painter").await;

    let response = server
        .post("/api/auth/login")
        .json(&serde_json::json!({
            "username": "painter",
            "password": "wrongpassword"
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[serial]
async fn test_me_with_session_cookie() {
    let Some(db) = TestDatabase::try_new().await else { return };
    let server = create_test_server(db.url()).await;
    let user = create_test_user(db.pool(), "painter").await;

    let response = server
        .get("/api/auth/me")
        .add_header("Cookie", user.cookie())
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["username"], "painter");
}

#[tokio::test]
#[serial]
async fn test_me_without_session() {
    let Some(db) = TestDatabase::try_new().await else { return };
    let server = create_test_server(db.url()).await;

    let response = server.get("/api/auth/me").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[serial]
async fn test_blocked_user_gets_403_and_cleared_cookie() {
    let Some(db) = TestDatabase::try_new().await else { return };
    let server = create_test_server(db.url()).await;
    let user = create_test_user(db.pool(), "painter").await;

    artcorner::backend::auth::users::set_blocked(db.pool(), user.id(), true)
        .await
        .unwrap();

    // the previously valid cookie now fails every protected route
    let response = server
        .get("/api/auth/me")
        .add_header("Cookie", user.cookie())
        .await;

    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    let cookie = response
        .headers()
        .get("set-cookie")
        .and_then(|v| v.to_str().ok())
        .expect("blocked rejection must clear the cookie");
    assert!(cookie.contains("Max-Age=0"));
}

#[tokio::test]
#[serial]
async fn test_logout_clears_cookie() {
    let Some(db) = TestDatabase::try_new().await else { return };
    let server = create_test_server(db.url()).await;
    let user = create_test_user(db.pool(), "painter").await;

    let response = server
        .post("/api/auth/logout")
        .add_header("Cookie", user.cookie())
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let cookie = response
        .headers()
        .get("set-cookie")
        .and_then(|v| v.to_str().ok())
        .unwrap();
    assert!(cookie.contains("Max-Age=0"));
}
