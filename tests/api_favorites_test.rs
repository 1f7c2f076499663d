//! Favorites fan-out integration tests
//!
//! Exactly one owner notification per add edge, never on remove, never
//! for the owner's own favourite. Requires `DATABASE_URL`.

mod common;

use axum::http::StatusCode;
use serial_test::serial;
use uuid::Uuid;

use common::auth_helpers::{create_test_server, create_test_user, TestUser};
use common::database::TestDatabase;

async fn create_product(server: &axum_test::TestServer, owner: &TestUser) -> Uuid {
    let response = server
        .post("/api/products")
        .add_header("Cookie", owner.cookie())
        .json(&serde_json::json!({ "title": "Dusk" }))
        .await;
    let body: serde_json::Value = response.json();
    body["id"].as_str().unwrap().parse().unwrap()
}

async fn toggle(
    server: &axum_test::TestServer,
    user: &TestUser,
    product_id: Uuid,
) -> serde_json::Value {
    let response = server
        .post("/api/favorites")
        .add_header("Cookie", user.cookie())
        .json(&serde_json::json!({ "item_kind": "product", "item_id": product_id }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    response.json()
}

async fn favorite_notifications(server: &axum_test::TestServer, user: &TestUser) -> usize {
    let response = server
        .get("/api/notifications")
        .add_header("Cookie", user.cookie())
        .await;
    let body: serde_json::Value = response.json();
    body["notifications"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|n| n["kind"] == "favorite")
        .count()
}

#[tokio::test]
#[serial]
async fn test_add_edge_notifies_owner_once() {
    let Some(db) = TestDatabase::try_new().await else { return };
    let server = create_test_server(db.url()).await;

    let owner = create_test_user(db.pool(), "owner").await;
    let fan = create_test_user(db.pool(), "fan").await;
    let product_id = create_product(&server, &owner).await;

    let body = toggle(&server, &fan, product_id).await;
    assert_eq!(body["favorited"], true);
    assert_eq!(favorite_notifications(&server, &owner).await, 1);

    // remove edge: no new notification
    let body = toggle(&server, &fan, product_id).await;
    assert_eq!(body["favorited"], false);
    assert_eq!(favorite_notifications(&server, &owner).await, 1);

    // second add edge notifies again
    toggle(&server, &fan, product_id).await;
    assert_eq!(favorite_notifications(&server, &owner).await, 2);
}

#[tokio::test]
#[serial]
async fn test_own_favorite_is_silent() {
    let Some(db) = TestDatabase::try_new().await else { return };
    let server = create_test_server(db.url()).await;

    let owner = create_test_user(db.pool(), "owner").await;
    let product_id = create_product(&server, &owner).await;

    let body = toggle(&server, &owner, product_id).await;
    assert_eq!(body["favorited"], true);
    assert_eq!(favorite_notifications(&server, &owner).await, 0);
}

#[tokio::test]
#[serial]
async fn test_favorites_listing() {
    let Some(db) = TestDatabase::try_new().await else { return };
    let server = create_test_server(db.url()).await;

    let owner = create_test_user(db.pool(), "owner").await;
    let fan = create_test_user(db.pool(), "fan").await;
    let product_id = create_product(&server, &owner).await;
    toggle(&server, &fan, product_id).await;

    let response = server
        .get(&format!("/api/users/{}/favorites", fan.id()))
        .add_header("Cookie", fan.cookie())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    let favorites = body["favorites"].as_array().unwrap();
    assert_eq!(favorites.len(), 1);
    assert_eq!(favorites[0]["item_kind"], "product");
    assert_eq!(favorites[0]["item_id"], product_id.to_string());
}
