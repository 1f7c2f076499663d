//! Cart and checkout integration tests
//!
//! The all-or-nothing checkout transaction over polymorphic lines.
//! Requires `DATABASE_URL`; tests skip without it.

mod common;

use axum::http::StatusCode;
use serial_test::serial;
use uuid::Uuid;

use common::auth_helpers::{create_test_server, create_test_user, TestUser};
use common::database::TestDatabase;

async fn create_product(
    server: &axum_test::TestServer,
    seller: &TestUser,
    title: &str,
    price_cents: i64,
    quantity: i64,
) -> Uuid {
    let response = server
        .post("/api/products")
        .add_header("Cookie", seller.cookie())
        .json(&serde_json::json!({
            "title": title,
            "for_sale": true,
            "price_cents": price_cents,
            "quantity": quantity,
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    body["id"].as_str().unwrap().parse().unwrap()
}

async fn create_event(
    server: &axum_test::TestServer,
    organiser: &TestUser,
    title: &str,
    capacity: i64,
) -> Uuid {
    let response = server
        .post("/api/events")
        .add_header("Cookie", organiser.cookie())
        .json(&serde_json::json!({
            "title": title,
            "capacity": capacity,
            "ticket_type": "paid",
            "price_cents": 2000,
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    body["id"].as_str().unwrap().parse().unwrap()
}

async fn add_to_cart(
    server: &axum_test::TestServer,
    buyer: &TestUser,
    kind: &str,
    item_id: Uuid,
    quantity: i64,
) {
    let response = server
        .post("/api/cart")
        .add_header("Cookie", buyer.cookie())
        .json(&serde_json::json!({
            "item_id": item_id,
            "item_kind": kind,
            "quantity": quantity,
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
}

async fn product_quantity(db: &TestDatabase, id: Uuid) -> i64 {
    artcorner::backend::products::db::get_product(db.pool(), id)
        .await
        .unwrap()
        .unwrap()
        .quantity
}

async fn event_capacity(db: &TestDatabase, id: Uuid) -> i64 {
    artcorner::backend::events::db::get_event(db.pool(), id)
        .await
        .unwrap()
        .unwrap()
        .capacity
}

#[tokio::test]
#[serial]
async fn test_capacity_shortfall_aborts_whole_checkout() {
    let Some(db) = TestDatabase::try_new().await else { return };
    let server = create_test_server(db.url()).await;

    let seller = create_test_user(db.pool(), "seller").await;
    let buyer = create_test_user(db.pool(), "buyer").await;

    // product P with stock 2, paid event E with capacity 1
    let p = create_product(&server, &seller, "Dusk", 1500, 2).await;
    let e = create_event(&server, &seller, "Opening night", 1).await;

    add_to_cart(&server, &buyer, "product", p, 1).await;
    add_to_cart(&server, &buyer, "event", e, 2).await;

    let response = server
        .post("/api/checkout")
        .add_header("Cookie", buyer.cookie())
        .json(&serde_json::json!({ "shipping": { "name": "Buyer" } }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("capacity"));

    // nothing was decremented
    assert_eq!(product_quantity(&db, p).await, 2);
    assert_eq!(event_capacity(&db, e).await, 1);
}

#[tokio::test]
#[serial]
async fn test_successful_checkout_decrements_and_clears_cart() {
    let Some(db) = TestDatabase::try_new().await else { return };
    let server = create_test_server(db.url()).await;

    let seller = create_test_user(db.pool(), "seller").await;
    let buyer = create_test_user(db.pool(), "buyer").await;

    let p = create_product(&server, &seller, "Dusk", 1500, 2).await;
    let e = create_event(&server, &seller, "Opening night", 3).await;

    add_to_cart(&server, &buyer, "product", p, 1).await;
    add_to_cart(&server, &buyer, "event", e, 2).await;

    let response = server
        .post("/api/checkout")
        .add_header("Cookie", buyer.cookie())
        .json(&serde_json::json!({ "shipping": { "name": "Buyer", "city": "Ghent" } }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["order"]["status"], "pending");
    assert_eq!(body["order"]["total_cents"], 1500 + 2 * 2000);
    assert_eq!(body["order"]["items"].as_array().unwrap().len(), 2);

    assert_eq!(product_quantity(&db, p).await, 1);
    assert_eq!(event_capacity(&db, e).await, 1);

    // cart is now empty
    let cart = server
        .get("/api/cart")
        .add_header("Cookie", buyer.cookie())
        .await;
    let cart_body: serde_json::Value = cart.json();
    assert!(cart_body["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
#[serial]
async fn test_self_purchase_of_own_product_is_skipped() {
    let Some(db) = TestDatabase::try_new().await else { return };
    let server = create_test_server(db.url()).await;

    let seller = create_test_user(db.pool(), "seller").await;
    let buyer = create_test_user(db.pool(), "buyer").await;

    let own = create_product(&server, &seller, "Mine", 1000, 5).await;
    let other = create_product(&server, &buyer, "Theirs", 2000, 5).await;

    // seller buys: their own product is skipped silently, the other charges
    add_to_cart(&server, &seller, "product", own, 1).await;
    add_to_cart(&server, &seller, "product", other, 1).await;

    let response = server
        .post("/api/checkout")
        .add_header("Cookie", seller.cookie())
        .json(&serde_json::json!({ "shipping": {} }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    let items = body["order"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["title"], "Theirs");

    // own stock untouched
    assert_eq!(product_quantity(&db, own).await, 5);
    assert_eq!(product_quantity(&db, other).await, 4);
}

#[tokio::test]
#[serial]
async fn test_empty_cart_checkout_rejected() {
    let Some(db) = TestDatabase::try_new().await else { return };
    let server = create_test_server(db.url()).await;
    let buyer = create_test_user(db.pool(), "buyer").await;

    let response = server
        .post("/api/checkout")
        .add_header("Cookie", buyer.cookie())
        .json(&serde_json::json!({ "shipping": {} }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[serial]
async fn test_cart_line_defaults_to_product_kind() {
    let Some(db) = TestDatabase::try_new().await else { return };
    let server = create_test_server(db.url()).await;

    let seller = create_test_user(db.pool(), "seller").await;
    let buyer = create_test_user(db.pool(), "buyer").await;
    let p = create_product(&server, &seller, "Dusk", 1500, 2).await;

    // no item_kind in the payload
    let response = server
        .post("/api/cart")
        .add_header("Cookie", buyer.cookie())
        .json(&serde_json::json!({ "item_id": p }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let cart = server
        .get("/api/cart")
        .add_header("Cookie", buyer.cookie())
        .await;
    let body: serde_json::Value = cart.json();
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["item_kind"], "product");
    assert_eq!(items[0]["quantity"], 1);
}
