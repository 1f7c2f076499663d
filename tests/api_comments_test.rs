//! Comment thread integration tests
//!
//! Single-level display nesting and the single-level delete cascade.
//! Requires `DATABASE_URL`; tests skip without it.

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

async fn post_comment(
    server: &axum_test::TestServer,
    author: &TestUser,
    product_id: Uuid,
    parent: Option<Uuid>,
    content: &str,
) -> Uuid {
    let payload = match parent {
        Some(parent_id) => serde_json::json!({ "parent_id": parent_id, "content": content }),
        None => serde_json::json!({
            "resource_kind": "product",
            "resource_id": product_id,
            "content": content,
        }),
    };
    let response = server
        .post("/api/comments")
        .add_header("Cookie", author.cookie())
        .json(&payload)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    body["id"].as_str().unwrap().parse().unwrap()
}

async fn list_thread(server: &axum_test::TestServer, product_id: Uuid) -> Vec<serde_json::Value> {
    let response = server
        .get(&format!(
            "/api/comments?resource_kind=product&resource_id={product_id}"
        ))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    body["comments"].as_array().unwrap().clone()
}

#[tokio::test]
#[serial]
async fn test_deep_replies_collapse_to_single_level() {
    let Some(db) = TestDatabase::try_new().await else { return };
    let server = create_test_server(db.url()).await;

    let owner = create_test_user(db.pool(), "owner").await;
    let commenter = create_test_user(db.pool(), "visitor").await;
    let product_id = create_product(&server, &owner).await;

    let top = post_comment(&server, &commenter, product_id, None, "lovely").await;
    let reply = post_comment(&server, &commenter, product_id, Some(top), "agreed").await;
    // reply-to-reply is allowed at creation time
    let deep = post_comment(&server, &commenter, product_id, Some(reply), "same").await;

    let thread = list_thread(&server, product_id).await;
    assert_eq!(thread.len(), 1);
    let replies = thread[0]["replies"].as_array().unwrap();
    let reply_ids: Vec<&str> = replies.iter().map(|r| r["id"].as_str().unwrap()).collect();
    assert_eq!(reply_ids, vec![reply.to_string(), deep.to_string()]);
}

#[tokio::test]
#[serial]
async fn test_delete_cascades_direct_children_only() {
    let Some(db) = TestDatabase::try_new().await else { return };
    let server = create_test_server(db.url()).await;

    let owner = create_test_user(db.pool(), "owner").await;
    let commenter = create_test_user(db.pool(), "visitor").await;
    let product_id = create_product(&server, &owner).await;

    let top = post_comment(&server, &commenter, product_id, None, "lovely").await;
    let child = post_comment(&server, &commenter, product_id, Some(top), "agreed").await;
    let grandchild = post_comment(&server, &commenter, product_id, Some(child), "same").await;

    let response = server
        .delete(&format!("/api/comments/{top}"))
        .add_header("Cookie", commenter.cookie())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    // top and child are gone; the grandchild row survives orphaned
    let remaining = artcorner::backend::comments::db::list_for_resource(
        db.pool(),
        artcorner::shared::ResourceKind::Product,
        product_id,
    )
    .await
    .unwrap();
    let ids: Vec<Uuid> = remaining.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![grandchild]);

    // and the orphan never shows up in the displayed thread
    assert!(list_thread(&server, product_id).await.is_empty());
}

#[tokio::test]
#[serial]
async fn test_reply_inherits_parent_resource() {
    let Some(db) = TestDatabase::try_new().await else { return };
    let server = create_test_server(db.url()).await;

    let owner = create_test_user(db.pool(), "owner").await;
    let commenter = create_test_user(db.pool(), "visitor").await;
    let product_id = create_product(&server, &owner).await;

    let top = post_comment(&server, &commenter, product_id, None, "lovely").await;

    // the reply payload carries no resource target at all
    let response = server
        .post("/api/comments")
        .add_header("Cookie", commenter.cookie())
        .json(&serde_json::json!({ "parent_id": top, "content": "agreed" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["resource_id"], product_id.to_string());
    assert_eq!(body["resource_kind"], "product");
}

#[tokio::test]
#[serial]
async fn test_like_dislike_mutually_exclusive() {
    let Some(db) = TestDatabase::try_new().await else { return };
    let server = create_test_server(db.url()).await;

    let owner = create_test_user(db.pool(), "owner").await;
    let reader = create_test_user(db.pool(), "reader").await;
    let product_id = create_product(&server, &owner).await;
    let comment = post_comment(&server, &owner, product_id, None, "thoughts?").await;

    let like = server
        .post(&format!("/api/comments/{comment}/react"))
        .add_header("Cookie", reader.cookie())
        .json(&serde_json::json!({ "reaction": "like" }))
        .await;
    let body: serde_json::Value = like.json();
    assert_eq!(body["likes"], 1);
    assert_eq!(body["dislikes"], 0);

    // switching to dislike replaces the like
    let dislike = server
        .post(&format!("/api/comments/{comment}/react"))
        .add_header("Cookie", reader.cookie())
        .json(&serde_json::json!({ "reaction": "dislike" }))
        .await;
    let body: serde_json::Value = dislike.json();
    assert_eq!(body["likes"], 0);
    assert_eq!(body["dislikes"], 1);
}
