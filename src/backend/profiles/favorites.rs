//! Favorites
//!
//! Toggle membership of products, events, galleries, and articles in a
//! user's favorites. The owner is notified exactly once, on the add edge
//! only, and never about their own favourite.

use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::backend::error::ApiError;
use crate::backend::middleware::auth::AuthUser;
use crate::backend::outbox::{self, DomainEvent};
use crate::backend::resources;
use crate::shared::ResourceKind;

/// One favourite entry
#[derive(Debug, Clone, Serialize)]
pub struct Favorite {
    pub item_kind: ResourceKind,
    pub item_id: Uuid,
}

/// Toggle payload
#[derive(Debug, Clone, Deserialize)]
pub struct ToggleFavoriteRequest {
    pub item_kind: ResourceKind,
    pub item_id: Uuid,
}

/// Kinds a user can favourite; user profiles are not favouritable
fn validate_kind(kind: ResourceKind) -> Result<(), ApiError> {
    match kind {
        ResourceKind::User => Err(ApiError::validation("Users cannot be favourited")),
        _ => Ok(()),
    }
}

async fn is_favorited(
    pool: &PgPool,
    user_id: Uuid,
    kind: ResourceKind,
    item_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let row: (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM favorites WHERE user_id = $1 AND item_kind = $2 AND item_id = $3",
    )
    .bind(user_id)
    .bind(kind.as_str())
    .bind(item_id)
    .fetch_one(pool)
    .await?;
    Ok(row.0 > 0)
}

/// POST /api/favorites — toggle; returns the resulting membership
pub async fn toggle_favorite(
    State(pool): State<PgPool>,
    AuthUser(current): AuthUser,
    Json(request): Json<ToggleFavoriteRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    validate_kind(request.item_kind)?;

    let resource = resources::resolve(&pool, request.item_kind, request.item_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Item"))?;

    if is_favorited(&pool, current.user_id, request.item_kind, request.item_id).await? {
        // remove edge: never notifies
        sqlx::query(
            "DELETE FROM favorites WHERE user_id = $1 AND item_kind = $2 AND item_id = $3",
        )
        .bind(current.user_id)
        .bind(request.item_kind.as_str())
        .bind(request.item_id)
        .execute(&pool)
        .await?;

        return Ok(Json(serde_json::json!({ "favorited": false })));
    }

    sqlx::query(
        r#"
        INSERT INTO favorites (user_id, item_kind, item_id, created_at)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(current.user_id)
    .bind(request.item_kind.as_str())
    .bind(request.item_id)
    .bind(Utc::now())
    .execute(&pool)
    .await?;

    outbox::dispatch(
        &pool,
        DomainEvent::FavoriteAdded {
            actor_id: current.user_id,
            actor_name: current.username.clone(),
            owner_id: resource.owner_id,
            resource_kind: request.item_kind,
            resource_id: request.item_id,
            resource_title: resource.title,
        },
    )
    .await;

    Ok(Json(serde_json::json!({ "favorited": true })))
}

/// GET /api/users/{id}/favorites
pub async fn list_favorites(
    State(pool): State<PgPool>,
    AuthUser(_current): AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let rows = sqlx::query(
        r#"
        SELECT item_kind, item_id FROM favorites
        WHERE user_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(&pool)
    .await?;

    let favorites: Vec<Favorite> = rows
        .into_iter()
        .filter_map(|row| {
            let kind: String = row.get("item_kind");
            ResourceKind::from_str(&kind).map(|item_kind| Favorite {
                item_kind,
                item_id: row.get("item_id"),
            })
        })
        .collect();

    Ok(Json(serde_json::json!({ "favorites": favorites })))
}
