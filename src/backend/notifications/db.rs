//! Notification Storage
//!
//! Notification rows are only ever written through the outbox consumer
//! (`backend::outbox`); handlers read, mark seen, and delete.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{PgPool, Row};
use uuid::Uuid;

/// One notification for a user
#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: String,
    pub message: String,
    pub link: Option<String>,
    pub seen: bool,
    pub meta: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

fn from_row(row: sqlx::postgres::PgRow) -> Notification {
    Notification {
        id: row.get("id"),
        user_id: row.get("user_id"),
        kind: row.get("kind"),
        message: row.get("message"),
        link: row.get("link"),
        seen: row.get("seen"),
        meta: row.get("meta"),
        created_at: row.get("created_at"),
    }
}

/// Insert a notification row
pub async fn insert(
    pool: &PgPool,
    user_id: Uuid,
    kind: &str,
    message: &str,
    link: Option<&str>,
    meta: serde_json::Value,
) -> Result<Uuid, sqlx::Error> {
    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO notifications (id, user_id, kind, message, link, seen, meta, created_at)
        VALUES ($1, $2, $3, $4, $5, FALSE, $6, $7)
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(kind)
    .bind(message)
    .bind(link)
    .bind(meta)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    Ok(id)
}

/// List a user's notifications, newest first
pub async fn list_for_user(
    pool: &PgPool,
    user_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<Notification>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT id, user_id, kind, message, link, seen, meta, created_at
        FROM notifications
        WHERE user_id = $1
        ORDER BY created_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(from_row).collect())
}

/// Whether the user has an unseen notification of `kind` whose meta
/// contains `meta_filter`
///
/// Used as the re-invite guard: a still-pending collaborator with an unseen
/// invite is not notified again.
pub async fn has_unseen_matching(
    pool: &PgPool,
    user_id: Uuid,
    kind: &str,
    meta_filter: &serde_json::Value,
) -> Result<bool, sqlx::Error> {
    let row: (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(*) FROM notifications
        WHERE user_id = $1 AND kind = $2 AND seen = FALSE AND meta @> $3
        "#,
    )
    .bind(user_id)
    .bind(kind)
    .bind(meta_filter)
    .fetch_one(pool)
    .await?;

    Ok(row.0 > 0)
}

/// Delete the user's notifications of `kind` whose meta contains
/// `meta_filter`
pub async fn delete_matching(
    pool: &PgPool,
    user_id: Uuid,
    kind: &str,
    meta_filter: &serde_json::Value,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        DELETE FROM notifications
        WHERE user_id = $1 AND kind = $2 AND meta @> $3
        "#,
    )
    .bind(user_id)
    .bind(kind)
    .bind(meta_filter)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// Delete the user's notifications of any kind whose meta contains
/// `meta_filter`
pub async fn delete_matching_any_kind(
    pool: &PgPool,
    user_id: Uuid,
    meta_filter: &serde_json::Value,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM notifications WHERE user_id = $1 AND meta @> $2")
        .bind(user_id)
        .bind(meta_filter)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

/// Mark the user's notifications of `kind` matching `meta_filter` as seen
pub async fn mark_matching_seen(
    pool: &PgPool,
    user_id: Uuid,
    kind: &str,
    meta_filter: &serde_json::Value,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE notifications SET seen = TRUE
        WHERE user_id = $1 AND kind = $2 AND meta @> $3
        "#,
    )
    .bind(user_id)
    .bind(kind)
    .bind(meta_filter)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// Mark one notification seen; scoped to its owner
pub async fn mark_seen(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE notifications SET seen = TRUE WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Mark all of a user's notifications seen
pub async fn mark_all_seen(pool: &PgPool, user_id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("UPDATE notifications SET seen = TRUE WHERE user_id = $1")
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

/// Delete one notification; scoped to its owner
pub async fn delete(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM notifications WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
