//! Database operations for direct messages

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{PgPool, Row};
use uuid::Uuid;

/// One direct message
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub content: String,
    pub attachment_urls: Vec<String>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// A conversation partner with the latest message and unread count
#[derive(Debug, Clone, Serialize)]
pub struct ConversationSummary {
    pub partner_id: Uuid,
    pub partner_username: String,
    pub last_message: String,
    pub last_message_at: DateTime<Utc>,
    pub unread_count: i64,
}

fn from_row(row: sqlx::postgres::PgRow) -> Message {
    Message {
        id: row.get("id"),
        sender_id: row.get("sender_id"),
        receiver_id: row.get("receiver_id"),
        content: row.get("content"),
        attachment_urls: row.get("attachment_urls"),
        is_read: row.get("is_read"),
        created_at: row.get("created_at"),
    }
}

/// Store a message
pub async fn create_message(
    pool: &PgPool,
    sender_id: Uuid,
    receiver_id: Uuid,
    content: &str,
    attachment_urls: &[String],
) -> Result<Message, sqlx::Error> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    sqlx::query(
        r#"
        INSERT INTO messages (id, sender_id, receiver_id, content, attachment_urls, is_read, created_at)
        VALUES ($1, $2, $3, $4, $5, FALSE, $6)
        "#,
    )
    .bind(id)
    .bind(sender_id)
    .bind(receiver_id)
    .bind(content)
    .bind(attachment_urls)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(Message {
        id,
        sender_id,
        receiver_id,
        content: content.to_string(),
        attachment_urls: attachment_urls.to_vec(),
        is_read: false,
        created_at: now,
    })
}

/// Get one message
pub async fn get_message(pool: &PgPool, id: Uuid) -> Result<Option<Message>, sqlx::Error> {
    let row = sqlx::query(
        "SELECT id, sender_id, receiver_id, content, attachment_urls, is_read, created_at FROM messages WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(from_row))
}

/// Both directions of a two-user conversation, newest first
pub async fn conversation_between(
    pool: &PgPool,
    user_a: Uuid,
    user_b: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<Message>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT id, sender_id, receiver_id, content, attachment_urls, is_read, created_at
        FROM messages
        WHERE (sender_id = $1 AND receiver_id = $2)
           OR (sender_id = $2 AND receiver_id = $1)
        ORDER BY created_at DESC
        LIMIT $3 OFFSET $4
        "#,
    )
    .bind(user_a)
    .bind(user_b)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(from_row).collect())
}

/// Conversation summaries for a user: one row per partner with the latest
/// message and how many incoming messages are unread
pub async fn conversations_for_user(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<ConversationSummary>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT DISTINCT ON (partner_id)
               partner_id,
               u.username AS partner_username,
               m.content AS last_message,
               m.created_at AS last_message_at,
               (SELECT COUNT(*) FROM messages
                WHERE sender_id = partner_id AND receiver_id = $1 AND is_read = FALSE)
                   AS unread_count
        FROM (
            SELECT *,
                   CASE WHEN sender_id = $1 THEN receiver_id ELSE sender_id END AS partner_id
            FROM messages
            WHERE sender_id = $1 OR receiver_id = $1
        ) m
        JOIN users u ON u.id = m.partner_id
        ORDER BY partner_id, m.created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| ConversationSummary {
            partner_id: row.get("partner_id"),
            partner_username: row.get("partner_username"),
            last_message: row.get("last_message"),
            last_message_at: row.get("last_message_at"),
            unread_count: row.get("unread_count"),
        })
        .collect())
}

/// Mark a message as read; only the receiver may do so
pub async fn mark_read(pool: &PgPool, message_id: Uuid, receiver_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE messages SET is_read = TRUE WHERE id = $1 AND receiver_id = $2",
    )
    .bind(message_id)
    .bind(receiver_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}
