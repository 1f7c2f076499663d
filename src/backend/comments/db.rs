//! Database operations for comments and reactions

use chrono::Utc;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::models::Comment;
use crate::shared::ResourceKind;

fn from_row(row: sqlx::postgres::PgRow) -> Comment {
    let kind: String = row.get("resource_kind");
    Comment {
        id: row.get("id"),
        author_id: row.get("author_id"),
        resource_kind: ResourceKind::from_str(&kind).unwrap_or(ResourceKind::Product),
        resource_id: row.get("resource_id"),
        parent_id: row.get("parent_id"),
        content: row.get("content"),
        likes: row.get("likes"),
        dislikes: row.get("dislikes"),
        created_at: row.get("created_at"),
    }
}

const COMMENT_SELECT: &str = r#"
    SELECT c.id, c.author_id, c.resource_kind, c.resource_id, c.parent_id, c.content, c.created_at,
           COALESCE(SUM(CASE WHEN r.reaction = 'like' THEN 1 ELSE 0 END), 0) AS likes,
           COALESCE(SUM(CASE WHEN r.reaction = 'dislike' THEN 1 ELSE 0 END), 0) AS dislikes
    FROM comments c
    LEFT JOIN comment_reactions r ON r.comment_id = c.id
"#;

/// Insert a comment or reply
pub async fn create_comment(
    pool: &PgPool,
    author_id: Uuid,
    resource_kind: ResourceKind,
    resource_id: Uuid,
    parent_id: Option<Uuid>,
    content: &str,
) -> Result<Comment, sqlx::Error> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    sqlx::query(
        r#"
        INSERT INTO comments (id, author_id, resource_kind, resource_id, parent_id, content, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(id)
    .bind(author_id)
    .bind(resource_kind.as_str())
    .bind(resource_id)
    .bind(parent_id)
    .bind(content)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(Comment {
        id,
        author_id,
        resource_kind,
        resource_id,
        parent_id,
        content: content.to_string(),
        likes: 0,
        dislikes: 0,
        created_at: now,
    })
}

/// Get one comment with its reaction counts
pub async fn get_comment(pool: &PgPool, id: Uuid) -> Result<Option<Comment>, sqlx::Error> {
    let row = sqlx::query(&format!("{COMMENT_SELECT} WHERE c.id = $1 GROUP BY c.id"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(from_row))
}

/// All comments on a resource, oldest first, with reaction counts
pub async fn list_for_resource(
    pool: &PgPool,
    resource_kind: ResourceKind,
    resource_id: Uuid,
) -> Result<Vec<Comment>, sqlx::Error> {
    let rows = sqlx::query(&format!(
        r#"
        {COMMENT_SELECT}
        WHERE c.resource_kind = $1 AND c.resource_id = $2
        GROUP BY c.id
        ORDER BY c.created_at ASC
        "#
    ))
    .bind(resource_kind.as_str())
    .bind(resource_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(from_row).collect())
}

/// Delete a comment and its direct children only
///
/// The cascade is intentionally single-level: a reply's own children are
/// orphaned, not deleted, and the display layer drops them.
pub async fn delete_with_direct_children(pool: &PgPool, id: Uuid) -> Result<u64, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let children = sqlx::query("DELETE FROM comments WHERE parent_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    let own = sqlx::query("DELETE FROM comments WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(children.rows_affected() + own.rows_affected())
}

/// Set a user's reaction, replacing any existing one
pub async fn set_reaction(
    pool: &PgPool,
    comment_id: Uuid,
    user_id: Uuid,
    reaction: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO comment_reactions (comment_id, user_id, reaction, created_at)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (comment_id, user_id) DO UPDATE SET reaction = EXCLUDED.reaction
        "#,
    )
    .bind(comment_id)
    .bind(user_id)
    .bind(reaction)
    .bind(Utc::now())
    .execute(pool)
    .await?;
    Ok(())
}

/// Clear a user's reaction
pub async fn clear_reaction(
    pool: &PgPool,
    comment_id: Uuid,
    user_id: Uuid,
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM comment_reactions WHERE comment_id = $1 AND user_id = $2")
        .bind(comment_id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(())
}
