//! Database operations for articles

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use super::models::{Article, Category, CreateArticleRequest, UpdateArticleRequest};

const ARTICLE_COLUMNS: &str =
    "id, user_id, title, category, content, cover_url, created_at, updated_at";

pub async fn create_article(
    pool: &PgPool,
    user_id: Uuid,
    request: &CreateArticleRequest,
) -> Result<Article, sqlx::Error> {
    let now = Utc::now();
    sqlx::query_as::<_, Article>(&format!(
        r#"
        INSERT INTO articles (id, user_id, title, category, content, cover_url, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING {ARTICLE_COLUMNS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(&request.title)
    .bind(request.category.as_str())
    .bind(&request.content)
    .bind(&request.cover_url)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await
}

pub async fn get_article(pool: &PgPool, id: Uuid) -> Result<Option<Article>, sqlx::Error> {
    sqlx::query_as::<_, Article>(&format!(
        "SELECT {ARTICLE_COLUMNS} FROM articles WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// List articles, newest first, optionally filtered by category
pub async fn list_articles(
    pool: &PgPool,
    category: Option<Category>,
    limit: i64,
    offset: i64,
) -> Result<Vec<Article>, sqlx::Error> {
    match category {
        Some(category) => {
            sqlx::query_as::<_, Article>(&format!(
                "SELECT {ARTICLE_COLUMNS} FROM articles WHERE category = $1 ORDER BY created_at DESC LIMIT $2 OFFSET $3"
            ))
            .bind(category.as_str())
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
        }
        None => {
            sqlx::query_as::<_, Article>(&format!(
                "SELECT {ARTICLE_COLUMNS} FROM articles ORDER BY created_at DESC LIMIT $1 OFFSET $2"
            ))
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
        }
    }
}

pub async fn update_article(
    pool: &PgPool,
    id: Uuid,
    request: &UpdateArticleRequest,
) -> Result<Option<Article>, sqlx::Error> {
    sqlx::query_as::<_, Article>(&format!(
        r#"
        UPDATE articles
        SET title = COALESCE($1, title),
            category = COALESCE($2, category),
            content = COALESCE($3, content),
            cover_url = COALESCE($4, cover_url),
            updated_at = $5
        WHERE id = $6
        RETURNING {ARTICLE_COLUMNS}
        "#
    ))
    .bind(&request.title)
    .bind(request.category.map(|c| Category::as_str(&c)))
    .bind(&request.content)
    .bind(&request.cover_url)
    .bind(Utc::now())
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn delete_article(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM articles WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Ok(false);
    }

    sqlx::query("DELETE FROM favorites WHERE item_kind = 'article' AND item_id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(true)
}
