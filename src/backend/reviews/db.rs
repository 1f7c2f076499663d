//! Database operations for reviews
//!
//! One review per (user, product), enforced by a unique constraint. Every
//! write and delete recomputes the product's `average_rating` through the
//! single aggregation below — there is deliberately no second recompute
//! path anywhere else.

use chrono::Utc;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::models::Review;

fn from_row(row: sqlx::postgres::PgRow) -> Review {
    Review {
        id: row.get("id"),
        user_id: row.get("user_id"),
        product_id: row.get("product_id"),
        rating: row.get("rating"),
        body: row.get("body"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

/// Recompute a product's average rating from its reviews
pub async fn recompute_average_rating(pool: &PgPool, product_id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE products
        SET average_rating = COALESCE(
            (SELECT AVG(rating)::double precision FROM reviews WHERE product_id = $1), 0)
        WHERE id = $1
        "#,
    )
    .bind(product_id)
    .execute(pool)
    .await?;
    Ok(())
}

/// Insert a review; the unique constraint turns duplicates into errors
pub async fn create_review(
    pool: &PgPool,
    user_id: Uuid,
    product_id: Uuid,
    rating: i16,
    body: &str,
) -> Result<Review, sqlx::Error> {
    let now = Utc::now();
    let row = sqlx::query(
        r#"
        INSERT INTO reviews (id, user_id, product_id, rating, body, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id, user_id, product_id, rating, body, created_at, updated_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(product_id)
    .bind(rating)
    .bind(body)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;

    recompute_average_rating(pool, product_id).await?;
    Ok(from_row(row))
}

/// Get one review
pub async fn get_review(pool: &PgPool, id: Uuid) -> Result<Option<Review>, sqlx::Error> {
    let row = sqlx::query(
        "SELECT id, user_id, product_id, rating, body, created_at, updated_at FROM reviews WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(from_row))
}

/// List a product's reviews, newest first
pub async fn list_for_product(
    pool: &PgPool,
    product_id: Uuid,
) -> Result<Vec<Review>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT id, user_id, product_id, rating, body, created_at, updated_at
        FROM reviews
        WHERE product_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(product_id)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(from_row).collect())
}

/// Update a review's rating/body
pub async fn update_review(
    pool: &PgPool,
    id: Uuid,
    rating: i16,
    body: &str,
) -> Result<Option<Review>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        UPDATE reviews SET rating = $1, body = $2, updated_at = $3
        WHERE id = $4
        RETURNING id, user_id, product_id, rating, body, created_at, updated_at
        "#,
    )
    .bind(rating)
    .bind(body)
    .bind(Utc::now())
    .bind(id)
    .fetch_optional(pool)
    .await?;

    let review = row.map(from_row);
    if let Some(ref review) = review {
        recompute_average_rating(pool, review.product_id).await?;
    }
    Ok(review)
}

/// Delete a review
pub async fn delete_review(pool: &PgPool, id: Uuid, product_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Ok(false);
    }
    recompute_average_rating(pool, product_id).await?;
    Ok(true)
}
