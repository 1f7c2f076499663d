//! Database operations for products

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use super::models::{CreateProductRequest, Product, UpdateProductRequest};

const PRODUCT_COLUMNS: &str = "id, user_id, title, description, image_urls, video_urls, audio_urls, for_sale, price_cents, quantity, average_rating, created_at, updated_at";

/// Create a product listing
pub async fn create_product(
    pool: &PgPool,
    user_id: Uuid,
    request: &CreateProductRequest,
) -> Result<Product, sqlx::Error> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    sqlx::query_as::<_, Product>(&format!(
        r#"
        INSERT INTO products (id, user_id, title, description, image_urls, video_urls, audio_urls,
                              for_sale, price_cents, quantity, average_rating, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, 0, $11, $12)
        RETURNING {PRODUCT_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(user_id)
    .bind(&request.title)
    .bind(&request.description)
    .bind(&request.image_urls)
    .bind(&request.video_urls)
    .bind(&request.audio_urls)
    .bind(request.for_sale)
    .bind(request.price_cents)
    .bind(request.quantity)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await
}

/// Get one product
pub async fn get_product(pool: &PgPool, id: Uuid) -> Result<Option<Product>, sqlx::Error> {
    sqlx::query_as::<_, Product>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// List products, newest first, optionally scoped to one artist
pub async fn list_products(
    pool: &PgPool,
    user_id: Option<Uuid>,
    limit: i64,
    offset: i64,
) -> Result<Vec<Product>, sqlx::Error> {
    match user_id {
        Some(user_id) => {
            sqlx::query_as::<_, Product>(&format!(
                "SELECT {PRODUCT_COLUMNS} FROM products WHERE user_id = $1 ORDER BY created_at DESC LIMIT $2 OFFSET $3"
            ))
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
        }
        None => {
            sqlx::query_as::<_, Product>(&format!(
                "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY created_at DESC LIMIT $1 OFFSET $2"
            ))
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
        }
    }
}

/// Apply a partial update
pub async fn update_product(
    pool: &PgPool,
    id: Uuid,
    request: &UpdateProductRequest,
) -> Result<Option<Product>, sqlx::Error> {
    sqlx::query_as::<_, Product>(&format!(
        r#"
        UPDATE products
        SET title = COALESCE($1, title),
            description = COALESCE($2, description),
            image_urls = COALESCE($3, image_urls),
            video_urls = COALESCE($4, video_urls),
            audio_urls = COALESCE($5, audio_urls),
            for_sale = COALESCE($6, for_sale),
            price_cents = COALESCE($7, price_cents),
            quantity = COALESCE($8, quantity),
            updated_at = $9
        WHERE id = $10
        RETURNING {PRODUCT_COLUMNS}
        "#
    ))
    .bind(&request.title)
    .bind(&request.description)
    .bind(&request.image_urls)
    .bind(&request.video_urls)
    .bind(&request.audio_urls)
    .bind(request.for_sale)
    .bind(request.price_cents)
    .bind(request.quantity)
    .bind(Utc::now())
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Delete a product and pull the polymorphic references that have no
/// foreign key (favorites, cart lines)
pub async fn delete_product(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Ok(false);
    }

    sqlx::query("DELETE FROM favorites WHERE item_kind = 'product' AND item_id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    sqlx::query("DELETE FROM cart_items WHERE item_kind = 'product' AND item_id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(true)
}
