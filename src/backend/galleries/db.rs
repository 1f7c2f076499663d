//! Database operations for galleries

use chrono::Utc;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::models::{
    CollaboratorState, CreateGalleryRequest, Gallery, GalleryProductEntry, UpdateGalleryRequest,
};

const GALLERY_COLUMNS: &str =
    "id, owner_id, title, description, cover_url, is_public, created_at, updated_at";

/// Create a gallery
pub async fn create_gallery(
    pool: &PgPool,
    owner_id: Uuid,
    request: &CreateGalleryRequest,
) -> Result<Gallery, sqlx::Error> {
    let now = Utc::now();
    sqlx::query_as::<_, Gallery>(&format!(
        r#"
        INSERT INTO galleries (id, owner_id, title, description, cover_url, is_public, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING {GALLERY_COLUMNS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(owner_id)
    .bind(&request.title)
    .bind(&request.description)
    .bind(&request.cover_url)
    .bind(request.is_public)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await
}

/// Get one gallery row
pub async fn get_gallery(pool: &PgPool, id: Uuid) -> Result<Option<Gallery>, sqlx::Error> {
    sqlx::query_as::<_, Gallery>(&format!(
        "SELECT {GALLERY_COLUMNS} FROM galleries WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// List public galleries plus the viewer's own, newest first
pub async fn list_galleries(
    pool: &PgPool,
    viewer: Option<Uuid>,
    limit: i64,
    offset: i64,
) -> Result<Vec<Gallery>, sqlx::Error> {
    sqlx::query_as::<_, Gallery>(&format!(
        r#"
        SELECT {GALLERY_COLUMNS} FROM galleries
        WHERE is_public = TRUE OR owner_id = $1
        ORDER BY created_at DESC
        LIMIT $2 OFFSET $3
        "#
    ))
    .bind(viewer)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

/// Apply a partial update to gallery fields
pub async fn update_gallery(
    pool: &PgPool,
    id: Uuid,
    request: &UpdateGalleryRequest,
) -> Result<Option<Gallery>, sqlx::Error> {
    sqlx::query_as::<_, Gallery>(&format!(
        r#"
        UPDATE galleries
        SET title = COALESCE($1, title),
            description = COALESCE($2, description),
            cover_url = COALESCE($3, cover_url),
            is_public = COALESCE($4, is_public),
            updated_at = $5
        WHERE id = $6
        RETURNING {GALLERY_COLUMNS}
        "#
    ))
    .bind(&request.title)
    .bind(&request.description)
    .bind(&request.cover_url)
    .bind(request.is_public)
    .bind(Utc::now())
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Delete a gallery (memberships cascade)
pub async fn delete_gallery(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM galleries WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Ok(false);
    }

    // polymorphic references have no FK; pull them here
    sqlx::query("DELETE FROM favorites WHERE item_kind = 'gallery' AND item_id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(true)
}

/// Collaborator ids in a given state, in insertion order
pub async fn collaborators_in_state(
    pool: &PgPool,
    gallery_id: Uuid,
    state: CollaboratorState,
) -> Result<Vec<Uuid>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT user_id FROM gallery_collaborators
        WHERE gallery_id = $1 AND state = $2
        ORDER BY created_at ASC
        "#,
    )
    .bind(gallery_id)
    .bind(state.as_str())
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|r| r.get("user_id")).collect())
}

/// The state a user holds on a gallery, if any
pub async fn collaborator_state(
    pool: &PgPool,
    gallery_id: Uuid,
    user_id: Uuid,
) -> Result<Option<CollaboratorState>, sqlx::Error> {
    let row = sqlx::query(
        "SELECT state FROM gallery_collaborators WHERE gallery_id = $1 AND user_id = $2",
    )
    .bind(gallery_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.and_then(|r| CollaboratorState::from_str(r.get::<String, _>("state").as_str())))
}

/// Insert a pending invite
pub async fn add_pending(pool: &PgPool, gallery_id: Uuid, user_id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO gallery_collaborators (gallery_id, user_id, state, created_at)
        VALUES ($1, $2, 'pending', $3)
        ON CONFLICT (gallery_id, user_id) DO NOTHING
        "#,
    )
    .bind(gallery_id)
    .bind(user_id)
    .bind(Utc::now())
    .execute(pool)
    .await?;
    Ok(())
}

/// Flip a pending invite to accepted
pub async fn accept_pending(
    pool: &PgPool,
    gallery_id: Uuid,
    user_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE gallery_collaborators SET state = 'accepted'
        WHERE gallery_id = $1 AND user_id = $2 AND state = 'pending'
        "#,
    )
    .bind(gallery_id)
    .bind(user_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Remove a membership row regardless of state
pub async fn remove_collaborator(
    pool: &PgPool,
    gallery_id: Uuid,
    user_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let result =
        sqlx::query("DELETE FROM gallery_collaborators WHERE gallery_id = $1 AND user_id = $2")
            .bind(gallery_id)
            .bind(user_id)
            .execute(pool)
            .await?;
    Ok(result.rows_affected() > 0)
}

/// The gallery's products ordered by position
pub async fn gallery_products(
    pool: &PgPool,
    gallery_id: Uuid,
) -> Result<Vec<GalleryProductEntry>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT product_id, position FROM gallery_products
        WHERE gallery_id = $1
        ORDER BY position ASC
        "#,
    )
    .bind(gallery_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|r| GalleryProductEntry {
            product_id: r.get("product_id"),
            position: r.get("position"),
        })
        .collect())
}

/// Replace the gallery's product membership with normalised positions
pub async fn replace_gallery_products(
    pool: &PgPool,
    gallery_id: Uuid,
    entries: &[GalleryProductEntry],
) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM gallery_products WHERE gallery_id = $1")
        .bind(gallery_id)
        .execute(&mut *tx)
        .await?;

    for entry in entries {
        sqlx::query(
            r#"
            INSERT INTO gallery_products (gallery_id, product_id, position)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(gallery_id)
        .bind(entry.product_id)
        .bind(entry.position)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await
}
