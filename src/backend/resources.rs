//! Polymorphic Resource Lookup
//!
//! Comments, favorites, and reports all target "some resource" identified
//! by a [`ResourceKind`] tag plus an id. This is the single lookup keyed by
//! that tag: it returns the owner and a display title, or `None` when the
//! target does not exist.

use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::shared::ResourceKind;

/// The resolved view of a polymorphic reference
#[derive(Debug, Clone)]
pub struct ResourceRef {
    pub kind: ResourceKind,
    pub id: Uuid,
    /// The user who owns the resource (for a user resource, the user
    /// themself)
    pub owner_id: Uuid,
    pub title: String,
}

/// Resolve a (kind, id) reference
pub async fn resolve(
    pool: &PgPool,
    kind: ResourceKind,
    id: Uuid,
) -> Result<Option<ResourceRef>, sqlx::Error> {
    let row = match kind {
        ResourceKind::User => {
            sqlx::query("SELECT id AS owner_id, username AS title FROM users WHERE id = $1")
                .bind(id)
                .fetch_optional(pool)
                .await?
        }
        ResourceKind::Product => {
            sqlx::query("SELECT user_id AS owner_id, title FROM products WHERE id = $1")
                .bind(id)
                .fetch_optional(pool)
                .await?
        }
        ResourceKind::Event => {
            sqlx::query("SELECT user_id AS owner_id, title FROM events WHERE id = $1")
                .bind(id)
                .fetch_optional(pool)
                .await?
        }
        ResourceKind::Gallery => {
            sqlx::query("SELECT owner_id, title FROM galleries WHERE id = $1")
                .bind(id)
                .fetch_optional(pool)
                .await?
        }
        ResourceKind::Article => {
            sqlx::query("SELECT user_id AS owner_id, title FROM articles WHERE id = $1")
                .bind(id)
                .fetch_optional(pool)
                .await?
        }
    };

    Ok(row.map(|r| ResourceRef {
        kind,
        id,
        owner_id: r.get("owner_id"),
        title: r.get("title"),
    }))
}
