//! Audit Log Storage
//!
//! Append-only records of privileged and lifecycle-significant actions.
//! There is deliberately no update or delete path; `performed_by` is nulled
//! by the database when the acting user is removed.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::shared::ResourceKind;

/// One audit record
#[derive(Debug, Clone, Serialize)]
pub struct AuditLog {
    pub id: Uuid,
    pub action: String,
    pub performed_by: Option<Uuid>,
    pub target_kind: Option<String>,
    pub target_id: Option<Uuid>,
    pub details: String,
    pub created_at: DateTime<Utc>,
}

/// Append an audit record
pub async fn record(
    pool: &PgPool,
    action: &str,
    performed_by: Option<Uuid>,
    target_kind: Option<ResourceKind>,
    target_id: Option<Uuid>,
    details: String,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO audit_logs (id, action, performed_by, target_kind, target_id, details, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(action)
    .bind(performed_by)
    .bind(target_kind.map(|k| k.as_str()))
    .bind(target_id)
    .bind(details)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    Ok(())
}

/// List audit records, newest first
pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<AuditLog>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT id, action, performed_by, target_kind, target_id, details, created_at
        FROM audit_logs
        ORDER BY created_at DESC
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| AuditLog {
            id: row.get("id"),
            action: row.get("action"),
            performed_by: row.get("performed_by"),
            target_kind: row.get("target_kind"),
            target_id: row.get("target_id"),
            details: row.get("details"),
            created_at: row.get("created_at"),
        })
        .collect())
}
