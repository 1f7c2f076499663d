//! Database operations for reports

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::shared::ResourceKind;

/// A user-filed report against a resource
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub id: Uuid,
    pub reporter_id: Uuid,
    pub resource_kind: ResourceKind,
    pub resource_id: Uuid,
    pub reason: String,
    pub status: String,
    pub resolved_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn from_row(row: sqlx::postgres::PgRow) -> Report {
    let kind: String = row.get("resource_kind");
    Report {
        id: row.get("id"),
        reporter_id: row.get("reporter_id"),
        resource_kind: ResourceKind::from_str(&kind).unwrap_or(ResourceKind::Product),
        resource_id: row.get("resource_id"),
        reason: row.get("reason"),
        status: row.get("status"),
        resolved_by: row.get("resolved_by"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

const REPORT_COLUMNS: &str = "id, reporter_id, resource_kind, resource_id, reason, status, resolved_by, created_at, updated_at";

/// File a report
pub async fn create_report(
    pool: &PgPool,
    reporter_id: Uuid,
    resource_kind: ResourceKind,
    resource_id: Uuid,
    reason: &str,
) -> Result<Report, sqlx::Error> {
    let now = Utc::now();
    let row = sqlx::query(&format!(
        r#"
        INSERT INTO reports (id, reporter_id, resource_kind, resource_id, reason, status, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, 'open', $6, $7)
        RETURNING {REPORT_COLUMNS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(reporter_id)
    .bind(resource_kind.as_str())
    .bind(resource_id)
    .bind(reason)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(from_row(row))
}

/// Get one report
pub async fn get_report(pool: &PgPool, id: Uuid) -> Result<Option<Report>, sqlx::Error> {
    let row = sqlx::query(&format!("SELECT {REPORT_COLUMNS} FROM reports WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(from_row))
}

/// List reports, open first, newest first within status
pub async fn list_reports(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Report>, sqlx::Error> {
    let rows = sqlx::query(&format!(
        r#"
        SELECT {REPORT_COLUMNS} FROM reports
        ORDER BY (status = 'open') DESC, created_at DESC
        LIMIT $1 OFFSET $2
        "#
    ))
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(from_row).collect())
}

/// Resolve or dismiss a report
pub async fn set_status(
    pool: &PgPool,
    id: Uuid,
    status: &str,
    resolved_by: Uuid,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE reports SET status = $1, resolved_by = $2, updated_at = $3 WHERE id = $4",
    )
    .bind(status)
    .bind(resolved_by)
    .bind(Utc::now())
    .bind(id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}
