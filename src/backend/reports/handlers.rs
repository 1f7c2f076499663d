//! Report HTTP Handlers

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use super::db;
use crate::backend::error::ApiError;
use crate::backend::middleware::auth::{require_admin, AuthUser};
use crate::backend::outbox::{self, DomainEvent};
use crate::backend::resources;
use crate::shared::ResourceKind;

/// Payload for filing a report
#[derive(Debug, Clone, Deserialize)]
pub struct CreateReportRequest {
    pub resource_kind: ResourceKind,
    pub resource_id: Uuid,
    pub reason: String,
}

/// Admin payload for closing a report
#[derive(Debug, Clone, Deserialize)]
pub struct ResolveReportRequest {
    /// "resolved" or "dismissed"
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct ListReportsParams {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

pub async fn create_report(
    State(pool): State<PgPool>,
    AuthUser(current): AuthUser,
    Json(request): Json<CreateReportRequest>,
) -> Result<Json<db::Report>, ApiError> {
    if request.reason.trim().is_empty() {
        return Err(ApiError::validation("A reason is required"));
    }

    resources::resolve(&pool, request.resource_kind, request.resource_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Resource"))?;

    let report = db::create_report(
        &pool,
        current.user_id,
        request.resource_kind,
        request.resource_id,
        &request.reason,
    )
    .await?;

    outbox::dispatch(
        &pool,
        DomainEvent::ReportFiled {
            report_id: report.id,
            reporter_id: current.user_id,
            resource_kind: request.resource_kind,
            resource_id: request.resource_id,
        },
    )
    .await;

    Ok(Json(report))
}

/// GET /api/admin/reports
pub async fn list_reports(
    State(pool): State<PgPool>,
    AuthUser(current): AuthUser,
    Query(params): Query<ListReportsParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_admin(&current)?;

    let limit = params.limit.unwrap_or(50).min(200) as i64;
    let offset = params.offset.unwrap_or(0) as i64;

    let reports = db::list_reports(&pool, limit, offset).await?;
    Ok(Json(serde_json::json!({ "reports": reports })))
}

/// PATCH /api/admin/reports/{id}
pub async fn resolve_report(
    State(pool): State<PgPool>,
    AuthUser(current): AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<ResolveReportRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_admin(&current)?;

    if request.status != "resolved" && request.status != "dismissed" {
        return Err(ApiError::validation(
            "Status must be 'resolved' or 'dismissed'",
        ));
    }

    let report = db::get_report(&pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Report"))?;

    if report.status != "open" {
        return Err(ApiError::conflict("Report is already closed"));
    }

    db::set_status(&pool, id, &request.status, current.user_id).await?;

    outbox::dispatch(
        &pool,
        DomainEvent::ReportResolved {
            report_id: id,
            admin_id: current.user_id,
            reporter_id: report.reporter_id,
            status: request.status.clone(),
        },
    )
    .await;

    Ok(Json(serde_json::json!({ "success": true })))
}
