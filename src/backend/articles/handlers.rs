//! Article HTTP Handlers

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use super::db;
use super::models::{Article, Category, CreateArticleRequest, UpdateArticleRequest};
use crate::backend::error::ApiError;
use crate::backend::middleware::auth::AuthUser;

#[derive(Debug, Deserialize)]
pub struct ListArticlesParams {
    pub category: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

pub async fn list_articles(
    State(pool): State<PgPool>,
    Query(params): Query<ListArticlesParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let category = match params.category.as_deref() {
        Some(raw) => Some(
            Category::from_str(raw)
                .ok_or_else(|| ApiError::validation(format!("Unknown category '{}'", raw)))?,
        ),
        None => None,
    };
    let limit = params.limit.unwrap_or(50).min(200) as i64;
    let offset = params.offset.unwrap_or(0) as i64;

    let articles = db::list_articles(&pool, category, limit, offset).await?;
    Ok(Json(serde_json::json!({ "articles": articles })))
}

pub async fn get_article(
    State(pool): State<PgPool>,
    Path(id): Path<Uuid>,
) -> Result<Json<Article>, ApiError> {
    let article = db::get_article(&pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Article"))?;
    Ok(Json(article))
}

pub async fn create_article(
    State(pool): State<PgPool>,
    AuthUser(current): AuthUser,
    Json(request): Json<CreateArticleRequest>,
) -> Result<Json<Article>, ApiError> {
    if request.title.trim().is_empty() {
        return Err(ApiError::validation("Title must not be empty"));
    }

    let article = db::create_article(&pool, current.user_id, &request).await?;
    Ok(Json(article))
}

pub async fn update_article(
    State(pool): State<PgPool>,
    AuthUser(current): AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateArticleRequest>,
) -> Result<Json<Article>, ApiError> {
    let existing = db::get_article(&pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Article"))?;

    if existing.user_id != current.user_id {
        return Err(ApiError::forbidden("Only the author can edit an article"));
    }

    let article = db::update_article(&pool, id, &request)
        .await?
        .ok_or_else(|| ApiError::not_found("Article"))?;
    Ok(Json(article))
}

pub async fn delete_article(
    State(pool): State<PgPool>,
    AuthUser(current): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let existing = db::get_article(&pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Article"))?;

    if existing.user_id != current.user_id && !current.is_admin() {
        return Err(ApiError::forbidden("Only the author can delete an article"));
    }

    db::delete_article(&pool, id).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}
