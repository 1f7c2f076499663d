//! Review HTTP Handlers

use axum::extract::{Path, State};
use axum::Json;
use sqlx::PgPool;
use uuid::Uuid;

use super::db;
use super::models::{Review, ReviewRequest};
use crate::backend::error::ApiError;
use crate::backend::middleware::auth::AuthUser;
use crate::backend::outbox::{self, DomainEvent};
use crate::backend::products;

fn validate_rating(rating: i16) -> Result<(), ApiError> {
    if !(1..=5).contains(&rating) {
        return Err(ApiError::validation("Rating must be between 1 and 5"));
    }
    Ok(())
}

pub async fn list_reviews(
    State(pool): State<PgPool>,
    Path(product_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let reviews = db::list_for_product(&pool, product_id).await?;
    Ok(Json(serde_json::json!({ "reviews": reviews })))
}

pub async fn create_review(
    State(pool): State<PgPool>,
    AuthUser(current): AuthUser,
    Path(product_id): Path<Uuid>,
    Json(request): Json<ReviewRequest>,
) -> Result<Json<Review>, ApiError> {
    validate_rating(request.rating)?;

    let product = products::db::get_product(&pool, product_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product"))?;

    let review = db::create_review(&pool, current.user_id, product_id, request.rating, &request.body)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                ApiError::conflict("You already reviewed this product")
            }
            _ => ApiError::from(e),
        })?;

    outbox::dispatch(
        &pool,
        DomainEvent::ReviewPosted {
            product_id,
            product_title: product.title.clone(),
            product_owner_id: product.user_id,
            reviewer_id: current.user_id,
            reviewer_name: current.username.clone(),
            rating: request.rating,
        },
    )
    .await;

    Ok(Json(review))
}

pub async fn update_review(
    State(pool): State<PgPool>,
    AuthUser(current): AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<ReviewRequest>,
) -> Result<Json<Review>, ApiError> {
    validate_rating(request.rating)?;

    let existing = db::get_review(&pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Review"))?;

    if existing.user_id != current.user_id {
        return Err(ApiError::forbidden("Only the author can edit a review"));
    }

    let review = db::update_review(&pool, id, request.rating, &request.body)
        .await?
        .ok_or_else(|| ApiError::not_found("Review"))?;
    Ok(Json(review))
}

pub async fn delete_review(
    State(pool): State<PgPool>,
    AuthUser(current): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let existing = db::get_review(&pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Review"))?;

    if existing.user_id != current.user_id && !current.is_admin() {
        return Err(ApiError::forbidden("Only the author can delete a review"));
    }

    db::delete_review(&pool, id, existing.product_id).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}
