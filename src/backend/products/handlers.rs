//! Product HTTP Handlers
//!
//! Listing browse is public; mutation requires ownership (or admin for
//! delete, which is audited and notifies the owner).

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use super::db;
use super::models::{CreateProductRequest, Product, UpdateProductRequest};
use crate::backend::error::ApiError;
use crate::backend::middleware::auth::AuthUser;
use crate::backend::outbox::{self, DomainEvent};

#[derive(Debug, Deserialize)]
pub struct ListProductsParams {
    pub user_id: Option<Uuid>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

/// Validate the sale invariant, enforced at creation only
fn validate_new_product(request: &CreateProductRequest) -> Result<(), ApiError> {
    if request.title.trim().is_empty() {
        return Err(ApiError::validation("Title must not be empty"));
    }
    if request.for_sale && request.price_cents <= 0 {
        return Err(ApiError::validation(
            "A product for sale must have a positive price",
        ));
    }
    if request.price_cents < 0 || request.quantity < 0 {
        return Err(ApiError::validation("Price and quantity must not be negative"));
    }
    Ok(())
}

pub async fn list_products(
    State(pool): State<PgPool>,
    Query(params): Query<ListProductsParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let limit = params.limit.unwrap_or(50).min(200) as i64;
    let offset = params.offset.unwrap_or(0) as i64;

    let products = db::list_products(&pool, params.user_id, limit, offset).await?;
    Ok(Json(serde_json::json!({ "products": products })))
}

pub async fn get_product(
    State(pool): State<PgPool>,
    Path(id): Path<Uuid>,
) -> Result<Json<Product>, ApiError> {
    let product = db::get_product(&pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product"))?;
    Ok(Json(product))
}

pub async fn create_product(
    State(pool): State<PgPool>,
    AuthUser(current): AuthUser,
    Json(request): Json<CreateProductRequest>,
) -> Result<Json<Product>, ApiError> {
    validate_new_product(&request)?;

    let product = db::create_product(&pool, current.user_id, &request).await?;
    tracing::info!("Product {} created by {}", product.id, current.username);
    Ok(Json(product))
}

pub async fn update_product(
    State(pool): State<PgPool>,
    AuthUser(current): AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateProductRequest>,
) -> Result<Json<Product>, ApiError> {
    let existing = db::get_product(&pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product"))?;

    if existing.user_id != current.user_id {
        return Err(ApiError::forbidden("Only the owner can edit a product"));
    }

    if let Some(price) = request.price_cents {
        if price < 0 {
            return Err(ApiError::validation("Price must not be negative"));
        }
    }
    if let Some(quantity) = request.quantity {
        if quantity < 0 {
            return Err(ApiError::validation("Quantity must not be negative"));
        }
    }

    let product = db::update_product(&pool, id, &request)
        .await?
        .ok_or_else(|| ApiError::not_found("Product"))?;
    Ok(Json(product))
}

pub async fn delete_product(
    State(pool): State<PgPool>,
    AuthUser(current): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let existing = db::get_product(&pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product"))?;

    let is_owner = existing.user_id == current.user_id;
    if !is_owner && !current.is_admin() {
        return Err(ApiError::forbidden("Only the owner can delete a product"));
    }

    db::delete_product(&pool, id).await?;

    if !is_owner {
        outbox::dispatch(
            &pool,
            DomainEvent::ProductRemovedByAdmin {
                admin_id: current.user_id,
                product_id: id,
                owner_id: existing.user_id,
                title: existing.title.clone(),
            },
        )
        .await;
    }

    Ok(Json(serde_json::json!({ "success": true })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_request() -> CreateProductRequest {
        CreateProductRequest {
            title: "Dusk".to_string(),
            description: String::new(),
            image_urls: vec![],
            video_urls: vec![],
            audio_urls: vec![],
            for_sale: false,
            price_cents: 0,
            quantity: 0,
        }
    }

    #[test]
    fn test_for_sale_requires_positive_price() {
        let mut request = base_request();
        request.for_sale = true;
        assert!(validate_new_product(&request).is_err());

        request.price_cents = 1500;
        assert!(validate_new_product(&request).is_ok());
    }

    #[test]
    fn test_not_for_sale_allows_zero_price() {
        let request = base_request();
        assert!(validate_new_product(&request).is_ok());
    }

    #[test]
    fn test_empty_title_rejected() {
        let mut request = base_request();
        request.title = "  ".to_string();
        assert!(validate_new_product(&request).is_err());
    }

    #[test]
    fn test_negative_quantity_rejected() {
        let mut request = base_request();
        request.quantity = -1;
        assert!(validate_new_product(&request).is_err());
    }
}
