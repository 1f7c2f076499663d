//! Cart, Checkout, and Order HTTP Handlers
//!
//! Cart reads re-resolve every line through its stored discriminator, so
//! dangling references surface as unavailable instead of breaking the
//! response. Checkout delegates to [`super::checkout::perform_checkout`]
//! and only then talks to the payment processor.

use axum::extract::{Path, State};
use axum::Json;
use sqlx::PgPool;
use uuid::Uuid;

use super::checkout::perform_checkout;
use super::db;
use super::models::{
    AddCartItemRequest, CheckoutRequest, OrderDetail, OrderStatus, UpdateOrderStatusRequest,
};
use crate::backend::adapters::{Mailer, PaymentClient};
use crate::backend::error::ApiError;
use crate::backend::events;
use crate::backend::middleware::auth::{require_admin, AuthUser};
use crate::backend::outbox::{self, DomainEvent};
use crate::backend::products;
use crate::shared::ItemKind;

/// GET /api/cart — every line re-resolved against its current target
pub async fn get_cart(
    State(pool): State<PgPool>,
    AuthUser(current): AuthUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let items = db::cart_items(&pool, current.user_id).await?;

    let mut lines = Vec::with_capacity(items.len());
    for item in items {
        let resolved = match item.item_kind {
            ItemKind::Product => products::db::get_product(&pool, item.item_id)
                .await?
                .map(|p| (p.title, p.price_cents, p.quantity)),
            ItemKind::Event => events::db::get_event(&pool, item.item_id)
                .await?
                .map(|e| (e.title, e.price_cents, e.capacity)),
        };

        match resolved {
            Some((title, price_cents, remaining)) => lines.push(serde_json::json!({
                "item_kind": item.item_kind,
                "item_id": item.item_id,
                "quantity": item.quantity,
                "title": title,
                "price_cents": price_cents,
                "remaining": remaining,
                "available": remaining >= item.quantity,
            })),
            None => lines.push(serde_json::json!({
                "item_kind": item.item_kind,
                "item_id": item.item_id,
                "quantity": item.quantity,
                "available": false,
            })),
        }
    }

    Ok(Json(serde_json::json!({ "items": lines })))
}

/// POST /api/cart — add or update one line
pub async fn add_to_cart(
    State(pool): State<PgPool>,
    AuthUser(current): AuthUser,
    Json(request): Json<AddCartItemRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if request.quantity <= 0 {
        return Err(ApiError::validation("Quantity must be positive"));
    }

    match request.item_kind {
        ItemKind::Product => {
            let product = products::db::get_product(&pool, request.item_id)
                .await?
                .ok_or_else(|| ApiError::not_found("Product"))?;
            if !product.for_sale {
                return Err(ApiError::validation("This product is not for sale"));
            }
        }
        ItemKind::Event => {
            events::db::get_event(&pool, request.item_id)
                .await?
                .ok_or_else(|| ApiError::not_found("Event"))?;
        }
    }

    db::upsert_cart_item(
        &pool,
        current.user_id,
        request.item_kind,
        request.item_id,
        request.quantity,
    )
    .await?;

    Ok(Json(serde_json::json!({ "success": true })))
}

/// DELETE /api/cart/{kind}/{id}
pub async fn remove_from_cart(
    State(pool): State<PgPool>,
    AuthUser(current): AuthUser,
    Path((kind, item_id)): Path<(String, Uuid)>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let kind = ItemKind::from_str(&kind)
        .ok_or_else(|| ApiError::validation(format!("Unknown item kind '{}'", kind)))?;

    let removed = db::remove_cart_item(&pool, current.user_id, kind, item_id).await?;
    if !removed {
        return Err(ApiError::not_found("Cart item"));
    }
    Ok(Json(serde_json::json!({ "success": true })))
}

/// POST /api/checkout
pub async fn checkout(
    State(pool): State<PgPool>,
    State(payments): State<PaymentClient>,
    State(mailer): State<Option<Mailer>>,
    AuthUser(current): AuthUser,
    Json(request): Json<CheckoutRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let cart = db::cart_items(&pool, current.user_id).await?;

    let (order, items) =
        perform_checkout(&pool, current.user_id, &cart, &request.shipping).await?;

    outbox::dispatch(
        &pool,
        DomainEvent::OrderPlaced {
            order_id: order.id,
            buyer_id: current.user_id,
            total_cents: order.total_cents,
            item_count: items.len(),
        },
    )
    .await;

    // the payment session lives outside the transaction; a processor
    // failure leaves the order pending and the client may retry payment
    let mut session_url = None;
    if order.total_cents > 0 && payments.is_configured() {
        match payments
            .create_checkout_session(order.id, order.total_cents, "usd")
            .await
        {
            Ok(session) => {
                db::set_payment_session(&pool, order.id, &session.id).await?;
                session_url = Some(session.url);
            }
            Err(e) => {
                tracing::error!("Payment session for order {} failed: {:?}", order.id, e);
            }
        }
    }

    if let Some(mailer) = mailer {
        let to = current.email.clone();
        let order_id = order.id;
        let total = order.total_cents;
        tokio::spawn(async move {
            mailer
                .send(
                    &to,
                    "Your Art Corner order",
                    format!(
                        "Order {} was placed. Total: {}.{:02} USD.",
                        order_id,
                        total / 100,
                        total % 100
                    ),
                )
                .await;
        });
    }

    Ok(Json(serde_json::json!({
        "order": OrderDetail { order, items },
        "payment_url": session_url,
    })))
}

/// GET /api/checkout/confirm/{order_id} — payment success callback target
pub async fn confirm_checkout(
    State(pool): State<PgPool>,
    AuthUser(current): AuthUser,
    Path(order_id): Path<Uuid>,
) -> Result<Json<OrderDetail>, ApiError> {
    let detail = db::get_order_detail(&pool, order_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Order"))?;

    if detail.order.user_id != current.user_id {
        return Err(ApiError::forbidden("Not your order"));
    }

    tracing::info!("Payment confirmed for order {}", order_id);
    Ok(Json(detail))
}

/// GET /api/orders
pub async fn list_orders(
    State(pool): State<PgPool>,
    AuthUser(current): AuthUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let orders = db::list_for_user(&pool, current.user_id).await?;
    Ok(Json(serde_json::json!({ "orders": orders })))
}

/// GET /api/orders/{id}
pub async fn get_order(
    State(pool): State<PgPool>,
    AuthUser(current): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<OrderDetail>, ApiError> {
    let detail = db::get_order_detail(&pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Order"))?;

    if detail.order.user_id != current.user_id && !current.is_admin() {
        return Err(ApiError::forbidden("Not your order"));
    }

    Ok(Json(detail))
}

/// PATCH /api/orders/{id}/status — admin only
pub async fn update_order_status(
    State(pool): State<PgPool>,
    AuthUser(current): AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateOrderStatusRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_admin(&current)?;

    let detail = db::get_order_detail(&pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Order"))?;

    if detail.order.status == OrderStatus::Cancelled {
        return Err(ApiError::conflict("Cancelled orders cannot change status"));
    }

    db::update_status(&pool, id, request.status).await?;

    outbox::dispatch(
        &pool,
        DomainEvent::OrderStatusChanged {
            order_id: id,
            buyer_id: detail.order.user_id,
            status: request.status.as_str().to_string(),
            changed_by: current.user_id,
        },
    )
    .await;

    Ok(Json(serde_json::json!({ "success": true })))
}
