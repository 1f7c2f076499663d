//! Database operations for carts and orders

use chrono::Utc;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::models::{CartItem, Order, OrderDetail, OrderItem, OrderStatus, ShippingInfo};
use crate::shared::ItemKind;

fn order_from_row(row: sqlx::postgres::PgRow) -> Order {
    let status: String = row.get("status");
    Order {
        id: row.get("id"),
        user_id: row.get("user_id"),
        status: OrderStatus::from_str(&status).unwrap_or(OrderStatus::Pending),
        total_cents: row.get("total_cents"),
        shipping: ShippingInfo {
            name: row.get("ship_name"),
            address: row.get("ship_address"),
            city: row.get("ship_city"),
            country: row.get("ship_country"),
            postal_code: row.get("ship_postal_code"),
        },
        payment_session_id: row.get("payment_session_id"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn item_from_row(row: sqlx::postgres::PgRow) -> OrderItem {
    let kind: String = row.get("item_kind");
    OrderItem {
        id: row.get("id"),
        order_id: row.get("order_id"),
        item_kind: ItemKind::from_str(&kind).unwrap_or_default(),
        item_id: row.get("item_id"),
        title: row.get("title"),
        price_cents: row.get("price_cents"),
        quantity: row.get("quantity"),
    }
}

const ORDER_COLUMNS: &str = "id, user_id, status, total_cents, ship_name, ship_address, ship_city, ship_country, ship_postal_code, payment_session_id, created_at, updated_at";

/// The user's cart lines
pub async fn cart_items(pool: &PgPool, user_id: Uuid) -> Result<Vec<CartItem>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT item_kind, item_id, quantity FROM cart_items
        WHERE user_id = $1
        ORDER BY created_at ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| {
            let kind: String = row.get("item_kind");
            CartItem {
                item_kind: ItemKind::from_str(&kind).unwrap_or_default(),
                item_id: row.get("item_id"),
                quantity: row.get("quantity"),
            }
        })
        .collect())
}

/// Upsert one cart line (replaces the quantity)
pub async fn upsert_cart_item(
    pool: &PgPool,
    user_id: Uuid,
    kind: ItemKind,
    item_id: Uuid,
    quantity: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO cart_items (user_id, item_kind, item_id, quantity, created_at)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (user_id, item_kind, item_id) DO UPDATE SET quantity = EXCLUDED.quantity
        "#,
    )
    .bind(user_id)
    .bind(kind.as_str())
    .bind(item_id)
    .bind(quantity)
    .bind(Utc::now())
    .execute(pool)
    .await?;
    Ok(())
}

/// Remove one cart line
pub async fn remove_cart_item(
    pool: &PgPool,
    user_id: Uuid,
    kind: ItemKind,
    item_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "DELETE FROM cart_items WHERE user_id = $1 AND item_kind = $2 AND item_id = $3",
    )
    .bind(user_id)
    .bind(kind.as_str())
    .bind(item_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Get an order with its items
pub async fn get_order_detail(
    pool: &PgPool,
    order_id: Uuid,
) -> Result<Option<OrderDetail>, sqlx::Error> {
    let row = sqlx::query(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"))
        .bind(order_id)
        .fetch_optional(pool)
        .await?;

    let order = match row {
        Some(row) => order_from_row(row),
        None => return Ok(None),
    };

    let item_rows = sqlx::query(
        "SELECT id, order_id, item_kind, item_id, title, price_cents, quantity FROM order_items WHERE order_id = $1",
    )
    .bind(order_id)
    .fetch_all(pool)
    .await?;

    Ok(Some(OrderDetail {
        order,
        items: item_rows.into_iter().map(item_from_row).collect(),
    }))
}

/// The user's orders, newest first
pub async fn list_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Order>, sqlx::Error> {
    let rows = sqlx::query(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = $1 ORDER BY created_at DESC"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(order_from_row).collect())
}

/// Change an order's status
pub async fn update_status(
    pool: &PgPool,
    order_id: Uuid,
    status: OrderStatus,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE orders SET status = $1, updated_at = $2 WHERE id = $3")
        .bind(status.as_str())
        .bind(Utc::now())
        .bind(order_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Attach the payment session created after checkout
pub async fn set_payment_session(
    pool: &PgPool,
    order_id: Uuid,
    session_id: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE orders SET payment_session_id = $1, updated_at = $2 WHERE id = $3")
        .bind(session_id)
        .bind(Utc::now())
        .bind(order_id)
        .execute(pool)
        .await?;
    Ok(())
}
