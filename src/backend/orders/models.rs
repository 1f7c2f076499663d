//! Cart and order types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::ItemKind;

/// Order lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(OrderStatus::Pending),
            "delivered" => Some(OrderStatus::Delivered),
            "cancelled" => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }
}

/// One cart line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    pub item_kind: ItemKind,
    pub item_id: Uuid,
    pub quantity: i64,
}

/// Payload for adding/updating a cart line; the kind defaults to product
#[derive(Debug, Clone, Deserialize)]
pub struct AddCartItemRequest {
    pub item_id: Uuid,
    #[serde(default)]
    pub item_kind: ItemKind,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
}

fn default_quantity() -> i64 {
    1
}

/// Shipping fields captured at checkout
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShippingInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub postal_code: String,
}

/// Checkout payload
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutRequest {
    #[serde(default)]
    pub shipping: ShippingInfo,
}

/// An order header
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub status: OrderStatus,
    pub total_cents: i64,
    pub shipping: ShippingInfo,
    pub payment_session_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One order line, snapshotted at checkout time
#[derive(Debug, Clone, Serialize)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub item_kind: ItemKind,
    pub item_id: Uuid,
    pub title: String,
    pub price_cents: i64,
    pub quantity: i64,
}

/// Order with its lines
#[derive(Debug, Clone, Serialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// Admin payload for changing an order's status
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_roundtrip() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(OrderStatus::from_str(status.as_str()), Some(status));
        }
        assert_eq!(OrderStatus::from_str("shipped"), None);
    }

    #[test]
    fn test_cart_item_kind_defaults_to_product() {
        let request: AddCartItemRequest = serde_json::from_str(
            r#"{ "item_id": "00000000-0000-0000-0000-000000000001" }"#,
        )
        .unwrap();
        assert_eq!(request.item_kind, ItemKind::Product);
        assert_eq!(request.quantity, 1);
    }
}
