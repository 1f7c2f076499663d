//! Checkout
//!
//! Cart lines reference either a product or an event; the discriminator
//! picks the table, and a common [`PurchasableItem`] view drives the
//! decisions. The whole checkout runs in one transaction: any shortfall
//! aborts everything and no counter is touched.
//!
//! Self-purchase of one's own product is a silent skip, not an error.
//! Events carry no such guard — the source system behaved that way and the
//! asymmetry is preserved.

use sqlx::{PgPool, Postgres, Row, Transaction};
use uuid::Uuid;

use super::models::{CartItem, Order, OrderItem, ShippingInfo};
use crate::backend::error::ApiError;
use crate::shared::ItemKind;

/// Common purchasable view over a product or event row
#[derive(Debug, Clone)]
pub struct PurchasableItem {
    pub kind: ItemKind,
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub price_cents: i64,
    /// Stock for products, capacity for events
    pub remaining: i64,
    /// Products not listed for sale cannot be bought; events always can
    pub for_sale: bool,
}

/// What to do with one cart line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineDecision {
    /// Decrement the counter and add to the order
    Charge,
    /// Buyer owns this product: drop the line silently
    SkipSelfPurchase,
    /// Abort the whole checkout
    Reject(String),
}

/// Decide one line against the resolved item
pub fn decide_line(item: &PurchasableItem, buyer: Uuid, quantity: i64) -> LineDecision {
    if quantity <= 0 {
        return LineDecision::Reject(format!("Invalid quantity for '{}'", item.title));
    }

    if item.kind == ItemKind::Product {
        if item.owner_id == buyer {
            return LineDecision::SkipSelfPurchase;
        }
        if !item.for_sale {
            return LineDecision::Reject(format!("'{}' is not for sale", item.title));
        }
    }

    if item.remaining < quantity {
        return LineDecision::Reject(format!(
            "Insufficient {} for '{}': {} requested, {} available",
            match item.kind {
                ItemKind::Product => "stock",
                ItemKind::Event => "capacity",
            },
            item.title,
            quantity,
            item.remaining
        ));
    }

    LineDecision::Charge
}

/// Resolve a cart line inside the transaction, locking the row
async fn resolve_for_update(
    tx: &mut Transaction<'_, Postgres>,
    kind: ItemKind,
    id: Uuid,
) -> Result<Option<PurchasableItem>, sqlx::Error> {
    let row = match kind {
        ItemKind::Product => {
            sqlx::query(
                r#"
                SELECT user_id AS owner_id, title, price_cents, quantity AS remaining, for_sale
                FROM products WHERE id = $1
                FOR UPDATE
                "#,
            )
            .bind(id)
            .fetch_optional(&mut **tx)
            .await?
        }
        ItemKind::Event => {
            sqlx::query(
                r#"
                SELECT user_id AS owner_id, title, price_cents, capacity AS remaining, TRUE AS for_sale
                FROM events WHERE id = $1
                FOR UPDATE
                "#,
            )
            .bind(id)
            .fetch_optional(&mut **tx)
            .await?
        }
    };

    Ok(row.map(|r| PurchasableItem {
        kind,
        id,
        owner_id: r.get("owner_id"),
        title: r.get("title"),
        price_cents: r.get("price_cents"),
        remaining: r.get("remaining"),
        for_sale: r.get("for_sale"),
    }))
}

/// Decrement the right counter, guarded against going negative
async fn decrement_counter(
    tx: &mut Transaction<'_, Postgres>,
    kind: ItemKind,
    id: Uuid,
    quantity: i64,
) -> Result<bool, sqlx::Error> {
    let result = match kind {
        ItemKind::Product => {
            sqlx::query(
                "UPDATE products SET quantity = quantity - $1 WHERE id = $2 AND quantity >= $1",
            )
            .bind(quantity)
            .bind(id)
            .execute(&mut **tx)
            .await?
        }
        ItemKind::Event => {
            sqlx::query(
                "UPDATE events SET capacity = capacity - $1 WHERE id = $2 AND capacity >= $1",
            )
            .bind(quantity)
            .bind(id)
            .execute(&mut **tx)
            .await?
        }
    };
    Ok(result.rows_affected() > 0)
}

/// Run the whole checkout in one transaction
///
/// Validates every line first (locking the rows), then decrements
/// counters, inserts the order with its item snapshots, and clears the
/// cart. Returning an error before commit rolls everything back.
pub async fn perform_checkout(
    pool: &PgPool,
    buyer: Uuid,
    cart: &[CartItem],
    shipping: &ShippingInfo,
) -> Result<(Order, Vec<OrderItem>), ApiError> {
    if cart.is_empty() {
        return Err(ApiError::validation("Cart is empty"));
    }

    let mut tx = pool.begin().await?;

    let mut charged: Vec<(PurchasableItem, i64)> = Vec::new();
    for line in cart {
        let item = resolve_for_update(&mut tx, line.item_kind, line.item_id)
            .await?
            .ok_or_else(|| {
                ApiError::validation(format!(
                    "A {} in your cart is no longer available",
                    line.item_kind.as_str()
                ))
            })?;

        match decide_line(&item, buyer, line.quantity) {
            LineDecision::Charge => charged.push((item, line.quantity)),
            LineDecision::SkipSelfPurchase => {
                tracing::debug!("Skipping self-purchase of product {}", item.id);
            }
            LineDecision::Reject(reason) => return Err(ApiError::validation(reason)),
        }
    }

    if charged.is_empty() {
        return Err(ApiError::validation("Nothing purchasable in the cart"));
    }

    for (item, quantity) in &charged {
        let ok = decrement_counter(&mut tx, item.kind, item.id, *quantity).await?;
        if !ok {
            return Err(ApiError::validation(format!(
                "Insufficient availability for '{}'",
                item.title
            )));
        }
    }

    let total_cents: i64 = charged
        .iter()
        .map(|(item, quantity)| item.price_cents * quantity)
        .sum();

    let order_id = Uuid::new_v4();
    let now = chrono::Utc::now();

    sqlx::query(
        r#"
        INSERT INTO orders (id, user_id, status, total_cents, ship_name, ship_address, ship_city,
                            ship_country, ship_postal_code, created_at, updated_at)
        VALUES ($1, $2, 'pending', $3, $4, $5, $6, $7, $8, $9, $10)
        "#,
    )
    .bind(order_id)
    .bind(buyer)
    .bind(total_cents)
    .bind(&shipping.name)
    .bind(&shipping.address)
    .bind(&shipping.city)
    .bind(&shipping.country)
    .bind(&shipping.postal_code)
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    let mut items = Vec::with_capacity(charged.len());
    for (item, quantity) in &charged {
        let item_row_id = Uuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO order_items (id, order_id, item_kind, item_id, title, price_cents, quantity)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(item_row_id)
        .bind(order_id)
        .bind(item.kind.as_str())
        .bind(item.id)
        .bind(&item.title)
        .bind(item.price_cents)
        .bind(*quantity)
        .execute(&mut *tx)
        .await?;

        items.push(OrderItem {
            id: item_row_id,
            order_id,
            item_kind: item.kind,
            item_id: item.id,
            title: item.title.clone(),
            price_cents: item.price_cents,
            quantity: *quantity,
        });
    }

    sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
        .bind(buyer)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    let order = Order {
        id: order_id,
        user_id: buyer,
        status: super::models::OrderStatus::Pending,
        total_cents,
        shipping: shipping.clone(),
        payment_session_id: None,
        created_at: now,
        updated_at: now,
    };

    Ok((order, items))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(owner: Uuid, remaining: i64, for_sale: bool) -> PurchasableItem {
        PurchasableItem {
            kind: ItemKind::Product,
            id: Uuid::new_v4(),
            owner_id: owner,
            title: "Dusk".to_string(),
            price_cents: 1500,
            remaining,
            for_sale,
        }
    }

    fn event(owner: Uuid, remaining: i64) -> PurchasableItem {
        PurchasableItem {
            kind: ItemKind::Event,
            id: Uuid::new_v4(),
            owner_id: owner,
            title: "Opening night".to_string(),
            price_cents: 2000,
            remaining,
            for_sale: true,
        }
    }

    #[test]
    fn test_charge_when_stock_suffices() {
        let buyer = Uuid::new_v4();
        let item = product(Uuid::new_v4(), 2, true);
        assert_eq!(decide_line(&item, buyer, 2), LineDecision::Charge);
    }

    #[test]
    fn test_insufficient_stock_rejects() {
        let buyer = Uuid::new_v4();
        let item = product(Uuid::new_v4(), 1, true);
        assert!(matches!(
            decide_line(&item, buyer, 2),
            LineDecision::Reject(_)
        ));
    }

    #[test]
    fn test_self_purchase_of_product_is_skipped() {
        let buyer = Uuid::new_v4();
        let item = product(buyer, 5, true);
        assert_eq!(decide_line(&item, buyer, 1), LineDecision::SkipSelfPurchase);
    }

    #[test]
    fn test_own_event_has_no_self_purchase_guard() {
        // deliberate asymmetry with products
        let buyer = Uuid::new_v4();
        let item = event(buyer, 5);
        assert_eq!(decide_line(&item, buyer, 1), LineDecision::Charge);
    }

    #[test]
    fn test_not_for_sale_rejects() {
        let buyer = Uuid::new_v4();
        let item = product(Uuid::new_v4(), 5, false);
        assert!(matches!(
            decide_line(&item, buyer, 1),
            LineDecision::Reject(_)
        ));
    }

    #[test]
    fn test_event_capacity_shortfall_rejects() {
        let buyer = Uuid::new_v4();
        let item = event(Uuid::new_v4(), 1);
        let decision = decide_line(&item, buyer, 2);
        match decision {
            LineDecision::Reject(reason) => assert!(reason.contains("capacity")),
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_quantity_rejects() {
        let buyer = Uuid::new_v4();
        let item = product(Uuid::new_v4(), 5, true);
        assert!(matches!(
            decide_line(&item, buyer, 0),
            LineDecision::Reject(_)
        ));
    }
}
