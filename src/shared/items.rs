//! Tagged Resource and Item Kinds
//!
//! The platform references resources polymorphically in several places:
//! comments and reports target any of five resource kinds, and cart/order
//! lines reference either a product or an event. Both discriminators are
//! modelled as enums stored as text columns, so every branch over a kind is
//! exhaustive at compile time.

use serde::{Deserialize, Serialize};

/// Kind of a purchasable cart/order line item
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// An artwork listing with a stock counter
    Product,
    /// An event ticket with a capacity counter
    Event,
}

impl Default for ItemKind {
    // absent discriminators in stored carts mean "product"
    fn default() -> Self {
        ItemKind::Product
    }
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Product => "product",
            ItemKind::Event => "event",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "product" => Some(ItemKind::Product),
            "event" => Some(ItemKind::Event),
            _ => None,
        }
    }
}

/// Kind of a resource that comments, reports, notifications and audit
/// records may point at
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    User,
    Product,
    Event,
    Gallery,
    Article,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::User => "user",
            ResourceKind::Product => "product",
            ResourceKind::Event => "event",
            ResourceKind::Gallery => "gallery",
            ResourceKind::Article => "article",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "user" => Some(ResourceKind::User),
            "product" => Some(ResourceKind::Product),
            "event" => Some(ResourceKind::Event),
            "gallery" => Some(ResourceKind::Gallery),
            "article" => Some(ResourceKind::Article),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_kind_roundtrip() {
        for kind in [ItemKind::Product, ItemKind::Event] {
            assert_eq!(ItemKind::from_str(kind.as_str()), Some(kind));
        }
        assert_eq!(ItemKind::from_str("gallery"), None);
    }

    #[test]
    fn test_item_kind_default_is_product() {
        assert_eq!(ItemKind::default(), ItemKind::Product);
    }

    #[test]
    fn test_resource_kind_roundtrip() {
        for kind in [
            ResourceKind::User,
            ResourceKind::Product,
            ResourceKind::Event,
            ResourceKind::Gallery,
            ResourceKind::Article,
        ] {
            assert_eq!(ResourceKind::from_str(kind.as_str()), Some(kind));
        }
        assert_eq!(ResourceKind::from_str("order"), None);
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&ItemKind::Event).unwrap();
        assert_eq!(json, "\"event\"");
        let kind: ResourceKind = serde_json::from_str("\"gallery\"").unwrap();
        assert_eq!(kind, ResourceKind::Gallery);
    }
}
