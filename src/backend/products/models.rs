//! Product (artwork listing) types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An artwork listing
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: Uuid,
    /// Owning artist
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub image_urls: Vec<String>,
    pub video_urls: Vec<String>,
    pub audio_urls: Vec<String>,
    pub for_sale: bool,
    pub price_cents: i64,
    /// Remaining stock
    pub quantity: i64,
    /// Derived from reviews; recomputed on every review write/delete
    pub average_rating: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a listing
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProductRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_urls: Vec<String>,
    #[serde(default)]
    pub video_urls: Vec<String>,
    #[serde(default)]
    pub audio_urls: Vec<String>,
    #[serde(default)]
    pub for_sale: bool,
    #[serde(default)]
    pub price_cents: i64,
    #[serde(default)]
    pub quantity: i64,
}

/// Payload for updating a listing; absent fields keep their value
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProductRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_urls: Option<Vec<String>>,
    pub video_urls: Option<Vec<String>>,
    pub audio_urls: Option<Vec<String>>,
    pub for_sale: Option<bool>,
    pub price_cents: Option<i64>,
    pub quantity: Option<i64>,
}
