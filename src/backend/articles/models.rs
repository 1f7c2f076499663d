//! Article types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Article category
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    News,
    Tutorial,
    Exhibition,
    Interview,
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::News => "news",
            Category::Tutorial => "tutorial",
            Category::Exhibition => "exhibition",
            Category::Interview => "interview",
            Category::Other => "other",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "news" => Some(Category::News),
            "tutorial" => Some(Category::Tutorial),
            "exhibition" => Some(Category::Exhibition),
            "interview" => Some(Category::Interview),
            "other" => Some(Category::Other),
            _ => None,
        }
    }
}

/// A blog article
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Article {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub category: String,
    pub content: String,
    pub cover_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating an article
#[derive(Debug, Clone, Deserialize)]
pub struct CreateArticleRequest {
    pub title: String,
    #[serde(default = "default_category")]
    pub category: Category,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub cover_url: Option<String>,
}

fn default_category() -> Category {
    Category::Other
}

/// Payload for updating an article
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateArticleRequest {
    pub title: Option<String>,
    pub category: Option<Category>,
    pub content: Option<String>,
    pub cover_url: Option<String>,
}
