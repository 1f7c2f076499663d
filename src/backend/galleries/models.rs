//! Gallery types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A curated, ordered collection of products
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Gallery {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: String,
    pub cover_url: Option<String>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Collaborator membership state
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CollaboratorState {
    Pending,
    Accepted,
}

impl CollaboratorState {
    pub fn as_str(&self) -> &'static str {
        match self {
            CollaboratorState::Pending => "pending",
            CollaboratorState::Accepted => "accepted",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(CollaboratorState::Pending),
            "accepted" => Some(CollaboratorState::Accepted),
            _ => None,
        }
    }
}

/// Full read model of a gallery: the row plus its people and products
#[derive(Debug, Clone, Serialize)]
pub struct GalleryDetail {
    #[serde(flatten)]
    pub gallery: Gallery,
    pub collaborators: Vec<Uuid>,
    pub pending_collaborators: Vec<Uuid>,
    pub products: Vec<GalleryProductEntry>,
}

/// One product membership with its position
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryProductEntry {
    pub product_id: Uuid,
    pub position: i64,
}

/// Payload for creating a gallery
#[derive(Debug, Clone, Deserialize)]
pub struct CreateGalleryRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub cover_url: Option<String>,
    #[serde(default = "default_is_public")]
    pub is_public: bool,
}

fn default_is_public() -> bool {
    true
}

/// Payload for updating gallery fields
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateGalleryRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub cover_url: Option<String>,
    pub is_public: Option<bool>,
}

/// Payload for the collaborator-list update
///
/// `collaborators` is raw JSON on purpose: malformed values are coerced to
/// the empty list rather than rejected.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCollaboratorsRequest {
    #[serde(default)]
    pub collaborators: serde_json::Value,
}

/// Invitee's accept/decline payload
#[derive(Debug, Clone, Deserialize)]
pub struct RespondInviteRequest {
    pub accept: bool,
}

/// Payload replacing a gallery's product membership and order
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateGalleryProductsRequest {
    pub products: Vec<GalleryProductInput>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GalleryProductInput {
    pub product: Uuid,
    #[serde(default)]
    pub order: i64,
}
