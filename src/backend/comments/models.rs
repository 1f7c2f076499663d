//! Comment types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::ResourceKind;

/// A comment or reply on a resource
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub author_id: Uuid,
    pub resource_kind: ResourceKind,
    pub resource_id: Uuid,
    /// Present on replies; always points at another comment on the same
    /// resource
    pub parent_id: Option<Uuid>,
    pub content: String,
    pub likes: i64,
    pub dislikes: i64,
    pub created_at: DateTime<Utc>,
}

/// Reaction on a comment; like and dislike are mutually exclusive per user
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Reaction {
    Like,
    Dislike,
    /// Clears any existing reaction
    None,
}

/// Payload for posting a comment or reply
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCommentRequest {
    pub resource_kind: Option<ResourceKind>,
    pub resource_id: Option<Uuid>,
    /// When set, this is a reply; the resource target is inherited from
    /// the parent and any submitted target is ignored
    pub parent_id: Option<Uuid>,
    pub content: String,
}

/// Payload for reacting to a comment
#[derive(Debug, Clone, Deserialize)]
pub struct ReactionRequest {
    pub reaction: Reaction,
}

/// Query parameters for listing a resource's comments
#[derive(Debug, Deserialize)]
pub struct ListCommentsParams {
    pub resource_kind: ResourceKind,
    pub resource_id: Uuid,
}
