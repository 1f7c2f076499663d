//! Messaging HTTP Handlers
//!
//! Direct messages between two users. Sending respects personal block
//! lists in both directions.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use super::db;
use crate::backend::auth::users::{get_user_by_id, is_blocked_between};
use crate::backend::error::ApiError;
use crate::backend::middleware::auth::AuthUser;

/// Payload for sending a message
#[derive(Debug, Clone, Deserialize)]
pub struct SendMessageRequest {
    pub receiver_id: Uuid,
    pub content: String,
    #[serde(default)]
    pub attachment_urls: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ConversationParams {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

pub async fn send_message(
    State(pool): State<PgPool>,
    AuthUser(current): AuthUser,
    Json(request): Json<SendMessageRequest>,
) -> Result<Json<db::Message>, ApiError> {
    if request.content.trim().is_empty() && request.attachment_urls.is_empty() {
        return Err(ApiError::validation("Message must not be empty"));
    }
    if request.receiver_id == current.user_id {
        return Err(ApiError::validation("Cannot message yourself"));
    }

    get_user_by_id(&pool, request.receiver_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User"))?;

    if is_blocked_between(&pool, current.user_id, request.receiver_id).await? {
        return Err(ApiError::forbidden("Messaging is blocked between these users"));
    }

    let message = db::create_message(
        &pool,
        current.user_id,
        request.receiver_id,
        &request.content,
        &request.attachment_urls,
    )
    .await?;

    Ok(Json(message))
}

/// GET /api/messages/{user_id} — the conversation with one partner
pub async fn get_conversation(
    State(pool): State<PgPool>,
    AuthUser(current): AuthUser,
    Path(partner_id): Path<Uuid>,
    Query(params): Query<ConversationParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let limit = params.limit.unwrap_or(50).min(200) as i64;
    let offset = params.offset.unwrap_or(0) as i64;

    let messages =
        db::conversation_between(&pool, current.user_id, partner_id, limit, offset).await?;
    let has_more = messages.len() as i64 == limit;

    Ok(Json(serde_json::json!({
        "messages": messages,
        "has_more": has_more,
    })))
}

/// GET /api/conversations — one summary per partner
pub async fn list_conversations(
    State(pool): State<PgPool>,
    AuthUser(current): AuthUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let conversations = db::conversations_for_user(&pool, current.user_id).await?;
    Ok(Json(serde_json::json!({ "conversations": conversations })))
}

/// PATCH /api/messages/{id}/read
pub async fn mark_message_read(
    State(pool): State<PgPool>,
    AuthUser(current): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let message = db::get_message(&pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Message"))?;

    if message.receiver_id != current.user_id {
        return Err(ApiError::forbidden("Only the receiver can mark a message read"));
    }

    db::mark_read(&pool, id, current.user_id).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}
