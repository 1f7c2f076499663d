//! Comment HTTP Handlers
//!
//! Listing is public and returns the assembled single-level thread.
//! Replies inherit the parent's resource target; deleting a top-level
//! comment takes its direct children with it.

use axum::extract::{Path, Query, State};
use axum::Json;
use sqlx::PgPool;
use uuid::Uuid;

use super::db;
use super::models::{Comment, CreateCommentRequest, ListCommentsParams, Reaction, ReactionRequest};
use super::tree::assemble_thread;
use crate::backend::error::ApiError;
use crate::backend::middleware::auth::AuthUser;
use crate::backend::outbox::{self, DomainEvent};
use crate::backend::resources;

pub async fn list_comments(
    State(pool): State<PgPool>,
    Query(params): Query<ListCommentsParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let comments = db::list_for_resource(&pool, params.resource_kind, params.resource_id).await?;
    let thread = assemble_thread(comments);
    Ok(Json(serde_json::json!({ "comments": thread })))
}

pub async fn create_comment(
    State(pool): State<PgPool>,
    AuthUser(current): AuthUser,
    Json(request): Json<CreateCommentRequest>,
) -> Result<Json<Comment>, ApiError> {
    if request.content.trim().is_empty() {
        return Err(ApiError::validation("Comment must not be empty"));
    }

    let comment = match request.parent_id {
        Some(parent_id) => {
            // replies always inherit the parent's target; no depth check
            let parent = db::get_comment(&pool, parent_id)
                .await?
                .ok_or_else(|| ApiError::not_found("Parent comment"))?;

            let comment = db::create_comment(
                &pool,
                current.user_id,
                parent.resource_kind,
                parent.resource_id,
                Some(parent_id),
                &request.content,
            )
            .await?;

            outbox::dispatch(
                &pool,
                DomainEvent::ReplyPosted {
                    author_id: current.user_id,
                    author_name: current.username.clone(),
                    parent_author_id: parent.author_id,
                    resource_kind: parent.resource_kind,
                    resource_id: parent.resource_id,
                    comment_id: comment.id,
                },
            )
            .await;

            comment
        }
        None => {
            let kind = request
                .resource_kind
                .ok_or_else(|| ApiError::validation("resource_kind is required"))?;
            let resource_id = request
                .resource_id
                .ok_or_else(|| ApiError::validation("resource_id is required"))?;

            let resource = resources::resolve(&pool, kind, resource_id)
                .await?
                .ok_or_else(|| ApiError::not_found("Resource"))?;

            let comment = db::create_comment(
                &pool,
                current.user_id,
                kind,
                resource_id,
                None,
                &request.content,
            )
            .await?;

            outbox::dispatch(
                &pool,
                DomainEvent::CommentPosted {
                    author_id: current.user_id,
                    author_name: current.username.clone(),
                    resource_kind: kind,
                    resource_id,
                    resource_owner_id: resource.owner_id,
                    comment_id: comment.id,
                },
            )
            .await;

            comment
        }
    };

    Ok(Json(comment))
}

pub async fn delete_comment(
    State(pool): State<PgPool>,
    AuthUser(current): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let comment = db::get_comment(&pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Comment"))?;

    let mut allowed = comment.author_id == current.user_id || current.is_admin();
    if !allowed {
        // the owner of the commented resource may moderate its comments
        if let Some(resource) =
            resources::resolve(&pool, comment.resource_kind, comment.resource_id).await?
        {
            allowed = resource.owner_id == current.user_id;
        }
    }
    if !allowed {
        return Err(ApiError::forbidden("Not allowed to delete this comment"));
    }

    let deleted = db::delete_with_direct_children(&pool, id).await?;
    Ok(Json(serde_json::json!({ "success": true, "deleted": deleted })))
}

pub async fn react_to_comment(
    State(pool): State<PgPool>,
    AuthUser(current): AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<ReactionRequest>,
) -> Result<Json<Comment>, ApiError> {
    db::get_comment(&pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Comment"))?;

    match request.reaction {
        Reaction::Like => db::set_reaction(&pool, id, current.user_id, "like").await?,
        Reaction::Dislike => db::set_reaction(&pool, id, current.user_id, "dislike").await?,
        Reaction::None => db::clear_reaction(&pool, id, current.user_id).await?,
    }

    let comment = db::get_comment(&pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Comment"))?;
    Ok(Json(comment))
}
