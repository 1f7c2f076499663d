//! Gallery HTTP Handlers
//!
//! Browsing public galleries needs no session; mutations require the owner
//! or an accepted collaborator, and the collaborator list itself is
//! owner-only. The collaborator workflow follows
//! [`collab::reconcile_collaborators`] and emits one event per transition.

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use super::collab::{coerce_collaborator_ids, reconcile_collaborators};
use super::db;
use super::models::{
    CollaboratorState, CreateGalleryRequest, Gallery, GalleryDetail, GalleryProductEntry,
    RespondInviteRequest, UpdateCollaboratorsRequest, UpdateGalleryProductsRequest,
    UpdateGalleryRequest,
};
use super::ordering::{normalize_positions, OrderedProduct};
use crate::backend::auth::sessions;
use crate::backend::auth::users::get_user_by_id;
use crate::backend::error::ApiError;
use crate::backend::middleware::auth::AuthUser;
use crate::backend::notifications::db as notifications_db;
use crate::backend::outbox::consumer::kinds;
use crate::backend::outbox::{self, DomainEvent};
use crate::backend::products;

#[derive(Debug, Deserialize)]
pub struct ListGalleriesParams {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

/// Best-effort identity for public endpoints: a valid session widens the
/// listing to the viewer's own private galleries, anything else is ignored.
fn optional_viewer(headers: &HeaderMap) -> Option<Uuid> {
    let cookie = headers
        .get(axum::http::header::COOKIE)
        .and_then(|h| h.to_str().ok())?;
    let token = sessions::token_from_cookie_header(cookie)?;
    let claims = sessions::verify_token(token).ok()?;
    Uuid::parse_str(&claims.sub).ok()
}

/// Assemble the full gallery read model
async fn load_detail(pool: &PgPool, gallery: Gallery) -> Result<GalleryDetail, ApiError> {
    let (collaborators, pending_collaborators, products) = futures_util::try_join!(
        db::collaborators_in_state(pool, gallery.id, CollaboratorState::Accepted),
        db::collaborators_in_state(pool, gallery.id, CollaboratorState::Pending),
        db::gallery_products(pool, gallery.id),
    )?;

    Ok(GalleryDetail {
        gallery,
        collaborators,
        pending_collaborators,
        products,
    })
}

/// Whether `user_id` may edit this gallery's content
async fn can_edit(pool: &PgPool, gallery: &Gallery, user_id: Uuid) -> Result<bool, ApiError> {
    if gallery.owner_id == user_id {
        return Ok(true);
    }
    Ok(db::collaborator_state(pool, gallery.id, user_id).await?
        == Some(CollaboratorState::Accepted))
}

pub async fn list_galleries(
    State(pool): State<PgPool>,
    headers: HeaderMap,
    Query(params): Query<ListGalleriesParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let limit = params.limit.unwrap_or(50).min(200) as i64;
    let offset = params.offset.unwrap_or(0) as i64;

    let galleries = db::list_galleries(&pool, optional_viewer(&headers), limit, offset).await?;
    Ok(Json(serde_json::json!({ "galleries": galleries })))
}

pub async fn get_gallery(
    State(pool): State<PgPool>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<GalleryDetail>, ApiError> {
    let gallery = db::get_gallery(&pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Gallery"))?;

    if !gallery.is_public {
        let viewer = optional_viewer(&headers).ok_or_else(|| {
            ApiError::forbidden("This gallery is private")
        })?;
        let is_member = gallery.owner_id == viewer
            || db::collaborator_state(&pool, gallery.id, viewer).await?.is_some();
        if !is_member {
            return Err(ApiError::forbidden("This gallery is private"));
        }
    }

    Ok(Json(load_detail(&pool, gallery).await?))
}

pub async fn create_gallery(
    State(pool): State<PgPool>,
    AuthUser(current): AuthUser,
    Json(request): Json<CreateGalleryRequest>,
) -> Result<Json<Gallery>, ApiError> {
    if request.title.trim().is_empty() {
        return Err(ApiError::validation("Title must not be empty"));
    }

    let gallery = db::create_gallery(&pool, current.user_id, &request).await?;
    tracing::info!("Gallery {} created by {}", gallery.id, current.username);
    Ok(Json(gallery))
}

pub async fn update_gallery(
    State(pool): State<PgPool>,
    AuthUser(current): AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateGalleryRequest>,
) -> Result<Json<Gallery>, ApiError> {
    let gallery = db::get_gallery(&pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Gallery"))?;

    if !can_edit(&pool, &gallery, current.user_id).await? {
        return Err(ApiError::forbidden(
            "Only the owner or a collaborator can edit this gallery",
        ));
    }

    let gallery = db::update_gallery(&pool, id, &request)
        .await?
        .ok_or_else(|| ApiError::not_found("Gallery"))?;
    Ok(Json(gallery))
}

pub async fn delete_gallery(
    State(pool): State<PgPool>,
    AuthUser(current): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let gallery = db::get_gallery(&pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Gallery"))?;

    if gallery.owner_id != current.user_id && !current.is_admin() {
        return Err(ApiError::forbidden("Only the owner can delete a gallery"));
    }

    db::delete_gallery(&pool, id).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}

/// PUT /api/galleries/{id}/collaborators — the owner submits the desired
/// collaborator list and the partition is reconciled against it
pub async fn update_collaborators(
    State(pool): State<PgPool>,
    AuthUser(current): AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateCollaboratorsRequest>,
) -> Result<Json<GalleryDetail>, ApiError> {
    let gallery = db::get_gallery(&pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Gallery"))?;

    if gallery.owner_id != current.user_id {
        return Err(ApiError::forbidden(
            "Only the owner can manage collaborators",
        ));
    }

    let (submitted, malformed) = coerce_collaborator_ids(&request.collaborators);
    if malformed {
        tracing::warn!(
            "Malformed collaborators payload for gallery {}; coerced to {} id(s)",
            id,
            submitted.len()
        );
    }

    // submitted ids must be real accounts; unknown ids are dropped like
    // malformed entries
    let mut known = Vec::with_capacity(submitted.len());
    for user_id in submitted {
        if get_user_by_id(&pool, user_id).await?.is_some() {
            known.push(user_id);
        } else {
            tracing::warn!("Ignoring unknown user {} in collaborators payload", user_id);
        }
    }

    let accepted = db::collaborators_in_state(&pool, id, CollaboratorState::Accepted).await?;
    let pending = db::collaborators_in_state(&pool, id, CollaboratorState::Pending).await?;

    let outcome = reconcile_collaborators(gallery.owner_id, &accepted, &pending, &known);

    for &user_id in &outcome.invited {
        db::add_pending(&pool, id, user_id).await?;
        outbox::dispatch(
            &pool,
            DomainEvent::CollaboratorInvited {
                gallery_id: id,
                gallery_title: gallery.title.clone(),
                owner_name: current.username.clone(),
                invitee_id: user_id,
            },
        )
        .await;
    }

    // a kept-pending invitee whose invite notification is gone or already
    // seen gets a fresh one; otherwise stay silent
    let invite_meta = serde_json::json!({ "gallery_id": id.to_string() });
    for &user_id in &outcome.kept_pending {
        let has_unseen =
            notifications_db::has_unseen_matching(&pool, user_id, kinds::GALLERY_INVITE, &invite_meta)
                .await?;
        if !has_unseen {
            outbox::dispatch(
                &pool,
                DomainEvent::CollaboratorInvited {
                    gallery_id: id,
                    gallery_title: gallery.title.clone(),
                    owner_name: current.username.clone(),
                    invitee_id: user_id,
                },
            )
            .await;
        }
    }

    for &user_id in &outcome.withdrawn {
        db::remove_collaborator(&pool, id, user_id).await?;
        outbox::dispatch(
            &pool,
            DomainEvent::InviteWithdrawn {
                gallery_id: id,
                gallery_title: gallery.title.clone(),
                invitee_id: user_id,
            },
        )
        .await;
    }

    for &user_id in &outcome.removed {
        db::remove_collaborator(&pool, id, user_id).await?;
        outbox::dispatch(
            &pool,
            DomainEvent::CollaboratorRemoved {
                gallery_id: id,
                gallery_title: gallery.title.clone(),
                user_id,
            },
        )
        .await;
    }

    Ok(Json(load_detail(&pool, gallery).await?))
}

/// POST /api/galleries/{id}/collaborators/respond — invitee accepts or
/// declines a pending invite
pub async fn respond_to_invite(
    State(pool): State<PgPool>,
    AuthUser(current): AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<RespondInviteRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let gallery = db::get_gallery(&pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Gallery"))?;

    let state = db::collaborator_state(&pool, id, current.user_id).await?;
    if state != Some(CollaboratorState::Pending) {
        return Err(ApiError::not_found("Invite"));
    }

    let invite_meta = serde_json::json!({ "gallery_id": id.to_string() });

    if request.accept {
        db::accept_pending(&pool, id, current.user_id).await?;
        notifications_db::mark_matching_seen(
            &pool,
            current.user_id,
            kinds::GALLERY_INVITE,
            &invite_meta,
        )
        .await?;
        outbox::dispatch(
            &pool,
            DomainEvent::InviteAccepted {
                gallery_id: id,
                gallery_title: gallery.title.clone(),
                owner_id: gallery.owner_id,
                collaborator_name: current.username.clone(),
            },
        )
        .await;
    } else {
        db::remove_collaborator(&pool, id, current.user_id).await?;
        notifications_db::delete_matching(
            &pool,
            current.user_id,
            kinds::GALLERY_INVITE,
            &invite_meta,
        )
        .await?;
        outbox::dispatch(
            &pool,
            DomainEvent::InviteDeclined {
                gallery_id: id,
                gallery_title: gallery.title.clone(),
                owner_id: gallery.owner_id,
                invitee_name: current.username.clone(),
            },
        )
        .await;
    }

    Ok(Json(serde_json::json!({ "success": true })))
}

/// PUT /api/galleries/{id}/products — replace membership and order; stored
/// positions always come out a dense permutation
pub async fn update_gallery_products(
    State(pool): State<PgPool>,
    AuthUser(current): AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateGalleryProductsRequest>,
) -> Result<Json<GalleryDetail>, ApiError> {
    let gallery = db::get_gallery(&pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Gallery"))?;

    if !can_edit(&pool, &gallery, current.user_id).await? {
        return Err(ApiError::forbidden(
            "Only the owner or a collaborator can edit this gallery",
        ));
    }

    let mut submitted = Vec::with_capacity(request.products.len());
    for input in &request.products {
        if products::db::get_product(&pool, input.product).await?.is_none() {
            return Err(ApiError::validation(format!(
                "Unknown product {}",
                input.product
            )));
        }
        submitted.push(OrderedProduct {
            product_id: input.product,
            position: input.order,
        });
    }

    let normalized = normalize_positions(&submitted);
    let entries: Vec<GalleryProductEntry> = normalized
        .into_iter()
        .map(|e| GalleryProductEntry {
            product_id: e.product_id,
            position: e.position,
        })
        .collect();

    db::replace_gallery_products(&pool, id, &entries).await?;

    Ok(Json(load_detail(&pool, gallery).await?))
}
