//! Event HTTP Handlers
//!
//! Browsing is public; creation geocodes the location when a geocoder is
//! configured and proceeds without coordinates when the lookup fails.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use super::db;
use super::models::{
    CreateEventRequest, Event, EventDetail, RsvpRequest, RsvpStatus, TicketType,
    UpdateEventRequest,
};
use crate::backend::adapters::GeocodeClient;
use crate::backend::error::ApiError;
use crate::backend::middleware::auth::AuthUser;

#[derive(Debug, Deserialize)]
pub struct ListEventsParams {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

fn validate_new_event(request: &CreateEventRequest) -> Result<(), ApiError> {
    if request.title.trim().is_empty() {
        return Err(ApiError::validation("Title must not be empty"));
    }
    if request.capacity < 0 {
        return Err(ApiError::validation("Capacity must not be negative"));
    }
    if request.ticket_type == TicketType::Paid && request.price_cents <= 0 {
        return Err(ApiError::validation(
            "A paid event must have a positive ticket price",
        ));
    }
    Ok(())
}

async fn load_detail(pool: &PgPool, event: Event) -> Result<EventDetail, ApiError> {
    let going_participants = db::participants_with_status(pool, event.id, "going").await?;
    let interested_participants =
        db::participants_with_status(pool, event.id, "interested").await?;

    Ok(EventDetail {
        event,
        going_participants,
        interested_participants,
    })
}

pub async fn list_events(
    State(pool): State<PgPool>,
    Query(params): Query<ListEventsParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let limit = params.limit.unwrap_or(50).min(200) as i64;
    let offset = params.offset.unwrap_or(0) as i64;

    let events = db::list_events(&pool, limit, offset).await?;
    Ok(Json(serde_json::json!({ "events": events })))
}

pub async fn get_event(
    State(pool): State<PgPool>,
    Path(id): Path<Uuid>,
) -> Result<Json<EventDetail>, ApiError> {
    let event = db::get_event(&pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Event"))?;
    Ok(Json(load_detail(&pool, event).await?))
}

pub async fn create_event(
    State(pool): State<PgPool>,
    State(geocoder): State<GeocodeClient>,
    AuthUser(current): AuthUser,
    Json(request): Json<CreateEventRequest>,
) -> Result<Json<Event>, ApiError> {
    validate_new_event(&request)?;

    let coordinates = match &request.location {
        Some(location) if !location.trim().is_empty() => geocoder.lookup(location).await,
        _ => None,
    };

    let event = db::create_event(&pool, current.user_id, &request, coordinates).await?;
    tracing::info!("Event {} created by {}", event.id, current.username);
    Ok(Json(event))
}

pub async fn update_event(
    State(pool): State<PgPool>,
    State(geocoder): State<GeocodeClient>,
    AuthUser(current): AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateEventRequest>,
) -> Result<Json<Event>, ApiError> {
    let existing = db::get_event(&pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Event"))?;

    if existing.user_id != current.user_id {
        return Err(ApiError::forbidden("Only the organiser can edit an event"));
    }

    if let Some(capacity) = request.capacity {
        if capacity < 0 {
            return Err(ApiError::validation("Capacity must not be negative"));
        }
    }

    // re-geocode only when a new location is submitted
    let coordinates = match &request.location {
        Some(location) if !location.trim().is_empty() => geocoder.lookup(location).await,
        _ => None,
    };

    let event = db::update_event(&pool, id, &request, coordinates)
        .await?
        .ok_or_else(|| ApiError::not_found("Event"))?;
    Ok(Json(event))
}

pub async fn delete_event(
    State(pool): State<PgPool>,
    AuthUser(current): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let existing = db::get_event(&pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Event"))?;

    if existing.user_id != current.user_id && !current.is_admin() {
        return Err(ApiError::forbidden("Only the organiser can delete an event"));
    }

    db::delete_event(&pool, id).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}

/// POST /api/events/{id}/rsvp — going and interested are mutually
/// exclusive; "none" clears the RSVP
pub async fn rsvp(
    State(pool): State<PgPool>,
    AuthUser(current): AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<RsvpRequest>,
) -> Result<Json<EventDetail>, ApiError> {
    let event = db::get_event(&pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Event"))?;

    match request.status {
        RsvpStatus::Going => db::set_rsvp(&pool, id, current.user_id, "going").await?,
        RsvpStatus::Interested => db::set_rsvp(&pool, id, current.user_id, "interested").await?,
        RsvpStatus::None => db::clear_rsvp(&pool, id, current.user_id).await?,
    }

    Ok(Json(load_detail(&pool, event).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_request() -> CreateEventRequest {
        CreateEventRequest {
            title: "Opening night".to_string(),
            description: String::new(),
            location: None,
            starts_at: None,
            capacity: 50,
            ticket_type: TicketType::Free,
            price_cents: 0,
        }
    }

    #[test]
    fn test_paid_event_needs_price() {
        let mut request = base_request();
        request.ticket_type = TicketType::Paid;
        assert!(validate_new_event(&request).is_err());

        request.price_cents = 1000;
        assert!(validate_new_event(&request).is_ok());
    }

    #[test]
    fn test_free_event_zero_price_ok() {
        assert!(validate_new_event(&base_request()).is_ok());
    }

    #[test]
    fn test_negative_capacity_rejected() {
        let mut request = base_request();
        request.capacity = -1;
        assert!(validate_new_event(&request).is_err());
    }
}
