//! Database operations for events

use chrono::Utc;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::models::{CreateEventRequest, Event, TicketType, UpdateEventRequest};

const EVENT_COLUMNS: &str = "id, user_id, title, description, location, latitude, longitude, starts_at, capacity, ticket_type, price_cents, created_at, updated_at";

/// Create an event
pub async fn create_event(
    pool: &PgPool,
    user_id: Uuid,
    request: &CreateEventRequest,
    coordinates: Option<(f64, f64)>,
) -> Result<Event, sqlx::Error> {
    let now = Utc::now();
    sqlx::query_as::<_, Event>(&format!(
        r#"
        INSERT INTO events (id, user_id, title, description, location, latitude, longitude,
                            starts_at, capacity, ticket_type, price_cents, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
        RETURNING {EVENT_COLUMNS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(&request.title)
    .bind(&request.description)
    .bind(&request.location)
    .bind(coordinates.map(|c| c.0))
    .bind(coordinates.map(|c| c.1))
    .bind(request.starts_at)
    .bind(request.capacity)
    .bind(request.ticket_type.as_str())
    .bind(request.price_cents)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await
}

/// Get one event
pub async fn get_event(pool: &PgPool, id: Uuid) -> Result<Option<Event>, sqlx::Error> {
    sqlx::query_as::<_, Event>(&format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// List events, soonest first (events without a date sort last)
pub async fn list_events(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Event>, sqlx::Error> {
    sqlx::query_as::<_, Event>(&format!(
        "SELECT {EVENT_COLUMNS} FROM events ORDER BY starts_at ASC NULLS LAST LIMIT $1 OFFSET $2"
    ))
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

/// Apply a partial update
pub async fn update_event(
    pool: &PgPool,
    id: Uuid,
    request: &UpdateEventRequest,
    coordinates: Option<(f64, f64)>,
) -> Result<Option<Event>, sqlx::Error> {
    sqlx::query_as::<_, Event>(&format!(
        r#"
        UPDATE events
        SET title = COALESCE($1, title),
            description = COALESCE($2, description),
            location = COALESCE($3, location),
            latitude = COALESCE($4, latitude),
            longitude = COALESCE($5, longitude),
            starts_at = COALESCE($6, starts_at),
            capacity = COALESCE($7, capacity),
            ticket_type = COALESCE($8, ticket_type),
            price_cents = COALESCE($9, price_cents),
            updated_at = $10
        WHERE id = $11
        RETURNING {EVENT_COLUMNS}
        "#
    ))
    .bind(&request.title)
    .bind(&request.description)
    .bind(&request.location)
    .bind(coordinates.map(|c| c.0))
    .bind(coordinates.map(|c| c.1))
    .bind(request.starts_at)
    .bind(request.capacity)
    .bind(request.ticket_type.map(|t| TicketType::as_str(&t)))
    .bind(request.price_cents)
    .bind(Utc::now())
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Delete an event and pull the polymorphic references
pub async fn delete_event(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM events WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Ok(false);
    }

    sqlx::query("DELETE FROM favorites WHERE item_kind = 'event' AND item_id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    sqlx::query("DELETE FROM cart_items WHERE item_kind = 'event' AND item_id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(true)
}

/// Participant ids holding a given RSVP status
pub async fn participants_with_status(
    pool: &PgPool,
    event_id: Uuid,
    status: &str,
) -> Result<Vec<Uuid>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT user_id FROM event_participants
        WHERE event_id = $1 AND status = $2
        ORDER BY created_at ASC
        "#,
    )
    .bind(event_id)
    .bind(status)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|r| r.get("user_id")).collect())
}

/// Upsert an RSVP; one row per (event, user), so setting "going" replaces
/// "interested" and vice versa
pub async fn set_rsvp(
    pool: &PgPool,
    event_id: Uuid,
    user_id: Uuid,
    status: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO event_participants (event_id, user_id, status, created_at)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (event_id, user_id) DO UPDATE SET status = EXCLUDED.status
        "#,
    )
    .bind(event_id)
    .bind(user_id)
    .bind(status)
    .bind(Utc::now())
    .execute(pool)
    .await?;
    Ok(())
}

/// Clear any RSVP the user holds on the event
pub async fn clear_rsvp(pool: &PgPool, event_id: Uuid, user_id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM event_participants WHERE event_id = $1 AND user_id = $2")
        .bind(event_id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(())
}
