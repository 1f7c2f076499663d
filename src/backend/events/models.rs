//! Event types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Ticket pricing model
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TicketType {
    Free,
    Paid,
}

impl TicketType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketType::Free => "free",
            TicketType::Paid => "paid",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "free" => Some(TicketType::Free),
            "paid" => Some(TicketType::Paid),
            _ => None,
        }
    }
}

/// RSVP status; a user holds at most one of these per event
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RsvpStatus {
    Going,
    Interested,
    /// Clears any existing RSVP
    None,
}

/// An event listing
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Event {
    pub id: Uuid,
    /// Organising user
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub starts_at: Option<DateTime<Utc>>,
    /// Remaining ticket capacity; decremented at checkout
    pub capacity: i64,
    pub ticket_type: String,
    pub price_cents: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Event detail with participant lists
#[derive(Debug, Clone, Serialize)]
pub struct EventDetail {
    #[serde(flatten)]
    pub event: Event,
    pub going_participants: Vec<Uuid>,
    pub interested_participants: Vec<Uuid>,
}

/// Payload for creating an event
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEventRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub starts_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub capacity: i64,
    #[serde(default = "default_ticket_type")]
    pub ticket_type: TicketType,
    #[serde(default)]
    pub price_cents: i64,
}

fn default_ticket_type() -> TicketType {
    TicketType::Free
}

/// Payload for updating an event
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub starts_at: Option<DateTime<Utc>>,
    pub capacity: Option<i64>,
    pub ticket_type: Option<TicketType>,
    pub price_cents: Option<i64>,
}

/// RSVP payload
#[derive(Debug, Clone, Deserialize)]
pub struct RsvpRequest {
    pub status: RsvpStatus,
}
