//! Events with RSVP and ticketing

pub mod db;
pub mod handlers;
pub mod models;

pub use models::{Event, TicketType};
