//! Product reviews and the derived average rating

pub mod db;
pub mod handlers;
pub mod models;

pub use models::Review;
