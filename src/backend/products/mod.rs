//! Artwork listings

pub mod db;
pub mod handlers;
pub mod models;

pub use models::Product;
