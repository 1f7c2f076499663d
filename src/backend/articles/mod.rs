//! Blog articles

pub mod db;
pub mod handlers;
pub mod models;

pub use models::{Article, Category};
