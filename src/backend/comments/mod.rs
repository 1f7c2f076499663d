//! Comments and single-level reply threads

pub mod db;
pub mod handlers;
pub mod models;
pub mod tree;

pub use models::{Comment, Reaction};
