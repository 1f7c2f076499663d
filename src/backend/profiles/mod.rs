//! User profiles, personal block lists, and favorites

pub mod favorites;
pub mod handlers;
