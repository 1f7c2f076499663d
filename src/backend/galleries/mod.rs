//! Galleries: curated product collections with collaborators
//!
//! The collaborator workflow is the heart of this module: see
//! [`collab::reconcile_collaborators`] for the three-way partition rules
//! and `handlers::update_collaborators` for how transitions turn into
//! notifications.

pub mod collab;
pub mod db;
pub mod handlers;
pub mod models;
pub mod ordering;

pub use models::{CollaboratorState, Gallery};
