//! Shared Module
//!
//! Types shared across the backend: common error types and the tagged
//! discriminators for polymorphic references.

pub mod error;
pub mod items;

pub use error::SharedError;
pub use items::{ItemKind, ResourceKind};
