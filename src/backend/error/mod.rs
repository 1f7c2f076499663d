//! Backend error types

pub mod types;

pub use types::ApiError;
