//! Backend Error Types
//!
//! This module defines the error type used by the HTTP handlers. Every
//! variant maps to an HTTP status code, and the `IntoResponse` impl renders
//! the body as `{"error": "..."}` JSON.
//!
//! Server-side failures (database, serialization, upstream services) are
//! logged with their full detail and surfaced to the client with a generic
//! message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::shared::SharedError;

/// Errors surfaced by HTTP handlers
#[derive(Debug, Error)]
pub enum ApiError {
    /// The requested entity does not exist
    #[error("{0} not found")]
    NotFound(String),

    /// No valid session was presented
    #[error("{0}")]
    Unauthorized(String),

    /// The caller is authenticated but not allowed to act on the resource
    #[error("{0}")]
    Forbidden(String),

    /// The request payload failed validation
    #[error("{0}")]
    Validation(String),

    /// The request conflicts with current state (duplicates, stale versions)
    #[error("{0}")]
    Conflict(String),

    /// Database failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Serialization failure
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A third-party service call failed
    #[error("Upstream service error: {0}")]
    Upstream(String),

    /// A required third-party integration is not configured
    #[error("{0} is not configured")]
    Unconfigured(&'static str),

    /// Anything else
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Not-found error for a named entity ("Gallery", "Product", ...)
    pub fn not_found(entity: impl Into<String>) -> Self {
        Self::NotFound(entity.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Database(sqlx::Error::RowNotFound) => StatusCode::NOT_FOUND,
            Self::Database(_) | Self::Serialization(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::Unconfigured(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Message included in the response body
    ///
    /// 5xx variants return a generic message; the detail only goes to the
    /// log.
    pub fn message(&self) -> String {
        match self {
            Self::NotFound(entity) => format!("{} not found", entity),
            Self::Unauthorized(m) | Self::Forbidden(m) | Self::Validation(m) | Self::Conflict(m) => {
                m.clone()
            }
            Self::Database(sqlx::Error::RowNotFound) => "not found".to_string(),
            Self::Database(_) | Self::Serialization(_) | Self::Internal(_) => {
                "internal server error".to_string()
            }
            Self::Upstream(_) => "upstream service unavailable".to_string(),
            Self::Unconfigured(what) => format!("{} is not configured", what),
        }
    }
}

impl From<SharedError> for ApiError {
    fn from(err: SharedError) -> Self {
        match err {
            SharedError::ValidationError { field, message } => {
                Self::Validation(format!("{}: {}", field, message))
            }
            SharedError::SerializationError { message } => Self::Internal(message),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("request failed: {:?}", self);
        } else {
            tracing::debug!("request rejected: {:?}", self);
        }
        let body = Json(serde_json::json!({ "error": self.message() }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_mapping() {
        assert_eq!(
            ApiError::not_found("Gallery").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::unauthorized("no session").status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::forbidden("not yours").status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::validation("bad payload").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::conflict("stale version").status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::internal("boom").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_row_not_found_maps_to_404() {
        let err = ApiError::from(sqlx::Error::RowNotFound);
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_server_errors_hide_detail() {
        let err = ApiError::internal("connection pool exhausted at 10.0.0.3");
        assert_eq!(err.message(), "internal server error");
    }

    #[test]
    fn test_not_found_message() {
        let err = ApiError::not_found("Product");
        assert_eq!(err.message(), "Product not found");
    }

    #[test]
    fn test_from_shared_validation() {
        let err: ApiError = SharedError::validation("price", "must be positive").into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(err.message().contains("price"));
    }
}
