//! Error types for the response cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache and its admin API.
///
/// A missing key is never an error inside the cache itself; `NotFound` is only
/// produced by HTTP handlers.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Rejected key, pattern or request parameter
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Requested resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Value could not be converted into a cacheable payload
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Response that cannot be captured into the cache
    #[error("Response not cacheable: {0}")]
    Uncacheable(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::Serialization(_)
            | CacheError::Uncacheable(_)
            | CacheError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the response cache.
pub type Result<T> = std::result::Result<T, CacheError>;
