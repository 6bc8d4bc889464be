//! Error types for the middleware stack
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Midware Error Enum ==
/// Unified error type for the cache, the middleware and the HTTP bridge.
#[derive(Error, Debug)]
pub enum MidwareError {
    /// Key not present in the heap
    #[error("Key not found: {0}")]
    KeyNotFound(String),

    /// Rejected configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Dispatch pattern failed to compile
    #[error("Invalid route pattern: {0}")]
    InvalidRoute(#[from] regex::Error),

    /// Cached response or session data could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for MidwareError {
    fn into_response(self) -> Response {
        let status = match &self {
            MidwareError::KeyNotFound(_) => StatusCode::NOT_FOUND,
            MidwareError::InvalidConfig(_) | MidwareError::InvalidRoute(_) => {
                StatusCode::BAD_REQUEST
            }
            MidwareError::Serialization(_) | MidwareError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the middleware stack.
pub type Result<T> = std::result::Result<T, MidwareError>;
