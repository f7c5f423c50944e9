//! Error types for the cart cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Failures reported by a key-value backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Backend unreachable or the connection dropped
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Operation exceeded the configured timeout
    #[error("Operation timed out after {0}ms")]
    Timeout(u64),

    /// Backend answered with an error
    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

// == Cart Error Enum ==
/// Unified error type for cart operations.
#[derive(Error, Debug)]
pub enum CartError {
    /// Malformed input, rejected before any cache access
    #[error("Invalid request: {0}")]
    Validation(String),

    /// The targeted store or item is not in the cart
    #[error("{} in cart of {customer_id}", describe_missing(.store_id, .book_id))]
    NotFound {
        customer_id: String,
        store_id: i32,
        /// `None` when the store group itself is missing
        book_id: Option<i32>,
    },

    /// Cache unreachable, timed out or returned a protocol error
    #[error("Cart storage unavailable: {0}")]
    Transient(#[from] CacheError),

    /// Stored bytes could not be decoded
    #[error("Corrupt cart data under '{key}': {reason}")]
    CorruptData { key: String, reason: String },

    /// Concurrent writers kept replacing the cart
    #[error("Cart of {customer_id} changed concurrently, gave up after {attempts} attempts")]
    Conflict { customer_id: String, attempts: u32 },

    /// Cart could not be encoded
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CartError {
    /// Returns true when the caller may retry the same request.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CartError::Transient(_) | CartError::Conflict { .. })
    }
}

fn describe_missing(store_id: &i32, book_id: &Option<i32>) -> String {
    match book_id {
        Some(book_id) => format!("Item {} not found in store {}", book_id, store_id),
        None => format!("Store {} not found", store_id),
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CartError {
    fn into_response(self) -> Response {
        let status = match &self {
            CartError::Validation(_) => StatusCode::BAD_REQUEST,
            CartError::NotFound { .. } => StatusCode::NOT_FOUND,
            CartError::Transient(_) => StatusCode::SERVICE_UNAVAILABLE,
            CartError::Conflict { .. } => StatusCode::CONFLICT,
            CartError::CorruptData { .. } | CartError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = ErrorResponse::new(self.to_string(), self.is_retryable());

        (status, Json(body)).into_response()
    }
}

// == Result Type Aliases ==
/// Convenience Result type for cart operations.
pub type Result<T> = std::result::Result<T, CartError>;

/// Result type returned by key-value backends.
pub type CacheResult<T> = std::result::Result<T, CacheError>;
