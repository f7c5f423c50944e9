//! Response DTOs for the cart API

use rust_decimal::Decimal;
use serde::Serialize;

use crate::cart::Cart;

/// A cart with its derived totals, returned by every cart endpoint.
///
/// The cart fields are flattened so the body reads as the stored cart plus
/// `itemCount` and `subtotal`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    #[serde(flatten)]
    pub cart: Cart,
    /// Units across all lines
    pub item_count: u64,
    #[serde(with = "rust_decimal::serde::str")]
    pub subtotal: Decimal,
}

impl From<Cart> for CartResponse {
    fn from(cart: Cart) -> Self {
        Self {
            item_count: cart.item_count(),
            subtotal: cart.subtotal(),
            cart,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// "healthy", or "degraded" when the cache does not answer
    pub status: String,
    /// Whether the key-value cache answered a probe
    pub cache_connected: bool,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a HealthResponse from the cache probe result
    pub fn from_probe(cache_connected: bool) -> Self {
        let status = if cache_connected { "healthy" } else { "degraded" };
        Self {
            status: status.to_string(),
            cache_connected,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
    /// Whether repeating the request may succeed
    pub retryable: bool,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, retryable: bool) -> Self {
        Self {
            error: error.into(),
            retryable,
        }
    }
}
