//! Request DTOs for the cart API
//!
//! The command shapes accepted by the cart store.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Request body for adding a book to a cart (POST /cart/items)
///
/// `quantity` is signed so that a negative value reaches validation instead
/// of failing deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    pub customer_id: String,
    pub store_id: i32,
    #[serde(default)]
    pub store_name: Option<String>,
    pub book_id: i32,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    pub quantity: i64,
    pub unit_price: Decimal,
}

impl AddItemRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if let Some(msg) = validate_customer_id(&self.customer_id) {
            return Some(msg);
        }
        if self.quantity < 1 {
            return Some(format!(
                "Quantity must be a positive integer, got {}",
                self.quantity
            ));
        }
        if self.quantity > i64::from(u32::MAX) {
            return Some(format!("Quantity {} is too large", self.quantity));
        }
        if self.unit_price < Decimal::ZERO {
            return Some(format!(
                "Unit price cannot be negative, got {}",
                self.unit_price
            ));
        }
        None
    }
}

/// Identifies one line to remove from a cart
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveItemRequest {
    pub customer_id: String,
    pub store_id: i32,
    pub book_id: i32,
}

impl RemoveItemRequest {
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        validate_customer_id(&self.customer_id)
    }
}

/// Customer ids are opaque but must be present.
pub fn validate_customer_id(customer_id: &str) -> Option<String> {
    if customer_id.trim().is_empty() {
        return Some("Customer id cannot be empty".to_string());
    }
    None
}
