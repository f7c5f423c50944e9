//! Cart data model.
//!
//! Plain value records. All merge and removal rules live in
//! [`CartStore`](super::CartStore) so they can be tested in one place.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A customer's cart, grouped by the store each book is sold by.
///
/// A cart without store groups is a valid value and is distinct from a cart
/// that was never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub customer_id: String,
    /// Bumped on every conditional write; older payloads decode as 0.
    #[serde(default)]
    pub version: u64,
    #[serde(default)]
    pub stores: Vec<StoreGroup>,
}

/// The items of one cart bought from a single store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreGroup {
    pub store_id: i32,
    /// Display hint captured when the group was created
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_name: Option<String>,
    #[serde(default)]
    pub items: Vec<LineItem>,
}

/// One book and its requested quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub book_id: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Always at least 1
    pub quantity: u32,
    #[serde(with = "rust_decimal::serde::str")]
    pub unit_price: Decimal,
}

impl Cart {
    /// A fresh cart with no store groups.
    pub fn empty(customer_id: impl Into<String>) -> Self {
        Self {
            customer_id: customer_id.into(),
            version: 0,
            stores: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.stores.iter().all(|store| store.items.is_empty())
    }

    pub fn store(&self, store_id: i32) -> Option<&StoreGroup> {
        self.stores.iter().find(|store| store.store_id == store_id)
    }

    /// Total number of units across all stores.
    pub fn item_count(&self) -> u64 {
        self.stores
            .iter()
            .flat_map(|store| &store.items)
            .map(|item| u64::from(item.quantity))
            .sum()
    }

    /// Sum of `quantity * unit_price` over every line.
    pub fn subtotal(&self) -> Decimal {
        self.stores.iter().map(StoreGroup::subtotal).sum()
    }
}

impl StoreGroup {
    pub fn subtotal(&self) -> Decimal {
        self.items.iter().map(LineItem::line_total).sum()
    }
}

impl LineItem {
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}
