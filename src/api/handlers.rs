//! API Handlers
//!
//! HTTP request handlers for each cart endpoint. Each one decodes a command
//! and delegates to the shared [`CartStore`].

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};

use crate::cart::CartStore;
use crate::error::{CartError, Result};
use crate::models::{AddItemRequest, CartResponse, HealthResponse, RemoveItemRequest};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Cart store over the shared cache connection
    pub carts: Arc<CartStore>,
}

impl AppState {
    /// Creates a new AppState with the given cart store.
    pub fn new(carts: CartStore) -> Self {
        Self {
            carts: Arc::new(carts),
        }
    }
}

/// Handler for GET /cart/:customer_id
pub async fn get_cart_handler(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
) -> Result<Json<CartResponse>> {
    let cart = state.carts.fetch(&customer_id).await?;
    Ok(Json(cart.into()))
}

/// Handler for POST /cart/items
///
/// A body that does not decode (missing identifier, wrong type, bad JSON)
/// is a validation failure like any other.
pub async fn add_item_handler(
    State(state): State<AppState>,
    body: std::result::Result<Json<AddItemRequest>, JsonRejection>,
) -> Result<Json<CartResponse>> {
    let Json(req) = body.map_err(|rejection| CartError::Validation(rejection.body_text()))?;
    let cart = state.carts.add_item(&req).await?;
    Ok(Json(cart.into()))
}

/// Handler for DELETE /cart/:customer_id/stores/:store_id/items/:book_id
pub async fn remove_item_handler(
    State(state): State<AppState>,
    Path((customer_id, store_id, book_id)): Path<(String, i32, i32)>,
) -> Result<Json<CartResponse>> {
    let req = RemoveItemRequest {
        customer_id,
        store_id,
        book_id,
    };
    let cart = state.carts.remove_item(&req).await?;
    Ok(Json(cart.into()))
}

/// Handler for DELETE /cart/:customer_id
pub async fn clear_cart_handler(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
) -> Result<StatusCode> {
    state.carts.clear(&customer_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let connected = state.carts.is_connected().await;
    Json(HealthResponse::from_probe(connected))
}
