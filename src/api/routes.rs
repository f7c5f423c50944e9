//! API Routes
//!
//! Configures the Axum router with all cart endpoints.
//!
//! `/cart/items` is a static segment and wins over `/cart/:customer_id`, so
//! a customer whose id is literally `items` cannot be fetched or cleared
//! over HTTP (GET and DELETE answer 405). Ids are opaque to the cart store,
//! which still accepts that id.

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    add_item_handler, clear_cart_handler, get_cart_handler, health_handler, remove_item_handler,
    AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /cart/:customer_id` - Fetch a cart (empty if none stored)
/// - `POST /cart/items` - Add a book to a cart
/// - `DELETE /cart/:customer_id/stores/:store_id/items/:book_id` - Remove a line
/// - `DELETE /cart/:customer_id` - Clear a cart
/// - `GET /health` - Health check including cache connectivity
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/cart/items", post(add_item_handler))
        .route(
            "/cart/:customer_id",
            get(get_cart_handler).delete(clear_cart_handler),
        )
        .route(
            "/cart/:customer_id/stores/:store_id/items/:book_id",
            delete(remove_item_handler),
        )
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
