//! API Module
//!
//! HTTP surface over the cart store.
//!
//! # Endpoints
//! - `GET /cart/:customer_id` - Fetch a cart
//! - `POST /cart/items` - Add a book
//! - `DELETE /cart/:customer_id/stores/:store_id/items/:book_id` - Remove a line
//! - `DELETE /cart/:customer_id` - Clear a cart
//! - `GET /health` - Health check

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
