//! Cart Cache - session-scoped shopping carts over a key-value cache
//!
//! Carts group line items by store, live under a per-customer key and
//! expire after a fixed idle period.

pub mod api;
pub mod cache;
pub mod cart;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cart::CartStore;
pub use config::Config;
pub use error::{CacheError, CartError};
pub use tasks::spawn_cleanup_task;
