//! Background Tasks Module
//!
//! - Expiry sweep: purges expired carts from the in-process cache

mod cleanup;

pub use cleanup::spawn_cleanup_task;
