//! Cart Module
//!
//! The cart aggregate and the store that keeps it in a TTL key-value cache.

mod codec;
mod keys;
mod model;
mod store;


pub use codec::{check_invariants, CartCodec, CodecError, JsonCodec};
pub use keys::CartKeys;
pub use model::{Cart, LineItem, StoreGroup};
pub use store::CartStore;
