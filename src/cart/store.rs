//! Cart Store Module
//!
//! Load, mutate and save carts against a [`KeyValueCache`].
//!
//! Mutations are optimistic: the raw bytes read at the start of an attempt
//! are handed back to the cache as the expected value of a compare-and-set.
//! If another writer replaced the cart in between, the attempt is discarded
//! and re-run from a fresh read.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::{Cart, CartCodec, CartKeys, JsonCodec, LineItem, StoreGroup};
use crate::cache::KeyValueCache;
use crate::config::Config;
use crate::error::{CacheError, CacheResult, CartError, Result};
use crate::models::requests::{validate_customer_id, AddItemRequest, RemoveItemRequest};

// == Cart Store ==
/// Owns all cart state held in the key-value cache.
///
/// Cheap to share behind an `Arc`; holds no in-process lock.
pub struct CartStore {
    cache: Arc<dyn KeyValueCache>,
    codec: Arc<dyn CartCodec>,
    keys: CartKeys,
    ttl: Duration,
    op_timeout: Duration,
    max_retries: u32,
}

impl CartStore {
    // == Constructors ==
    /// Creates a store with default TTL, timeout and retry settings.
    pub fn new(cache: Arc<dyn KeyValueCache>) -> Self {
        Self::from_config(cache, &Config::default())
    }

    /// Creates a store using the cart settings from `config`.
    pub fn from_config(cache: Arc<dyn KeyValueCache>, config: &Config) -> Self {
        Self {
            cache,
            codec: Arc::new(JsonCodec),
            keys: CartKeys::new(config.key_prefix.clone()),
            ttl: config.cart_ttl(),
            op_timeout: config.cache_timeout(),
            max_retries: config.max_retries,
        }
    }

    pub fn with_codec(mut self, codec: Arc<dyn CartCodec>) -> Self {
        self.codec = codec;
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_timeout(mut self, op_timeout: Duration) -> Self {
        self.op_timeout = op_timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn keys(&self) -> &CartKeys {
        &self.keys
    }

    // == Fetch ==
    /// Returns the stored cart, or a fresh empty one if none is stored.
    ///
    /// A miss is not written back. Undecodable bytes are reported as
    /// [`CartError::CorruptData`], never replaced by an empty cart.
    pub async fn fetch(&self, customer_id: &str) -> Result<Cart> {
        check_customer_id(customer_id)?;
        let key = self.keys.key(customer_id);
        let raw = self.timed(self.cache.get(&key)).await?;
        self.decode_or_empty(&key, customer_id, raw.as_deref())
    }

    // == Add Item ==
    /// Adds a book to the cart, merging quantities with an existing line.
    pub async fn add_item(&self, req: &AddItemRequest) -> Result<Cart> {
        if let Some(msg) = req.validate() {
            return Err(CartError::Validation(msg));
        }

        let cart = self
            .mutate(&req.customer_id, |cart| merge_item(cart, req))
            .await?;
        info!(
            customer_id = %req.customer_id,
            store_id = req.store_id,
            book_id = req.book_id,
            quantity = req.quantity,
            "Item added to cart"
        );
        Ok(cart)
    }

    // == Remove Item ==
    /// Deletes one line from the cart.
    ///
    /// A store group left without items is kept in the cart.
    pub async fn remove_item(&self, req: &RemoveItemRequest) -> Result<Cart> {
        if let Some(msg) = req.validate() {
            return Err(CartError::Validation(msg));
        }

        let cart = self
            .mutate(&req.customer_id, |cart| remove_line(cart, req))
            .await?;
        info!(
            customer_id = %req.customer_id,
            store_id = req.store_id,
            book_id = req.book_id,
            "Item removed from cart"
        );
        Ok(cart)
    }

    // == Clear ==
    /// Deletes the stored cart. Succeeds when nothing is stored.
    pub async fn clear(&self, customer_id: &str) -> Result<()> {
        check_customer_id(customer_id)?;
        let key = self.keys.key(customer_id);
        self.timed(self.cache.delete(&key)).await?;
        info!(customer_id, "Cart cleared");
        Ok(())
    }

    // == Save ==
    /// Unconditionally stores `cart` with a fresh TTL.
    pub async fn save(&self, cart: &Cart) -> Result<()> {
        check_customer_id(&cart.customer_id)?;
        let key = self.keys.key(&cart.customer_id);
        let encoded = self.encode(cart)?;
        self.timed(self.cache.set_with_expiry(&key, &encoded, self.ttl))
            .await?;
        debug!(key, bytes = encoded.len(), "Cart saved");
        Ok(())
    }

    /// Whether the backing cache answers.
    pub async fn is_connected(&self) -> bool {
        tokio::time::timeout(self.op_timeout, self.cache.is_connected())
            .await
            .unwrap_or(false)
    }

    /// Read-modify-write with compare-and-set, retried on concurrent change.
    async fn mutate<F>(&self, customer_id: &str, apply: F) -> Result<Cart>
    where
        F: Fn(Cart) -> Result<Cart> + Send,
    {
        let key = self.keys.key(customer_id);
        let mut attempts = 0;

        loop {
            attempts += 1;
            let raw = self.timed(self.cache.get(&key)).await?;
            let current = self.decode_or_empty(&key, customer_id, raw.as_deref())?;

            let mut updated = apply(current)?;
            updated.version += 1;
            let encoded = self.encode(&updated)?;

            let stored = self
                .timed(
                    self.cache
                        .compare_and_set(&key, raw.as_deref(), &encoded, self.ttl),
                )
                .await?;
            if stored {
                debug!(key, attempts, version = updated.version, "Cart updated");
                return Ok(updated);
            }

            if attempts > self.max_retries {
                warn!(key, attempts, "Giving up on cart update after repeated conflicts");
                return Err(CartError::Conflict {
                    customer_id: customer_id.to_string(),
                    attempts,
                });
            }
            debug!(key, attempts, "Cart changed concurrently, retrying");
        }
    }

    fn decode_or_empty(&self, key: &str, customer_id: &str, raw: Option<&[u8]>) -> Result<Cart> {
        match raw {
            None | Some([]) => Ok(Cart::empty(customer_id)),
            Some(bytes) => self.codec.decode(bytes).map_err(|e| {
                warn!(key, error = %e, "Stored cart could not be decoded");
                CartError::CorruptData {
                    key: key.to_string(),
                    reason: e.to_string(),
                }
            }),
        }
    }

    fn encode(&self, cart: &Cart) -> Result<Vec<u8>> {
        self.codec
            .encode(cart)
            .map_err(|e| CartError::Internal(format!("failed to encode cart: {}", e)))
    }

    /// Bounds a cache round-trip by the configured timeout.
    async fn timed<T>(&self, op: impl Future<Output = CacheResult<T>>) -> Result<T> {
        match tokio::time::timeout(self.op_timeout, op).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(CacheError::Timeout(self.op_timeout.as_millis() as u64).into()),
        }
    }
}

fn check_customer_id(customer_id: &str) -> Result<()> {
    match validate_customer_id(customer_id) {
        Some(msg) => Err(CartError::Validation(msg)),
        None => Ok(()),
    }
}

// == Cart Algebra ==
/// Adds the requested quantity to the matching line, creating the store
/// group and line as needed. An existing line keeps its price and display
/// fields.
pub(super) fn merge_item(mut cart: Cart, req: &AddItemRequest) -> Result<Cart> {
    let quantity = u32::try_from(req.quantity)
        .map_err(|_| CartError::Validation(format!("Quantity {} out of range", req.quantity)))?;

    let position = match cart.stores.iter().position(|s| s.store_id == req.store_id) {
        Some(position) => position,
        None => {
            cart.stores.push(StoreGroup {
                store_id: req.store_id,
                store_name: req.store_name.clone(),
                items: Vec::new(),
            });
            cart.stores.len() - 1
        }
    };
    let store = &mut cart.stores[position];

    match store.items.iter_mut().find(|item| item.book_id == req.book_id) {
        Some(item) => {
            item.quantity = item.quantity.checked_add(quantity).ok_or_else(|| {
                CartError::Validation(format!(
                    "Quantity of book {} would exceed {}",
                    req.book_id,
                    u32::MAX
                ))
            })?;
        }
        None => store.items.push(LineItem {
            book_id: req.book_id,
            title: req.title.clone(),
            image_url: req.image_url.clone(),
            quantity,
            unit_price: req.unit_price,
        }),
    }

    Ok(cart)
}

/// Deletes the addressed line. Missing store or line is `NotFound`.
pub(super) fn remove_line(mut cart: Cart, req: &RemoveItemRequest) -> Result<Cart> {
    let not_found = |book_id| CartError::NotFound {
        customer_id: req.customer_id.clone(),
        store_id: req.store_id,
        book_id,
    };

    let store = cart
        .stores
        .iter_mut()
        .find(|s| s.store_id == req.store_id)
        .ok_or_else(|| not_found(None))?;
    let position = store
        .items
        .iter()
        .position(|item| item.book_id == req.book_id)
        .ok_or_else(|| not_found(Some(req.book_id)))?;
    store.items.remove(position);

    Ok(cart)
}
