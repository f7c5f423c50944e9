//! Byte encoding of carts for the key-value store.

use std::collections::HashSet;

use thiserror::Error;

use super::Cart;

/// Encoding or decoding failure.
#[derive(Error, Debug)]
#[error("{0}")]
pub struct CodecError(pub String);

/// Converts carts to and from the bytes kept in the cache.
///
/// Implementations must round-trip every field exactly: absent optional
/// fields stay absent and prices keep their decimal representation.
pub trait CartCodec: Send + Sync {
    fn encode(&self, cart: &Cart) -> Result<Vec<u8>, CodecError>;
    fn decode(&self, bytes: &[u8]) -> Result<Cart, CodecError>;
}

/// JSON encoding with camelCase fields and string prices.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl CartCodec for JsonCodec {
    fn encode(&self, cart: &Cart) -> Result<Vec<u8>, CodecError> {
        serde_json::to_vec(cart).map_err(|e| CodecError(e.to_string()))
    }

    fn decode(&self, bytes: &[u8]) -> Result<Cart, CodecError> {
        let cart: Cart = serde_json::from_slice(bytes).map_err(|e| CodecError(e.to_string()))?;
        check_invariants(&cart)?;
        Ok(cart)
    }
}

/// Rejects carts no sequence of cart operations can produce: a repeated
/// store, a repeated book within a store, or a zero quantity.
pub fn check_invariants(cart: &Cart) -> Result<(), CodecError> {
    let mut stores = HashSet::new();
    for store in &cart.stores {
        if !stores.insert(store.store_id) {
            return Err(CodecError(format!("store {} appears twice", store.store_id)));
        }

        let mut books = HashSet::new();
        for item in &store.items {
            if !books.insert(item.book_id) {
                return Err(CodecError(format!(
                    "book {} appears twice in store {}",
                    item.book_id, store.store_id
                )));
            }
            if item.quantity == 0 {
                return Err(CodecError(format!(
                    "book {} in store {} has quantity 0",
                    item.book_id, store.store_id
                )));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::{LineItem, StoreGroup};

    #[test]
    fn test_decode_stored_payload() {
        let payload = br#"{
            "customerId": "u1",
            "version": 3,
            "stores": [{
                "storeId": 7,
                "storeName": "Harbor Books",
                "items": [{"bookId": 100, "quantity": 2, "unitPrice": "12.50"}]
            }]
        }"#;

        let cart = JsonCodec.decode(payload).unwrap();

        assert_eq!(cart.version, 3);
        let item = &cart.stores[0].items[0];
        assert_eq!(item.unit_price.to_string(), "12.50");
        assert!(item.title.is_none());
        assert!(item.image_url.is_none());
    }

    #[test]
    fn test_decode_without_version_defaults_to_zero() {
        let cart = JsonCodec
            .decode(br#"{"customerId":"u1","stores":[]}"#)
            .unwrap();
        assert_eq!(cart, Cart::empty("u1"));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(JsonCodec.decode(b"not json").is_err());
        assert!(JsonCodec.decode(br#"{"stores":[]}"#).is_err());
        assert!(JsonCodec
            .decode(br#"{"customerId":"u1","stores":[{"storeId":1,"items":[{"bookId":1,"quantity":1,"unitPrice":"abc"}]}]}"#)
            .is_err());
    }

    #[test]
    fn test_decode_rejects_zero_quantity() {
        let err = JsonCodec
            .decode(br#"{"customerId":"u1","stores":[{"storeId":1,"items":[{"bookId":1,"quantity":0,"unitPrice":"1.00"}]}]}"#)
            .unwrap_err();
        assert!(err.to_string().contains("quantity 0"));
    }

    #[test]
    fn test_decode_rejects_repeated_store() {
        let err = JsonCodec
            .decode(br#"{"customerId":"u1","stores":[{"storeId":1,"items":[]},{"storeId":1,"items":[]}]}"#)
            .unwrap_err();
        assert!(err.to_string().contains("store 1 appears twice"));
    }

    #[test]
    fn test_decode_rejects_repeated_book() {
        let payload = br#"{"customerId":"u1","stores":[{"storeId":1,"items":[
            {"bookId":5,"quantity":1,"unitPrice":"1.00"},
            {"bookId":5,"quantity":2,"unitPrice":"1.00"}
        ]}]}"#;
        let err = JsonCodec.decode(payload).unwrap_err();
        assert!(err.to_string().contains("book 5 appears twice"));
    }

    #[test]
    fn test_same_book_in_two_stores_is_valid() {
        let payload = br#"{"customerId":"u1","stores":[
            {"storeId":1,"items":[{"bookId":5,"quantity":1,"unitPrice":"1.00"}]},
            {"storeId":2,"items":[{"bookId":5,"quantity":1,"unitPrice":"1.00"}]}
        ]}"#;
        assert!(JsonCodec.decode(payload).is_ok());
    }

    #[test]
    fn test_price_scale_survives_roundtrip() {
        let mut cart = Cart::empty("u1");
        cart.stores.push(StoreGroup {
            store_id: 1,
            store_name: Some(String::new()),
            items: vec![LineItem {
                book_id: i32::MAX,
                title: Some("Dune".into()),
                image_url: None,
                quantity: u32::MAX,
                unit_price: "0.10".parse().unwrap(),
            }],
        });

        let decoded = JsonCodec.decode(&JsonCodec.encode(&cart).unwrap()).unwrap();

        assert_eq!(decoded, cart);
        let item = &decoded.stores[0].items[0];
        assert_eq!(item.unit_price.to_string(), "0.10");
        assert_eq!(decoded.stores[0].store_name.as_deref(), Some(""));
    }
}
