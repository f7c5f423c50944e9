//! Customer id to cache key mapping.

/// Builds cache keys as `prefix + customer_id`.
///
/// No delimiter or escaping is applied, so callers must keep customer ids
/// free of values that would collide under plain concatenation.
///
/// Any non-empty id maps to a key, `items` included, even though the HTTP
/// surface cannot address that customer (see [`crate::api::routes`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartKeys {
    prefix: String,
}

impl CartKeys {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn key(&self, customer_id: &str) -> String {
        format!("{}{}", self.prefix, customer_id)
    }
}

impl Default for CartKeys {
    fn default() -> Self {
        Self::new("cart")
    }
}
