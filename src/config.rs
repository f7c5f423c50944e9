//! Configuration Module
//!
//! Handles loading and managing service configuration from environment variables.

use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

/// Which key-value backend holds the carts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheBackend {
    /// In-process store, lost on restart
    Memory,
    /// External Redis server
    Redis,
}

impl FromStr for CacheBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(CacheBackend::Memory),
            "redis" => Ok(CacheBackend::Redis),
            other => Err(format!("unknown cache backend '{}'", other)),
        }
    }
}

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Backend holding the carts
    pub backend: CacheBackend,
    /// Redis connection URL, used when `backend` is Redis
    pub redis_url: String,
    /// Cart TTL in seconds, refreshed on every write
    pub cart_ttl: u64,
    /// Namespace prefix prepended to customer ids
    pub key_prefix: String,
    /// Upper bound for a single cache round-trip, in milliseconds
    pub cache_timeout_ms: u64,
    /// Extra attempts after a concurrent modification is detected
    pub max_retries: u32,
    /// Maximum number of carts the memory backend holds
    pub max_entries: usize,
    /// Memory backend expiry sweep interval in seconds
    pub cleanup_interval: u64,
}

/// A configuration variable that is set but cannot be parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid value '{value}' for {name}: {reason}")]
pub struct ConfigError {
    pub name: String,
    pub value: String,
    pub reason: String,
}

/// Parses `name` through `lookup`, falling back to `default` only when the
/// variable is unset.
fn parse_var<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match lookup(name) {
        None => Ok(default),
        Some(value) => {
            let parsed = value.trim().parse::<T>();
            parsed.map_err(|e| ConfigError {
                name: name.to_string(),
                value,
                reason: e.to_string(),
            })
        }
    }
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// Unset variables take their default. A variable that is set to an
    /// unparsable value is an error rather than silently defaulted.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CACHE_BACKEND` - `memory` or `redis` (default: memory)
    /// - `REDIS_URL` - Redis URL (default: redis://127.0.0.1:6379)
    /// - `CART_TTL` - Cart TTL in seconds (default: 60)
    /// - `CART_KEY_PREFIX` - Cache key prefix (default: cart)
    /// - `CACHE_TIMEOUT_MS` - Per-operation timeout (default: 3000)
    /// - `CART_MAX_RETRIES` - Retries on concurrent modification (default: 3)
    /// - `MAX_ENTRIES` - Memory backend capacity (default: 10000)
    /// - `CLEANUP_INTERVAL` - Memory backend sweep in seconds (default: 1)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a Config from any variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            server_port: parse_var(&lookup, "SERVER_PORT", defaults.server_port)?,
            backend: parse_var(&lookup, "CACHE_BACKEND", defaults.backend)?,
            redis_url: lookup("REDIS_URL").unwrap_or(defaults.redis_url),
            cart_ttl: parse_var(&lookup, "CART_TTL", defaults.cart_ttl)?,
            key_prefix: lookup("CART_KEY_PREFIX").unwrap_or(defaults.key_prefix),
            cache_timeout_ms: parse_var(&lookup, "CACHE_TIMEOUT_MS", defaults.cache_timeout_ms)?,
            max_retries: parse_var(&lookup, "CART_MAX_RETRIES", defaults.max_retries)?,
            max_entries: parse_var(&lookup, "MAX_ENTRIES", defaults.max_entries)?,
            cleanup_interval: parse_var(&lookup, "CLEANUP_INTERVAL", defaults.cleanup_interval)?,
        })
    }

    /// Cart TTL as a Duration.
    pub fn cart_ttl(&self) -> Duration {
        Duration::from_secs(self.cart_ttl)
    }

    /// Cache operation timeout as a Duration.
    pub fn cache_timeout(&self) -> Duration {
        Duration::from_millis(self.cache_timeout_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            backend: CacheBackend::Memory,
            redis_url: "redis://127.0.0.1:6379".to_string(),
            cart_ttl: 60,
            key_prefix: "cart".to_string(),
            cache_timeout_ms: 3000,
            max_retries: 3,
            max_entries: 10_000,
            cleanup_interval: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.backend, CacheBackend::Memory);
        assert_eq!(config.cart_ttl(), Duration::from_secs(60));
        assert_eq!(config.key_prefix, "cart");
        assert_eq!(config.cache_timeout(), Duration::from_secs(3));
        assert_eq!(config.max_retries, 3);
    }

    fn lookup_from<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |name| {
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| value.to_string())
        }
    }

    #[test]
    fn test_config_unset_vars_take_defaults() {
        let config = Config::from_lookup(|_| None).unwrap();
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.backend, CacheBackend::Memory);
        assert_eq!(config.cart_ttl, 60);
        assert_eq!(config.key_prefix, "cart");
    }

    #[test]
    fn test_config_reads_vars() {
        let vars = [
            ("CACHE_BACKEND", "redis"),
            ("CART_TTL", "120"),
            ("CART_KEY_PREFIX", "shop:cart:"),
        ];
        let config = Config::from_lookup(lookup_from(&vars)).unwrap();
        assert_eq!(config.backend, CacheBackend::Redis);
        assert_eq!(config.cart_ttl, 120);
        assert_eq!(config.key_prefix, "shop:cart:");
    }

    #[test]
    fn test_config_rejects_unknown_backend() {
        let vars = [("CACHE_BACKEND", "reddis")];
        let err = Config::from_lookup(lookup_from(&vars)).unwrap_err();
        assert_eq!(err.name, "CACHE_BACKEND");
        assert_eq!(err.value, "reddis");
        assert!(err.to_string().contains("unknown cache backend"));
    }

    #[test]
    fn test_config_rejects_bad_number() {
        let vars = [("CART_TTL", "sixty")];
        let err = Config::from_lookup(lookup_from(&vars)).unwrap_err();
        assert_eq!(err.name, "CART_TTL");
    }

    #[test]
    fn test_backend_parse() {
        assert_eq!("Redis".parse::<CacheBackend>(), Ok(CacheBackend::Redis));
        assert_eq!(" memory ".parse::<CacheBackend>(), Ok(CacheBackend::Memory));
        assert!("memcached".parse::<CacheBackend>().is_err());
    }
}
