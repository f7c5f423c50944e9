//! Redis [`KeyValueCache`] backend.
//!
//! Uses a `ConnectionManager`, which reconnects transparently and is cheap to
//! clone per call. Compare-and-set runs as a Lua script so the read and the
//! conditional write happen atomically on the server.

use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;
use tracing::debug;

use super::KeyValueCache;
use crate::error::{CacheError, CacheResult};

/// KEYS[1] = key, ARGV = [has_expected, expected, value, ttl_seconds]
const COMPARE_AND_SET: &str = r"
local current = redis.call('GET', KEYS[1])
if ARGV[1] == '0' then
  if current then return 0 end
elseif current ~= ARGV[2] then
  return 0
end
redis.call('SET', KEYS[1], ARGV[3], 'EX', ARGV[4])
return 1
";

/// Redis cache backend using connection manager for pooling.
pub struct RedisCache {
    conn: redis::aio::ConnectionManager,
    cas_script: redis::Script,
}

impl RedisCache {
    /// Connects to Redis, giving up after `connect_timeout`.
    ///
    /// # Arguments
    ///
    /// * `url` - Redis connection URL (e.g., "redis://localhost:6379")
    /// * `connect_timeout` - Upper bound for establishing the connection
    pub async fn connect(url: &str, connect_timeout: Duration) -> CacheResult<Self> {
        let client = redis::Client::open(url).map_err(map_redis_error)?;
        let conn = tokio::time::timeout(
            connect_timeout,
            redis::aio::ConnectionManager::new(client),
        )
        .await
        .map_err(|_| CacheError::Timeout(connect_timeout.as_millis() as u64))?
        .map_err(map_redis_error)?;

        debug!(url, "Connected to Redis");
        Ok(Self {
            conn,
            cas_script: redis::Script::new(COMPARE_AND_SET),
        })
    }
}

/// Redis expiries have second granularity; never round down to "no TTL".
fn ttl_seconds(ttl: Duration) -> u64 {
    ttl.as_secs().max(1)
}

/// Maps Redis errors to CacheError.
fn map_redis_error(err: redis::RedisError) -> CacheError {
    if err.is_connection_refusal() || err.is_timeout() || err.is_connection_dropped() {
        CacheError::ConnectionFailed(err.to_string())
    } else {
        CacheError::OperationFailed(err.to_string())
    }
}

#[async_trait]
impl KeyValueCache for RedisCache {
    async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
        let mut conn = self.conn.clone();
        let value: Option<Vec<u8>> = conn.get(key).await.map_err(map_redis_error)?;
        Ok(value)
    }

    async fn set_with_expiry(&self, key: &str, value: &[u8], ttl: Duration) -> CacheResult<()> {
        let mut conn = self.conn.clone();
        conn.set_ex::<_, _, ()>(key, value, ttl_seconds(ttl))
            .await
            .map_err(map_redis_error)
    }

    async fn compare_and_set(
        &self,
        key: &str,
        expected: Option<&[u8]>,
        value: &[u8],
        ttl: Duration,
    ) -> CacheResult<bool> {
        let mut conn = self.conn.clone();
        let has_expected = if expected.is_some() { "1" } else { "0" };
        let swapped: i64 = self
            .cas_script
            .key(key)
            .arg(has_expected)
            .arg(expected.unwrap_or_default())
            .arg(value)
            .arg(ttl_seconds(ttl))
            .invoke_async(&mut conn)
            .await
            .map_err(map_redis_error)?;
        Ok(swapped == 1)
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(key).await.map_err(map_redis_error)
    }

    async fn is_connected(&self) -> bool {
        let mut conn = self.conn.clone();
        let pong: redis::RedisResult<String> = redis::cmd("PING").query_async(&mut conn).await;
        pong.is_ok()
    }
}
