//! Redis-backed parameter cache for multi-instance deployments.
//!
//! Entries are stored as JSON strings under their storage key with a
//! SETEX expiry, so every instance sees the same cache generation and
//! an invalidation on one instance is visible to all.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use std::time::Duration;

use crate::ports::{CacheEntry, CacheError, CacheKey, ParameterCache};

/// Redis-backed parameter cache.
///
/// A read that finds undecodable JSON reports `CacheError::Corrupt`
/// rather than treating it as a miss; the read-through path falls back
/// to the repository and the next populate overwrites the bad entry.
#[derive(Clone)]
pub struct RedisParameterCache {
    conn: MultiplexedConnection,
}

impl RedisParameterCache {
    /// Create a new Redis parameter cache.
    pub fn new(conn: MultiplexedConnection) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl ParameterCache for RedisParameterCache {
    async fn get(&self, key: &CacheKey) -> Result<Option<CacheEntry>, CacheError> {
        let storage_key = key.to_storage_key();
        let mut conn = self.conn.clone();

        let raw: Option<String> = conn
            .get(&storage_key)
            .await
            .map_err(|e: redis::RedisError| CacheError::unavailable(e.to_string()))?;

        match raw {
            Some(json) => {
                let entry = serde_json::from_str(&json)
                    .map_err(|e| CacheError::corrupt(key, e.to_string()))?;
                Ok(Some(entry))
            }
            None => Ok(None),
        }
    }

    async fn put(
        &self,
        key: &CacheKey,
        entry: &CacheEntry,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        let storage_key = key.to_storage_key();
        let json = serde_json::to_string(entry)
            .map_err(|e| CacheError::unavailable(format!("encode cache entry: {}", e)))?;

        // SETEX rejects a zero expiry
        let ttl_secs = ttl.as_secs().max(1);

        let mut conn = self.conn.clone();
        conn.set_ex::<_, _, ()>(&storage_key, json, ttl_secs)
            .await
            .map_err(|e: redis::RedisError| CacheError::unavailable(e.to_string()))?;

        Ok(())
    }

    async fn invalidate(&self, key: &CacheKey) -> Result<(), CacheError> {
        let storage_key = key.to_storage_key();
        let mut conn = self.conn.clone();

        conn.del::<_, ()>(&storage_key)
            .await
            .map_err(|e: redis::RedisError| CacheError::unavailable(e.to_string()))?;

        Ok(())
    }
}

impl std::fmt::Debug for RedisParameterCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisParameterCache").finish_non_exhaustive()
    }
}
