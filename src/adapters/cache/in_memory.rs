//! In-memory parameter cache for testing and single-server deployments.
//!
//! Stores entries in a HashMap behind a tokio RwLock and checks TTLs
//! lazily on read. Not suitable for multi-server deployments, where
//! instances would each hold a stale copy after a write elsewhere.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::ports::{CacheEntry, CacheError, CacheKey, ParameterCache};

/// In-memory parameter cache.
///
/// Expired entries are dropped lazily when a read encounters them, so
/// the map never outgrows the set of keys written within one TTL
/// window. Every operation is infallible.
#[derive(Debug, Default)]
pub struct InMemoryParameterCache {
    /// Entries keyed by their storage key string.
    entries: Arc<RwLock<HashMap<String, StoredEntry>>>,
}

/// One cached entry together with its expiry deadline.
#[derive(Debug, Clone)]
struct StoredEntry {
    entry: CacheEntry,
    expires_at: Instant,
}

impl InMemoryParameterCache {
    /// Create an empty in-memory cache.
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl ParameterCache for InMemoryParameterCache {
    async fn get(&self, key: &CacheKey) -> Result<Option<CacheEntry>, CacheError> {
        let storage_key = key.to_storage_key();
        let mut entries = self.entries.write().await;

        match entries.get(&storage_key) {
            Some(stored) if stored.expires_at > Instant::now() => Ok(Some(stored.entry.clone())),
            Some(_) => {
                // Expired
                entries.remove(&storage_key);
                Ok(None)
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
        let stored = StoredEntry {
            entry: entry.clone(),
            expires_at: Instant::now() + ttl,
        };
        self.entries
            .write()
            .await
            .insert(key.to_storage_key(), stored);
        Ok(())
    }

    async fn invalidate(&self, key: &CacheKey) -> Result<(), CacheError> {
        self.entries.write().await.remove(&key.to_storage_key());
        Ok(())
    }
}
