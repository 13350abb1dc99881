//! ParameterStore - read-through cached access to configuration
//! parameters.
//!
//! Reads go through the cache: a hit returns the cached decoded value,
//! a miss fetches the row, decodes it, and populates the cache with
//! the configured TTL. Absent rows are cached as an explicit missing
//! sentinel so the caller's fallback default is applied per call and
//! never stored. Writes flow to the repository; the wired repository
//! is the invalidating decorator, so every successful mutation clears
//! the affected cache entries before the call returns.
//!
//! The cache is never the source of truth. When it fails on the read
//! path the store logs a warning and falls back to the repository.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use crate::domain::foundation::DomainError;
use crate::domain::parameter::{codec, NewParameter, Parameter, ParameterPatch, ParameterType, ParameterValue};
use crate::ports::{CacheEntry, CacheKey, ParameterCache, ParameterRepository};

/// One entry of a bulk write.
#[derive(Debug, Clone)]
pub struct BulkParameter {
    pub key: String,
    pub value: Value,
    pub value_type: ParameterType,
    pub group: Option<String>,
    pub description: Option<String>,
}

/// Cached parameter access for the public read path plus raw-row
/// operations for the admin endpoints.
pub struct ParameterStore {
    repository: Arc<dyn ParameterRepository>,
    cache: Arc<dyn ParameterCache>,
    ttl: Duration,
}

impl ParameterStore {
    pub fn new(
        repository: Arc<dyn ParameterRepository>,
        cache: Arc<dyn ParameterCache>,
        ttl: Duration,
    ) -> Self {
        Self {
            repository,
            cache,
            ttl,
        }
    }

    /// Returns the decoded value of `key`, or `default` when no row
    /// exists. Never creates a row.
    pub async fn get(
        &self,
        key: &str,
        default: ParameterValue,
    ) -> Result<ParameterValue, DomainError> {
        let cache_key = CacheKey::single(key);

        match self.cache.get(&cache_key).await {
            Ok(Some(CacheEntry::Value(value))) => return Ok(value),
            Ok(Some(CacheEntry::Missing)) => return Ok(default),
            Ok(Some(CacheEntry::Map(_))) => {
                tracing::warn!("Map entry cached under '{}', refetching", cache_key);
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!("Cache read for '{}' failed, using repository: {}", cache_key, e);
            }
        }

        match self.repository.find_by_key(key).await? {
            Some(parameter) => {
                let value = codec::decode(parameter.raw_value.as_deref(), parameter.value_type);
                self.populate(&cache_key, &CacheEntry::Value(value.clone())).await;
                Ok(value)
            }
            None => {
                self.populate(&cache_key, &CacheEntry::Missing).await;
                Ok(default)
            }
        }
    }

    /// Returns the key-to-decoded-value map for one group, or for the
    /// whole table when `group` is absent.
    pub async fn get_by_group(
        &self,
        group: Option<&str>,
    ) -> Result<BTreeMap<String, ParameterValue>, DomainError> {
        let cache_key = CacheKey::group_or_all(group);

        match self.cache.get(&cache_key).await {
            Ok(Some(CacheEntry::Map(map))) => return Ok(map),
            Ok(Some(_)) => {
                tracing::warn!("Non-map entry cached under '{}', refetching", cache_key);
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!("Cache read for '{}' failed, using repository: {}", cache_key, e);
            }
        }

        let rows = match group {
            Some(g) => self.repository.find_by_group(g).await?,
            None => self.repository.find_all().await?,
        };

        // Key uniqueness is repository-enforced, so no collisions here.
        let map: BTreeMap<String, ParameterValue> = rows
            .into_iter()
            .map(|p| {
                let value = codec::decode(p.raw_value.as_deref(), p.value_type);
                (p.key, value)
            })
            .collect();

        self.populate(&cache_key, &CacheEntry::Map(map.clone())).await;
        Ok(map)
    }

    /// Encodes `value` and upserts the parameter by key. All non-key
    /// fields of an existing row are replaced.
    pub async fn set(
        &self,
        key: &str,
        value: &Value,
        value_type: ParameterType,
        group: Option<String>,
        description: Option<String>,
    ) -> Result<Parameter, DomainError> {
        let entry = NewParameter {
            key: key.to_string(),
            raw_value: codec::encode(value),
            value_type,
            group,
            description,
        };
        self.repository.upsert(&entry).await
    }

    /// Applies `set` to each entry in order. Stops at the first
    /// failure; already-written entries stay written.
    pub async fn set_many(&self, entries: &[BulkParameter]) -> Result<usize, DomainError> {
        for entry in entries {
            self.set(
                &entry.key,
                &entry.value,
                entry.value_type,
                entry.group.clone(),
                entry.description.clone(),
            )
            .await?;
        }
        Ok(entries.len())
    }

    /// Lists raw rows, optionally filtered by group. Uncached.
    pub async fn list(&self, group: Option<&str>) -> Result<Vec<Parameter>, DomainError> {
        match group {
            Some(g) => self.repository.find_by_group(g).await,
            None => self.repository.find_all().await,
        }
    }

    /// Finds one raw row by key. Uncached.
    pub async fn find_by_key(&self, key: &str) -> Result<Option<Parameter>, DomainError> {
        self.repository.find_by_key(key).await
    }

    /// Finds one raw row by id. Uncached.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Parameter>, DomainError> {
        self.repository.find_by_id(id).await
    }

    /// Partially updates the row with the given id.
    pub async fn update(&self, id: i64, patch: &ParameterPatch) -> Result<Parameter, DomainError> {
        self.repository.update(id, patch).await
    }

    /// Deletes the row with the given id. Returns whether one existed.
    pub async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        self.repository.delete(id).await
    }

    async fn populate(&self, key: &CacheKey, entry: &CacheEntry) {
        if let Err(e) = self.cache.put(key, entry, self.ttl).await {
            tracing::warn!("Cache populate for '{}' failed: {}", key, e);
        }
    }
}
