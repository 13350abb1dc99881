//! Parameter cache port.
//!
//! This port defines the interface for the read-through cache sitting
//! in front of the parameter repository. Implementations can use
//! in-memory storage for single-instance deployments and testing, or
//! Redis when instances must share one cache.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use crate::domain::parameter::ParameterValue;

/// Port for cached parameter reads and explicit invalidation.
///
/// The cache is never the source of truth; repository state remains
/// authoritative and entries expire after their TTL regardless of
/// invalidation traffic.
#[async_trait]
pub trait ParameterCache: Send + Sync {
    /// Look up an entry. `None` means a cache miss, never "key absent
    /// in the repository"; that state is cached as [`CacheEntry::Missing`].
    async fn get(&self, key: &CacheKey) -> Result<Option<CacheEntry>, CacheError>;

    /// Store an entry under the key for at most `ttl`.
    async fn put(&self, key: &CacheKey, entry: &CacheEntry, ttl: Duration) -> Result<(), CacheError>;

    /// Drop the entry for the key, if any. Idempotent.
    async fn invalidate(&self, key: &CacheKey) -> Result<(), CacheError>;
}

/// Key identifying one cached view of the parameter table.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub enum CacheKey {
    /// Decoded value of a single parameter.
    Single(String),
    /// Key-to-value map over every parameter.
    All,
    /// Key-to-value map restricted to one group.
    Group(String),
}

impl CacheKey {
    /// Creates a single-parameter key.
    pub fn single(key: impl Into<String>) -> Self {
        CacheKey::Single(key.into())
    }

    /// Creates a group key, or the all-parameters key when `group` is
    /// absent (callers treat "no group" as "all parameters").
    pub fn group_or_all(group: Option<&str>) -> Self {
        match group {
            Some(g) => CacheKey::Group(g.to_string()),
            None => CacheKey::All,
        }
    }

    /// Returns the storage key string for this cache key.
    pub fn to_storage_key(&self) -> String {
        match self {
            CacheKey::Single(key) => format!("param:{}", key),
            CacheKey::All => "params:all".to_string(),
            CacheKey::Group(group) => format!("params:group:{}", group),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_storage_key())
    }
}

/// A cached value, JSON-serialized by shared-cache backends.
///
/// `Missing` records that the repository has no row for the key, so
/// repeated reads of an absent parameter do not hammer the database.
/// The caller's fallback default is applied outside the cache and is
/// never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum CacheEntry {
    Missing,
    Value(ParameterValue),
    Map(BTreeMap<String, ParameterValue>),
}

/// Errors that can occur during cache operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// Cache backend is unreachable or refused the operation.
    #[error("cache backend unavailable: {0}")]
    Unavailable(String),

    /// A stored entry could not be decoded.
    #[error("corrupt cache entry for '{key}': {reason}")]
    Corrupt { key: String, reason: String },
}

impl CacheError {
    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        CacheError::Unavailable(message.into())
    }

    /// Creates a corrupt entry error.
    pub fn corrupt(key: &CacheKey, reason: impl Into<String>) -> Self {
        CacheError::Corrupt {
            key: key.to_storage_key(),
            reason: reason.into(),
        }
    }
}
