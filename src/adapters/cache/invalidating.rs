//! InvalidatingParameterRepository - Wrapper tying cache invalidation to writes.
//!
//! This adapter wraps any `ParameterRepository` and clears the affected
//! cache entries after every successful mutation, so no write path can
//! leave the cache serving a value the database no longer holds.
//!
//! ## Usage
//!
//! ```ignore
//! let repository = InvalidatingParameterRepository::new(
//!     PostgresParameterRepository::new(pool),
//!     cache.clone(),
//! );
//!
//! let store = ParameterStore::new(Arc::new(repository), cache, ttl);
//! ```
//!
//! ## How It Works
//!
//! 1. Before a mutation: load the current row to learn its group tag
//! 2. Delegate the write to the inner repository
//! 3. After a successful write: invalidate `param:<key>`, `params:all`,
//!    and the group entries for both the old and the new group
//!
//! ## Error Handling
//!
//! - If the inner write fails, nothing is invalidated (the cache still
//!   matches the stored state)
//! - If invalidation fails after a successful write, every remaining key
//!   is still attempted, then the failure is logged and surfaced as a
//!   `CacheError`; the write itself is not rolled back

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::parameter::{NewParameter, Parameter, ParameterPatch};
use crate::ports::{CacheKey, ParameterCache, ParameterRepository};

/// Wrapper that invalidates cache entries on every successful write.
///
/// Reads pass straight through to the inner repository. Mutations made
/// through any path land here, so callers cannot opt out of
/// invalidation.
pub struct InvalidatingParameterRepository<R: ParameterRepository> {
    inner: R,
    cache: Arc<dyn ParameterCache>,
}

impl<R: ParameterRepository> InvalidatingParameterRepository<R> {
    /// Create a new InvalidatingParameterRepository wrapping the given
    /// repository.
    pub fn new(inner: R, cache: Arc<dyn ParameterCache>) -> Self {
        Self { inner, cache }
    }

    /// Cache keys affected by a write to the row with this key, moving
    /// from `old_group` to `new_group`.
    fn affected_keys(key: &str, old_group: Option<&str>, new_group: Option<&str>) -> Vec<CacheKey> {
        let mut keys = vec![CacheKey::single(key), CacheKey::All];
        if let Some(group) = old_group {
            keys.push(CacheKey::Group(group.to_string()));
        }
        if let Some(group) = new_group {
            if old_group != Some(group) {
                keys.push(CacheKey::Group(group.to_string()));
            }
        }
        keys
    }

    /// Invalidate every key, attempting all of them even when one
    /// fails. The first failure is surfaced after the loop.
    async fn invalidate_all(&self, keys: &[CacheKey]) -> Result<(), DomainError> {
        let mut first_failure = None;
        for key in keys {
            if let Err(e) = self.cache.invalidate(key).await {
                tracing::error!("Cache invalidation for '{}' failed: {}", key, e);
                if first_failure.is_none() {
                    first_failure = Some((key.clone(), e));
                }
            }
        }
        match first_failure {
            None => Ok(()),
            Some((key, e)) => Err(DomainError::new(
                ErrorCode::CacheError,
                format!("cache invalidation for '{}' failed: {}", key, e),
            )),
        }
    }
}

#[async_trait]
impl<R: ParameterRepository + 'static> ParameterRepository
    for InvalidatingParameterRepository<R>
{
    async fn find_by_key(&self, key: &str) -> Result<Option<Parameter>, DomainError> {
        self.inner.find_by_key(key).await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Parameter>, DomainError> {
        self.inner.find_by_id(id).await
    }

    async fn find_all(&self) -> Result<Vec<Parameter>, DomainError> {
        self.inner.find_all().await
    }

    async fn find_by_group(&self, group: &str) -> Result<Vec<Parameter>, DomainError> {
        self.inner.find_by_group(group).await
    }

    async fn upsert(&self, entry: &NewParameter) -> Result<Parameter, DomainError> {
        // The upsert may move the row to another group; the old group's
        // map entry must be cleared too
        let old_group = self
            .inner
            .find_by_key(&entry.key)
            .await?
            .and_then(|row| row.group);

        let row = self.inner.upsert(entry).await?;

        let keys = Self::affected_keys(&row.key, old_group.as_deref(), row.group.as_deref());
        self.invalidate_all(&keys).await?;

        Ok(row)
    }

    async fn update(&self, id: i64, patch: &ParameterPatch) -> Result<Parameter, DomainError> {
        let old_group = self
            .inner
            .find_by_id(id)
            .await?
            .and_then(|row| row.group);

        let row = self.inner.update(id, patch).await?;

        let keys = Self::affected_keys(&row.key, old_group.as_deref(), row.group.as_deref());
        self.invalidate_all(&keys).await?;

        Ok(row)
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        let existing = self.inner.find_by_id(id).await?;

        let deleted = self.inner.delete(id).await?;

        if let Some(row) = existing {
            let keys = Self::affected_keys(&row.key, row.group.as_deref(), None);
            self.invalidate_all(&keys).await?;
        }

        Ok(deleted)
    }
}
