//! Parameter repository port.
//!
//! Defines the contract for durable storage of configuration
//! parameters keyed by their unique `cle`. Implementations handle the
//! actual database operations.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::parameter::{NewParameter, Parameter, ParameterPatch};

/// Repository port for Parameter persistence.
///
/// Implementations must enforce key uniqueness at the storage layer
/// and provide an atomic insert-or-update-by-key primitive, so two
/// concurrent upserts on one key never produce duplicate rows.
#[async_trait]
pub trait ParameterRepository: Send + Sync {
    /// Find a parameter by its unique key. Returns `None` if not found.
    async fn find_by_key(&self, key: &str) -> Result<Option<Parameter>, DomainError>;

    /// Find a parameter by its surrogate id. Returns `None` if not found.
    async fn find_by_id(&self, id: i64) -> Result<Option<Parameter>, DomainError>;

    /// List every parameter, unfiltered.
    async fn find_all(&self) -> Result<Vec<Parameter>, DomainError>;

    /// List parameters carrying the given group tag.
    async fn find_by_group(&self, group: &str) -> Result<Vec<Parameter>, DomainError>;

    /// Insert the parameter, or replace all non-key fields of the
    /// existing row with the same key. Returns the resulting row.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn upsert(&self, entry: &NewParameter) -> Result<Parameter, DomainError>;

    /// Apply a partial update to the row with the given id. Fields the
    /// patch leaves out retain their stored values.
    ///
    /// # Errors
    ///
    /// - `ParameterNotFound` if no row has this id
    /// - `DatabaseError` on persistence failure
    async fn update(&self, id: i64, patch: &ParameterPatch) -> Result<Parameter, DomainError>;

    /// Delete the row with the given id. Returns whether a row existed.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn delete(&self, id: i64) -> Result<bool, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Trait object safety test
    #[test]
    fn parameter_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn ParameterRepository) {}
    }
}
