//! Machine repository port.
//!
//! Machines own two many-to-many association sets (charges and
//! categories) plus a branch foreign key. Mutations touching the row
//! and its associations must be atomic; implementations wrap them in
//! one storage transaction.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::machine::{MachineDetails, MachinePatch, NewMachine};

/// Repository port for Machine persistence.
#[async_trait]
pub trait MachineRepository: Send + Sync {
    /// List every machine with branch, charges, and categories loaded.
    async fn find_all(&self) -> Result<Vec<MachineDetails>, DomainError>;

    /// Find one machine with relations. Returns `None` if not found.
    async fn find_by_id(&self, id: i64) -> Result<Option<MachineDetails>, DomainError>;

    /// List machines belonging to a branch, with relations loaded.
    async fn find_by_branch(&self, branch_id: i64) -> Result<Vec<MachineDetails>, DomainError>;

    /// Insert the machine and attach its association sets in one
    /// transaction. Rolls everything back on any failure.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn create(&self, machine: &NewMachine) -> Result<MachineDetails, DomainError>;

    /// Apply a partial update; when the patch carries association ids,
    /// replace the whole set. Row and association writes share one
    /// transaction.
    ///
    /// # Errors
    ///
    /// - `MachineNotFound` if no row has this id
    /// - `DatabaseError` on persistence failure
    async fn update(&self, id: i64, patch: &MachinePatch) -> Result<MachineDetails, DomainError>;

    /// Detach both association sets and delete the row in one
    /// transaction. Returns whether a row existed.
    async fn delete(&self, id: i64) -> Result<bool, DomainError>;

    /// Replace the machine's charge set with exactly `charge_ids`.
    ///
    /// # Errors
    ///
    /// - `MachineNotFound` if no row has this id
    async fn sync_charges(
        &self,
        id: i64,
        charge_ids: &[i64],
    ) -> Result<MachineDetails, DomainError>;

    /// Attach one charge. Idempotent: attaching an already-attached
    /// charge is a no-op.
    ///
    /// # Errors
    ///
    /// - `MachineNotFound` / `ChargeNotFound` on absent rows
    async fn attach_charge(&self, id: i64, charge_id: i64) -> Result<MachineDetails, DomainError>;

    /// Detach one charge, if attached.
    ///
    /// # Errors
    ///
    /// - `MachineNotFound` / `ChargeNotFound` on absent rows
    async fn detach_charge(&self, id: i64, charge_id: i64) -> Result<MachineDetails, DomainError>;

    /// Whether a branch row exists. Used to reject bad `branch_id`
    /// before any write happens.
    async fn branch_exists(&self, branch_id: i64) -> Result<bool, DomainError>;

    /// Subset of `charge_ids` with no matching charge row, in input
    /// order. Empty means every id exists.
    async fn missing_charges(&self, charge_ids: &[i64]) -> Result<Vec<i64>, DomainError>;

    /// Subset of `category_ids` with no matching category row.
    async fn missing_categories(&self, category_ids: &[i64]) -> Result<Vec<i64>, DomainError>;
}
