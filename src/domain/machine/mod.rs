//! Machine domain - gym equipment tied to a branch, with many-to-many
//! charge and category associations.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;

/// A piece of gym equipment as stored.
#[derive(Debug, Clone, PartialEq)]
pub struct Machine {
    pub id: i64,
    pub branch_id: i64,
    pub name: String,
    pub machine_type: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A machine together with its loaded relations.
///
/// `branch` is `None` only when the owning branch row has been removed
/// out from under the machine; listings tolerate that instead of
/// failing the whole response.
#[derive(Debug, Clone, PartialEq)]
pub struct MachineDetails {
    pub machine: Machine,
    pub branch: Option<BranchRef>,
    pub charges: Vec<ChargeRef>,
    pub categories: Vec<CategoryRef>,
}

/// Branch reference as embedded in machine responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchRef {
    pub id: i64,
    pub name: String,
}

/// Charge (billing line) reference as embedded in machine responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChargeRef {
    pub id: i64,
    pub label: String,
}

/// Category reference as embedded in machine responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRef {
    pub id: i64,
    pub name: String,
}

/// Full field set for creating a machine.
///
/// Association ids are attached in the same transaction as the insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMachine {
    pub branch_id: i64,
    pub name: String,
    pub machine_type: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub charge_ids: Vec<i64>,
    pub category_ids: Vec<i64>,
}

/// Partial field set for updating a machine.
///
/// `None` scalar fields retain the stored value; a present
/// `charge_ids`/`category_ids` replaces the whole association set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MachinePatch {
    pub branch_id: Option<i64>,
    pub name: Option<String>,
    pub machine_type: Option<String>,
    pub description: Option<Option<String>>,
    pub image_url: Option<Option<String>>,
    pub video_url: Option<Option<String>>,
    pub charge_ids: Option<Vec<i64>>,
    pub category_ids: Option<Vec<i64>>,
}
