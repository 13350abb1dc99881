//! HTTP DTOs for machine endpoints.
//!
//! The update body distinguishes "field absent" from "field set to
//! null": nullable columns are cleared by sending an explicit null,
//! while leaving the field out keeps the stored value. The
//! double-Option deserializer below carries that distinction through
//! serde.

use serde::{Deserialize, Deserializer, Serialize};

use crate::adapters::http::response::FieldErrors;
use crate::domain::foundation::Timestamp;
use crate::domain::machine::{
    BranchRef, CategoryRef, ChargeRef, MachineDetails, MachinePatch, NewMachine,
};

/// Deserializes a field so that an absent key stays `None` (via
/// `#[serde(default)]`) while a present key, null included, becomes
/// `Some(..)`.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Body of `POST /api/machines`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMachineRequest {
    pub branch_id: Option<i64>,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub machine_type: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub charge_ids: Option<Vec<i64>>,
    pub category_ids: Option<Vec<i64>>,
}

impl CreateMachineRequest {
    /// Field-level checks: `branch_id`, `name` and `type` required,
    /// `name`/`type` at most 255 characters, urls http(s) and at most
    /// 500. Referential checks stay in the handler where the
    /// repository is available. Returns the insert form only when this
    /// request added no messages.
    pub fn validate(self, errors: &mut FieldErrors) -> Option<NewMachine> {
        let before = errors.len();

        let branch_id = self.branch_id.unwrap_or_else(|| {
            errors.add("branch_id", "The branch_id field is required.");
            0
        });
        let name = validate_required_name(&self.name, "name", errors);
        let machine_type = validate_required_name(&self.machine_type, "type", errors);
        validate_url(self.image_url.as_deref(), "image_url", errors);
        validate_url(self.video_url.as_deref(), "video_url", errors);

        if errors.len() > before {
            return None;
        }

        Some(NewMachine {
            branch_id,
            name,
            machine_type,
            description: self.description,
            image_url: self.image_url,
            video_url: self.video_url,
            charge_ids: self.charge_ids.unwrap_or_default(),
            category_ids: self.category_ids.unwrap_or_default(),
        })
    }
}

/// Body of `PUT /api/machines/:id`.
///
/// Every field is optional; a present null clears nullable columns and
/// fails validation on required ones. Present `charge_ids` or
/// `category_ids` (null meaning the empty set) replace the whole
/// association set.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateMachineRequest {
    #[serde(default, deserialize_with = "double_option")]
    pub branch_id: Option<Option<i64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub name: Option<Option<String>>,
    #[serde(rename = "type", default, deserialize_with = "double_option")]
    pub machine_type: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub image_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub video_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub charge_ids: Option<Option<Vec<i64>>>,
    #[serde(default, deserialize_with = "double_option")]
    pub category_ids: Option<Option<Vec<i64>>>,
}

impl UpdateMachineRequest {
    /// Same field limits as the create body, applied only to present
    /// fields. Returns the repository patch only when this request
    /// added no messages.
    pub fn validate(self, errors: &mut FieldErrors) -> Option<MachinePatch> {
        let before = errors.len();

        let branch_id = match self.branch_id {
            None => None,
            Some(None) => {
                errors.add("branch_id", "The branch_id field is required.");
                None
            }
            Some(Some(id)) => Some(id),
        };
        let name = validate_patched_name(self.name, "name", errors);
        let machine_type = validate_patched_name(self.machine_type, "type", errors);
        if let Some(inner) = &self.image_url {
            validate_url(inner.as_deref(), "image_url", errors);
        }
        if let Some(inner) = &self.video_url {
            validate_url(inner.as_deref(), "video_url", errors);
        }

        if errors.len() > before {
            return None;
        }

        Some(MachinePatch {
            branch_id,
            name,
            machine_type,
            description: self.description,
            image_url: self.image_url,
            video_url: self.video_url,
            charge_ids: self.charge_ids.map(Option::unwrap_or_default),
            category_ids: self.category_ids.map(Option::unwrap_or_default),
        })
    }
}

/// Body of `POST /api/machines/:id/charges/sync`.
#[derive(Debug, Clone, Deserialize)]
pub struct SyncChargesRequest {
    pub charge_ids: Option<Vec<i64>>,
}

// ════════════════════════════════════════════════════════════════════════════
// Validation helpers
// ════════════════════════════════════════════════════════════════════════════

fn validate_required_name(
    value: &Option<String>,
    field: &str,
    errors: &mut FieldErrors,
) -> String {
    match value.as_deref().map(str::trim) {
        None | Some("") => {
            errors.add(field, format!("The {} field is required.", field));
            String::new()
        }
        Some(s) if s.len() > 255 => {
            errors.add(
                field,
                format!("The {} field must not be greater than 255 characters.", field),
            );
            String::new()
        }
        Some(s) => s.to_string(),
    }
}

fn validate_patched_name(
    value: Option<Option<String>>,
    field: &str,
    errors: &mut FieldErrors,
) -> Option<String> {
    match value {
        None => None,
        Some(inner) => Some(validate_required_name(&inner, field, errors)),
    }
}

fn validate_url(value: Option<&str>, field: &str, errors: &mut FieldErrors) {
    if let Some(url) = value {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            errors.add(field, format!("The {} field must be a valid URL.", field));
        } else if url.len() > 500 {
            errors.add(
                field,
                format!("The {} field must not be greater than 500 characters.", field),
            );
        }
    }
}

/// Adds one message per missing association id, keyed by its position
/// in the submitted array.
pub fn add_missing_id_errors(
    errors: &mut FieldErrors,
    field: &str,
    submitted: &[i64],
    missing: &[i64],
) {
    for id in missing {
        if let Some(index) = submitted.iter().position(|v| v == id) {
            let key = format!("{}.{}", field, index);
            errors.add(key.clone(), format!("The selected {} is invalid.", key));
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// A machine with its loaded relations.
#[derive(Debug, Clone, Serialize)]
pub struct MachineResponse {
    pub id: i64,
    pub branch_id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub machine_type: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub branch: Option<BranchRef>,
    pub charges: Vec<ChargeRef>,
    pub categories: Vec<CategoryRef>,
}

impl From<MachineDetails> for MachineResponse {
    fn from(details: MachineDetails) -> Self {
        let machine = details.machine;
        Self {
            id: machine.id,
            branch_id: machine.branch_id,
            name: machine.name,
            machine_type: machine.machine_type,
            description: machine.description,
            image_url: machine.image_url,
            video_url: machine.video_url,
            created_at: machine.created_at,
            updated_at: machine.updated_at,
            branch: details.branch,
            charges: details.charges,
            categories: details.categories,
        }
    }
}
