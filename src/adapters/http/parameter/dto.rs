//! HTTP DTOs for parameter endpoints.
//!
//! Wire field names stay French (`cle`, `valeur`, `type`, `groupe`,
//! `description`), matching the stored schema; the DTOs translate
//! between that surface and the domain types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::adapters::http::response::FieldErrors;
use crate::domain::foundation::Timestamp;
use crate::domain::parameter::{codec, Parameter, ParameterPatch, ParameterType};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Body of `POST /api/parametres`, and of each bulk entry.
#[derive(Debug, Clone, Deserialize)]
pub struct UpsertParameterRequest {
    pub cle: Option<String>,
    #[serde(default)]
    pub valeur: Value,
    #[serde(rename = "type")]
    pub value_type: Option<String>,
    pub groupe: Option<String>,
    pub description: Option<String>,
}

/// An upsert request that passed validation.
#[derive(Debug, Clone)]
pub struct ValidatedUpsert {
    pub key: String,
    pub value: Value,
    pub value_type: ParameterType,
    pub group: Option<String>,
    pub description: Option<String>,
}

impl UpsertParameterRequest {
    /// Applies the request limits: `cle` required and at most 255
    /// characters, `groupe` at most 255, `description` at most 500,
    /// `type` one of the known parameter types (defaulting to text).
    ///
    /// Messages accumulate in `errors` with their field keys prefixed
    /// by `prefix` (empty for the single endpoint, `parametres.N.` for
    /// bulk entries). Returns the validated form only when this request
    /// added no messages.
    pub fn validate(self, prefix: &str, errors: &mut FieldErrors) -> Option<ValidatedUpsert> {
        let before = errors.len();

        let key = self.cle.as_deref().map(str::trim).unwrap_or("").to_string();
        if key.is_empty() {
            errors.add(
                format!("{}cle", prefix),
                "The cle field is required.",
            );
        } else if key.len() > 255 {
            errors.add(
                format!("{}cle", prefix),
                "The cle field must not be greater than 255 characters.",
            );
        }

        let value_type = match self.value_type.as_deref() {
            None => ParameterType::Text,
            Some(s) => s.parse().unwrap_or_else(|_| {
                errors.add(format!("{}type", prefix), "The selected type is invalid.");
                ParameterType::Text
            }),
        };

        if self.groupe.as_deref().is_some_and(|g| g.len() > 255) {
            errors.add(
                format!("{}groupe", prefix),
                "The groupe field must not be greater than 255 characters.",
            );
        }
        if self.description.as_deref().is_some_and(|d| d.len() > 500) {
            errors.add(
                format!("{}description", prefix),
                "The description field must not be greater than 500 characters.",
            );
        }

        if errors.len() > before {
            return None;
        }

        Some(ValidatedUpsert {
            key,
            value: self.valeur,
            value_type,
            group: self.groupe,
            description: self.description,
        })
    }
}

/// Body of `PUT /api/parametres/:id`.
///
/// Absent fields keep their stored values; `valeur` is re-encoded
/// through the codec when present.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateParameterRequest {
    pub valeur: Option<Value>,
    #[serde(rename = "type")]
    pub value_type: Option<String>,
    pub groupe: Option<String>,
    pub description: Option<String>,
}

impl UpdateParameterRequest {
    /// Same limits as the upsert body, minus the key. Returns the
    /// repository patch only when no messages were added.
    pub fn validate(self, errors: &mut FieldErrors) -> Option<ParameterPatch> {
        let before = errors.len();

        let value_type = match self.value_type.as_deref() {
            None => None,
            Some(s) => match s.parse::<ParameterType>() {
                Ok(t) => Some(t),
                Err(_) => {
                    errors.add("type", "The selected type is invalid.");
                    None
                }
            },
        };

        if self.groupe.as_deref().is_some_and(|g| g.len() > 255) {
            errors.add(
                "groupe",
                "The groupe field must not be greater than 255 characters.",
            );
        }
        if self.description.as_deref().is_some_and(|d| d.len() > 500) {
            errors.add(
                "description",
                "The description field must not be greater than 500 characters.",
            );
        }

        if errors.len() > before {
            return None;
        }

        Some(ParameterPatch {
            raw_value: self.valeur.as_ref().and_then(codec::encode),
            value_type,
            group: self.groupe,
            description: self.description,
        })
    }
}

/// Body of `POST /api/parametres/bulk`.
#[derive(Debug, Clone, Deserialize)]
pub struct BulkUpsertRequest {
    #[serde(default)]
    pub parametres: Vec<UpsertParameterRequest>,
}

/// Query string of the listing endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GroupQuery {
    pub groupe: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// A parameter row as stored, with the raw string value.
#[derive(Debug, Clone, Serialize)]
pub struct ParameterResponse {
    pub id: i64,
    pub cle: String,
    pub valeur: Option<String>,
    #[serde(rename = "type")]
    pub value_type: String,
    pub groupe: Option<String>,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<Parameter> for ParameterResponse {
    fn from(parameter: Parameter) -> Self {
        Self {
            id: parameter.id,
            cle: parameter.key,
            valeur: parameter.raw_value,
            value_type: parameter.value_type.as_str().to_string(),
            groupe: parameter.group,
            description: parameter.description,
            created_at: parameter.created_at,
            updated_at: parameter.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn upsert_request(json: Value) -> UpsertParameterRequest {
        serde_json::from_value(json).unwrap()
    }

    // ───────────────────────────────────────────────────────────────
    // Upsert validation
    // ───────────────────────────────────────────────────────────────

    #[test]
    fn valid_upsert_passes_with_defaulted_type() {
        let req = upsert_request(json!({"cle": "site_name", "valeur": "Acme Gym"}));

        let mut errors = FieldErrors::new();
        let valid = req.validate("", &mut errors).unwrap();

        assert!(errors.is_empty());
        assert_eq!(valid.key, "site_name");
        assert_eq!(valid.value, json!("Acme Gym"));
        assert_eq!(valid.value_type, ParameterType::Text);
    }

    #[test]
    fn missing_cle_is_rejected() {
        let req = upsert_request(json!({"valeur": 1}));

        let mut errors = FieldErrors::new();
        assert!(req.validate("", &mut errors).is_none());
        assert_eq!(
            serde_json::to_value(&errors).unwrap(),
            json!({"cle": ["The cle field is required."]})
        );
    }

    #[test]
    fn blank_cle_is_rejected() {
        let req = upsert_request(json!({"cle": "   "}));

        let mut errors = FieldErrors::new();
        assert!(req.validate("", &mut errors).is_none());
        assert!(!errors.is_empty());
    }

    #[test]
    fn unknown_type_is_rejected() {
        let req = upsert_request(json!({"cle": "k", "type": "banana"}));

        let mut errors = FieldErrors::new();
        assert!(req.validate("", &mut errors).is_none());
        assert_eq!(
            serde_json::to_value(&errors).unwrap(),
            json!({"type": ["The selected type is invalid."]})
        );
    }

    #[test]
    fn over_length_fields_are_rejected_together() {
        let req = upsert_request(json!({
            "cle": "x".repeat(256),
            "groupe": "g".repeat(256),
            "description": "d".repeat(501)
        }));

        let mut errors = FieldErrors::new();
        assert!(req.validate("", &mut errors).is_none());
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn bulk_prefix_lands_in_the_field_keys() {
        let req = upsert_request(json!({"valeur": null}));

        let mut errors = FieldErrors::new();
        assert!(req.validate("parametres.2.", &mut errors).is_none());
        assert_eq!(
            serde_json::to_value(&errors).unwrap(),
            json!({"parametres.2.cle": ["The cle field is required."]})
        );
    }

    #[test]
    fn absent_valeur_defaults_to_null() {
        let req = upsert_request(json!({"cle": "k"}));
        assert_eq!(req.valeur, Value::Null);
    }

    // ───────────────────────────────────────────────────────────────
    // Update validation
    // ───────────────────────────────────────────────────────────────

    #[test]
    fn update_encodes_valeur_through_the_codec() {
        let req: UpdateParameterRequest =
            serde_json::from_value(json!({"valeur": true, "type": "boolean"})).unwrap();

        let mut errors = FieldErrors::new();
        let patch = req.validate(&mut errors).unwrap();

        assert_eq!(patch.raw_value.as_deref(), Some("true"));
        assert_eq!(patch.value_type, Some(ParameterType::Boolean));
        assert!(patch.group.is_none());
    }

    #[test]
    fn update_with_no_fields_yields_an_empty_patch() {
        let req: UpdateParameterRequest = serde_json::from_value(json!({})).unwrap();

        let mut errors = FieldErrors::new();
        let patch = req.validate(&mut errors).unwrap();

        assert!(patch.is_empty());
    }

    #[test]
    fn update_rejects_unknown_type() {
        let req: UpdateParameterRequest =
            serde_json::from_value(json!({"type": "watermelon"})).unwrap();

        let mut errors = FieldErrors::new();
        assert!(req.validate(&mut errors).is_none());
    }

    // ───────────────────────────────────────────────────────────────
    // Response shape
    // ───────────────────────────────────────────────────────────────

    #[test]
    fn response_uses_the_french_wire_names() {
        let parameter = Parameter {
            id: 3,
            key: "site_name".to_string(),
            raw_value: Some("Acme Gym".to_string()),
            value_type: ParameterType::Text,
            group: Some("general".to_string()),
            description: None,
            created_at: Timestamp::now(),
            updated_at: Timestamp::now(),
        };

        let value = serde_json::to_value(ParameterResponse::from(parameter)).unwrap();
        assert_eq!(value["cle"], "site_name");
        assert_eq!(value["valeur"], "Acme Gym");
        assert_eq!(value["type"], "text");
        assert_eq!(value["groupe"], "general");
        assert_eq!(value["description"], Value::Null);
    }
}
