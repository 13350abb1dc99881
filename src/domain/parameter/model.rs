//! Parameter entity and its type tag.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{Timestamp, ValidationError};

/// Type tag governing how a stored parameter value is decoded.
///
/// The tag set is closed; any other string on the wire is a validation
/// error and is rejected before persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ParameterType {
    #[default]
    Text,
    Textarea,
    Image,
    File,
    Json,
    Boolean,
    Number,
}

impl ParameterType {
    /// All accepted wire values, in declaration order.
    pub const ALL: [ParameterType; 7] = [
        ParameterType::Text,
        ParameterType::Textarea,
        ParameterType::Image,
        ParameterType::File,
        ParameterType::Json,
        ParameterType::Boolean,
        ParameterType::Number,
    ];

    /// Returns the wire/storage representation of this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterType::Text => "text",
            ParameterType::Textarea => "textarea",
            ParameterType::Image => "image",
            ParameterType::File => "file",
            ParameterType::Json => "json",
            ParameterType::Boolean => "boolean",
            ParameterType::Number => "number",
        }
    }
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ParameterType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(ParameterType::Text),
            "textarea" => Ok(ParameterType::Textarea),
            "image" => Ok(ParameterType::Image),
            "file" => Ok(ParameterType::File),
            "json" => Ok(ParameterType::Json),
            "boolean" => Ok(ParameterType::Boolean),
            "number" => Ok(ParameterType::Number),
            other => Err(ValidationError::invalid(
                "type",
                format!(
                    "'{}' is not one of text, textarea, image, file, json, boolean, number",
                    other
                ),
            )),
        }
    }
}

/// A persisted configuration parameter.
///
/// `key` is globally unique and immutable once created. `raw_value` is
/// the persisted textual form; decoding it according to `value_type`
/// is the codec's job, never the entity's.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub id: i64,
    pub key: String,
    pub raw_value: Option<String>,
    pub value_type: ParameterType,
    pub group: Option<String>,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Full field set for an upsert-by-key.
///
/// Upsert always writes every field: on conflict with an existing key
/// the row's value, type, group, and description are all replaced.
#[derive(Debug, Clone, PartialEq)]
pub struct NewParameter {
    pub key: String,
    pub raw_value: Option<String>,
    pub value_type: ParameterType,
    pub group: Option<String>,
    pub description: Option<String>,
}

/// Partial field set for an update-by-id.
///
/// `None` fields retain the stored value; clearing a stored field back
/// to null goes through an upsert, which always writes every field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterPatch {
    pub raw_value: Option<String>,
    pub value_type: Option<ParameterType>,
    pub group: Option<String>,
    pub description: Option<String>,
}

impl ParameterPatch {
    /// Whether this patch changes anything at all.
    pub fn is_empty(&self) -> bool {
        self.raw_value.is_none()
            && self.value_type.is_none()
            && self.group.is_none()
            && self.description.is_none()
    }
}
