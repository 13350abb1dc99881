//! Decoded parameter values.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The logical value of a parameter after decoding its stored string.
///
/// Serializes to the natural JSON form: `Null` becomes `null`, `Text`
/// a string, `Bool` a boolean, `Number` an integer, and `Json` the
/// parsed document itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    Null,
    Bool(bool),
    Number(i64),
    Text(String),
    Json(Value),
}

impl ParameterValue {
    /// Converts into a plain `serde_json::Value`.
    pub fn into_json(self) -> Value {
        match self {
            ParameterValue::Null => Value::Null,
            ParameterValue::Bool(b) => Value::Bool(b),
            ParameterValue::Number(n) => Value::from(n),
            ParameterValue::Text(s) => Value::String(s),
            ParameterValue::Json(v) => v,
        }
    }

    /// Returns true for the `Null` variant.
    pub fn is_null(&self) -> bool {
        matches!(self, ParameterValue::Null)
    }
}

impl From<&str> for ParameterValue {
    fn from(s: &str) -> Self {
        ParameterValue::Text(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_to_natural_json_forms() {
        assert_eq!(serde_json::to_value(ParameterValue::Null).unwrap(), json!(null));
        assert_eq!(serde_json::to_value(ParameterValue::Bool(true)).unwrap(), json!(true));
        assert_eq!(serde_json::to_value(ParameterValue::Number(42)).unwrap(), json!(42));
        assert_eq!(
            serde_json::to_value(ParameterValue::Text("Acme Gym".into())).unwrap(),
            json!("Acme Gym")
        );
        assert_eq!(
            serde_json::to_value(ParameterValue::Json(json!({"a": [1, 2]}))).unwrap(),
            json!({"a": [1, 2]})
        );
    }

    #[test]
    fn deserializes_scalars_back() {
        let v: ParameterValue = serde_json::from_str("null").unwrap();
        assert_eq!(v, ParameterValue::Null);

        let v: ParameterValue = serde_json::from_str("false").unwrap();
        assert_eq!(v, ParameterValue::Bool(false));

        let v: ParameterValue = serde_json::from_str("-7").unwrap();
        assert_eq!(v, ParameterValue::Number(-7));

        let v: ParameterValue = serde_json::from_str("\"hello\"").unwrap();
        assert_eq!(v, ParameterValue::Text("hello".into()));
    }

    #[test]
    fn deserializes_composites_as_json_variant() {
        let v: ParameterValue = serde_json::from_str(r#"{"k": 1}"#).unwrap();
        assert_eq!(v, ParameterValue::Json(json!({"k": 1})));

        let v: ParameterValue = serde_json::from_str("[1, 2, 3]").unwrap();
        assert_eq!(v, ParameterValue::Json(json!([1, 2, 3])));
    }

    #[test]
    fn into_json_matches_serialization() {
        let values = [
            ParameterValue::Null,
            ParameterValue::Bool(true),
            ParameterValue::Number(9),
            ParameterValue::Text("x".into()),
            ParameterValue::Json(json!([null, "y"])),
        ];
        for v in values {
            let serialized = serde_json::to_value(&v).unwrap();
            assert_eq!(v.into_json(), serialized);
        }
    }
}
