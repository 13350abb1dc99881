//! Typed value codec - conversion between the persisted string form
//! and the logical value implied by a parameter's type tag.
//!
//! Decoding is total: malformed input coerces to a best-effort value
//! and never fails the request, so it is safe on attacker-controlled
//! stored text. Encoding is likewise total and type-independent; the
//! type tag only governs how the stored string is read back.

use serde_json::Value;

use super::{ParameterType, ParameterValue};

/// Decodes a stored raw value according to the parameter's type tag.
///
/// - `json`: parsed with serde_json; parse failure or an absent value
///   decodes to `Null`.
/// - `boolean`: case-insensitive `true`, `1`, `yes`, `on` decode to
///   `true`; everything else, including an absent value, to `false`.
/// - `number`: the leading optional-sign integer prefix of the string
///   (`"42abc"` is 42, `"-7.5"` is -7); no digits or an absent value
///   decode to 0; out-of-range magnitudes saturate.
/// - `text`, `textarea`, `image`, `file`: the string unchanged, or
///   `Null` when absent.
pub fn decode(raw: Option<&str>, ty: ParameterType) -> ParameterValue {
    match ty {
        ParameterType::Json => match raw {
            Some(s) => serde_json::from_str(s)
                .map(ParameterValue::Json)
                .unwrap_or(ParameterValue::Null),
            None => ParameterValue::Null,
        },
        ParameterType::Boolean => ParameterValue::Bool(raw.is_some_and(is_truthy)),
        ParameterType::Number => ParameterValue::Number(leading_integer(raw.unwrap_or(""))),
        ParameterType::Text
        | ParameterType::Textarea
        | ParameterType::Image
        | ParameterType::File => match raw {
            Some(s) => ParameterValue::Text(s.to_string()),
            None => ParameterValue::Null,
        },
    }
}

/// Encodes a JSON request value into the persisted string form.
///
/// `null` encodes to `None`; strings pass through unchanged; arrays and
/// objects are serialized to JSON text so the stored value is always a
/// plain string; booleans and numbers take their canonical display form
/// (`"true"`, `"42"`).
pub fn encode(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Array(_) | Value::Object(_) => Some(value.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
    }
}

/// Permissive string-to-boolean coercion.
fn is_truthy(s: &str) -> bool {
    matches!(
        s.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}

/// Parses the leading optional-sign integer prefix, saturating on
/// overflow. Returns 0 when no digit prefix exists.
fn leading_integer(s: &str) -> i64 {
    let s = s.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let digits = &rest[..digits_end];
    if digits.is_empty() {
        return 0;
    }

    match digits.parse::<i64>() {
        Ok(n) if negative => -n,
        Ok(n) => n,
        Err(_) if negative => i64::MIN,
        Err(_) => i64::MAX,
    }
}
