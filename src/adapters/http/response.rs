//! Shared JSON envelope for API responses.
//!
//! Every endpoint replies in the same shape. Successes carry
//! `{"success": true, "data": ..}` with a `message` on mutations.
//! Failures carry `{"success": false, "message": ..}`, or
//! `{"success": false, "errors": {field: [msgs]}}` for validation
//! failures.

use std::collections::BTreeMap;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::StorageError;

// ════════════════════════════════════════════════════════════════════════════
// Envelope types
// ════════════════════════════════════════════════════════════════════════════

/// Success envelope.
#[derive(Debug, Clone, Serialize)]
pub struct ApiSuccess<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiSuccess<T> {
    /// Data-only success, for reads.
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    /// Data plus confirmation message, for mutations.
    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: Some(data),
        }
    }
}

impl ApiSuccess<()> {
    /// Message-only success, for mutations with nothing to return.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: None,
        }
    }
}

/// Failure envelope.
#[derive(Debug, Clone, Serialize)]
pub struct ApiFailure {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

impl ApiFailure {
    /// Failure with a client-facing message.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            errors: None,
        }
    }

    /// Validation failure carrying the field map.
    pub fn validation(errors: FieldErrors) -> Self {
        Self {
            success: false,
            message: None,
            errors: Some(errors),
        }
    }
}

/// Field-keyed validation messages for 422 responses.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message under the given field key.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Total number of messages across all fields.
    pub fn len(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Response builders
// ════════════════════════════════════════════════════════════════════════════

/// 404 with a resource message.
pub fn not_found(message: impl Into<String>) -> Response {
    (StatusCode::NOT_FOUND, Json(ApiFailure::message(message))).into_response()
}

/// 422 carrying the field map.
pub fn validation_failed(errors: FieldErrors) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ApiFailure::validation(errors)),
    )
        .into_response()
}

/// 400 for requests the extractors could not make sense of.
pub fn bad_request(message: impl Into<String>) -> Response {
    (StatusCode::BAD_REQUEST, Json(ApiFailure::message(message))).into_response()
}

/// Maps a domain error onto the failure envelope.
///
/// Not-found codes become 404 with the error's own message and
/// validation failures become 422 with a single-field map. Everything
/// else is logged and becomes a 500 with `context` as the client-facing
/// message; the underlying cause never reaches the wire.
pub fn domain_error_response(error: DomainError, context: &str) -> Response {
    if error.code.is_not_found() {
        return not_found(error.message);
    }

    match error.code {
        ErrorCode::ValidationFailed => {
            let field = error
                .details
                .get("field")
                .cloned()
                .unwrap_or_else(|| "value".to_string());
            let mut errors = FieldErrors::new();
            errors.add(field, error.message);
            validation_failed(errors)
        }
        _ => {
            tracing::error!("{}: {}", context, error);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiFailure::message(context)),
            )
                .into_response()
        }
    }
}

/// Client-facing message for an upload rejected on `field`.
pub fn upload_rejection_message(field: &str, error: &StorageError) -> String {
    match error {
        StorageError::UnsupportedType { extension } if extension.is_empty() => {
            format!("The {} field must have a file extension.", field)
        }
        StorageError::UnsupportedType { extension } => {
            format!("The {} field does not allow .{} files.", field, extension)
        }
        StorageError::TooLarge { max_bytes, .. } => format!(
            "The {} field must not be greater than {} kilobytes.",
            field,
            max_bytes / 1024
        ),
        StorageError::Io { message } => message.clone(),
    }
}

/// Maps a storage error for an uploaded `field`.
///
/// Rejected files (bad extension, oversized) become a 422 on the field;
/// IO failures are logged and become a 500 with `context` as the
/// message.
pub fn storage_error_response(error: StorageError, field: &str, context: &str) -> Response {
    match &error {
        StorageError::UnsupportedType { .. } | StorageError::TooLarge { .. } => {
            let mut errors = FieldErrors::new();
            errors.add(field, upload_rejection_message(field, &error));
            validation_failed(errors)
        }
        StorageError::Io { .. } => {
            tracing::error!("{}: {}", context, error);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiFailure::message(context)),
            )
                .into_response()
        }
    }
}
