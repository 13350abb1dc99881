//! Error types for the domain layer.

use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use thiserror::Error;

/// Errors that occur during request field validation.
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    #[error("Field '{field}' is required")]
    Required { field: String },

    #[error("Field '{field}' must be at most {max} characters, got {actual}")]
    TooLong {
        field: String,
        max: usize,
        actual: usize,
    },

    #[error("Field '{field}' is invalid: {reason}")]
    Invalid { field: String, reason: String },
}

impl ValidationError {
    /// Creates a missing required field error.
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required { field: field.into() }
    }

    /// Creates an over-length field error.
    pub fn too_long(field: impl Into<String>, max: usize, actual: usize) -> Self {
        ValidationError::TooLong {
            field: field.into(),
            max,
            actual,
        }
    }

    /// Creates an invalid value error.
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::Invalid {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Returns the name of the offending field.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field } => field,
            ValidationError::TooLong { field, .. } => field,
            ValidationError::Invalid { field, .. } => field,
        }
    }
}

/// Error codes organized by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Validation errors
    ValidationFailed,

    // Not found errors
    ParameterNotFound,
    MachineNotFound,
    VideoNotFound,
    BranchNotFound,
    CoachNotFound,
    ChargeNotFound,
    CategoryNotFound,

    // Infrastructure errors
    DatabaseError,
    CacheError,
    StorageError,
    InternalError,
}

impl ErrorCode {
    /// Whether this code maps to a 404-class lookup failure.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ErrorCode::ParameterNotFound
                | ErrorCode::MachineNotFound
                | ErrorCode::VideoNotFound
                | ErrorCode::BranchNotFound
                | ErrorCode::CoachNotFound
                | ErrorCode::ChargeNotFound
                | ErrorCode::CategoryNotFound
        )
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
            ErrorCode::ParameterNotFound => "PARAMETER_NOT_FOUND",
            ErrorCode::MachineNotFound => "MACHINE_NOT_FOUND",
            ErrorCode::VideoNotFound => "VIDEO_NOT_FOUND",
            ErrorCode::BranchNotFound => "BRANCH_NOT_FOUND",
            ErrorCode::CoachNotFound => "COACH_NOT_FOUND",
            ErrorCode::ChargeNotFound => "CHARGE_NOT_FOUND",
            ErrorCode::CategoryNotFound => "CATEGORY_NOT_FOUND",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::CacheError => "CACHE_ERROR",
            ErrorCode::StorageError => "STORAGE_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        };
        write!(f, "{}", s)
    }
}

/// Standard domain error with code, message, and optional details.
#[derive(Debug, Clone)]
pub struct DomainError {
    pub code: ErrorCode,
    pub message: String,
    pub details: HashMap<String, String>,
}

impl DomainError {
    /// Creates a new domain error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: HashMap::new(),
        }
    }

    /// Creates a validation error for a specific field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::ValidationFailed,
            message: message.into(),
            details: HashMap::new(),
        }
        .with_detail("field", field.into())
    }

    /// Adds a detail to the error.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl Error for DomainError {}

impl From<ValidationError> for DomainError {
    fn from(err: ValidationError) -> Self {
        let field = err.field().to_string();
        DomainError::validation(field, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_required_displays_correctly() {
        let err = ValidationError::required("cle");
        assert_eq!(format!("{}", err), "Field 'cle' is required");
    }

    #[test]
    fn validation_error_too_long_displays_correctly() {
        let err = ValidationError::too_long("cle", 255, 300);
        assert_eq!(
            format!("{}", err),
            "Field 'cle' must be at most 255 characters, got 300"
        );
    }

    #[test]
    fn validation_error_invalid_displays_correctly() {
        let err = ValidationError::invalid("type", "unknown parameter type");
        assert_eq!(
            format!("{}", err),
            "Field 'type' is invalid: unknown parameter type"
        );
    }

    #[test]
    fn validation_error_exposes_field_name() {
        assert_eq!(ValidationError::required("groupe").field(), "groupe");
        assert_eq!(ValidationError::too_long("description", 500, 501).field(), "description");
    }

    #[test]
    fn domain_error_displays_code_and_message() {
        let err = DomainError::new(ErrorCode::ParameterNotFound, "Parameter not found");
        assert_eq!(format!("{}", err), "[PARAMETER_NOT_FOUND] Parameter not found");
    }

    #[test]
    fn domain_error_with_detail_adds_detail() {
        let err = DomainError::new(ErrorCode::ValidationFailed, "Validation failed")
            .with_detail("field", "cle")
            .with_detail("reason", "missing");

        assert_eq!(err.details.get("field"), Some(&"cle".to_string()));
        assert_eq!(err.details.get("reason"), Some(&"missing".to_string()));
    }

    #[test]
    fn validation_error_converts_to_domain_error() {
        let err: DomainError = ValidationError::required("cle").into();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(err.details.get("field"), Some(&"cle".to_string()));
    }

    #[test]
    fn not_found_codes_are_recognized() {
        assert!(ErrorCode::ParameterNotFound.is_not_found());
        assert!(ErrorCode::CoachNotFound.is_not_found());
        assert!(!ErrorCode::DatabaseError.is_not_found());
        assert!(!ErrorCode::ValidationFailed.is_not_found());
    }

    #[test]
    fn error_code_display_formats_correctly() {
        assert_eq!(format!("{}", ErrorCode::MachineNotFound), "MACHINE_NOT_FOUND");
        assert_eq!(format!("{}", ErrorCode::CacheError), "CACHE_ERROR");
    }
}
