//! Schema error types
//!
//! Registry error codes:
//! - SCHEMA_DUPLICATE_TYPE
//! - SCHEMA_UNKNOWN_TYPE
//! - SCHEMA_VALIDATION_FAILED
//! - SCHEMA_MALFORMED_DEFINITION
//! - SCHEMA_TYPE_CONVERSION
//!
//! Field error kinds (carried inside SCHEMA_VALIDATION_FAILED):
//! - MISSING_FIELD
//! - TYPE_MISMATCH
//! - CONSTRAINT_VIOLATION
//! - UNKNOWN_FIELD

use serde::Serialize;
use serde_json::Value;
use std::fmt;

use super::types::Constraint;

/// Registry-level error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorCode {
    /// Type name already registered
    DuplicateType,
    /// Type name not registered
    UnknownType,
    /// Record failed validation
    ValidationFailed,
    /// Definition is structurally invalid or unreadable
    MalformedDefinition,
    /// Validated record does not fit the requested Rust type
    TypeConversion,
}

impl SchemaErrorCode {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorCode::DuplicateType => "SCHEMA_DUPLICATE_TYPE",
            SchemaErrorCode::UnknownType => "SCHEMA_UNKNOWN_TYPE",
            SchemaErrorCode::ValidationFailed => "SCHEMA_VALIDATION_FAILED",
            SchemaErrorCode::MalformedDefinition => "SCHEMA_MALFORMED_DEFINITION",
            SchemaErrorCode::TypeConversion => "SCHEMA_TYPE_CONVERSION",
        }
    }
}

impl fmt::Display for SchemaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Kind of a single per-field failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldErrorKind {
    /// Required field absent (or null) with no default
    MissingField,
    /// Value cannot be coerced to the declared type
    TypeMismatch,
    /// Coerced value breaks a range or format rule
    ConstraintViolation,
    /// Key has no matching declaration (reject policy only)
    UnknownField,
}

impl FieldErrorKind {
    pub fn code(&self) -> &'static str {
        match self {
            FieldErrorKind::MissingField => "MISSING_FIELD",
            FieldErrorKind::TypeMismatch => "TYPE_MISMATCH",
            FieldErrorKind::ConstraintViolation => "CONSTRAINT_VIOLATION",
            FieldErrorKind::UnknownField => "UNKNOWN_FIELD",
        }
    }
}

impl fmt::Display for FieldErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One per-field validation failure
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    /// Field path (`$root` for the input itself)
    pub field: String,
    pub kind: FieldErrorKind,
    /// Offending input value, absent for missing fields
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    /// Expected type or violated constraint
    pub expected: String,
    /// Human-readable summary
    pub detail: String,
}

impl FieldError {
    pub fn missing_field(field: impl Into<String>, expected: impl Into<String>) -> Self {
        let expected = expected.into();
        Self {
            field: field.into(),
            kind: FieldErrorKind::MissingField,
            value: None,
            detail: format!("required {} value is missing", expected),
            expected,
        }
    }

    pub fn type_mismatch(field: impl Into<String>, expected: impl Into<String>, actual: &Value) -> Self {
        let expected = expected.into();
        Self {
            field: field.into(),
            kind: FieldErrorKind::TypeMismatch,
            detail: format!("expected {}, got {}", expected, json_type_name(actual)),
            value: Some(actual.clone()),
            expected,
        }
    }

    pub fn constraint_violation(field: impl Into<String>, constraint: &Constraint, actual: &Value) -> Self {
        let expected = constraint.describe();
        Self {
            field: field.into(),
            kind: FieldErrorKind::ConstraintViolation,
            detail: format!("value {} violates {}", actual, expected),
            value: Some(actual.clone()),
            expected,
        }
    }

    pub fn unknown_field(field: impl Into<String>, actual: &Value) -> Self {
        Self {
            field: field.into(),
            kind: FieldErrorKind::UnknownField,
            value: Some(actual.clone()),
            expected: "no undeclared fields".into(),
            detail: "field is not declared".into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "field '{}': {} ({})", self.field, self.kind, self.detail)
    }
}

/// Complete, ordered list of per-field failures for one input
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    pub type_name: String,
    pub errors: Vec<FieldError>,
}

impl ValidationReport {
    pub fn new(type_name: impl Into<String>, errors: Vec<FieldError>) -> Self {
        Self {
            type_name: type_name.into(),
            errors,
        }
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Errors recorded against one field
    pub fn errors_for<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a FieldError> + 'a {
        self.errors.iter().filter(move |e| e.field == field)
    }

    /// Returns true if any error of `kind` was recorded for `field`
    pub fn has(&self, field: &str, kind: FieldErrorKind) -> bool {
        self.errors_for(field).any(|e| e.kind == kind)
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} error(s) validating '{}'", self.errors.len(), self.type_name)?;
        for err in &self.errors {
            write!(f, "; {}", err)?;
        }
        Ok(())
    }
}

/// Schema error type with full context
#[derive(Debug)]
pub struct SchemaError {
    code: SchemaErrorCode,
    message: String,
    type_name: Option<String>,
    report: Option<ValidationReport>,
}

impl SchemaError {
    /// Create a duplicate registration error
    pub fn duplicate_type(type_name: impl Into<String>) -> Self {
        let name = type_name.into();
        Self {
            code: SchemaErrorCode::DuplicateType,
            message: format!("Record type '{}' is already registered", name),
            type_name: Some(name),
            report: None,
        }
    }

    /// Create an unknown type error
    pub fn unknown_type(type_name: impl Into<String>) -> Self {
        let name = type_name.into();
        Self {
            code: SchemaErrorCode::UnknownType,
            message: format!("Record type '{}' is not registered", name),
            type_name: Some(name),
            report: None,
        }
    }

    /// Create a validation failed error carrying every field error
    pub fn validation_failed(report: ValidationReport) -> Self {
        Self {
            code: SchemaErrorCode::ValidationFailed,
            message: report.to_string(),
            type_name: Some(report.type_name.clone()),
            report: Some(report),
        }
    }

    /// Create an error for a malformed definition
    pub fn malformed_definition(source: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            code: SchemaErrorCode::MalformedDefinition,
            message: format!("Malformed definition '{}': {}", source.into(), reason.into()),
            type_name: None,
            report: None,
        }
    }

    /// Create an error for a record that does not deserialize into its target
    pub fn type_conversion(type_name: impl Into<String>, reason: impl Into<String>) -> Self {
        let name = type_name.into();
        Self {
            code: SchemaErrorCode::TypeConversion,
            message: format!("Record '{}' does not fit target type: {}", name, reason.into()),
            type_name: Some(name),
            report: None,
        }
    }

    pub fn code(&self) -> SchemaErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    /// Returns the validation report if this is a validation failure
    pub fn report(&self) -> Option<&ValidationReport> {
        self.report.as_ref()
    }

    pub fn into_report(self) -> Option<ValidationReport> {
        self.report
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for SchemaError {}

impl From<ValidationReport> for SchemaError {
    fn from(report: ValidationReport) -> Self {
        SchemaError::validation_failed(report)
    }
}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Returns the JSON type name for error messages.
pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                "int"
            } else {
                "float"
            }
        }
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
