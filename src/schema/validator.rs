//! Record validator
//!
//! Validation semantics:
//! - Declared fields are checked in declaration order
//! - Every field is checked; errors accumulate, nothing short-circuits
//! - Absent optional fields take their default
//! - Null is accepted only on nullable fields
//! - Range bounds are inclusive
//! - Unknown keys are ignored or rejected per `UnknownKeyPolicy`
//!
//! `validate_record` is a pure function of (definition, input, policy).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::coerce::{coerce, is_valid_email};
use super::errors::{FieldError, SchemaError, SchemaResult, ValidationReport};
use super::record::{FieldValue, Record};
use super::registry::SchemaRegistry;
use super::types::{Constraint, FieldDef, RecordTypeDef, StringFormat, ValueType};

/// What to do with input keys that have no field declaration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownKeyPolicy {
    /// Drop silently
    #[default]
    Ignore,
    /// Report one `UNKNOWN_FIELD` error per key
    Reject,
}

/// Validator bound to a registry.
///
/// Validator does not mutate the registry or the input.
pub struct SchemaValidator<'a> {
    registry: &'a SchemaRegistry,
    policy: UnknownKeyPolicy,
}

impl<'a> SchemaValidator<'a> {
    /// Creates a validator with the default (ignore) unknown-key policy.
    pub fn new(registry: &'a SchemaRegistry) -> Self {
        Self {
            registry,
            policy: UnknownKeyPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: UnknownKeyPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> UnknownKeyPolicy {
        self.policy
    }

    /// Validates raw input against a registered type.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError` if:
    /// - Type not registered (SCHEMA_UNKNOWN_TYPE)
    /// - Input fails validation (SCHEMA_VALIDATION_FAILED), with every
    ///   field error in the report
    pub fn validate(&self, type_name: &str, raw: &Value) -> SchemaResult<Record> {
        let def = self
            .registry
            .definition(type_name)
            .ok_or_else(|| SchemaError::unknown_type(type_name))?;

        validate_record(def, raw, self.policy).map_err(SchemaError::validation_failed)
    }
}

/// Validates `raw` against `def`, collecting every field error.
pub fn validate_record(
    def: &RecordTypeDef,
    raw: &Value,
    policy: UnknownKeyPolicy,
) -> Result<Record, ValidationReport> {
    let obj = match raw.as_object() {
        Some(obj) => obj,
        None => {
            return Err(ValidationReport::new(
                &def.type_name,
                vec![FieldError::type_mismatch("$root", "object", raw)],
            ));
        }
    };

    let mut errors = Vec::new();
    let mut values = Vec::with_capacity(def.fields.len());

    for field in &def.fields {
        match resolve_field(field, obj.get(&field.name)) {
            Ok(value) => values.push((field.name.clone(), value)),
            Err(err) => errors.push(err),
        }
    }

    if policy == UnknownKeyPolicy::Reject {
        // Sorted by key; input key order is not significant.
        let mut unknown: Vec<_> = obj.iter().filter(|(key, _)| def.field(key).is_none()).collect();
        unknown.sort_by(|a, b| a.0.cmp(b.0));
        for (key, value) in unknown {
            errors.push(FieldError::unknown_field(key.as_str(), value));
        }
    }

    if !errors.is_empty() {
        return Err(ValidationReport::new(&def.type_name, errors));
    }

    Ok(Record::new(&def.type_name, def.collection_name(), values))
}

/// Resolves one declared field from its (possibly absent) raw value.
fn resolve_field(field: &FieldDef, raw: Option<&Value>) -> Result<FieldValue, FieldError> {
    match raw {
        Some(value) => check_value(field, value),
        None => match &field.default {
            Some(default) if !field.required => check_value(field, default),
            _ => Err(FieldError::missing_field(&field.name, field.value_type.type_name())),
        },
    }
}

/// Coerces a present value and applies the field's constraints.
pub(crate) fn check_value(field: &FieldDef, raw: &Value) -> Result<FieldValue, FieldError> {
    if raw.is_null() {
        return if field.nullable {
            Ok(FieldValue::Null)
        } else {
            Err(FieldError::type_mismatch(&field.name, field.value_type.type_name(), raw))
        };
    }

    let value = match coerce(field.value_type, raw) {
        Some(value) => value,
        None => {
            return Err(oversized_int_violation(field, raw).unwrap_or_else(|| {
                FieldError::type_mismatch(&field.name, field.value_type.type_name(), raw)
            }));
        }
    };

    for constraint in field.effective_constraints() {
        if !satisfies(&constraint, &value) {
            return Err(FieldError::constraint_violation(&field.name, &constraint, raw));
        }
    }

    Ok(value)
}

/// An integral number too large for `i64` on a bounded int field breaks the
/// bound rather than the type.
fn oversized_int_violation(field: &FieldDef, raw: &Value) -> Option<FieldError> {
    if field.value_type != ValueType::Int {
        return None;
    }
    let n = raw.as_f64()?;
    if !n.is_finite() || n.fract() != 0.0 {
        return None;
    }
    field
        .effective_constraints()
        .into_iter()
        .find(|constraint| match constraint {
            Constraint::Min { min } => n < *min,
            Constraint::Max { max } => n > *max,
            Constraint::Format { .. } => false,
        })
        .map(|constraint| FieldError::constraint_violation(&field.name, &constraint, raw))
}

fn satisfies(constraint: &Constraint, value: &FieldValue) -> bool {
    match (constraint, value) {
        (Constraint::Min { min }, FieldValue::Int(i)) => int_at_least(*i, *min),
        (Constraint::Max { max }, FieldValue::Int(i)) => int_at_most(*i, *max),
        (Constraint::Min { min }, _) => value.as_f64().map_or(true, |v| v >= *min),
        (Constraint::Max { max }, _) => value.as_f64().map_or(true, |v| v <= *max),
        (
            Constraint::Format {
                format: StringFormat::Email,
            },
            _,
        ) => value.as_str().map_or(true, is_valid_email),
    }
}

/// 2^63, the first float above every `i64`.
const I64_END: f64 = 9_223_372_036_854_775_808.0;

/// Exact `i >= min`. Ints past 2^53 do not survive a cast to `f64`, so the
/// bound is rounded to an integer instead.
fn int_at_least(i: i64, min: f64) -> bool {
    if min.is_nan() {
        return false;
    }
    let bound = min.ceil();
    // `as` saturates below i64::MIN
    bound < I64_END && i >= bound as i64
}

/// Exact `i <= max`.
fn int_at_most(i: i64, max: f64) -> bool {
    if max.is_nan() {
        return false;
    }
    let bound = max.floor();
    // `as` saturates above i64::MAX
    bound >= -I64_END && i <= bound as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::errors::{FieldErrorKind, SchemaErrorCode};
    use serde_json::json;

    fn account() -> RecordTypeDef {
        RecordTypeDef::new(
            "Account",
            vec![
                FieldDef::required("name", ValueType::String),
                FieldDef::required("email", ValueType::Email),
                FieldDef::nullable("age", ValueType::Int).min(0.0).max(120.0),
                FieldDef::required("balance", ValueType::Float).min(0.0),
                FieldDef::with_default("active", ValueType::Bool, json!(true)),
            ],
        )
    }

    fn valid_input() -> Value {
        json!({
            "name": "Ada",
            "email": "ada@example.com",
            "balance": 10.5
        })
    }

    #[test]
    fn test_valid_input_fills_defaults() {
        let record = validate_record(&account(), &valid_input(), UnknownKeyPolicy::Ignore).unwrap();
        assert_eq!(record.len(), 5);
        assert_eq!(record.get("age"), Some(&FieldValue::Null));
        assert_eq!(record.get("active"), Some(&FieldValue::Bool(true)));
        assert_eq!(record.collection(), "account");
    }

    #[test]
    fn test_all_errors_collected_in_declaration_order() {
        let input = json!({
            "email": "not-an-email",
            "age": "old",
            "balance": -1
        });
        let report = validate_record(&account(), &input, UnknownKeyPolicy::Ignore).unwrap_err();

        let summary: Vec<_> = report
            .errors
            .iter()
            .map(|e| (e.field.as_str(), e.kind))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("name", FieldErrorKind::MissingField),
                ("email", FieldErrorKind::ConstraintViolation),
                ("age", FieldErrorKind::TypeMismatch),
                ("balance", FieldErrorKind::ConstraintViolation),
            ]
        );
    }

    #[test]
    fn test_error_carries_value_and_bound() {
        let mut input = valid_input();
        input["age"] = json!(121);
        let report = validate_record(&account(), &input, UnknownKeyPolicy::Ignore).unwrap_err();
        let err = &report.errors[0];
        assert_eq!(err.field, "age");
        assert_eq!(err.value, Some(json!(121)));
        assert_eq!(err.expected, "<= 120");
    }

    #[test]
    fn test_bounds_are_inclusive() {
        for (age, ok) in [(-1, false), (0, true), (120, true), (121, false)] {
            let mut input = valid_input();
            input["age"] = json!(age);
            let result = validate_record(&account(), &input, UnknownKeyPolicy::Ignore);
            assert_eq!(result.is_ok(), ok, "age {}", age);
        }
    }

    #[test]
    fn test_null_on_nullable_accepted() {
        let mut input = valid_input();
        input["age"] = Value::Null;
        let record = validate_record(&account(), &input, UnknownKeyPolicy::Ignore).unwrap();
        assert!(record.get("age").unwrap().is_null());
    }

    #[test]
    fn test_null_on_non_nullable_rejected() {
        let mut input = valid_input();
        input["active"] = Value::Null;
        input["name"] = Value::Null;
        let report = validate_record(&account(), &input, UnknownKeyPolicy::Ignore).unwrap_err();
        assert!(report.has("name", FieldErrorKind::TypeMismatch));
        assert!(report.has("active", FieldErrorKind::TypeMismatch));
        assert_eq!(report.len(), 2);
    }

    #[test]
    fn test_unknown_keys_ignored_by_default() {
        let mut input = valid_input();
        input["nickname"] = json!("ace");
        let record = validate_record(&account(), &input, UnknownKeyPolicy::default()).unwrap();
        assert!(record.get("nickname").is_none());
    }

    #[test]
    fn test_unknown_keys_rejected_under_reject_policy() {
        let mut input = valid_input();
        input["zeta"] = json!(1);
        input["alpha"] = json!(2);
        let report = validate_record(&account(), &input, UnknownKeyPolicy::Reject).unwrap_err();
        let fields: Vec<_> = report.errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["alpha", "zeta"]);
        assert!(report
            .errors
            .iter()
            .all(|e| e.kind == FieldErrorKind::UnknownField));
    }

    #[test]
    fn test_non_object_input() {
        let report = validate_record(&account(), &json!([1, 2]), UnknownKeyPolicy::Ignore).unwrap_err();
        assert_eq!(report.len(), 1);
        assert_eq!(report.errors[0].field, "$root");
        assert_eq!(report.errors[0].kind, FieldErrorKind::TypeMismatch);
    }

    #[test]
    fn test_coerced_values_in_record() {
        let input = json!({
            "name": "Ada",
            "email": "ada@Example.com",
            "age": "42",
            "balance": "3",
            "active": "no"
        });
        let record = validate_record(&account(), &input, UnknownKeyPolicy::Ignore).unwrap();
        assert_eq!(record.get("age"), Some(&FieldValue::Int(42)));
        assert_eq!(record.get("balance"), Some(&FieldValue::Float(3.0)));
        assert_eq!(record.get("active"), Some(&FieldValue::Bool(false)));
        assert_eq!(record.get("email").and_then(|v| v.as_str()), Some("ada@example.com"));
    }

    #[test]
    fn test_revalidation_is_idempotent() {
        let input = json!({
            "name": "Ada",
            "email": "ada@example.com",
            "age": 42.0,
            "balance": 7
        });
        let first = validate_record(&account(), &input, UnknownKeyPolicy::Reject).unwrap();
        let second = validate_record(&account(), &first.to_json(), UnknownKeyPolicy::Reject).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_int_bounds_exact_past_f64_precision() {
        // 2^53
        let limit = 9_007_199_254_740_992_i64;
        let def = RecordTypeDef::new(
            "Counter",
            vec![FieldDef::required("n", ValueType::Int)
                .min(-(limit as f64))
                .max(limit as f64)],
        );

        for (n, ok) in [(limit, true), (limit + 1, false), (-limit, true), (-limit - 1, false)] {
            let result = validate_record(&def, &json!({ "n": n }), UnknownKeyPolicy::Ignore);
            assert_eq!(result.is_ok(), ok, "n = {}", n);
            if let Err(report) = result {
                assert!(report.has("n", FieldErrorKind::ConstraintViolation));
            }
        }
    }

    #[test]
    fn test_int_bounds_fractional() {
        let def = RecordTypeDef::new(
            "Rating",
            vec![FieldDef::required("stars", ValueType::Int).min(0.5).max(4.5)],
        );
        for (n, ok) in [(0, false), (1, true), (4, true), (5, false)] {
            let result = validate_record(&def, &json!({ "stars": n }), UnknownKeyPolicy::Ignore);
            assert_eq!(result.is_ok(), ok, "stars = {}", n);
        }
    }

    #[test]
    fn test_oversized_int_breaks_bound() {
        let mut input = valid_input();
        input["age"] = json!(u64::MAX);
        let report = validate_record(&account(), &input, UnknownKeyPolicy::Ignore).unwrap_err();
        assert!(report.has("age", FieldErrorKind::ConstraintViolation));
        assert_eq!(report.errors[0].expected, "<= 120");

        input["age"] = json!(-1e19);
        let report = validate_record(&account(), &input, UnknownKeyPolicy::Ignore).unwrap_err();
        assert_eq!(report.errors[0].expected, ">= 0");

        let unbounded = RecordTypeDef::new("Tally", vec![FieldDef::required("n", ValueType::Int)]);
        let report = validate_record(&unbounded, &json!({ "n": u64::MAX }), UnknownKeyPolicy::Ignore)
            .unwrap_err();
        assert!(report.has("n", FieldErrorKind::TypeMismatch));
    }

    #[test]
    fn test_validator_unknown_type() {
        let registry = SchemaRegistry::new();
        let validator = SchemaValidator::new(&registry);
        let err = validator.validate("Ghost", &json!({})).unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::UnknownType);
    }

    #[test]
    fn test_validator_uses_policy() {
        let mut registry = SchemaRegistry::new();
        registry.register(account()).unwrap();

        let mut input = valid_input();
        input["extra"] = json!(true);

        let lenient = SchemaValidator::new(&registry);
        assert!(lenient.validate("Account", &input).is_ok());

        let strict = SchemaValidator::new(&registry).with_policy(UnknownKeyPolicy::Reject);
        let err = strict.validate("Account", &input).unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::ValidationFailed);
        assert!(err.report().unwrap().has("extra", FieldErrorKind::UnknownField));
    }
}
