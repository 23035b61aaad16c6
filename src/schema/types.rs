//! Record type definitions
//!
//! Supported value types:
//! - string: UTF-8 string
//! - email: string that must pass the email format check
//! - int: 64-bit signed integer
//! - float: 64-bit floating point
//! - bool: Boolean
//!
//! Definitions are plain data. One generic validator interprets all of them.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;

use super::naming;

/// Supported field value types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    /// UTF-8 string
    String,
    /// String in `local@domain` form
    Email,
    /// 64-bit signed integer
    Int,
    /// 64-bit floating point
    Float,
    /// Boolean
    Bool,
}

impl ValueType {
    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            ValueType::String => "string",
            ValueType::Email => "email",
            ValueType::Int => "int",
            ValueType::Float => "float",
            ValueType::Bool => "bool",
        }
    }

    /// Whether range bounds make sense for this type
    pub fn is_numeric(&self) -> bool {
        matches!(self, ValueType::Int | ValueType::Float)
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Named string formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StringFormat {
    Email,
}

impl StringFormat {
    pub fn name(&self) -> &'static str {
        match self {
            StringFormat::Email => "email",
        }
    }
}

/// A rule a coerced value must satisfy beyond its basic type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Constraint {
    /// Value must be `>= min` (inclusive)
    Min { min: f64 },
    /// Value must be `<= max` (inclusive)
    Max { max: f64 },
    /// String must match the named format
    Format { format: StringFormat },
}

impl Constraint {
    /// Human-readable description of the bound, used in error reports
    pub fn describe(&self) -> String {
        match self {
            Constraint::Min { min } => format!(">= {}", min),
            Constraint::Max { max } => format!("<= {}", max),
            Constraint::Format { format } => format!("valid {} address", format.name()),
        }
    }
}

/// Field definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Field name, unique within its record type
    pub name: String,
    /// Declared value type
    #[serde(rename = "type")]
    pub value_type: ValueType,
    /// Whether the field must be present in the input
    pub required: bool,
    /// Whether an explicit `null` is accepted
    #[serde(default)]
    pub nullable: bool,
    /// Value substituted when an optional field is absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<Constraint>,
    /// Documentation only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl FieldDef {
    fn new(name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            value_type,
            required: true,
            nullable: false,
            default: None,
            constraints: Vec::new(),
            description: None,
        }
    }

    /// Create a required field with no default
    pub fn required(name: impl Into<String>, value_type: ValueType) -> Self {
        Self::new(name, value_type)
    }

    /// Create an optional field that accepts null and defaults to null
    pub fn nullable(name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            required: false,
            nullable: true,
            default: Some(Value::Null),
            ..Self::new(name, value_type)
        }
    }

    /// Create an optional, non-null field with a default value
    pub fn with_default(name: impl Into<String>, value_type: ValueType, default: Value) -> Self {
        Self {
            required: false,
            default: Some(default),
            ..Self::new(name, value_type)
        }
    }

    /// Add an inclusive lower bound
    pub fn min(mut self, min: f64) -> Self {
        self.constraints.push(Constraint::Min { min });
        self
    }

    /// Add an inclusive upper bound
    pub fn max(mut self, max: f64) -> Self {
        self.constraints.push(Constraint::Max { max });
        self
    }

    /// Set the documentation string
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Constraints applied after coercion, including the implicit format
    /// check carried by email fields.
    pub fn effective_constraints(&self) -> Vec<Constraint> {
        let mut all = Vec::with_capacity(self.constraints.len() + 1);
        if self.value_type == ValueType::Email {
            all.push(Constraint::Format {
                format: StringFormat::Email,
            });
        }
        for c in &self.constraints {
            if !all.contains(c) {
                all.push(c.clone());
            }
        }
        all
    }
}

/// Record type definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordTypeDef {
    /// Unique type name (e.g. `PartnerLead`)
    pub type_name: String,
    /// Explicit collection name; lowercase of `type_name` when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Fields in declaration order
    pub fields: Vec<FieldDef>,
}

impl RecordTypeDef {
    /// Create a definition whose collection name follows the default rule
    pub fn new(type_name: impl Into<String>, fields: Vec<FieldDef>) -> Self {
        Self {
            type_name: type_name.into(),
            collection: None,
            description: None,
            fields,
        }
    }

    /// Pin the collection name explicitly
    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = Some(collection.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Resolved collection name
    pub fn collection_name(&self) -> String {
        naming::collection_name(&self.type_name, self.collection.as_deref())
    }

    /// Looks up a field by name
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Validates the definition structure itself (not a record)
    pub fn validate_structure(&self) -> Result<(), String> {
        naming::check_type_name(&self.type_name)?;

        if let Some(collection) = &self.collection {
            naming::check_collection_name(collection)?;
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            if field.name.is_empty() {
                return Err("field names must not be empty".into());
            }
            if !seen.insert(field.name.as_str()) {
                return Err(format!("duplicate field '{}'", field.name));
            }
            check_field(field)?;
        }

        Ok(())
    }
}

fn check_field(field: &FieldDef) -> Result<(), String> {
    let mut min = None;
    let mut max = None;
    for c in &field.constraints {
        match c {
            Constraint::Min { min: v } | Constraint::Max { max: v } => {
                if !field.value_type.is_numeric() {
                    return Err(format!(
                        "field '{}': range bound on non-numeric type {}",
                        field.name, field.value_type
                    ));
                }
                if !v.is_finite() {
                    return Err(format!("field '{}': bound must be finite", field.name));
                }
                match c {
                    Constraint::Min { .. } => min = Some(*v),
                    _ => max = Some(*v),
                }
            }
            Constraint::Format { .. } => {
                if !matches!(field.value_type, ValueType::String | ValueType::Email) {
                    return Err(format!(
                        "field '{}': format check on non-string type {}",
                        field.name, field.value_type
                    ));
                }
            }
        }
    }

    if let (Some(lo), Some(hi)) = (min, max) {
        if lo > hi {
            return Err(format!("field '{}': min {} exceeds max {}", field.name, lo, hi));
        }
    }

    if field.required && field.default.is_some() {
        return Err(format!("required field '{}' must not carry a default", field.name));
    }
    if !field.required && field.default.is_none() {
        return Err(format!("optional field '{}' needs a default", field.name));
    }

    if let Some(default) = &field.default {
        if default.is_null() {
            if !field.nullable {
                return Err(format!("field '{}': null default on non-nullable field", field.name));
            }
        } else {
            super::validator::check_value(field, default).map_err(|e| {
                format!("field '{}': default {} is invalid: {}", field.name, default, e.detail)
            })?;
        }
    }

    Ok(())
}
