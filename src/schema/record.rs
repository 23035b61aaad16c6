//! Validated records
//!
//! A `Record` is the output of a successful validation: every declared
//! field present, in declaration order, coerced to its declared type.

use serde::de::DeserializeOwned;
use serde_json::{Map, Number, Value};

use super::errors::{SchemaError, SchemaResult};

/// A typed, validated field value
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Int(i) => Some(*i as f64),
            FieldValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Converts back to a raw JSON value
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Null => Value::Null,
            FieldValue::String(s) => Value::String(s.clone()),
            FieldValue::Int(i) => Value::Number((*i).into()),
            // Coercion only admits finite floats.
            FieldValue::Float(f) => Number::from_f64(*f).map_or(Value::Null, Value::Number),
            FieldValue::Bool(b) => Value::Bool(*b),
        }
    }
}

/// A fully populated, constraint-checked record
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    type_name: String,
    collection: String,
    fields: Vec<(String, FieldValue)>,
}

impl Record {
    pub(crate) fn new(
        type_name: impl Into<String>,
        collection: impl Into<String>,
        fields: Vec<(String, FieldValue)>,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            collection: collection.into(),
            fields,
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Collection this record belongs in
    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    /// Fields in declaration order
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Re-serializes the record into a raw mapping
    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .fields
            .iter()
            .map(|(name, value)| (name.clone(), value.to_json()))
            .collect();
        Value::Object(map)
    }

    /// Deserializes into a typed struct
    pub fn into_typed<T: DeserializeOwned>(&self) -> SchemaResult<T> {
        serde_json::from_value(self.to_json())
            .map_err(|e| SchemaError::type_conversion(self.type_name.clone(), e.to_string()))
    }
}
