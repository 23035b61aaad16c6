//! Lax coercion from raw JSON values to declared value types
//!
//! Coercion table:
//! - string: JSON strings only
//! - email: JSON strings only, domain normalized to lowercase
//! - int: integers, integral floats, base-10 integer strings
//! - float: any finite number, finite decimal strings
//! - bool: booleans, 0/1, and the usual true/false spellings
//!
//! Null is handled by the caller; it never reaches these functions.

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

use super::record::FieldValue;
use super::types::ValueType;

const MAX_EMAIL_LEN: usize = 254;
const MAX_LOCAL_LEN: usize = 64;

/// Coerces `raw` to `value_type`. Returns `None` when the value cannot be
/// converted. Email format is not checked here; see [`is_valid_email`].
pub fn coerce(value_type: ValueType, raw: &Value) -> Option<FieldValue> {
    match value_type {
        ValueType::String => raw.as_str().map(|s| FieldValue::String(s.to_string())),
        ValueType::Email => raw.as_str().map(|s| FieldValue::String(normalize_email(s))),
        ValueType::Int => coerce_int(raw).map(FieldValue::Int),
        ValueType::Float => coerce_float(raw).map(FieldValue::Float),
        ValueType::Bool => coerce_bool(raw).map(FieldValue::Bool),
    }
}

fn coerce_int(raw: &Value) -> Option<i64> {
    match raw {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Some(i);
            }
            if n.is_u64() {
                return None;
            }
            let f = n.as_f64()?;
            if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
                Some(f as i64)
            } else {
                None
            }
        }
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

fn coerce_float(raw: &Value) -> Option<f64> {
    let f = match raw {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    f.is_finite().then_some(f)
}

fn coerce_bool(raw: &Value) -> Option<bool> {
    match raw {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_i64() {
            Some(0) => Some(false),
            Some(1) => Some(true),
            _ => None,
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" | "t" | "y" => Some(true),
            "false" | "0" | "no" | "off" | "f" | "n" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(
            r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*@([A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+[A-Za-z]{2,63}$",
        )
        .expect("email pattern is a valid regex")
    })
}

/// Checks `local@domain` syntax: dot-atom local part, dotted domain with
/// an alphabetic top-level label.
pub fn is_valid_email(s: &str) -> bool {
    if s.len() > MAX_EMAIL_LEN {
        return false;
    }
    match s.rsplit_once('@') {
        Some((local, _)) if local.len() <= MAX_LOCAL_LEN => email_regex().is_match(s),
        _ => false,
    }
}

/// Lowercases the domain part; the local part is left as written.
fn normalize_email(s: &str) -> String {
    match s.rsplit_once('@') {
        Some((local, domain)) => format!("{}@{}", local, domain.to_ascii_lowercase()),
        None => s.to_string(),
    }
}
