//! Reusable field validators
//!
//! The validator pipeline in the parent module composes these per field:
//! coercion first, then bounds, then format.

use crate::core::field::{FieldKind, FieldValue, is_valid_email};
use serde_json::Value;

/// Validator: value must coerce to the declared kind
///
/// Strings that parse as integers are accepted for integer fields.
pub fn coerce(
    kind: FieldKind,
) -> impl Fn(&str, &Value) -> Result<FieldValue, String> + Send + Sync + Clone {
    move |field: &str, value: &Value| {
        let coerced = match (kind, value) {
            (FieldKind::String | FieldKind::Email, Value::String(s)) => {
                Some(FieldValue::String(s.clone()))
            }
            (FieldKind::Integer, Value::Number(n)) => n.as_i64().map(FieldValue::Integer),
            (FieldKind::Integer, Value::String(s)) => {
                s.trim().parse::<i64>().ok().map(FieldValue::Integer)
            }
            _ => None,
        };

        coerced.ok_or_else(|| format!("invalid type for {}", field))
    }
}

/// Validator: integer must lie within `[min, max]`
pub fn in_range(
    min: Option<i64>,
    max: Option<i64>,
) -> impl Fn(&str, &FieldValue) -> Result<(), String> + Send + Sync + Clone {
    move |field: &str, value: &FieldValue| {
        let Some(num) = value.as_integer() else {
            return Ok(());
        };

        let below = min.is_some_and(|m| num < m);
        let above = max.is_some_and(|m| num > m);
        if below || above {
            Err(format!("{} out of range", field))
        } else {
            Ok(())
        }
    }
}

/// Validator: string length in characters must lie within `[min, max]`
pub fn string_length(
    min: Option<i64>,
    max: Option<i64>,
) -> impl Fn(&str, &FieldValue) -> Result<(), String> + Send + Sync + Clone {
    move |field: &str, value: &FieldValue| {
        let Some(s) = value.as_string() else {
            return Ok(());
        };

        let len = s.chars().count() as i64;
        if max.is_some_and(|m| len > m) {
            Err(format!("{} too long", field))
        } else if min.is_some_and(|m| len < m) {
            Err(format!("{} too short", field))
        } else {
            Ok(())
        }
    }
}

/// Validator: string must look like `local@domain.tld`
pub fn email() -> impl Fn(&str, &FieldValue) -> Result<(), String> + Send + Sync + Clone {
    |_: &str, value: &FieldValue| match value.as_string() {
        Some(s) if is_valid_email(s) => Ok(()),
        Some(_) => Err("invalid email".to_string()),
        None => Ok(()),
    }
}
