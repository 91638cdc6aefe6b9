//! Validation of incoming field sets
//!
//! A payload is checked against the resource's [`FieldSpec`]s before it reaches
//! the record store. Successful validation yields a normalized mapping that
//! holds exactly the declared fields, in declaration order, with optional
//! fields filled from their defaults.

pub mod validators;

use crate::core::field::{FieldKind, FieldSpec, FieldValue};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Normalized field mapping produced by a successful validation
pub type Fields = IndexMap<String, FieldValue>;

/// Per-field error messages, keyed by field name
pub type FieldErrors = IndexMap<String, String>;

/// How many errors a failed validation reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorMode {
    /// Collect one error for every failing field
    #[default]
    Bundle,
    /// Stop at the first failing field in declaration order
    FirstError,
}

impl ErrorMode {
    pub fn from_bundle_flag(bundle_errors: bool) -> Self {
        if bundle_errors {
            ErrorMode::Bundle
        } else {
            ErrorMode::FirstError
        }
    }
}

/// Validates payloads against a fixed list of field specs
#[derive(Debug, Clone)]
pub struct Validator {
    specs: Vec<FieldSpec>,
    mode: ErrorMode,
}

impl Validator {
    pub fn new(specs: Vec<FieldSpec>, mode: ErrorMode) -> Self {
        Self { specs, mode }
    }

    pub fn specs(&self) -> &[FieldSpec] {
        &self.specs
    }

    pub fn mode(&self) -> ErrorMode {
        self.mode
    }

    /// Validate a candidate payload
    pub fn validate(&self, candidate: &Value) -> Result<Fields, FieldErrors> {
        validate(candidate, &self.specs, self.mode)
    }
}

/// Validate `candidate` against `specs`
///
/// JSON `null` counts as absent. Keys not declared in `specs` are dropped.
pub fn validate(
    candidate: &Value,
    specs: &[FieldSpec],
    mode: ErrorMode,
) -> Result<Fields, FieldErrors> {
    let Some(object) = candidate.as_object() else {
        let mut errors = FieldErrors::new();
        errors.insert("body".to_string(), "expected a JSON object".to_string());
        return Err(errors);
    };

    let mut fields = Fields::with_capacity(specs.len());
    let mut errors = FieldErrors::new();

    for spec in specs {
        let raw = object.get(&spec.name).filter(|v| !v.is_null());

        match check_field(spec, raw) {
            Ok(value) => {
                fields.insert(spec.name.clone(), value);
            }
            Err(message) => {
                errors.insert(spec.name.clone(), message);
                if mode == ErrorMode::FirstError {
                    break;
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(fields)
    } else {
        Err(errors)
    }
}

/// Check the value an absent optional field would be filled with
///
/// The explicit default, or the kind's zero value, goes through the same
/// type, bounds and format checks as a submitted value.
pub fn check_default(spec: &FieldSpec) -> Result<FieldValue, String> {
    let value = spec.resolve_default();
    if !spec.kind.accepts(&value) {
        return Err(format!("invalid type for {}", spec.name));
    }

    let raw = serde_json::to_value(&value).map_err(|e| e.to_string())?;
    check_field(spec, Some(&raw))
}

/// Run the per-field pipeline: presence, type, bounds, format
fn check_field(spec: &FieldSpec, raw: Option<&Value>) -> Result<FieldValue, String> {
    let Some(raw) = raw else {
        return if spec.required {
            Err(format!("{} is required", spec.name))
        } else {
            Ok(spec.resolve_default())
        };
    };

    let value = validators::coerce(spec.kind)(&spec.name, raw)?;

    match spec.kind {
        FieldKind::Integer => validators::in_range(spec.min, spec.max)(&spec.name, &value)?,
        FieldKind::String => validators::string_length(spec.min, spec.max)(&spec.name, &value)?,
        FieldKind::Email => {
            validators::string_length(spec.min, spec.max)(&spec.name, &value)?;
            validators::email()(&spec.name, &value)?;
        }
    }

    Ok(value)
}
