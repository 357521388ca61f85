//! Field-keyed validation errors and wire-value coercion.
//!
//! Errors are reported per field as `{"field": ["message", ...]}` so that
//! clients can attach every message to the form input it belongs to.

pub mod body;
pub mod fields;

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use validator::ValidationErrors;

/// Key used for errors that do not belong to a single field.
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

/// Key `validator` uses for struct-level (schema) errors.
const VALIDATOR_SCHEMA_KEY: &str = "__all__";

/// Validation messages grouped by field name.
///
/// Serializes transparently as a JSON object of string arrays.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an error set holding a single message.
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    /// Append a message for `field`, keeping earlier messages.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Messages recorded for `field`, if any.
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// Fold the output of a `validator::Validate` run into this set.
    ///
    /// Struct-level errors land under [`NON_FIELD_ERRORS`]. A validator
    /// without an explicit message falls back to its code.
    pub fn extend_from_validator(&mut self, errors: &ValidationErrors) {
        for (field, field_errors) in errors.field_errors() {
            let mut key = field.to_string();
            if key == VALIDATOR_SCHEMA_KEY {
                key = NON_FIELD_ERRORS.to_string();
            }
            for err in field_errors.iter() {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| err.code.to_string());
                self.add(key.clone(), message);
            }
        }
    }

    /// `Ok(())` when no errors were recorded, `Err(self)` otherwise.
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut out = Self::new();
        out.extend_from_validator(&errors);
        out
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Named {
        #[validate(length(max = 3, message = "too long"))]
        name: String,
    }

    #[test]
    fn add_keeps_message_order() {
        let mut errors = FieldErrors::new();
        errors.add("name", "first");
        errors.add("name", "second");
        assert_eq!(errors.get("name").unwrap(), ["first", "second"]);
    }

    #[test]
    fn serializes_as_plain_object() {
        let errors = FieldErrors::single("amount", "bad");
        assert_eq!(
            serde_json::to_value(&errors).unwrap(),
            serde_json::json!({"amount": ["bad"]})
        );
    }

    #[test]
    fn validator_messages_are_folded_in() {
        let err = Named {
            name: "abcd".into(),
        }
        .validate()
        .unwrap_err();
        let errors = FieldErrors::from(err);
        assert_eq!(errors.get("name").unwrap(), ["too long"]);
    }

    #[test]
    fn into_result_on_empty_is_ok() {
        assert!(FieldErrors::new().into_result().is_ok());
        assert!(FieldErrors::single("x", "y").into_result().is_err());
    }

    #[test]
    fn display_joins_messages() {
        let mut errors = FieldErrors::new();
        errors.add("b", "two");
        errors.add("a", "one");
        assert_eq!(errors.to_string(), "a: one; b: two");
    }
}
