//! Field-by-field reading of an untyped request body.

use serde_json::{Map, Value};

use super::fields::{self, Coercer};
use super::{FieldErrors, NON_FIELD_ERRORS};

/// Whether absent fields are errors (create, full replace) or skipped
/// (partial update).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Create,
    Partial,
}

/// Types that can be built from a JSON request body, reporting every
/// unusable field at once.
pub trait FromBody: Sized {
    fn from_body(body: &Value) -> Result<Self, FieldErrors>;
}

/// Reads fields out of a JSON object, collecting errors as it goes.
#[derive(Debug)]
pub struct BodyReader<'a> {
    data: &'a Map<String, Value>,
    mode: Mode,
    errors: FieldErrors,
}

impl<'a> BodyReader<'a> {
    /// Fails when the body is not a JSON object.
    pub fn new(body: &'a Value, mode: Mode) -> Result<Self, FieldErrors> {
        let Value::Object(data) = body else {
            return Err(FieldErrors::single(
                NON_FIELD_ERRORS,
                format!(
                    "Invalid data. Expected a dictionary, but got {}.",
                    fields::wire_type_name(body)
                ),
            ));
        };
        Ok(Self {
            data,
            mode,
            errors: FieldErrors::new(),
        })
    }

    pub fn data(&self) -> &'a Map<String, Value> {
        self.data
    }

    /// Coerce `name`. A missing key is an error in [`Mode::Create`].
    pub fn field<T>(&mut self, name: &str, coercer: Coercer<T>) -> Option<T> {
        match self.data.get(name) {
            None => {
                if self.mode == Mode::Create {
                    self.errors.add(name, fields::REQUIRED);
                }
                None
            }
            Some(value) => self.coerce(name, value, coercer),
        }
    }

    /// Coerce an optional `name`. Absent or `null` is `None` in every mode.
    pub fn optional<T>(&mut self, name: &str, coercer: Coercer<T>) -> Option<T> {
        match self.data.get(name) {
            None | Some(Value::Null) => None,
            Some(value) => self.coerce(name, value, coercer),
        }
    }

    /// Record an error that was found outside the coercers.
    pub fn add_error(&mut self, name: &str, message: impl Into<String>) {
        self.errors.add(name, message);
    }

    pub fn has_error(&self, name: &str) -> bool {
        self.errors.contains(name)
    }

    /// `Ok(())` if no field failed.
    pub fn finish(self) -> Result<(), FieldErrors> {
        self.errors.into_result()
    }

    fn coerce<T>(&mut self, name: &str, value: &Value, coercer: Coercer<T>) -> Option<T> {
        match coercer(value) {
            Ok(v) => Some(v),
            Err(msg) => {
                self.errors.add(name, msg);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn create_mode_reports_missing_fields() {
        let body = json!({"name": "  Food  "});
        let mut reader = BodyReader::new(&body, Mode::Create).unwrap();
        assert_eq!(reader.field("name", fields::char_field).as_deref(), Some("Food"));
        assert_eq!(reader.field("amount", fields::integer_field), None);
        let errors = reader.finish().unwrap_err();
        assert_eq!(errors.get("amount").unwrap(), [fields::REQUIRED]);
        assert!(!errors.contains("name"));
    }

    #[test]
    fn partial_mode_skips_missing_fields() {
        let body = json!({});
        let mut reader = BodyReader::new(&body, Mode::Partial).unwrap();
        assert_eq!(reader.field("amount", fields::integer_field), None);
        assert!(reader.finish().is_ok());
    }

    #[test]
    fn optional_accepts_null() {
        let body = json!({"description": null, "note": 4});
        let mut reader = BodyReader::new(&body, Mode::Create).unwrap();
        assert_eq!(reader.optional("description", fields::char_field), None);
        assert_eq!(reader.optional("missing", fields::char_field), None);
        assert_eq!(reader.optional("note", fields::char_field).as_deref(), Some("4"));
        assert!(reader.finish().is_ok());
    }

    #[test]
    fn wrong_types_are_keyed_by_field() {
        let body = json!({"amount": "lots"});
        let mut reader = BodyReader::new(&body, Mode::Partial).unwrap();
        reader.field("amount", fields::integer_field);
        assert!(reader.has_error("amount"));
        let errors = reader.finish().unwrap_err();
        assert_eq!(errors.get("amount").unwrap(), [fields::INVALID_INTEGER]);
    }

    #[test]
    fn non_object_body_is_rejected() {
        let errors = BodyReader::new(&json!("text"), Mode::Create).unwrap_err();
        assert_eq!(
            errors.get(NON_FIELD_ERRORS).unwrap(),
            ["Invalid data. Expected a dictionary, but got str."]
        );
    }
}
