//! Coercion of raw JSON values into typed field values.
//!
//! Each coercer accepts the loosely-typed values that HTML forms and JSON
//! clients actually send (numbers as strings, stray whitespace) and returns
//! the message to report when the value cannot be used.

use chrono::NaiveDate;
use serde_json::Value;

pub const REQUIRED: &str = "This field is required.";
pub const NOT_NULL: &str = "This field may not be null.";
pub const BLANK: &str = "This field may not be blank.";
pub const NOT_A_STRING: &str = "Not a valid string.";
pub const INVALID_INTEGER: &str = "A valid integer is required.";
pub const INVALID_DATE: &str =
    "Date has wrong format. Use one of these formats instead: YYYY-MM-DD.";
pub const INTEGER_TOO_LARGE: &str = "Ensure this value is less than or equal to 2147483647.";
pub const INTEGER_TOO_SMALL: &str = "Ensure this value is greater than or equal to -2147483648.";
pub const MAX_LENGTH_100: &str = "Ensure this field has no more than 100 characters.";

/// Signature shared by every coercer: the typed value or the message to report.
pub type Coercer<T> = fn(&Value) -> Result<T, &'static str>;

/// Longest string accepted by [`integer_field`] before parsing is attempted.
const MAX_INTEGER_STRING_LENGTH: usize = 1000;

/// Floats at or above this magnitude render in exponent form and are rejected.
const MAX_EXACT_FLOAT: f64 = 1e16;

/// Coerce a text value. Strings and numbers are accepted, surrounding
/// whitespace is trimmed and an empty result is rejected.
pub fn char_field(value: &Value) -> Result<String, &'static str> {
    let text = match value {
        Value::Null => return Err(NOT_NULL),
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(_) | Value::Array(_) | Value::Object(_) => return Err(NOT_A_STRING),
    };
    if text.is_empty() {
        return Err(BLANK);
    }
    Ok(text)
}

/// Coerce an integer value.
///
/// Accepts JSON integers, floats with no fractional part, and strings such
/// as `" 42 "` or `"42.00"`.
pub fn integer_field(value: &Value) -> Result<i64, &'static str> {
    match value {
        Value::Null => Err(NOT_NULL),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(i)
            } else if n.is_u64() {
                Err(INTEGER_TOO_LARGE)
            } else {
                let f = n.as_f64().ok_or(INVALID_INTEGER)?;
                if f.is_finite() && f.fract() == 0.0 && f.abs() < MAX_EXACT_FLOAT {
                    Ok(f as i64)
                } else {
                    Err(INVALID_INTEGER)
                }
            }
        }
        Value::String(s) => parse_integer_text(s),
        Value::Bool(_) | Value::Array(_) | Value::Object(_) => Err(INVALID_INTEGER),
    }
}

fn parse_integer_text(raw: &str) -> Result<i64, &'static str> {
    if raw.len() > MAX_INTEGER_STRING_LENGTH {
        return Err(INVALID_INTEGER);
    }
    let mut text = raw.trim_end();
    // A decimal point followed only by zeros is dropped: "12.00" -> "12".
    if let Some((whole, fraction)) = text.rsplit_once('.') {
        if fraction.chars().all(|c| c == '0') {
            text = whole;
        }
    }
    let text = text.trim();
    match text.parse::<i64>() {
        Ok(i) => Ok(i),
        // All digits but too wide for i64: report it as out of range.
        Err(_) if is_signed_digits(text) => {
            if text.starts_with('-') {
                Err(INTEGER_TOO_SMALL)
            } else {
                Err(INTEGER_TOO_LARGE)
            }
        }
        Err(_) => Err(INVALID_INTEGER),
    }
}

fn is_signed_digits(text: &str) -> bool {
    let digits = text.strip_prefix(['-', '+']).unwrap_or(text);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

/// Coerce a calendar date written as `YYYY-MM-DD` (month and day may omit
/// their leading zero).
pub fn date_field(value: &Value) -> Result<NaiveDate, &'static str> {
    let text = match value {
        Value::Null => return Err(NOT_NULL),
        Value::String(s) => s.as_str(),
        _ => return Err(INVALID_DATE),
    };

    let mut parts = text.split('-');
    let (Some(year), Some(month), Some(day), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(INVALID_DATE);
    };

    let numeric = |s: &str, min: usize, max: usize| {
        (min..=max).contains(&s.len()) && s.chars().all(|c| c.is_ascii_digit())
    };
    if !numeric(year, 4, 4) || !numeric(month, 1, 2) || !numeric(day, 1, 2) {
        return Err(INVALID_DATE);
    }

    let (Ok(year), Ok(month), Ok(day)) = (year.parse(), month.parse(), day.parse()) else {
        return Err(INVALID_DATE);
    };
    NaiveDate::from_ymd_opt(year, month, day).ok_or(INVALID_DATE)
}

/// Reject integers outside the signed 32-bit range of an INTEGER column.
pub fn check_i32_range(value: i64) -> Result<(), &'static str> {
    if value > i64::from(i32::MAX) {
        Err(INTEGER_TOO_LARGE)
    } else if value < i64::from(i32::MIN) {
        Err(INTEGER_TOO_SMALL)
    } else {
        Ok(())
    }
}

/// Type name reported in "expected a dictionary" messages.
pub fn wire_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "NoneType",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn char_field_trims_and_rejects_blank() {
        assert_eq!(char_field(&json!("  Coffee ")).unwrap(), "Coffee");
        assert_eq!(char_field(&json!("   ")), Err(BLANK));
        assert_eq!(char_field(&json!("")), Err(BLANK));
    }

    #[test]
    fn char_field_stringifies_numbers() {
        assert_eq!(char_field(&json!(42)).unwrap(), "42");
    }

    #[test]
    fn char_field_rejects_non_scalars() {
        assert_eq!(char_field(&json!(true)), Err(NOT_A_STRING));
        assert_eq!(char_field(&json!(["a"])), Err(NOT_A_STRING));
        assert_eq!(char_field(&json!({"a": 1})), Err(NOT_A_STRING));
        assert_eq!(char_field(&Value::Null), Err(NOT_NULL));
    }

    #[test]
    fn integer_field_accepts_loose_forms() {
        assert_eq!(integer_field(&json!(5)), Ok(5));
        assert_eq!(integer_field(&json!(5.0)), Ok(5));
        assert_eq!(integer_field(&json!("12")), Ok(12));
        assert_eq!(integer_field(&json!(" 12 ")), Ok(12));
        assert_eq!(integer_field(&json!("12.000")), Ok(12));
        assert_eq!(integer_field(&json!("-7")), Ok(-7));
    }

    #[test]
    fn integer_field_rejects_fractions_and_junk() {
        assert_eq!(integer_field(&json!(5.5)), Err(INVALID_INTEGER));
        assert_eq!(integer_field(&json!("5.5")), Err(INVALID_INTEGER));
        assert_eq!(integer_field(&json!("five")), Err(INVALID_INTEGER));
        assert_eq!(integer_field(&json!("")), Err(INVALID_INTEGER));
        assert_eq!(integer_field(&json!(true)), Err(INVALID_INTEGER));
        assert_eq!(integer_field(&Value::Null), Err(NOT_NULL));
    }

    #[test]
    fn integer_field_reports_overflow_as_range_error() {
        assert_eq!(integer_field(&json!(u64::MAX)), Err(INTEGER_TOO_LARGE));
        assert_eq!(
            integer_field(&json!("99999999999999999999")),
            Err(INTEGER_TOO_LARGE)
        );
        assert_eq!(
            integer_field(&json!("-99999999999999999999")),
            Err(INTEGER_TOO_SMALL)
        );
    }

    #[test]
    fn i32_range_bounds() {
        assert!(check_i32_range(2_147_483_647).is_ok());
        assert_eq!(check_i32_range(2_147_483_648), Err(INTEGER_TOO_LARGE));
        assert!(check_i32_range(-2_147_483_648).is_ok());
        assert_eq!(check_i32_range(-2_147_483_649), Err(INTEGER_TOO_SMALL));
    }

    #[test]
    fn date_field_parses_iso_dates() {
        assert_eq!(
            date_field(&json!("2024-01-01")),
            Ok(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
        );
        assert_eq!(
            date_field(&json!("2024-3-9")),
            Ok(NaiveDate::from_ymd_opt(2024, 3, 9).unwrap())
        );
    }

    #[test]
    fn date_field_rejects_bad_input() {
        assert_eq!(date_field(&json!("2024-02-30")), Err(INVALID_DATE));
        assert_eq!(date_field(&json!("01/02/2024")), Err(INVALID_DATE));
        assert_eq!(date_field(&json!("24-01-01")), Err(INVALID_DATE));
        assert_eq!(date_field(&json!("2024-01-01T00:00")), Err(INVALID_DATE));
        assert_eq!(date_field(&json!(20240101)), Err(INVALID_DATE));
        assert_eq!(date_field(&Value::Null), Err(NOT_NULL));
    }

    #[test]
    fn wire_type_names() {
        assert_eq!(wire_type_name(&json!([1])), "list");
        assert_eq!(wire_type_name(&json!("x")), "str");
        assert_eq!(wire_type_name(&json!(1)), "int");
        assert_eq!(wire_type_name(&json!(1.5)), "float");
        assert_eq!(wire_type_name(&Value::Null), "NoneType");
    }
}
