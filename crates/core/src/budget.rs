//! Budget period rules.

use chrono::NaiveDate;

use crate::validation::{FieldErrors, NON_FIELD_ERRORS};

pub const PERIOD_ORDER: &str = "end_date must be on or after start_date.";

/// A budget period is inclusive on both ends and may be a single day.
pub fn check_period(start_date: NaiveDate, end_date: NaiveDate) -> Result<(), FieldErrors> {
    if end_date < start_date {
        return Err(FieldErrors::single(NON_FIELD_ERRORS, PERIOD_ORDER));
    }
    Ok(())
}

/// Message used when a budget points at a category that does not exist.
pub fn missing_category_message(category_id: i64) -> String {
    format!("Invalid pk \"{category_id}\" - object does not exist.")
}
