//! Expense payload validation.
//!
//! Turns an untyped request body into a validated [`ExpenseInput`] (create,
//! every field required) or [`ExpensePatch`] (partial update, only the
//! fields present are checked and applied). Errors from all fields are
//! collected before returning.

use chrono::NaiveDate;
use serde_json::{Map, Value};
use validator::Validate;

use crate::media::{self, UploadedFile, ValidatedImage};
use crate::validation::body::{BodyReader, Mode};
use crate::validation::fields;
use crate::validation::{FieldErrors, NON_FIELD_ERRORS};

pub const NAME: &str = "expense_name";
pub const AMOUNT: &str = "expense_amount";
pub const CATEGORY: &str = "expense_category";
pub const DATE: &str = "expense_date";
pub const IMAGE: &str = "expense_image";

/// A fully validated new expense.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseInput {
    pub name: String,
    pub amount: i64,
    pub category: String,
    pub date: NaiveDate,
    pub image: Option<ValidatedImage>,
}

/// What an update does to the stored receipt image.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ImageChange {
    #[default]
    Keep,
    Clear,
    Replace(ValidatedImage),
}

/// A validated partial update. `None` fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpensePatch {
    pub name: Option<String>,
    pub amount: Option<i64>,
    pub category: Option<String>,
    pub date: Option<NaiveDate>,
    pub image: ImageChange,
}

impl ExpensePatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.amount.is_none()
            && self.category.is_none()
            && self.date.is_none()
            && self.image == ImageChange::Keep
    }
}

/// Values that survived coercion, checked against column constraints.
#[derive(Debug, Default, Validate)]
struct Coerced {
    #[validate(length(max = 100, message = "Ensure this field has no more than 100 characters."))]
    expense_name: Option<String>,
    expense_amount: Option<i64>,
    #[validate(length(max = 100, message = "Ensure this field has no more than 100 characters."))]
    expense_category: Option<String>,
    expense_date: Option<NaiveDate>,
}

/// Validate a create payload.
///
/// `upload` is a file part received alongside the body; when present it
/// takes precedence over any `expense_image` key in `body`.
pub fn validate_create(
    body: &Value,
    upload: Option<UploadedFile>,
) -> Result<ExpenseInput, FieldErrors> {
    let (coerced, image) = validate(body, upload, Mode::Create)?;

    // Create mode reports a missing field as an error, so every value is set.
    let (Some(name), Some(amount), Some(category), Some(date)) = (
        coerced.expense_name,
        coerced.expense_amount,
        coerced.expense_category,
        coerced.expense_date,
    ) else {
        return Err(FieldErrors::single(NON_FIELD_ERRORS, fields::REQUIRED));
    };

    let image = match image {
        ImageChange::Replace(image) => Some(image),
        ImageChange::Keep | ImageChange::Clear => None,
    };

    Ok(ExpenseInput {
        name,
        amount,
        category,
        date,
        image,
    })
}

/// Validate a partial-update payload.
pub fn validate_patch(
    body: &Value,
    upload: Option<UploadedFile>,
) -> Result<ExpensePatch, FieldErrors> {
    let (coerced, image) = validate(body, upload, Mode::Partial)?;
    Ok(into_patch(coerced, image))
}

/// Validate a full-replacement payload.
///
/// Every required field must be present, as on create. The image is
/// optional and keeps its stored value when the key is absent.
pub fn validate_replace(
    body: &Value,
    upload: Option<UploadedFile>,
) -> Result<ExpensePatch, FieldErrors> {
    let (coerced, image) = validate(body, upload, Mode::Create)?;
    Ok(into_patch(coerced, image))
}

fn into_patch(coerced: Coerced, image: ImageChange) -> ExpensePatch {
    ExpensePatch {
        name: coerced.expense_name,
        amount: coerced.expense_amount,
        category: coerced.expense_category,
        date: coerced.expense_date,
        image,
    }
}

fn validate(
    body: &Value,
    upload: Option<UploadedFile>,
    mode: Mode,
) -> Result<(Coerced, ImageChange), FieldErrors> {
    let mut reader = BodyReader::new(body, mode)?;
    let mut coerced = Coerced {
        expense_name: reader.field(NAME, fields::char_field),
        expense_amount: reader.field(AMOUNT, fields::integer_field),
        expense_category: reader.field(CATEGORY, fields::char_field),
        expense_date: reader.field(DATE, fields::date_field),
    };

    if let Some(amount) = coerced.expense_amount {
        if let Err(msg) = fields::check_i32_range(amount) {
            reader.add_error(AMOUNT, msg);
            coerced.expense_amount = None;
        }
    }
    let image = image_change(reader.data(), upload);

    let mut errors = match reader.finish() {
        Ok(()) => FieldErrors::new(),
        Err(errors) => errors,
    };
    if let Err(e) = coerced.validate() {
        errors.extend_from_validator(&e);
    }
    let image = match image {
        Ok(image) => Some(image),
        Err(msg) => {
            errors.add(IMAGE, msg);
            None
        }
    };
    errors.into_result()?;
    Ok((coerced, image.unwrap_or(ImageChange::Keep)))
}

fn image_change(
    data: &Map<String, Value>,
    upload: Option<UploadedFile>,
) -> Result<ImageChange, String> {
    if let Some(upload) = upload {
        return media::inspect_image(upload).map(ImageChange::Replace);
    }
    match data.get(IMAGE) {
        None => Ok(ImageChange::Keep),
        Some(Value::Null) => Ok(ImageChange::Clear),
        Some(Value::String(s)) if s.is_empty() => Ok(ImageChange::Clear),
        Some(_) => Err(media::NOT_A_FILE.to_string()),
    }
}
