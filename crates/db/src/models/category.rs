//! Category entity model and DTOs.

use expense_core::types::{DbId, Timestamp};
use expense_core::validation::body::{BodyReader, FromBody, Mode};
use expense_core::validation::fields;
use expense_core::validation::FieldErrors;
use serde::Serialize;
use serde_json::Value;
use sqlx::FromRow;
use validator::Validate;

/// A row from the `categories` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Category {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a category, also used for full (PUT) replacement.
#[derive(Debug, Clone, Validate)]
pub struct CreateCategory {
    #[validate(length(min = 1, max = 100, message = "Ensure this field has between 1 and 100 characters."))]
    pub name: String,
    #[validate(length(max = 500, message = "Ensure this field has no more than 500 characters."))]
    pub description: Option<String>,
}

/// DTO for patching a category. All fields are optional.
#[derive(Debug, Clone, Default, Validate)]
pub struct UpdateCategory {
    #[validate(length(min = 1, max = 100, message = "Ensure this field has between 1 and 100 characters."))]
    pub name: Option<String>,
    #[validate(length(max = 500, message = "Ensure this field has no more than 500 characters."))]
    pub description: Option<String>,
}

impl From<CreateCategory> for UpdateCategory {
    fn from(input: CreateCategory) -> Self {
        Self {
            name: Some(input.name),
            description: input.description,
        }
    }
}

impl FromBody for CreateCategory {
    fn from_body(body: &Value) -> Result<Self, FieldErrors> {
        let mut reader = BodyReader::new(body, Mode::Create)?;
        let name = reader.field("name", fields::char_field);
        let description = reader.optional("description", description_field).flatten();
        reader.finish()?;
        let Some(name) = name else {
            return Err(FieldErrors::single("name", fields::REQUIRED));
        };
        Ok(Self { name, description })
    }
}

impl FromBody for UpdateCategory {
    fn from_body(body: &Value) -> Result<Self, FieldErrors> {
        let mut reader = BodyReader::new(body, Mode::Partial)?;
        let name = reader.field("name", fields::char_field);
        let description = reader.optional("description", description_field).flatten();
        reader.finish()?;
        Ok(Self { name, description })
    }
}

/// A trimmed description. Blank text is stored as no description.
fn description_field(value: &Value) -> Result<Option<String>, &'static str> {
    match fields::char_field(value) {
        Ok(text) => Ok(Some(text)),
        Err(fields::BLANK) => Ok(None),
        Err(msg) => Err(msg),
    }
}
