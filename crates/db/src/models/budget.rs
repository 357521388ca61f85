//! Budget entity model and DTOs.

use chrono::NaiveDate;
use expense_core::types::{DbId, Timestamp};
use expense_core::validation::body::{BodyReader, FromBody, Mode};
use expense_core::validation::fields;
use expense_core::validation::FieldErrors;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use validator::Validate;

/// A row from the `budgets` table. The period is inclusive on both ends.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Budget {
    pub id: DbId,
    pub category_id: DbId,
    pub amount: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a budget, also used for full (PUT) replacement.
#[derive(Debug, Clone, Validate)]
pub struct CreateBudget {
    pub category_id: DbId,
    #[validate(range(min = 0, max = 2147483647, message = "Ensure this value is between 0 and 2147483647."))]
    pub amount: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// DTO for patching a budget. All fields are optional.
#[derive(Debug, Clone, Default, Validate)]
pub struct UpdateBudget {
    pub category_id: Option<DbId>,
    #[validate(range(min = 0, max = 2147483647, message = "Ensure this value is between 0 and 2147483647."))]
    pub amount: Option<i64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl From<CreateBudget> for UpdateBudget {
    fn from(input: CreateBudget) -> Self {
        Self {
            category_id: Some(input.category_id),
            amount: Some(input.amount),
            start_date: Some(input.start_date),
            end_date: Some(input.end_date),
        }
    }
}

/// Query parameters for `GET /api/v1/budgets`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BudgetListParams {
    pub category_id: Option<DbId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl FromBody for UpdateBudget {
    fn from_body(body: &Value) -> Result<Self, FieldErrors> {
        read_budget(body, Mode::Partial)
    }
}

impl FromBody for CreateBudget {
    fn from_body(body: &Value) -> Result<Self, FieldErrors> {
        let budget = read_budget(body, Mode::Create)?;
        let (Some(category_id), Some(amount), Some(start_date), Some(end_date)) = (
            budget.category_id,
            budget.amount,
            budget.start_date,
            budget.end_date,
        ) else {
            return Err(FieldErrors::single(
                expense_core::validation::NON_FIELD_ERRORS,
                fields::REQUIRED,
            ));
        };
        Ok(Self {
            category_id,
            amount,
            start_date,
            end_date,
        })
    }
}

fn read_budget(body: &Value, mode: Mode) -> Result<UpdateBudget, FieldErrors> {
    let mut reader = BodyReader::new(body, mode)?;
    let budget = UpdateBudget {
        category_id: reader.field("category_id", fields::integer_field),
        amount: reader.field("amount", fields::integer_field),
        start_date: reader.field("start_date", fields::date_field),
        end_date: reader.field("end_date", fields::date_field),
    };
    reader.finish()?;
    Ok(budget)
}
