//! Expense entity model and DTOs.

use chrono::NaiveDate;
use expense_core::admin::DateBounds;
use expense_core::types::DbId;
use sqlx::FromRow;

/// A row from the `expense` table.
///
/// `expense_image` is the storage path relative to the media root.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Expense {
    pub expense_id: DbId,
    pub expense_name: String,
    pub expense_amount: i64,
    pub expense_category: String,
    pub expense_date: NaiveDate,
    pub expense_image: Option<String>,
}

/// DTO for inserting a new expense.
#[derive(Debug, Clone)]
pub struct CreateExpense {
    pub name: String,
    pub amount: i64,
    pub category: String,
    pub date: NaiveDate,
    pub image_path: Option<String>,
}

/// New value for the `expense_image` column in an update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ImageColumn {
    #[default]
    Keep,
    Clear,
    Set(String),
}

/// DTO for updating an existing expense. `None` fields keep their value.
#[derive(Debug, Clone, Default)]
pub struct UpdateExpense {
    pub name: Option<String>,
    pub amount: Option<i64>,
    pub category: Option<String>,
    pub date: Option<NaiveDate>,
    pub image: ImageColumn,
}

/// Filters for the `/api/v1/expenses` list.
#[derive(Debug, Clone, Default)]
pub struct ExpenseListFilter {
    /// Exact category match, case-insensitive.
    pub category: Option<String>,
    /// Substring match over name or category.
    pub search: Option<String>,
    pub limit: i64,
    pub offset: i64,
}

/// Filters for the admin change list. Every populated field narrows the set.
#[derive(Debug, Clone, Default)]
pub struct ExpenseAdminFilter {
    /// Substring match over the admin search fields.
    pub search: Option<String>,
    /// Exact category match.
    pub category: Option<String>,
    /// Date ranges the `expense_date` must fall in (all of them).
    pub date_ranges: Vec<DateBounds>,
}
