//! Response payload types shared across handlers.

use chrono::NaiveDate;
use expense_core::types::DbId;
use expense_db::models::expense::Expense;
use serde::Serialize;

use crate::media::MediaStore;

/// Wire rendering of an expense. The image path becomes its public URL.
#[derive(Debug, Serialize)]
pub struct ExpenseView {
    pub expense_id: DbId,
    pub expense_name: String,
    pub expense_amount: i64,
    pub expense_category: String,
    pub expense_date: NaiveDate,
    pub expense_image: Option<String>,
}

impl ExpenseView {
    pub fn render(expense: Expense, media: &MediaStore) -> Self {
        Self {
            expense_id: expense.expense_id,
            expense_name: expense.expense_name,
            expense_amount: expense.expense_amount,
            expense_category: expense.expense_category,
            expense_date: expense.expense_date,
            expense_image: expense.expense_image.map(|path| media.url_for(&path)),
        }
    }

    pub fn render_all(expenses: Vec<Expense>, media: &MediaStore) -> Vec<Self> {
        expenses
            .into_iter()
            .map(|e| Self::render(e, media))
            .collect()
    }
}

/// `{"message": ...}` acknowledgement body.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

impl MessageResponse {
    pub const fn new(message: &'static str) -> Self {
        Self { message }
    }
}
