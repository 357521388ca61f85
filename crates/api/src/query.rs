//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Generic pagination parameters (`?limit=&offset=`).
///
/// Values are clamped in the handler via `clamp_limit` / `clamp_offset`.
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// `GET /api/search?q=`
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

/// `GET /api/v1/expenses` filters.
#[derive(Debug, Default, Deserialize)]
pub struct ExpenseListParams {
    pub category: Option<String>,
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Admin change-list parameters, named after the fields they filter on.
#[derive(Debug, Default, Deserialize)]
pub struct ChangeListParams {
    /// Search over the registration's `search_fields`.
    pub q: Option<String>,
    pub expense_category: Option<String>,
    /// One of the relative date filter choices, e.g. `past_7_days`.
    pub expense_date: Option<String>,
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub day: Option<u32>,
    /// Ordering column, `-` prefixed for descending.
    pub o: Option<String>,
    /// Zero-based page number.
    pub p: Option<i64>,
}
