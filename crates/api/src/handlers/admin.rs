//! Handlers for the JSON admin console mounted at `/admin`.
//!
//! The change list is driven entirely by the [`EXPENSE_ADMIN`] registration:
//! which columns are listed, searched, filtered and drilled into by date.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use expense_core::admin::{
    page_window, DateDrilldown, DateRangeFilter, DrilldownLevel, ModelAdmin, PageWindow,
    EXPENSE_ADMIN, REGISTRY,
};
use expense_core::error::CoreError;
use expense_core::expense;
use expense_core::types::DbId;
use expense_db::models::expense::ExpenseAdminFilter;
use expense_db::repositories::ExpenseRepo;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{AppError, AppResult};
use crate::extract::{ExpenseBody, Path, Query};
use crate::handlers::expense::{apply, insert, remove};
use crate::middleware::admin::AdminUser;
use crate::query::ChangeListParams;
use crate::response::ExpenseView;
use crate::state::AppState;

const SITE_HEADER: &str = "Expense Tracker administration";

#[derive(Debug, Serialize)]
pub struct AdminIndex {
    pub site_header: &'static str,
    pub models: &'static [ModelAdmin],
}

#[derive(Debug, Serialize)]
pub struct FilterChoice {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

#[derive(Debug, Serialize)]
pub struct ChangeListFilters {
    pub expense_category: Vec<FilterChoice>,
    pub expense_date: Vec<FilterChoice>,
}

#[derive(Debug, Serialize)]
pub struct DateHierarchy {
    pub field: Option<&'static str>,
    /// `years`, `months`, `days`, or `day` once a single date is selected.
    pub level: &'static str,
    pub choices: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ChangeList {
    pub model: &'static str,
    pub columns: &'static [&'static str],
    pub rows: Vec<Map<String, Value>>,
    pub count: i64,
    #[serde(flatten)]
    pub page: PageWindow,
    pub per_page: i64,
    pub ordering: String,
    pub search: Option<String>,
    pub filters: ChangeListFilters,
    pub date_hierarchy: DateHierarchy,
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Expense",
        id,
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// GET /admin
pub async fn index(_admin: AdminUser) -> Json<AdminIndex> {
    Json(AdminIndex {
        site_header: SITE_HEADER,
        models: REGISTRY,
    })
}

/// GET /admin/expenses
pub async fn change_list(
    _admin: AdminUser,
    State(state): State<AppState>,
    Query(params): Query<ChangeListParams>,
) -> AppResult<Json<ChangeList>> {
    let admin = EXPENSE_ADMIN;

    let ordering = admin.ordering(params.o.as_deref())?;
    let drilldown = DateDrilldown::new(params.year, params.month, params.day)?;
    let date_filter = non_empty(params.expense_date)
        .map(|raw| DateRangeFilter::parse(&raw))
        .transpose()?;

    let mut filter = ExpenseAdminFilter {
        search: non_empty(params.q),
        category: non_empty(params.expense_category),
        date_ranges: Vec::new(),
    };
    if let Some(date_filter) = date_filter {
        filter
            .date_ranges
            .push(date_filter.bounds(Utc::now().date_naive())?);
    }
    if let Some(bounds) = drilldown.bounds()? {
        filter.date_ranges.push(bounds);
    }

    let count = ExpenseRepo::admin_count(&state.pool, &filter).await?;
    let window = page_window(count, params.p, admin.list_per_page)?;
    let expenses = ExpenseRepo::admin_page(&state.pool, &filter, ordering, window).await?;

    let rows = expenses
        .into_iter()
        .map(|e| list_row(ExpenseView::render(e, &state.media), admin.list_display))
        .collect::<AppResult<Vec<_>>>()?;

    let level = drilldown.level();
    let buckets = ExpenseRepo::date_buckets(&state.pool, &filter, level).await?;

    let categories = ExpenseRepo::distinct_categories(&state.pool).await?;
    let filters = ChangeListFilters {
        expense_category: categories
            .into_iter()
            .map(|c| FilterChoice {
                selected: filter.category.as_deref() == Some(c.as_str()),
                label: c.clone(),
                value: c,
            })
            .collect(),
        expense_date: DateRangeFilter::ALL
            .into_iter()
            .map(|f| FilterChoice {
                value: f.as_str().to_string(),
                label: f.label().to_string(),
                selected: date_filter == Some(f),
            })
            .collect(),
    };

    tracing::debug!(count, page = window.page, "Rendered admin change list");

    Ok(Json(ChangeList {
        model: admin.model,
        columns: admin.list_display,
        rows,
        count,
        page: window,
        per_page: admin.list_per_page,
        ordering: format!(
            "{}{}",
            if ordering.descending { "-" } else { "" },
            ordering.field
        ),
        search: filter.search,
        filters,
        date_hierarchy: DateHierarchy {
            field: admin.date_hierarchy,
            level: level_name(level),
            choices: buckets,
        },
    }))
}

/// Keep only the listed columns of a rendered expense.
fn list_row(view: ExpenseView, columns: &[&str]) -> AppResult<Map<String, Value>> {
    let Value::Object(mut full) =
        serde_json::to_value(view).map_err(|e| AppError::InternalError(e.to_string()))?
    else {
        return Err(AppError::InternalError(
            "Expense did not render as an object".into(),
        ));
    };
    Ok(columns
        .iter()
        .filter_map(|c| full.remove(*c).map(|v| (c.to_string(), v)))
        .collect())
}

fn level_name(level: DrilldownLevel) -> &'static str {
    match level {
        DrilldownLevel::Years => "years",
        DrilldownLevel::Months { .. } => "months",
        DrilldownLevel::Days { .. } => "days",
        DrilldownLevel::Day => "day",
    }
}

/// POST /admin/expenses
pub async fn create(
    _admin: AdminUser,
    State(state): State<AppState>,
    body: ExpenseBody,
) -> AppResult<(StatusCode, Json<ExpenseView>)> {
    let input = expense::validate_create(&body.data, body.upload)?;
    let expense = insert(&state, input).await?;
    Ok((StatusCode::CREATED, Json(ExpenseView::render(expense, &state.media))))
}

/// GET /admin/expenses/{id}
pub async fn get_by_id(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ExpenseView>> {
    let expense = ExpenseRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(ExpenseView::render(expense, &state.media)))
}

/// PUT /admin/expenses/{id}
///
/// Partial: fields missing from the body keep their value.
pub async fn update(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    body: ExpenseBody,
) -> AppResult<Json<ExpenseView>> {
    ExpenseRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    let patch = expense::validate_patch(&body.data, body.upload)?;
    let expense = apply(&state, id, patch).await?.ok_or_else(|| not_found(id))?;
    Ok(Json(ExpenseView::render(expense, &state.media)))
}

/// DELETE /admin/expenses/{id}
pub async fn delete(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if remove(&state, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}
