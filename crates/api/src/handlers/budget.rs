//! Handlers for the `/api/v1/budgets` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use expense_core::budget::{check_period, missing_category_message};
use expense_core::error::CoreError;
use expense_core::types::DbId;
use expense_core::validation::FieldErrors;
use expense_db::models::budget::{Budget, BudgetListParams, CreateBudget, UpdateBudget};
use expense_db::repositories::{BudgetRepo, CategoryRepo};

use crate::error::{AppError, AppResult};
use crate::extract::{Path, Query, ValidatedJson};
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Budget",
        id,
    })
}

/// The referenced category must exist before a budget can point at it.
async fn ensure_category(state: &AppState, category_id: DbId) -> AppResult<()> {
    if CategoryRepo::exists(&state.pool, category_id).await? {
        Ok(())
    } else {
        Err(FieldErrors::single("category_id", missing_category_message(category_id)).into())
    }
}

/// POST /api/v1/budgets
pub async fn create(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateBudget>,
) -> AppResult<(StatusCode, Json<Budget>)> {
    check_period(input.start_date, input.end_date)?;
    ensure_category(&state, input.category_id).await?;
    let budget = BudgetRepo::create(&state.pool, &input).await?;
    tracing::info!(
        budget_id = budget.id,
        category_id = budget.category_id,
        amount = budget.amount,
        "Budget created"
    );
    Ok((StatusCode::CREATED, Json(budget)))
}

/// GET /api/v1/budgets
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<BudgetListParams>,
) -> AppResult<Json<Vec<Budget>>> {
    let budgets = BudgetRepo::list(&state.pool, &params).await?;
    Ok(Json(budgets))
}

/// GET /api/v1/budgets/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Budget>> {
    let budget = BudgetRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(budget))
}

/// PUT /api/v1/budgets/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<CreateBudget>,
) -> AppResult<Json<Budget>> {
    BudgetRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    check_period(input.start_date, input.end_date)?;
    ensure_category(&state, input.category_id).await?;
    let budget = BudgetRepo::update(&state.pool, id, &UpdateBudget::from(input))
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(budget_id = id, "Budget replaced");
    Ok(Json(budget))
}

/// PATCH /api/v1/budgets/{id}
///
/// The period is checked against the stored value of any date not in the body.
pub async fn patch(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<UpdateBudget>,
) -> AppResult<Json<Budget>> {
    let existing = BudgetRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    check_period(
        input.start_date.unwrap_or(existing.start_date),
        input.end_date.unwrap_or(existing.end_date),
    )?;
    if let Some(category_id) = input.category_id {
        ensure_category(&state, category_id).await?;
    }
    let budget = BudgetRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(budget_id = id, "Budget updated");
    Ok(Json(budget))
}

/// DELETE /api/v1/budgets/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    if BudgetRepo::delete(&state.pool, id).await? {
        tracing::info!(budget_id = id, "Budget deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}
