//! Handlers for the original `/api/*` expense endpoints.
//!
//! Success bodies are `{"message": ...}` acknowledgements or bare expense
//! objects; failures render through [`LegacyError`].

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use expense_core::expense;
use expense_core::types::DbId;
use expense_db::repositories::ExpenseRepo;

use crate::error::{AppError, AppResult, LegacyError, LegacyResult};
use crate::extract::ExpenseBody;
use crate::handlers::expense::{apply, insert, remove};
use crate::query::SearchParams;
use crate::response::{ExpenseView, MessageResponse};
use crate::state::AppState;

const ADDED: MessageResponse = MessageResponse::new("Expense added successfully");
const UPDATED: MessageResponse = MessageResponse::new("Expense updated successfully");
const DELETED: MessageResponse = MessageResponse::new("Expense deleted successfully");

/// Ids that are not integers never match a row.
fn parse_id(raw: &str) -> LegacyResult<DbId> {
    raw.parse().map_err(|_| LegacyError::NotFound)
}

/// GET /api/view
pub async fn view(State(state): State<AppState>) -> AppResult<Json<Vec<ExpenseView>>> {
    let expenses = ExpenseRepo::list(&state.pool).await?;
    Ok(Json(ExpenseView::render_all(expenses, &state.media)))
}

/// GET /api/one/{id}
pub async fn one(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> LegacyResult<Json<ExpenseView>> {
    let id = parse_id(&raw_id)?;
    let expense = ExpenseRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(LegacyError::NotFound)?;
    Ok(Json(ExpenseView::render(expense, &state.media)))
}

/// POST /api/add
pub async fn add(
    State(state): State<AppState>,
    body: Result<ExpenseBody, AppError>,
) -> LegacyResult<(StatusCode, Json<MessageResponse>)> {
    let body = body?;
    let input = expense::validate_create(&body.data, body.upload)?;
    insert(&state, input).await?;
    Ok((StatusCode::CREATED, Json(ADDED)))
}

/// PUT|PATCH /api/update/{id}
///
/// Always a partial update: fields missing from the body keep their value.
pub async fn update(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    body: Result<ExpenseBody, AppError>,
) -> LegacyResult<Json<MessageResponse>> {
    let id = parse_id(&raw_id)?;
    if ExpenseRepo::find_by_id(&state.pool, id).await?.is_none() {
        return Err(LegacyError::NotFound);
    }
    let body = body?;
    let patch = expense::validate_patch(&body.data, body.upload)?;
    apply(&state, id, patch).await?.ok_or(LegacyError::NotFound)?;
    Ok(Json(UPDATED))
}

/// DELETE /api/delete/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> LegacyResult<Json<MessageResponse>> {
    let id = parse_id(&raw_id)?;
    if remove(&state, id).await? {
        Ok(Json(DELETED))
    } else {
        Err(LegacyError::NotFound)
    }
}

/// GET /api/search?q=
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<Vec<ExpenseView>>> {
    let expenses = ExpenseRepo::search(&state.pool, &params.q).await?;
    Ok(Json(ExpenseView::render_all(expenses, &state.media)))
}
