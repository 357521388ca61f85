//! Handlers for the `/api/v1/categories` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use expense_core::error::CoreError;
use expense_core::search::{clamp_limit, clamp_offset, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use expense_core::types::DbId;
use expense_db::models::category::{Category, CreateCategory, UpdateCategory};
use expense_db::repositories::CategoryRepo;

use crate::error::{AppError, AppResult};
use crate::extract::{Path, Query, ValidatedJson};
use crate::query::PaginationParams;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Category",
        id,
    })
}

/// A duplicate name is a conflict; any other database error passes through.
fn name_taken(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => AppError::Core(
            CoreError::Conflict("A category with this name already exists.".to_string()),
        ),
        _ => AppError::Database(err),
    }
}

/// POST /api/v1/categories
pub async fn create(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateCategory>,
) -> AppResult<(StatusCode, Json<Category>)> {
    let category = CategoryRepo::create(&state.pool, &input)
        .await
        .map_err(name_taken)?;
    tracing::info!(category_id = category.id, name = %category.name, "Category created");
    Ok((StatusCode::CREATED, Json(category)))
}

/// GET /api/v1/categories
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Vec<Category>>> {
    let limit = clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
    let offset = clamp_offset(params.offset);
    let categories = CategoryRepo::list(&state.pool, limit, offset).await?;
    Ok(Json(categories))
}

/// GET /api/v1/categories/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Category>> {
    let category = CategoryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(category))
}

/// PUT /api/v1/categories/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<CreateCategory>,
) -> AppResult<Json<Category>> {
    let category = CategoryRepo::replace(&state.pool, id, &input)
        .await
        .map_err(name_taken)?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(category_id = id, "Category replaced");
    Ok(Json(category))
}

/// PATCH /api/v1/categories/{id}
pub async fn patch(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<UpdateCategory>,
) -> AppResult<Json<Category>> {
    let category = CategoryRepo::update(&state.pool, id, &input)
        .await
        .map_err(name_taken)?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(category_id = id, "Category updated");
    Ok(Json(category))
}

/// DELETE /api/v1/categories/{id}
///
/// Budgets for the category are removed with it.
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    if CategoryRepo::delete(&state.pool, id).await? {
        tracing::info!(category_id = id, "Category deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}
