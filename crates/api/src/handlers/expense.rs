//! Handlers for `/api/v1/expenses`, plus the persistence steps every
//! expense surface shares.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use expense_core::error::CoreError;
use expense_core::expense::{self, ExpenseInput, ExpensePatch, ImageChange};
use expense_core::search::{clamp_limit, clamp_offset, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use expense_core::types::DbId;
use expense_db::models::expense::{
    CreateExpense, Expense, ExpenseListFilter, ImageColumn, UpdateExpense,
};
use expense_db::repositories::ExpenseRepo;

use crate::error::{AppError, AppResult};
use crate::extract::{ExpenseBody, Path, Query};
use crate::query::ExpenseListParams;
use crate::response::ExpenseView;
use crate::state::AppState;

/// Store the receipt (if any) and insert the row.
pub(crate) async fn insert(state: &AppState, input: ExpenseInput) -> AppResult<Expense> {
    let image_path = match &input.image {
        Some(image) => Some(store_image(state, image).await?),
        None => None,
    };
    let create = CreateExpense {
        name: input.name,
        amount: input.amount,
        category: input.category,
        date: input.date,
        image_path,
    };
    let expense = match ExpenseRepo::create(&state.pool, &create).await {
        Ok(expense) => expense,
        Err(e) => {
            discard_image(state, create.image_path.as_deref()).await;
            return Err(e.into());
        }
    };
    tracing::info!(
        expense_id = expense.expense_id,
        category = %expense.expense_category,
        has_image = expense.expense_image.is_some(),
        "Expense created"
    );
    Ok(expense)
}

/// Store a replacement receipt (if any) and apply the patch.
///
/// Returns `None` if the row does not exist.
pub(crate) async fn apply(
    state: &AppState,
    id: DbId,
    patch: ExpensePatch,
) -> AppResult<Option<Expense>> {
    let image = match &patch.image {
        ImageChange::Keep => ImageColumn::Keep,
        ImageChange::Clear => ImageColumn::Clear,
        ImageChange::Replace(image) => ImageColumn::Set(store_image(state, image).await?),
    };
    let stored = match &image {
        ImageColumn::Set(path) => Some(path.clone()),
        ImageColumn::Keep | ImageColumn::Clear => None,
    };
    let update = UpdateExpense {
        name: patch.name,
        amount: patch.amount,
        category: patch.category,
        date: patch.date,
        image,
    };
    match ExpenseRepo::update(&state.pool, id, &update).await {
        Ok(Some(expense)) => {
            tracing::info!(expense_id = id, "Expense updated");
            Ok(Some(expense))
        }
        Ok(None) => {
            discard_image(state, stored.as_deref()).await;
            Ok(None)
        }
        Err(e) => {
            discard_image(state, stored.as_deref()).await;
            Err(e.into())
        }
    }
}

/// Remove a row. Stored receipt files are left in place.
pub(crate) async fn remove(state: &AppState, id: DbId) -> AppResult<bool> {
    let deleted = ExpenseRepo::delete(&state.pool, id).await?;
    if deleted {
        tracing::info!(expense_id = id, "Expense deleted");
    }
    Ok(deleted)
}

async fn store_image(
    state: &AppState,
    image: &expense_core::media::ValidatedImage,
) -> AppResult<String> {
    state
        .media
        .save_expense_image(image)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to store receipt image: {e}")))
}

/// Remove a receipt stored for a write that did not happen.
async fn discard_image(state: &AppState, path: Option<&str>) {
    if let Some(path) = path {
        state.media.discard(path).await;
    }
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Expense",
        id,
    })
}

/// POST /api/v1/expenses
pub async fn create(
    State(state): State<AppState>,
    body: ExpenseBody,
) -> AppResult<(StatusCode, Json<ExpenseView>)> {
    let input = expense::validate_create(&body.data, body.upload)?;
    let expense = insert(&state, input).await?;
    Ok((StatusCode::CREATED, Json(ExpenseView::render(expense, &state.media))))
}

/// GET /api/v1/expenses
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ExpenseListParams>,
) -> AppResult<Json<Vec<ExpenseView>>> {
    let filter = ExpenseListFilter {
        category: params.category.filter(|c| !c.is_empty()),
        search: params.search,
        limit: clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT),
        offset: clamp_offset(params.offset),
    };
    let expenses = ExpenseRepo::list_filtered(&state.pool, &filter).await?;
    Ok(Json(ExpenseView::render_all(expenses, &state.media)))
}

/// GET /api/v1/expenses/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ExpenseView>> {
    let expense = ExpenseRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(ExpenseView::render(expense, &state.media)))
}

/// PUT /api/v1/expenses/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    body: ExpenseBody,
) -> AppResult<Json<ExpenseView>> {
    ensure_exists(&state, id).await?;
    let patch = expense::validate_replace(&body.data, body.upload)?;
    let expense = apply(&state, id, patch).await?.ok_or_else(|| not_found(id))?;
    Ok(Json(ExpenseView::render(expense, &state.media)))
}

/// PATCH /api/v1/expenses/{id}
pub async fn patch(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    body: ExpenseBody,
) -> AppResult<Json<ExpenseView>> {
    ensure_exists(&state, id).await?;
    let patch = expense::validate_patch(&body.data, body.upload)?;
    let expense = apply(&state, id, patch).await?.ok_or_else(|| not_found(id))?;
    Ok(Json(ExpenseView::render(expense, &state.media)))
}

/// DELETE /api/v1/expenses/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    if remove(&state, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

async fn ensure_exists(state: &AppState, id: DbId) -> AppResult<()> {
    ExpenseRepo::find_by_id(&state.pool, id)
        .await?
        .map(|_| ())
        .ok_or_else(|| not_found(id))
}
