//! Repository for the `budgets` table.

use expense_core::search::{clamp_limit, clamp_offset, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use expense_core::types::DbId;
use sqlx::SqlitePool;

use crate::models::budget::{Budget, BudgetListParams, CreateBudget, UpdateBudget};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, category_id, amount, start_date, end_date, created_at, updated_at";

/// Provides CRUD operations for budgets.
pub struct BudgetRepo;

impl BudgetRepo {
    /// Insert a new budget, returning the created row.
    pub async fn create(pool: &SqlitePool, input: &CreateBudget) -> Result<Budget, sqlx::Error> {
        let query = format!(
            "INSERT INTO budgets (category_id, amount, start_date, end_date)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Budget>(&query)
            .bind(input.category_id)
            .bind(input.amount)
            .bind(input.start_date)
            .bind(input.end_date)
            .fetch_one(pool)
            .await
    }

    /// Find a budget by its ID.
    pub async fn find_by_id(pool: &SqlitePool, id: DbId) -> Result<Option<Budget>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM budgets WHERE id = ?1");
        sqlx::query_as::<_, Budget>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List budgets, newest period first, optionally for one category.
    pub async fn list(
        pool: &SqlitePool,
        params: &BudgetListParams,
    ) -> Result<Vec<Budget>, sqlx::Error> {
        let limit = clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
        let offset = clamp_offset(params.offset);
        let query = format!(
            "SELECT {COLUMNS} FROM budgets
             WHERE (?1 IS NULL OR category_id = ?1)
             ORDER BY start_date DESC, id DESC
             LIMIT ?2 OFFSET ?3"
        );
        sqlx::query_as::<_, Budget>(&query)
            .bind(params.category_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Update a budget. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &SqlitePool,
        id: DbId,
        input: &UpdateBudget,
    ) -> Result<Option<Budget>, sqlx::Error> {
        let query = format!(
            "UPDATE budgets SET
                category_id = COALESCE(?2, category_id),
                amount = COALESCE(?3, amount),
                start_date = COALESCE(?4, start_date),
                end_date = COALESCE(?5, end_date),
                updated_at = strftime('%Y-%m-%dT%H:%M:%SZ', 'now')
             WHERE id = ?1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Budget>(&query)
            .bind(id)
            .bind(input.category_id)
            .bind(input.amount)
            .bind(input.start_date)
            .bind(input.end_date)
            .fetch_optional(pool)
            .await
    }

    /// Delete a budget by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &SqlitePool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM budgets WHERE id = ?1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
