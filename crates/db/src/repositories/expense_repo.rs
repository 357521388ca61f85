//! Repository for the `expense` table.

use expense_core::admin::{DrilldownLevel, Ordering, PageWindow, EXPENSE_ADMIN};
use expense_core::search::contains_pattern;
use expense_core::types::DbId;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::models::expense::{
    CreateExpense, Expense, ExpenseAdminFilter, ExpenseListFilter, ImageColumn, UpdateExpense,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "expense_id, expense_name, expense_amount, expense_category, expense_date, expense_image";

/// Provides CRUD, search and admin queries for expenses.
pub struct ExpenseRepo;

impl ExpenseRepo {
    /// Insert a new expense, returning the created row.
    pub async fn create(pool: &SqlitePool, input: &CreateExpense) -> Result<Expense, sqlx::Error> {
        let query = format!(
            "INSERT INTO expense
                (expense_name, expense_amount, expense_category, expense_date, expense_image)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Expense>(&query)
            .bind(&input.name)
            .bind(input.amount)
            .bind(&input.category)
            .bind(input.date)
            .bind(&input.image_path)
            .fetch_one(pool)
            .await
    }

    /// Find an expense by its primary key.
    pub async fn find_by_id(pool: &SqlitePool, id: DbId) -> Result<Option<Expense>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM expense WHERE expense_id = ?1");
        sqlx::query_as::<_, Expense>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List every expense in primary-key order.
    pub async fn list(pool: &SqlitePool) -> Result<Vec<Expense>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM expense ORDER BY expense_id");
        sqlx::query_as::<_, Expense>(&query).fetch_all(pool).await
    }

    /// Case-insensitive substring search over name OR category.
    ///
    /// An empty `needle` matches every row.
    pub async fn search(pool: &SqlitePool, needle: &str) -> Result<Vec<Expense>, sqlx::Error> {
        if needle.is_empty() {
            return Self::list(pool).await;
        }
        let query = format!(
            r"SELECT {COLUMNS} FROM expense
              WHERE expense_name LIKE ?1 ESCAPE '\'
                 OR expense_category LIKE ?1 ESCAPE '\'
              ORDER BY expense_id"
        );
        sqlx::query_as::<_, Expense>(&query)
            .bind(contains_pattern(needle))
            .fetch_all(pool)
            .await
    }

    /// Filtered, paginated list for `/api/v1/expenses`.
    pub async fn list_filtered(
        pool: &SqlitePool,
        filter: &ExpenseListFilter,
    ) -> Result<Vec<Expense>, sqlx::Error> {
        let mut qb = QueryBuilder::<Sqlite>::new(format!("SELECT {COLUMNS} FROM expense WHERE 1 = 1"));
        if let Some(category) = &filter.category {
            qb.push(" AND expense_category = ")
                .push_bind(category.clone())
                .push(" COLLATE NOCASE");
        }
        if let Some(needle) = filter.search.as_deref().filter(|s| !s.is_empty()) {
            let pattern = contains_pattern(needle);
            qb.push(" AND (expense_name LIKE ")
                .push_bind(pattern.clone())
                .push(r" ESCAPE '\' OR expense_category LIKE ")
                .push_bind(pattern)
                .push(r" ESCAPE '\')");
        }
        qb.push(" ORDER BY expense_id LIMIT ")
            .push_bind(filter.limit)
            .push(" OFFSET ")
            .push_bind(filter.offset);
        qb.build_query_as::<Expense>().fetch_all(pool).await
    }

    /// Update an expense. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &SqlitePool,
        id: DbId,
        input: &UpdateExpense,
    ) -> Result<Option<Expense>, sqlx::Error> {
        let (keep_image, image_path) = match &input.image {
            ImageColumn::Keep => (true, None),
            ImageColumn::Clear => (false, None),
            ImageColumn::Set(path) => (false, Some(path.as_str())),
        };
        let query = format!(
            "UPDATE expense SET
                expense_name = COALESCE(?2, expense_name),
                expense_amount = COALESCE(?3, expense_amount),
                expense_category = COALESCE(?4, expense_category),
                expense_date = COALESCE(?5, expense_date),
                expense_image = CASE WHEN ?6 THEN expense_image ELSE ?7 END
             WHERE expense_id = ?1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Expense>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.amount)
            .bind(&input.category)
            .bind(input.date)
            .bind(keep_image)
            .bind(image_path)
            .fetch_optional(pool)
            .await
    }

    /// Delete an expense by primary key. Returns `true` if a row was removed.
    pub async fn delete(pool: &SqlitePool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM expense WHERE expense_id = ?1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Admin change list
    // -----------------------------------------------------------------------

    /// Count rows matching the admin filter.
    pub async fn admin_count(
        pool: &SqlitePool,
        filter: &ExpenseAdminFilter,
    ) -> Result<i64, sqlx::Error> {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM expense WHERE 1 = 1");
        push_admin_filter(&mut qb, filter);
        let (count,) = qb.build_query_as::<(i64,)>().fetch_one(pool).await?;
        Ok(count)
    }

    /// One page of the admin change list.
    pub async fn admin_page(
        pool: &SqlitePool,
        filter: &ExpenseAdminFilter,
        ordering: Ordering,
        window: PageWindow,
    ) -> Result<Vec<Expense>, sqlx::Error> {
        let mut qb = QueryBuilder::<Sqlite>::new(format!("SELECT {COLUMNS} FROM expense WHERE 1 = 1"));
        push_admin_filter(&mut qb, filter);
        // `ordering.field` comes from the admin registration, never from input.
        qb.push(" ORDER BY ")
            .push(ordering.field)
            .push(if ordering.descending { " DESC" } else { " ASC" });
        if ordering.field != "expense_id" {
            qb.push(", expense_id DESC");
        }
        qb.push(" LIMIT ")
            .push_bind(window.limit)
            .push(" OFFSET ")
            .push_bind(window.offset);
        qb.build_query_as::<Expense>().fetch_all(pool).await
    }

    /// Distinct categories, for the category list filter.
    pub async fn distinct_categories(pool: &SqlitePool) -> Result<Vec<String>, sqlx::Error> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT DISTINCT expense_category FROM expense ORDER BY expense_category",
        )
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(|(c,)| c).collect())
    }

    /// Date-hierarchy buckets (`YYYY`, `YYYY-MM` or `YYYY-MM-DD`) present in
    /// the filtered rows. Empty when a single day is already selected.
    pub async fn date_buckets(
        pool: &SqlitePool,
        filter: &ExpenseAdminFilter,
        level: DrilldownLevel,
    ) -> Result<Vec<String>, sqlx::Error> {
        let format = match level {
            DrilldownLevel::Years => "%Y",
            DrilldownLevel::Months { .. } => "%Y-%m",
            DrilldownLevel::Days { .. } => "%Y-%m-%d",
            DrilldownLevel::Day => return Ok(Vec::new()),
        };
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT DISTINCT strftime(");
        qb.push_bind(format)
            .push(", expense_date) AS bucket FROM expense WHERE 1 = 1");
        push_admin_filter(&mut qb, filter);
        qb.push(" ORDER BY bucket");
        let rows = qb
            .build_query_as::<(Option<String>,)>()
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().filter_map(|(b,)| b).collect())
    }
}

fn push_admin_filter(qb: &mut QueryBuilder<'_, Sqlite>, filter: &ExpenseAdminFilter) {
    if let Some(needle) = filter.search.as_deref().filter(|s| !s.is_empty()) {
        let pattern = contains_pattern(needle);
        qb.push(" AND (");
        for (i, field) in EXPENSE_ADMIN.search_fields.iter().enumerate() {
            if i > 0 {
                qb.push(" OR ");
            }
            qb.push(*field)
                .push(" LIKE ")
                .push_bind(pattern.clone())
                .push(r" ESCAPE '\'");
        }
        qb.push(")");
    }
    if let Some(category) = &filter.category {
        qb.push(" AND expense_category = ").push_bind(category.clone());
    }
    for range in &filter.date_ranges {
        qb.push(" AND expense_date >= ")
            .push_bind(range.start)
            .push(" AND expense_date < ")
            .push_bind(range.end);
    }
}
