pub mod admin;
pub mod budget;
pub mod category;
pub mod expense;
pub mod health;
pub mod legacy;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /view                          list every expense
/// /one/{id}                      get one expense
/// /add                           create (POST)
/// /update/{id}                   partial update (PUT, PATCH)
/// /delete/{id}                   delete (DELETE)
/// /search?q=                     substring search
///
/// /v1/categories                 list, create
/// /v1/categories/{id}            get, replace, patch, delete
/// /v1/expenses                   list, create
/// /v1/expenses/{id}              get, replace, patch, delete
/// /v1/budgets                    list, create
/// /v1/budgets/{id}               get, replace, patch, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    let v1 = Router::new()
        .nest("/categories", category::router())
        .nest("/expenses", expense::router())
        .nest("/budgets", budget::router());

    legacy::router().nest("/v1", v1)
}
