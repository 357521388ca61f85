//! Route definitions for the admin console.

use axum::routing::get;
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`. Every handler requires the admin token.
///
/// ```text
/// GET    /                 -> index
/// GET    /expenses         -> change_list
/// POST   /expenses         -> create
/// GET    /expenses/{id}    -> get_by_id
/// PUT    /expenses/{id}    -> update (partial)
/// DELETE /expenses/{id}    -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(admin::index))
        .route("/expenses", get(admin::change_list).post(admin::create))
        .route(
            "/expenses/{id}",
            get(admin::get_by_id)
                .put(admin::update)
                .delete(admin::delete),
        )
}
