//! Route definitions for the original `/api/*` expense endpoints.

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::legacy;
use crate::state::AppState;

/// Routes mounted at `/api`.
///
/// ```text
/// GET          /view          -> view
/// GET          /one/{id}      -> one
/// POST         /add           -> add
/// PUT, PATCH   /update/{id}   -> update
/// DELETE       /delete/{id}   -> delete
/// GET          /search        -> search
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/view", get(legacy::view))
        .route("/one/{id}", get(legacy::one))
        .route("/add", post(legacy::add))
        .route("/update/{id}", put(legacy::update).patch(legacy::update))
        .route("/delete/{id}", delete(legacy::delete))
        .route("/search", get(legacy::search))
}
