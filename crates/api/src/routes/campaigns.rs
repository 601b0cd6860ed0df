//! Route definitions for the `/campaigns` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::campaigns;
use crate::state::AppState;

/// Routes mounted at `/campaigns`.
///
/// ```text
/// GET    /                 -> list (?status=)
/// POST   /                 -> create
/// GET    /{id}             -> get_by_id
/// PUT    /{id}             -> update
/// DELETE /{id}             -> delete
/// POST   /{id}/duplicate   -> duplicate
/// PUT    /{id}/status      -> set_status
/// POST   /{id}/toggle      -> toggle
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(campaigns::list).post(campaigns::create))
        .route(
            "/{id}",
            get(campaigns::get_by_id)
                .put(campaigns::update)
                .delete(campaigns::delete),
        )
        .route("/{id}/duplicate", post(campaigns::duplicate))
        .route("/{id}/status", put(campaigns::set_status))
        .route("/{id}/toggle", post(campaigns::toggle))
}
