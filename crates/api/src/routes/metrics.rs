use axum::routing::get;
use axum::Router;

use crate::handlers::metrics;
use crate::state::AppState;

/// Routes mounted at `/metrics`.
///
/// ```text
/// GET /                  -> report (?from=&to=&group_by=)
/// GET /campaigns/{id}    -> campaign
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(metrics::report))
        .route("/campaigns/{id}", get(metrics::campaign))
}
