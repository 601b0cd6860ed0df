//! Route definitions for `/activity`.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::activity;
use crate::state::AppState;

/// Routes mounted at `/activity`.
///
/// ```text
/// PUT /daily     -> upsert_daily
/// GET /weekly    -> weekly (?date=)
/// GET /team      -> team (?date=, admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/daily", put(activity::upsert_daily))
        .route("/weekly", get(activity::weekly))
        .route("/team", get(activity::team))
}
