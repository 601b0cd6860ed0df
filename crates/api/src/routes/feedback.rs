use axum::routing::get;
use axum::Router;

use crate::handlers::feedback;
use crate::state::AppState;

/// Routes mounted at `/feedback`.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(feedback::list))
}
