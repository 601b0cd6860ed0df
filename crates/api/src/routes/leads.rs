//! Route definitions for the `/leads` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{assignment, feedback, leads};
use crate::state::AppState;

/// Routes mounted at `/leads`.
///
/// ```text
/// GET    /                -> list (?status=&platform=&campaign_id=&assigned_to=&unassigned=)
/// POST   /                -> create
/// GET    /unassigned      -> list_unassigned
/// POST   /bulk-assign     -> bulk_assign
/// GET    /{id}            -> get_by_id
/// PUT    /{id}            -> update
/// DELETE /{id}            -> delete (admin)
/// POST   /{id}/assign     -> assign
/// POST   /{id}/feedback   -> submit feedback
/// GET    /{id}/feedback   -> get feedback
/// GET    /{id}/history    -> history
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(leads::list).post(leads::create))
        .route("/unassigned", get(leads::list_unassigned))
        .route("/bulk-assign", post(assignment::bulk_assign))
        .route(
            "/{id}",
            get(leads::get_by_id).put(leads::update).delete(leads::delete),
        )
        .route("/{id}/assign", post(assignment::assign))
        .route(
            "/{id}/feedback",
            get(feedback::get_for_lead).post(feedback::submit),
        )
        .route("/{id}/history", get(leads::history))
}
