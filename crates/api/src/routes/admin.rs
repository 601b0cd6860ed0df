//! Route definitions for `/admin`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{activity_log, admin};
use crate::state::AppState;

/// Routes mounted at `/admin`. Every handler requires the admin role.
///
/// ```text
/// GET    /users          -> list_users (?role=)
/// POST   /users          -> create_user
/// GET    /users/{id}     -> get_user
/// PUT    /users/{id}     -> update_user
/// DELETE /users/{id}     -> deactivate_user
/// POST   /users/{id}/reset-password -> reset_password
/// GET    /activity-log   -> list_recent (?limit=)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(admin::list_users).post(admin::create_user))
        .route(
            "/users/{id}",
            get(admin::get_user)
                .put(admin::update_user)
                .delete(admin::deactivate_user),
        )
        .route("/users/{id}/reset-password", post(admin::reset_password))
        .route("/activity-log", get(activity_log::list_recent))
}
