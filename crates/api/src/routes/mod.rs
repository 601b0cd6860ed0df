pub mod activity;
pub mod admin;
pub mod auth;
pub mod campaigns;
pub mod feedback;
pub mod health;
pub mod leads;
pub mod metrics;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /auth/login                          login (public)
/// /auth/me                             current user
///
/// /admin/users                         list, create (admin)
/// /admin/users/{id}                    get, update, deactivate (admin)
/// /admin/users/{id}/reset-password     set a new password (admin, POST)
/// /admin/activity-log                  recent audit entries (admin)
///
/// /users/agents                        active sales agents (admin, marketing)
///
/// /campaigns                           list (scoped), create (admin, marketing)
/// /campaigns/{id}                      get, update, delete
/// /campaigns/{id}/duplicate            copy as draft (POST)
/// /campaigns/{id}/status               set status (PUT)
/// /campaigns/{id}/toggle               active <-> paused (POST)
///
/// /leads                               list (scoped, filtered), create
/// /leads/unassigned                    assignment candidates
/// /leads/bulk-assign                   bulk assignment (POST)
/// /leads/{id}                          get, update, delete (admin)
/// /leads/{id}/assign                   assign (POST)
/// /leads/{id}/feedback                 submit (POST), get
/// /leads/{id}/history                  audit entries, oldest first
///
/// /feedback                            list (admin all, sales own)
///
/// /activity/daily                      upsert own report (PUT)
/// /activity/weekly                     own week rollup
/// /activity/team                       team day rollup (admin)
///
/// /metrics                             scoped report
/// /metrics/campaigns/{id}              single-campaign lifetime report
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/admin", admin::router())
        .nest("/users", users::router())
        .nest("/campaigns", campaigns::router())
        .nest("/leads", leads::router())
        .nest("/feedback", feedback::router())
        .nest("/activity", activity::router())
        .nest("/metrics", metrics::router())
}
