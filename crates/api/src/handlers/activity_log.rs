//! Admin view of the workflow audit trail.

use axum::extract::{Query, State};
use axum::Json;
use leadflow_db::models::activity_log::ActivityLog;
use leadflow_db::repositories::ActivityLogRepo;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::query::LimitParams;
use crate::response::DataResponse;
use crate::state::AppState;

const DEFAULT_LIMIT: i64 = 50;

/// GET /api/v1/admin/activity-log?limit=
pub async fn list_recent(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(params): Query<LimitParams>,
) -> AppResult<Json<DataResponse<Vec<ActivityLog>>>> {
    let entries =
        ActivityLogRepo::list_recent(&state.pool, params.limit.unwrap_or(DEFAULT_LIMIT)).await?;
    Ok(Json(DataResponse { data: entries }))
}
