//! Non-admin user lookups.

use axum::extract::State;
use axum::Json;
use leadflow_db::models::user::AgentSummary;
use leadflow_db::repositories::UserRepo;

use crate::error::AppResult;
use crate::middleware::rbac::RequireStaff;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/users/agents
///
/// Active sales users, i.e. the valid assignees for a lead.
pub async fn list_agents(
    State(state): State<AppState>,
    RequireStaff(_user): RequireStaff,
) -> AppResult<Json<DataResponse<Vec<AgentSummary>>>> {
    let agents = UserRepo::list_active_agents(&state.pool).await?;
    Ok(Json(DataResponse { data: agents }))
}
