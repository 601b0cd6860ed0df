//! Single and bulk lead assignment.

use axum::extract::{Path, State};
use axum::Json;
use leadflow_core::access::ensure_can_assign;
use leadflow_core::error::CoreError;
use leadflow_core::roles::ActorContext;
use leadflow_core::types::DbId;
use leadflow_db::models::lead::Lead;
use leadflow_db::repositories::LeadRepo;
use serde::{Deserialize, Serialize};

use super::leads::{check_assignee, load_ownership};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireStaff;
use crate::response::DataResponse;
use crate::state::AppState;

/// Upper bound on ids accepted by one bulk request.
pub const MAX_BULK_ASSIGN: usize = 500;

/// Request body for `POST /leads/{id}/assign`.
#[derive(Debug, Deserialize)]
pub struct AssignRequest {
    pub assignee_id: DbId,
}

/// Request body for `POST /leads/bulk-assign`.
#[derive(Debug, Deserialize)]
pub struct BulkAssignRequest {
    pub lead_ids: Vec<DbId>,
    pub assignee_id: DbId,
}

#[derive(Debug, Serialize)]
pub struct BulkAssignFailure {
    pub lead_id: DbId,
    pub reason: String,
}

#[derive(Debug, Serialize)]
pub struct BulkAssignResult {
    pub assigned_count: usize,
    /// Number of ids submitted, repeats included.
    pub total: usize,
    pub failures: Vec<BulkAssignFailure>,
}

/// Ownership check plus the transactional write. The assignee must already
/// have been validated.
async fn assign_one(
    state: &AppState,
    actor: &ActorContext,
    lead_id: DbId,
    assignee_id: DbId,
) -> AppResult<Lead> {
    let ownership = load_ownership(state, lead_id).await?;
    ensure_can_assign(actor, ownership.campaign_owner)?;

    let lead = LeadRepo::assign(&state.pool, lead_id, assignee_id, actor.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Lead", lead_id)))?;

    tracing::info!(
        lead_id,
        assignee_id,
        assigned_by = actor.user_id,
        "Lead assigned",
    );
    Ok(lead)
}

/// POST /api/v1/leads/{id}/assign
pub async fn assign(
    State(state): State<AppState>,
    RequireStaff(user): RequireStaff,
    Path(lead_id): Path<DbId>,
    Json(input): Json<AssignRequest>,
) -> AppResult<Json<DataResponse<Lead>>> {
    check_assignee(&state, input.assignee_id).await?;
    let lead = assign_one(&state, &user.actor(), lead_id, input.assignee_id).await?;
    Ok(Json(DataResponse { data: lead }))
}

/// POST /api/v1/leads/bulk-assign
///
/// Each id is assigned independently and in order; failures are reported
/// per id and do not undo earlier assignments. A repeated id is simply
/// assigned again. An invalid assignee fails the whole request up front.
pub async fn bulk_assign(
    State(state): State<AppState>,
    RequireStaff(user): RequireStaff,
    Json(input): Json<BulkAssignRequest>,
) -> AppResult<Json<DataResponse<BulkAssignResult>>> {
    if input.lead_ids.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "lead_ids must not be empty".into(),
        )));
    }
    if input.lead_ids.len() > MAX_BULK_ASSIGN {
        return Err(AppError::Core(CoreError::Validation(format!(
            "At most {MAX_BULK_ASSIGN} leads can be assigned at once"
        ))));
    }
    check_assignee(&state, input.assignee_id).await?;

    let actor = user.actor();
    let mut assigned_count = 0;
    let mut failures = Vec::new();

    for &lead_id in &input.lead_ids {
        match assign_one(&state, &actor, lead_id, input.assignee_id).await {
            Ok(_) => assigned_count += 1,
            Err(AppError::Core(err)) => {
                tracing::warn!(lead_id, error = %err, "Bulk assignment skipped lead");
                failures.push(BulkAssignFailure {
                    lead_id,
                    reason: err.to_string(),
                });
            }
            Err(other) => return Err(other),
        }
    }

    tracing::info!(
        assigned_count,
        total = input.lead_ids.len(),
        assignee_id = input.assignee_id,
        assigned_by = actor.user_id,
        "Bulk assignment finished",
    );

    Ok(Json(DataResponse {
        data: BulkAssignResult {
            assigned_count,
            total: input.lead_ids.len(),
            failures,
        },
    }))
}
