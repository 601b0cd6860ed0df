//! Handlers for the `/leads` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use leadflow_core::access::{
    can_view_lead, ensure_can_assign, ensure_staff, ensure_valid_assignee, RecordScope,
};
use leadflow_core::error::CoreError;
use leadflow_core::lead::{
    missing_sale_value, validate_contact, validate_contact_patch, validate_notes,
    validate_sale_value,
};
use leadflow_core::types::DbId;
use leadflow_db::models::activity_log::{ActivityLog, ENTITY_LEAD};
use leadflow_db::models::lead::{
    CreateLead, Lead, LeadFilter, LeadOwnership, LeadUpdate, UpdateLead,
};
use leadflow_db::repositories::{ActivityLogRepo, CampaignRepo, LeadRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::response::DataResponse;
use crate::state::AppState;

/// Load the access-relevant fields of a lead, or 404.
pub(crate) async fn load_ownership(state: &AppState, id: DbId) -> AppResult<LeadOwnership> {
    LeadRepo::find_ownership(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Lead", id)))
}

/// Check that `user_id` exists and may receive leads.
pub(crate) async fn check_assignee(state: &AppState, user_id: DbId) -> AppResult<()> {
    let assignee = UserRepo::find_by_id(&state.pool, user_id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("User", user_id)))?;
    ensure_valid_assignee(assignee.role, assignee.status)?;
    Ok(())
}

/// POST /api/v1/leads
///
/// Any role may enter a lead. A sales agent's lead is assigned to them;
/// staff may name an assignee subject to the usual assignment rules.
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(mut input): Json<CreateLead>,
) -> AppResult<(StatusCode, Json<DataResponse<Lead>>)> {
    let actor = user.actor();
    validate_contact(&input.full_name, &input.phone, input.email.as_deref())?;
    validate_notes(input.notes.as_deref())?;

    let campaign_owner = match input.campaign_id {
        Some(campaign_id) => {
            let campaign = CampaignRepo::find_by_id(&state.pool, campaign_id)
                .await?
                .ok_or(AppError::Core(CoreError::not_found("Campaign", campaign_id)))?;
            Some(campaign.created_by)
        }
        None => None,
    };

    if actor.is_sales() {
        input.assigned_to = Some(actor.user_id);
    } else if let Some(assignee_id) = input.assigned_to {
        ensure_can_assign(&actor, campaign_owner)?;
        check_assignee(&state, assignee_id).await?;
    }

    let lead = LeadRepo::create(&state.pool, actor.user_id, &input).await?;

    tracing::info!(
        lead_id = lead.id,
        created_by = actor.user_id,
        assigned_to = ?lead.assigned_to,
        "Lead created",
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: lead })))
}

/// GET /api/v1/leads
///
/// Scoped by role: admin sees all, marketing the leads of its own
/// campaigns, sales the leads assigned to it.
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(filter): Query<LeadFilter>,
) -> AppResult<Json<DataResponse<Vec<Lead>>>> {
    let scope = RecordScope::for_actor(&user.actor());
    let leads = LeadRepo::list(&state.pool, scope, &filter).await?;
    Ok(Json(DataResponse { data: leads }))
}

/// GET /api/v1/leads/unassigned
///
/// Assignment candidates for admin and marketing.
pub async fn list_unassigned(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> AppResult<Json<DataResponse<Vec<Lead>>>> {
    let actor = user.actor();
    ensure_staff(&actor)?;
    let filter = LeadFilter {
        unassigned: true,
        ..Default::default()
    };
    let leads = LeadRepo::list(&state.pool, RecordScope::for_actor(&actor), &filter).await?;
    Ok(Json(DataResponse { data: leads }))
}

async fn ensure_visible(state: &AppState, user: &AuthUser, id: DbId) -> AppResult<()> {
    let ownership = load_ownership(state, id).await?;
    if !can_view_lead(&user.actor(), ownership.assigned_to, ownership.campaign_owner) {
        return Err(AppError::Core(CoreError::Forbidden(
            "You do not have access to this lead".into(),
        )));
    }
    Ok(())
}

/// GET /api/v1/leads/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Lead>>> {
    ensure_visible(&state, &user, id).await?;
    let lead = LeadRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Lead", id)))?;
    Ok(Json(DataResponse { data: lead }))
}

/// GET /api/v1/leads/{id}/history
///
/// Audit entries for the lead, oldest first.
pub async fn history(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<ActivityLog>>>> {
    ensure_visible(&state, &user, id).await?;
    let entries = ActivityLogRepo::list_for_entity(&state.pool, ENTITY_LEAD, id).await?;
    Ok(Json(DataResponse { data: entries }))
}

/// PUT /api/v1/leads/{id}
///
/// Status change plus optional field edits. Moving to `closed-lost` is
/// refused (use feedback), and a lead closed through feedback keeps its
/// status.
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateLead>,
) -> AppResult<Json<DataResponse<Lead>>> {
    let actor = user.actor();

    validate_contact_patch(
        input.full_name.as_deref(),
        input.phone.as_deref(),
        input.email.as_deref(),
    )?;
    validate_sale_value(input.sale_value)?;
    validate_notes(input.notes.as_deref())?;

    let LeadUpdate {
        lead,
        previous_status,
    } = LeadRepo::update(&state.pool, id, &input, &actor, Utc::now().date_naive())
        .await?
        .into_result(id)?;

    if missing_sale_value(lead.status, lead.sale_value) {
        tracing::warn!(lead_id = id, "Lead closed as won without a sale value; counted as 0");
    }
    if lead.status != previous_status {
        tracing::info!(
            lead_id = id,
            from = %previous_status,
            to = %lead.status,
            updated_by = actor.user_id,
            "Lead status updated",
        );
    }

    Ok(Json(DataResponse { data: lead }))
}

/// DELETE /api/v1/leads/{id}
///
/// Admin housekeeping; removes the lead and its feedback permanently.
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if LeadRepo::hard_delete(&state.pool, id).await? {
        tracing::info!(lead_id = id, deleted_by = admin.user_id, "Lead deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::not_found("Lead", id)))
    }
}
