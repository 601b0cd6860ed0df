//! Handlers for the `/campaigns` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use leadflow_core::access::{can_view_campaign, ensure_campaign_owner, RecordScope};
use leadflow_core::campaign::{
    duplicate_title, duplicate_window, toggled_status, validate_campaign, CampaignStatus,
};
use leadflow_core::error::CoreError;
use leadflow_core::platform::PlatformSet;
use leadflow_core::roles::ActorContext;
use leadflow_core::types::DbId;
use leadflow_db::models::campaign::{Campaign, CampaignDeletion, CreateCampaign, UpdateCampaign};
use leadflow_db::repositories::{CampaignRepo, UserRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAuth, RequireStaff};
use crate::query::CampaignListParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `PUT /campaigns/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct SetStatusRequest {
    pub status: CampaignStatus,
}

/// Load a campaign and check that `actor` may manage it.
async fn load_owned(state: &AppState, actor: &ActorContext, id: DbId) -> AppResult<Campaign> {
    let campaign = CampaignRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Campaign", id)))?;
    ensure_campaign_owner(actor, campaign.created_by)?;
    Ok(campaign)
}

async fn ensure_user_exists(state: &AppState, user_id: Option<DbId>) -> AppResult<()> {
    if let Some(user_id) = user_id {
        UserRepo::find_by_id(&state.pool, user_id)
            .await?
            .ok_or(AppError::Core(CoreError::not_found("User", user_id)))?;
    }
    Ok(())
}

/// POST /api/v1/campaigns
pub async fn create(
    State(state): State<AppState>,
    RequireStaff(user): RequireStaff,
    Json(input): Json<CreateCampaign>,
) -> AppResult<(StatusCode, Json<DataResponse<Campaign>>)> {
    validate_campaign(&input.title, input.budget, input.start_date, input.end_date)?;
    let platforms = PlatformSet::new(input.platforms.clone())?;
    ensure_user_exists(&state, input.assigned_to).await?;

    let campaign = CampaignRepo::create(&state.pool, user.user_id, &input, &platforms).await?;

    tracing::info!(
        campaign_id = campaign.id,
        created_by = user.user_id,
        "Campaign created",
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: campaign })))
}

/// GET /api/v1/campaigns
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(params): Query<CampaignListParams>,
) -> AppResult<Json<DataResponse<Vec<Campaign>>>> {
    let scope = RecordScope::for_actor(&user.actor());
    let campaigns = CampaignRepo::list(&state.pool, scope, params.status).await?;
    Ok(Json(DataResponse { data: campaigns }))
}

/// GET /api/v1/campaigns/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Campaign>>> {
    let actor = user.actor();
    let campaign = CampaignRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Campaign", id)))?;

    let has_assigned_leads = if actor.is_sales() {
        CampaignRepo::has_leads_assigned_to(&state.pool, id, actor.user_id).await?
    } else {
        false
    };
    if !can_view_campaign(&actor, campaign.created_by, campaign.assigned_to, has_assigned_leads) {
        return Err(AppError::Core(CoreError::Forbidden(
            "You do not have access to this campaign".into(),
        )));
    }

    Ok(Json(DataResponse { data: campaign }))
}

/// PUT /api/v1/campaigns/{id}
///
/// Fields not supplied keep their stored values; the merged result must
/// still satisfy the campaign invariants.
pub async fn update(
    State(state): State<AppState>,
    RequireStaff(user): RequireStaff,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCampaign>,
) -> AppResult<Json<DataResponse<Campaign>>> {
    let existing = load_owned(&state, &user.actor(), id).await?;

    validate_campaign(
        input.title.as_deref().unwrap_or(&existing.title),
        input.budget.unwrap_or(existing.budget),
        input.start_date.unwrap_or(existing.start_date),
        input.end_date.unwrap_or(existing.end_date),
    )?;
    let platforms = input
        .platforms
        .clone()
        .map(PlatformSet::new)
        .transpose()?;
    ensure_user_exists(&state, input.assigned_to).await?;

    let campaign = CampaignRepo::update(&state.pool, id, &input, platforms.as_ref())
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Campaign", id)))?;

    tracing::info!(campaign_id = id, updated_by = user.user_id, "Campaign updated");
    Ok(Json(DataResponse { data: campaign }))
}

/// DELETE /api/v1/campaigns/{id}
///
/// Refused with 409 while the campaign still owns leads.
pub async fn delete(
    State(state): State<AppState>,
    RequireStaff(user): RequireStaff,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    load_owned(&state, &user.actor(), id).await?;

    match CampaignRepo::delete_if_unused(&state.pool, id, user.user_id).await? {
        CampaignDeletion::Deleted => {
            tracing::info!(campaign_id = id, deleted_by = user.user_id, "Campaign deleted");
            Ok(StatusCode::NO_CONTENT)
        }
        CampaignDeletion::NotFound => Err(AppError::Core(CoreError::not_found("Campaign", id))),
        CampaignDeletion::HasLeads(count) => Err(AppError::Core(CoreError::Conflict(format!(
            "Cannot delete campaign with existing leads ({count})"
        )))),
    }
}

/// POST /api/v1/campaigns/{id}/duplicate
///
/// The copy starts as `draft`, runs from today for 30 days and gets a
/// ` (Copy)` title suffix.
pub async fn duplicate(
    State(state): State<AppState>,
    RequireStaff(user): RequireStaff,
    Path(id): Path<DbId>,
) -> AppResult<(StatusCode, Json<DataResponse<Campaign>>)> {
    let source = load_owned(&state, &user.actor(), id).await?;

    let (start_date, end_date) = duplicate_window(Utc::now().date_naive());
    let copy = CampaignRepo::duplicate(
        &state.pool,
        id,
        &duplicate_title(&source.title),
        start_date,
        end_date,
    )
    .await?
    .ok_or(AppError::Core(CoreError::not_found("Campaign", id)))?;

    tracing::info!(
        source_id = id,
        campaign_id = copy.id,
        duplicated_by = user.user_id,
        "Campaign duplicated",
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: copy })))
}

/// PUT /api/v1/campaigns/{id}/status
pub async fn set_status(
    State(state): State<AppState>,
    RequireStaff(user): RequireStaff,
    Path(id): Path<DbId>,
    Json(input): Json<SetStatusRequest>,
) -> AppResult<Json<DataResponse<Campaign>>> {
    load_owned(&state, &user.actor(), id).await?;
    apply_status(&state, id, input.status, user.user_id).await
}

/// POST /api/v1/campaigns/{id}/toggle
///
/// Flips `active` and `paused`; any other status is a 409.
pub async fn toggle(
    State(state): State<AppState>,
    RequireStaff(user): RequireStaff,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Campaign>>> {
    let campaign = load_owned(&state, &user.actor(), id).await?;
    let next = toggled_status(campaign.status)?;
    apply_status(&state, id, next, user.user_id).await
}

async fn apply_status(
    state: &AppState,
    id: DbId,
    status: CampaignStatus,
    actor_id: DbId,
) -> AppResult<Json<DataResponse<Campaign>>> {
    let campaign = CampaignRepo::set_status(&state.pool, id, status, actor_id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Campaign", id)))?;

    tracing::info!(campaign_id = id, status = %status, changed_by = actor_id, "Campaign status changed");
    Ok(Json(DataResponse { data: campaign }))
}
