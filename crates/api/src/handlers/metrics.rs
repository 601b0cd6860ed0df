//! Performance reports built from lead and campaign rows.

use std::collections::BTreeSet;

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::Utc;
use leadflow_core::access::{ensure_campaign_owner, RecordScope};
use leadflow_core::error::CoreError;
use leadflow_core::metrics::{
    campaign_report, compute_report, CampaignBudget, CampaignReport, DateRange, GroupBy, LeadFact,
    MetricsReport,
};
use leadflow_core::types::DbId;
use leadflow_db::repositories::{CampaignRepo, MetricsRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAuth;
use crate::query::MetricsParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/metrics?from=&to=&group_by=
///
/// Scoped by role like the lead list. `group_by` defaults to `platform`;
/// the range defaults to the last 30 days.
pub async fn report(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(params): Query<MetricsParams>,
) -> AppResult<Json<DataResponse<MetricsReport>>> {
    let range = DateRange::resolve(params.from, params.to, Utc::now().date_naive())?;
    let group_by = params.group_by.unwrap_or(GroupBy::Platform);
    let scope = RecordScope::for_actor(&user.actor());

    let facts: Vec<LeadFact> = MetricsRepo::facts_in_range(&state.pool, range, scope)
        .await?
        .into_iter()
        .map(LeadFact::from)
        .collect();

    let budgets: Vec<CampaignBudget> = if group_by == GroupBy::Campaign {
        let ids: Vec<DbId> = facts
            .iter()
            .filter_map(|f| f.campaign_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        CampaignRepo::budgets(&state.pool, &ids)
            .await?
            .into_iter()
            .map(CampaignBudget::from)
            .collect()
    } else {
        Vec::new()
    };

    tracing::debug!(
        user_id = user.user_id,
        from = %range.from,
        to = %range.to,
        group_by = %group_by,
        facts = facts.len(),
        "Computing metrics report",
    );

    Ok(Json(DataResponse {
        data: compute_report(range, group_by, &facts, &budgets),
    }))
}

/// GET /api/v1/metrics/campaigns/{id}
///
/// Lifetime performance of one campaign; admin or the campaign's author.
pub async fn campaign(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<CampaignReport>>> {
    let campaign = CampaignRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Campaign", id)))?;
    ensure_campaign_owner(&user.actor(), campaign.created_by)?;

    let facts: Vec<LeadFact> = MetricsRepo::facts_for_campaign(&state.pool, id)
        .await?
        .into_iter()
        .map(LeadFact::from)
        .collect();

    Ok(Json(DataResponse {
        data: campaign_report(id, &campaign.title, campaign.budget, &facts),
    }))
}
