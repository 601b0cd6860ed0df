//! Daily activity reports and their weekly / team rollups.

use axum::extract::{Query, State};
use axum::Json;
use chrono::Utc;
use leadflow_core::access::ensure_can_report_activity;
use leadflow_core::activity::{
    summarize_team, summarize_week, validate_activity_date, validate_activity_notes,
    validate_counters, week_bounds, AgentActivity, TeamDailySummary, WeeklySummary,
};
use leadflow_db::models::activity::{DailyActivity, UpsertDailyActivity};
use leadflow_db::repositories::DailyActivityRepo;

use crate::error::AppResult;
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::query::DateParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// PUT /api/v1/activity/daily
///
/// File or overwrite the caller's report for a day (default: today).
pub async fn upsert_daily(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(input): Json<UpsertDailyActivity>,
) -> AppResult<Json<DataResponse<DailyActivity>>> {
    ensure_can_report_activity(&user.actor())?;

    let today = Utc::now().date_naive();
    let activity_date = input.activity_date.unwrap_or(today);
    let counters = input.counters();
    validate_activity_date(activity_date, today)?;
    validate_counters(&counters)?;
    validate_activity_notes(input.notes.as_deref())?;

    let row = DailyActivityRepo::upsert(
        &state.pool,
        user.user_id,
        activity_date,
        &counters,
        input.notes.as_deref(),
    )
    .await?;

    tracing::info!(
        user_id = user.user_id,
        %activity_date,
        calls_made = counters.calls_made,
        "Daily activity recorded",
    );
    Ok(Json(DataResponse { data: row }))
}

/// GET /api/v1/activity/weekly?date=
///
/// The caller's Monday-to-Sunday week containing `date` (default: today).
pub async fn weekly(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(params): Query<DateParams>,
) -> AppResult<Json<DataResponse<WeeklySummary>>> {
    let date = params.date.unwrap_or_else(|| Utc::now().date_naive());
    let (week_start, week_end) = week_bounds(date);

    let rows = DailyActivityRepo::list_for_user(&state.pool, user.user_id, week_start, week_end)
        .await?;
    let pairs: Vec<_> = rows
        .iter()
        .map(|row| (row.activity_date, row.counters()))
        .collect();

    Ok(Json(DataResponse {
        data: summarize_week(date, &pairs),
    }))
}

/// GET /api/v1/activity/team?date=
pub async fn team(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(params): Query<DateParams>,
) -> AppResult<Json<DataResponse<TeamDailySummary>>> {
    let date = params.date.unwrap_or_else(|| Utc::now().date_naive());
    let rows = DailyActivityRepo::list_team_for_date(&state.pool, date).await?;
    let agents: Vec<AgentActivity> = rows.into_iter().map(AgentActivity::from).collect();
    Ok(Json(DataResponse {
        data: summarize_team(date, agents),
    }))
}
