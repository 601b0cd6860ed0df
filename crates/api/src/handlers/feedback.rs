//! Lost-lead feedback.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use leadflow_core::access::can_view_lead;
use leadflow_core::error::CoreError;
use leadflow_core::feedback::{resolve_follow_up, validate_reason};
use leadflow_core::roles::Role;
use leadflow_core::types::DbId;
use leadflow_db::models::feedback::{CreateFeedback, Feedback};
use leadflow_db::repositories::FeedbackRepo;

use super::leads::load_ownership;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/leads/{id}/feedback
///
/// Records why the lead was lost and closes it as `closed-lost`. Allowed
/// once per lead, for the assigned agent or an admin.
pub async fn submit(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(lead_id): Path<DbId>,
    Json(input): Json<CreateFeedback>,
) -> AppResult<(StatusCode, Json<DataResponse<Feedback>>)> {
    let actor = user.actor();

    validate_reason(&input.reason_text)?;
    let follow_up_date = resolve_follow_up(
        input.follow_up_required,
        input.follow_up_date,
        Utc::now().date_naive(),
    )?;

    let feedback =
        FeedbackRepo::submit_and_close(&state.pool, lead_id, &actor, &input, follow_up_date)
            .await?
            .into_result(lead_id)?;

    tracing::info!(
        lead_id,
        feedback_id = feedback.id,
        feedback_type = %feedback.feedback_type,
        submitted_by = actor.user_id,
        "Feedback submitted, lead closed as lost",
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: feedback })))
}

/// GET /api/v1/leads/{id}/feedback
pub async fn get_for_lead(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(lead_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Feedback>>> {
    let ownership = load_ownership(&state, lead_id).await?;
    if !can_view_lead(&user.actor(), ownership.assigned_to, ownership.campaign_owner) {
        return Err(AppError::Core(CoreError::Forbidden(
            "You do not have access to this lead".into(),
        )));
    }
    let feedback = FeedbackRepo::find_by_lead(&state.pool, lead_id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Feedback for lead", lead_id)))?;
    Ok(Json(DataResponse { data: feedback }))
}

/// GET /api/v1/feedback
///
/// Admin sees every submission; a sales agent sees their own.
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> AppResult<Json<DataResponse<Vec<Feedback>>>> {
    let sales_id = match user.role {
        Role::Admin => None,
        Role::Sales => Some(user.user_id),
        Role::Marketing => {
            return Err(AppError::Core(CoreError::Forbidden(
                "Feedback is visible to admins and sales agents only".into(),
            )))
        }
    };
    let feedback = FeedbackRepo::list(&state.pool, sales_id).await?;
    Ok(Json(DataResponse { data: feedback }))
}
