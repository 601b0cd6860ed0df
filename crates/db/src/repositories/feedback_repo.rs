//! Repository for the `lead_feedback` table.

use leadflow_core::access::ensure_can_work_lead;
use leadflow_core::feedback::ensure_no_prior_feedback;
use leadflow_core::lead::LeadStatus;
use leadflow_core::roles::ActorContext;
use leadflow_core::types::{Date, DbId};
use serde_json::json;
use sqlx::{PgExecutor, PgPool};

use crate::models::activity_log::{CreateActivityLog, ACTION_FEEDBACK_SUBMITTED, ENTITY_LEAD};
use crate::models::feedback::{CreateFeedback, Feedback};
use crate::models::lead::LockedWrite;
use crate::repositories::{ActivityLogRepo, LeadRepo};

const COLUMNS: &str = "id, lead_id, sales_id, feedback_type, reason_text, follow_up_required, \
                       follow_up_date, submitted_at";

/// Name of the constraint enforcing one feedback row per lead.
pub const UNIQUE_LEAD_CONSTRAINT: &str = "uq_lead_feedback_lead_id";

pub struct FeedbackRepo;

impl FeedbackRepo {
    pub async fn exists_for_lead<'e, E>(executor: E, lead_id: DbId) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM lead_feedback WHERE lead_id = $1)")
            .bind(lead_id)
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_lead(
        pool: &PgPool,
        lead_id: DbId,
    ) -> Result<Option<Feedback>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM lead_feedback WHERE lead_id = $1");
        sqlx::query_as::<_, Feedback>(&query)
            .bind(lead_id)
            .fetch_optional(pool)
            .await
    }

    /// Feedback rows, newest first, optionally limited to one submitter.
    pub async fn list(pool: &PgPool, sales_id: Option<DbId>) -> Result<Vec<Feedback>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM lead_feedback
             WHERE ($1::BIGINT IS NULL OR sales_id = $1)
             ORDER BY submitted_at DESC, id DESC"
        );
        sqlx::query_as::<_, Feedback>(&query)
            .bind(sales_id)
            .fetch_all(pool)
            .await
    }

    /// Record feedback from `actor` and close the lead as `closed-lost` in
    /// one transaction.
    ///
    /// The assignee and prior-feedback checks run under the lead's row lock.
    /// [`UNIQUE_LEAD_CONSTRAINT`] still backs the one-per-lead rule.
    pub async fn submit_and_close(
        pool: &PgPool,
        lead_id: DbId,
        actor: &ActorContext,
        input: &CreateFeedback,
        follow_up_date: Option<Date>,
    ) -> Result<LockedWrite<Feedback>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let Some(locked) = LeadRepo::lock(&mut *tx, lead_id).await? else {
            return Ok(LockedWrite::NotFound);
        };
        let checked = ensure_can_work_lead(actor, locked.assigned_to)
            .and_then(|()| ensure_no_prior_feedback(locked.has_feedback));
        if let Err(err) = checked {
            return Ok(LockedWrite::Rejected(err));
        }

        let query = format!(
            "INSERT INTO lead_feedback
                (lead_id, sales_id, feedback_type, reason_text, follow_up_required, follow_up_date)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        let feedback = sqlx::query_as::<_, Feedback>(&query)
            .bind(lead_id)
            .bind(actor.user_id)
            .bind(input.feedback_type.as_str())
            .bind(input.reason_text.trim())
            .bind(input.follow_up_required)
            .bind(follow_up_date)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("UPDATE leads SET status = $2 WHERE id = $1")
            .bind(lead_id)
            .bind(LeadStatus::ClosedLost.as_str())
            .execute(&mut *tx)
            .await?;

        ActivityLogRepo::insert(
            &mut *tx,
            &CreateActivityLog {
                user_id: Some(actor.user_id),
                action: ACTION_FEEDBACK_SUBMITTED,
                entity_type: ENTITY_LEAD,
                entity_id: lead_id,
                details: json!({
                    "from": locked.status.as_str(),
                    "feedback_type": input.feedback_type.as_str(),
                }),
            },
        )
        .await?;

        tx.commit().await?;
        Ok(LockedWrite::Written(feedback))
    }
}
