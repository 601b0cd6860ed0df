//! Repository for the `leads` table.

use leadflow_core::access::{ensure_can_work_lead, RecordScope};
use leadflow_core::lead::{counts_as_contact, validate_status_change, LeadQuality, LeadStatus};
use leadflow_core::platform::Platform;
use leadflow_core::roles::ActorContext;
use leadflow_core::types::{Date, DbId};
use serde_json::json;
use sqlx::{PgConnection, PgPool};

use crate::models::activity_log::{
    CreateActivityLog, ACTION_LEAD_ASSIGNED, ACTION_LEAD_STATUS_UPDATED, ENTITY_LEAD,
};
use crate::models::lead::{
    CreateLead, Lead, LeadFilter, LeadOwnership, LeadUpdate, LockedLead, LockedWrite, UpdateLead,
};
use crate::repositories::{ActivityLogRepo, FeedbackRepo};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, full_name, phone, email, campaign_id, platform, product, notes, \
                       assigned_to, status, sale_value, lead_source, lead_quality, \
                       last_contact_date, next_follow_up, created_by, created_at, updated_at";

/// [`COLUMNS`] qualified with the `l` alias for joined queries.
const L_COLUMNS: &str = "l.id, l.full_name, l.phone, l.email, l.campaign_id, l.platform, \
                         l.product, l.notes, l.assigned_to, l.status, l.sale_value, \
                         l.lead_source, l.lead_quality, l.last_contact_date, l.next_follow_up, \
                         l.created_by, l.created_at, l.updated_at";

/// Sort key placing leads in [`LeadStatus::pipeline_rank`] order.
fn pipeline_order() -> String {
    let arms: String = LeadStatus::ALL
        .iter()
        .map(|s| format!(" WHEN '{}' THEN {}", s.as_str(), s.pipeline_rank()))
        .collect();
    format!("CASE l.status{arms} ELSE {} END", LeadStatus::ALL.len())
}

/// Provides CRUD and workflow operations for leads.
pub struct LeadRepo;

impl LeadRepo {
    /// Insert a new lead with status `new`.
    pub async fn create(
        pool: &PgPool,
        created_by: DbId,
        input: &CreateLead,
    ) -> Result<Lead, sqlx::Error> {
        let query = format!(
            "INSERT INTO leads
                (full_name, phone, email, campaign_id, platform, product, notes,
                 lead_source, lead_quality, next_follow_up, assigned_to, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Lead>(&query)
            .bind(input.full_name.trim())
            .bind(input.phone.trim())
            .bind(&input.email)
            .bind(input.campaign_id)
            .bind(input.platform.as_str())
            .bind(&input.product)
            .bind(&input.notes)
            .bind(&input.lead_source)
            .bind(input.lead_quality.unwrap_or_default().as_str())
            .bind(input.next_follow_up)
            .bind(input.assigned_to)
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Lead>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM leads WHERE id = $1");
        sqlx::query_as::<_, Lead>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Load the assignee and campaign owner of a lead for access checks.
    pub async fn find_ownership(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<LeadOwnership>, sqlx::Error> {
        sqlx::query_as::<_, LeadOwnership>(
            "SELECT c.created_by AS campaign_owner, l.assigned_to
             FROM leads l
             LEFT JOIN campaigns c ON c.id = l.campaign_id
             WHERE l.id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// List leads visible under `scope` matching `filter`, in pipeline order
    /// and newest first within a stage.
    pub async fn list(
        pool: &PgPool,
        scope: RecordScope,
        filter: &LeadFilter,
    ) -> Result<Vec<Lead>, sqlx::Error> {
        let query = format!(
            "SELECT {L_COLUMNS}
             FROM leads l
             LEFT JOIN campaigns c ON c.id = l.campaign_id
             WHERE ($1::BIGINT IS NULL OR c.created_by = $1)
               AND ($2::BIGINT IS NULL OR l.assigned_to = $2)
               AND ($3::TEXT IS NULL OR l.status = $3)
               AND ($4::TEXT IS NULL OR l.platform = $4)
               AND ($5::BIGINT IS NULL OR l.campaign_id = $5)
               AND ($6::BIGINT IS NULL OR l.assigned_to = $6)
               AND (NOT $7 OR l.assigned_to IS NULL)
             ORDER BY {order}, l.created_at DESC, l.id DESC",
            order = pipeline_order(),
        );
        sqlx::query_as::<_, Lead>(&query)
            .bind(scope.campaign_owner())
            .bind(scope.assignee())
            .bind(filter.status.map(LeadStatus::as_str))
            .bind(filter.platform.map(Platform::as_str))
            .bind(filter.campaign_id)
            .bind(filter.assigned_to)
            .bind(filter.unassigned)
            .fetch_all(pool)
            .await
    }

    /// Point the lead at a new assignee and log the change, atomically.
    ///
    /// Concurrent assignments of the same lead serialize on the row lock;
    /// the last one to commit wins. Returns `None` if the lead does not exist.
    pub async fn assign(
        pool: &PgPool,
        lead_id: DbId,
        assignee_id: DbId,
        actor_id: DbId,
    ) -> Result<Option<Lead>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let previous: Option<Option<DbId>> =
            sqlx::query_scalar("SELECT assigned_to FROM leads WHERE id = $1 FOR UPDATE")
                .bind(lead_id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some(previous) = previous else {
            return Ok(None);
        };

        let query = format!("UPDATE leads SET assigned_to = $2 WHERE id = $1 RETURNING {COLUMNS}");
        let lead = sqlx::query_as::<_, Lead>(&query)
            .bind(lead_id)
            .bind(assignee_id)
            .fetch_one(&mut *tx)
            .await?;

        ActivityLogRepo::insert(
            &mut *tx,
            &CreateActivityLog {
                user_id: Some(actor_id),
                action: ACTION_LEAD_ASSIGNED,
                entity_type: ENTITY_LEAD,
                entity_id: lead_id,
                details: json!({ "from": previous, "to": assignee_id }),
            },
        )
        .await?;

        tx.commit().await?;
        Ok(Some(lead))
    }

    /// Lock the lead row for the rest of the transaction and read the state
    /// the workflow rules depend on. The feedback lookup runs after the lock
    /// so it sees any submission that committed while we waited.
    pub(crate) async fn lock(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<LockedLead>, sqlx::Error> {
        let row: Option<(Option<DbId>, String)> =
            sqlx::query_as("SELECT assigned_to, status FROM leads WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *conn)
                .await?;
        let Some((assigned_to, status)) = row else {
            return Ok(None);
        };
        let status = status
            .parse::<LeadStatus>()
            .map_err(|e| sqlx::Error::Decode(e.into()))?;
        let has_feedback = FeedbackRepo::exists_for_lead(&mut *conn, id).await?;
        Ok(Some(LockedLead {
            assigned_to,
            status,
            has_feedback,
        }))
    }

    /// Apply a patch on behalf of `actor`. Only non-`None` fields in `input`
    /// are applied.
    ///
    /// Access and status rules are checked against the locked row, so a
    /// feedback submission racing this update either lands first and gets
    /// the update rejected, or waits for it. Moving off the current status
    /// stamps `last_contact_date` with `today` unless the patch carries one.
    /// A status change writes an activity log entry in the same transaction.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateLead,
        actor: &ActorContext,
        today: Date,
    ) -> Result<LockedWrite<LeadUpdate>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let Some(locked) = Self::lock(&mut *tx, id).await? else {
            return Ok(LockedWrite::NotFound);
        };
        let checked = ensure_can_work_lead(actor, locked.assigned_to).and_then(|()| {
            match input.status {
                Some(next) => validate_status_change(locked.status, next, locked.has_feedback),
                None => Ok(()),
            }
        });
        if let Err(err) = checked {
            return Ok(LockedWrite::Rejected(err));
        }

        let last_contact_date = input.last_contact_date.or_else(|| {
            input
                .status
                .filter(|&next| counts_as_contact(locked.status, next))
                .map(|_| today)
        });

        let query = format!(
            "UPDATE leads SET
                status = COALESCE($2, status),
                full_name = COALESCE($3, full_name),
                phone = COALESCE($4, phone),
                email = COALESCE($5, email),
                product = COALESCE($6, product),
                notes = COALESCE($7, notes),
                sale_value = COALESCE($8, sale_value),
                lead_quality = COALESCE($9, lead_quality),
                next_follow_up = COALESCE($10, next_follow_up),
                last_contact_date = COALESCE($11, last_contact_date)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let lead = sqlx::query_as::<_, Lead>(&query)
            .bind(id)
            .bind(input.status.map(LeadStatus::as_str))
            .bind(input.full_name.as_deref().map(str::trim))
            .bind(input.phone.as_deref().map(str::trim))
            .bind(&input.email)
            .bind(&input.product)
            .bind(&input.notes)
            .bind(input.sale_value)
            .bind(input.lead_quality.map(LeadQuality::as_str))
            .bind(input.next_follow_up)
            .bind(last_contact_date)
            .fetch_one(&mut *tx)
            .await?;

        if lead.status != locked.status {
            ActivityLogRepo::insert(
                &mut *tx,
                &CreateActivityLog {
                    user_id: Some(actor.user_id),
                    action: ACTION_LEAD_STATUS_UPDATED,
                    entity_type: ENTITY_LEAD,
                    entity_id: id,
                    details: json!({ "from": locked.status.as_str(), "to": lead.status.as_str() }),
                },
            )
            .await?;
        }

        tx.commit().await?;
        Ok(LockedWrite::Written(LeadUpdate {
            lead,
            previous_status: locked.status,
        }))
    }

    /// Permanently delete a lead (its feedback cascades). Returns `true` if
    /// a row was removed.
    pub async fn hard_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM leads WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
