//! Repository for the `campaigns` table.

use leadflow_core::access::RecordScope;
use leadflow_core::campaign::CampaignStatus;
use leadflow_core::platform::PlatformSet;
use leadflow_core::types::{Date, DbId};
use serde_json::json;
use sqlx::PgPool;

use crate::models::activity_log::{
    CreateActivityLog, ACTION_CAMPAIGN_DELETED, ACTION_CAMPAIGN_STATUS_CHANGED, ENTITY_CAMPAIGN,
};
use crate::models::campaign::{Campaign, CampaignDeletion, CreateCampaign, UpdateCampaign};
use crate::models::metrics::CampaignBudgetRow;
use crate::repositories::ActivityLogRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, product_name, platforms, budget, target_audience, objectives, \
                       description, created_by, assigned_to, start_date, end_date, status, \
                       created_at, updated_at";

/// Provides CRUD operations for campaigns.
pub struct CampaignRepo;

impl CampaignRepo {
    /// Insert a new `draft` campaign.
    ///
    /// `platforms` is the validated, de-duplicated form of `input.platforms`.
    pub async fn create(
        pool: &PgPool,
        created_by: DbId,
        input: &CreateCampaign,
        platforms: &PlatformSet,
    ) -> Result<Campaign, sqlx::Error> {
        let query = format!(
            "INSERT INTO campaigns
                (title, product_name, platforms, budget, target_audience, objectives,
                 description, created_by, assigned_to, start_date, end_date)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Campaign>(&query)
            .bind(input.title.trim())
            .bind(&input.product_name)
            .bind(platforms.to_strings())
            .bind(input.budget)
            .bind(&input.target_audience)
            .bind(&input.objectives)
            .bind(&input.description)
            .bind(created_by)
            .bind(input.assigned_to)
            .bind(input.start_date)
            .bind(input.end_date)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Campaign>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM campaigns WHERE id = $1");
        sqlx::query_as::<_, Campaign>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List campaigns visible under `scope`, newest first.
    ///
    /// Marketing sees campaigns it created or is assigned to; sales sees
    /// campaigns owning at least one lead assigned to it.
    pub async fn list(
        pool: &PgPool,
        scope: RecordScope,
        status: Option<CampaignStatus>,
    ) -> Result<Vec<Campaign>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM campaigns
             WHERE ($1::BIGINT IS NULL OR created_by = $1 OR assigned_to = $1)
               AND ($2::BIGINT IS NULL OR EXISTS (
                     SELECT 1 FROM leads
                     WHERE leads.campaign_id = campaigns.id AND leads.assigned_to = $2))
               AND ($3::TEXT IS NULL OR status = $3)
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Campaign>(&query)
            .bind(scope.campaign_owner())
            .bind(scope.assignee())
            .bind(status.map(CampaignStatus::as_str))
            .fetch_all(pool)
            .await
    }

    /// Update a campaign. Only non-`None` fields in `input` are applied;
    /// `platforms` replaces the stored set when given.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCampaign,
        platforms: Option<&PlatformSet>,
    ) -> Result<Option<Campaign>, sqlx::Error> {
        let query = format!(
            "UPDATE campaigns SET
                title = COALESCE($2, title),
                product_name = COALESCE($3, product_name),
                platforms = COALESCE($4, platforms),
                budget = COALESCE($5, budget),
                target_audience = COALESCE($6, target_audience),
                objectives = COALESCE($7, objectives),
                description = COALESCE($8, description),
                assigned_to = COALESCE($9, assigned_to),
                start_date = COALESCE($10, start_date),
                end_date = COALESCE($11, end_date)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Campaign>(&query)
            .bind(id)
            .bind(input.title.as_deref().map(str::trim))
            .bind(&input.product_name)
            .bind(platforms.map(PlatformSet::to_strings))
            .bind(input.budget)
            .bind(&input.target_audience)
            .bind(&input.objectives)
            .bind(&input.description)
            .bind(input.assigned_to)
            .bind(input.start_date)
            .bind(input.end_date)
            .fetch_optional(pool)
            .await
    }

    /// Set the status and record the change in the activity log, atomically.
    ///
    /// Returns `None` if the campaign does not exist.
    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        status: CampaignStatus,
        actor_id: DbId,
    ) -> Result<Option<Campaign>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let previous: Option<String> =
            sqlx::query_scalar("SELECT status FROM campaigns WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some(previous) = previous else {
            return Ok(None);
        };

        let query = format!(
            "UPDATE campaigns SET status = $2 WHERE id = $1 RETURNING {COLUMNS}"
        );
        let campaign = sqlx::query_as::<_, Campaign>(&query)
            .bind(id)
            .bind(status.as_str())
            .fetch_one(&mut *tx)
            .await?;

        ActivityLogRepo::insert(
            &mut *tx,
            &CreateActivityLog {
                user_id: Some(actor_id),
                action: ACTION_CAMPAIGN_STATUS_CHANGED,
                entity_type: ENTITY_CAMPAIGN,
                entity_id: id,
                details: json!({ "from": previous, "to": status.as_str() }),
            },
        )
        .await?;

        tx.commit().await?;
        Ok(Some(campaign))
    }

    /// Copy a campaign as a new `draft` with the given title and window.
    ///
    /// Every other field, the author and assignee included, is carried over.
    /// Returns `None` if the source does not exist.
    pub async fn duplicate(
        pool: &PgPool,
        source_id: DbId,
        title: &str,
        start_date: Date,
        end_date: Date,
    ) -> Result<Option<Campaign>, sqlx::Error> {
        let query = format!(
            "INSERT INTO campaigns
                (title, product_name, platforms, budget, target_audience, objectives,
                 description, created_by, assigned_to, start_date, end_date, status)
             SELECT $2, product_name, platforms, budget, target_audience, objectives,
                    description, created_by, assigned_to, $3, $4, 'draft'
             FROM campaigns WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Campaign>(&query)
            .bind(source_id)
            .bind(title)
            .bind(start_date)
            .bind(end_date)
            .fetch_optional(pool)
            .await
    }

    /// Delete a campaign that owns no leads.
    ///
    /// The campaign row is locked for the duration so a lead cannot be
    /// attached between the count and the delete.
    pub async fn delete_if_unused(
        pool: &PgPool,
        id: DbId,
        actor_id: DbId,
    ) -> Result<CampaignDeletion, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let title: Option<String> =
            sqlx::query_scalar("SELECT title FROM campaigns WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some(title) = title else {
            return Ok(CampaignDeletion::NotFound);
        };

        let lead_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM leads WHERE campaign_id = $1")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
        if lead_count > 0 {
            return Ok(CampaignDeletion::HasLeads(lead_count));
        }

        sqlx::query("DELETE FROM campaigns WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        ActivityLogRepo::insert(
            &mut *tx,
            &CreateActivityLog {
                user_id: Some(actor_id),
                action: ACTION_CAMPAIGN_DELETED,
                entity_type: ENTITY_CAMPAIGN,
                entity_id: id,
                details: json!({ "title": title }),
            },
        )
        .await?;

        tx.commit().await?;
        Ok(CampaignDeletion::Deleted)
    }

    /// Whether the campaign owns at least one lead assigned to `user_id`.
    pub async fn has_leads_assigned_to(
        pool: &PgPool,
        campaign_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM leads WHERE campaign_id = $1 AND assigned_to = $2)",
        )
        .bind(campaign_id)
        .bind(user_id)
        .fetch_one(pool)
        .await
    }

    /// Budgets for the given campaigns, used for ROI.
    pub async fn budgets(pool: &PgPool, ids: &[DbId]) -> Result<Vec<CampaignBudgetRow>, sqlx::Error> {
        sqlx::query_as::<_, CampaignBudgetRow>(
            "SELECT id, budget FROM campaigns WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(pool)
        .await
    }
}
