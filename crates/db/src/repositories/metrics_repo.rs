//! Read-only projections for the metrics rollups.

use leadflow_core::access::RecordScope;
use leadflow_core::metrics::DateRange;
use leadflow_core::types::DbId;
use sqlx::PgPool;

use crate::models::metrics::LeadFactRow;

/// Lead facts joined with campaign title and agent name. A lead's day is its
/// creation date in UTC.
const FACT_SELECT: &str = "SELECT l.id AS lead_id, l.status, l.platform, l.sale_value,
                                  l.campaign_id, c.title AS campaign_title,
                                  l.assigned_to, u.name AS agent_name,
                                  (l.created_at AT TIME ZONE 'UTC')::date AS created_on
                           FROM leads l
                           LEFT JOIN campaigns c ON c.id = l.campaign_id
                           LEFT JOIN users u ON u.id = l.assigned_to";

pub struct MetricsRepo;

impl MetricsRepo {
    /// Facts for leads created within `range` and visible under `scope`.
    pub async fn facts_in_range(
        pool: &PgPool,
        range: DateRange,
        scope: RecordScope,
    ) -> Result<Vec<LeadFactRow>, sqlx::Error> {
        let query = format!(
            "{FACT_SELECT}
             WHERE (l.created_at AT TIME ZONE 'UTC')::date BETWEEN $1 AND $2
               AND ($3::BIGINT IS NULL OR c.created_by = $3)
               AND ($4::BIGINT IS NULL OR l.assigned_to = $4)
             ORDER BY l.id ASC"
        );
        sqlx::query_as::<_, LeadFactRow>(&query)
            .bind(range.from)
            .bind(range.to)
            .bind(scope.campaign_owner())
            .bind(scope.assignee())
            .fetch_all(pool)
            .await
    }

    /// Every lead of one campaign, regardless of date.
    pub async fn facts_for_campaign(
        pool: &PgPool,
        campaign_id: DbId,
    ) -> Result<Vec<LeadFactRow>, sqlx::Error> {
        let query = format!(
            "{FACT_SELECT}
             WHERE l.campaign_id = $1
             ORDER BY l.id ASC"
        );
        sqlx::query_as::<_, LeadFactRow>(&query)
            .bind(campaign_id)
            .fetch_all(pool)
            .await
    }
}
