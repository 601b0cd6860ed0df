//! Flat projections feeding the metrics rollups.

use leadflow_core::lead::LeadStatus;
use leadflow_core::metrics::{CampaignBudget, LeadFact};
use leadflow_core::platform::Platform;
use leadflow_core::types::{Date, DbId};
use sqlx::FromRow;

/// One lead joined with its campaign title and agent name.
#[derive(Debug, Clone, FromRow)]
pub struct LeadFactRow {
    pub lead_id: DbId,
    #[sqlx(try_from = "String")]
    pub status: LeadStatus,
    #[sqlx(try_from = "String")]
    pub platform: Platform,
    pub sale_value: Option<f64>,
    pub campaign_id: Option<DbId>,
    pub campaign_title: Option<String>,
    pub assigned_to: Option<DbId>,
    pub agent_name: Option<String>,
    pub created_on: Date,
}

impl From<LeadFactRow> for LeadFact {
    fn from(row: LeadFactRow) -> Self {
        LeadFact {
            lead_id: row.lead_id,
            status: row.status,
            platform: row.platform,
            sale_value: row.sale_value,
            campaign_id: row.campaign_id,
            campaign_title: row.campaign_title,
            assigned_to: row.assigned_to,
            agent_name: row.agent_name,
            created_on: row.created_on,
        }
    }
}

#[derive(Debug, Clone, Copy, FromRow)]
pub struct CampaignBudgetRow {
    pub id: DbId,
    pub budget: f64,
}

impl From<CampaignBudgetRow> for CampaignBudget {
    fn from(row: CampaignBudgetRow) -> Self {
        CampaignBudget {
            campaign_id: row.id,
            budget: row.budget,
        }
    }
}
