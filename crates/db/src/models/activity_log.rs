//! Append-only audit trail of workflow actions.

use leadflow_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

pub const ACTION_LEAD_ASSIGNED: &str = "lead_assigned";
pub const ACTION_LEAD_STATUS_UPDATED: &str = "lead_status_updated";
pub const ACTION_FEEDBACK_SUBMITTED: &str = "feedback_submitted";
pub const ACTION_CAMPAIGN_DELETED: &str = "campaign_deleted";
pub const ACTION_CAMPAIGN_STATUS_CHANGED: &str = "campaign_status_changed";

pub const ENTITY_LEAD: &str = "lead";
pub const ENTITY_CAMPAIGN: &str = "campaign";

/// A row from the `activity_logs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ActivityLog {
    pub id: DbId,
    pub user_id: Option<DbId>,
    pub action: String,
    pub entity_type: String,
    pub entity_id: DbId,
    pub details: serde_json::Value,
    pub created_at: Timestamp,
}

/// Insert payload. Entries are never updated.
#[derive(Debug, Clone)]
pub struct CreateActivityLog {
    pub user_id: Option<DbId>,
    pub action: &'static str,
    pub entity_type: &'static str,
    pub entity_id: DbId,
    pub details: serde_json::Value,
}
