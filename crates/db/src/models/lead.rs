//! Lead entity model and DTOs.

use leadflow_core::error::CoreError;
use leadflow_core::lead::{LeadQuality, LeadStatus};
use leadflow_core::platform::Platform;
use leadflow_core::types::{Date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `leads` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Lead {
    pub id: DbId,
    pub full_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub campaign_id: Option<DbId>,
    #[sqlx(try_from = "String")]
    pub platform: Platform,
    pub product: Option<String>,
    pub notes: Option<String>,
    pub assigned_to: Option<DbId>,
    #[sqlx(try_from = "String")]
    pub status: LeadStatus,
    pub sale_value: Option<f64>,
    pub lead_source: Option<String>,
    #[sqlx(try_from = "String")]
    pub lead_quality: LeadQuality,
    pub last_contact_date: Option<Date>,
    pub next_follow_up: Option<Date>,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// The fields needed to authorize reading a lead or assigning it.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct LeadOwnership {
    /// `created_by` of the lead's campaign, if it has one.
    pub campaign_owner: Option<DbId>,
    pub assigned_to: Option<DbId>,
}

/// A lead's workflow state as read under its row lock.
#[derive(Debug, Clone, Copy)]
pub struct LockedLead {
    pub assigned_to: Option<DbId>,
    pub status: LeadStatus,
    pub has_feedback: bool,
}

/// Outcome of a lead write whose rules are checked after the row is locked.
#[derive(Debug)]
pub enum LockedWrite<T> {
    Written(T),
    NotFound,
    /// A rule failed against the locked state; nothing was written.
    Rejected(CoreError),
}

impl<T> LockedWrite<T> {
    pub fn into_result(self, lead_id: DbId) -> Result<T, CoreError> {
        match self {
            LockedWrite::Written(value) => Ok(value),
            LockedWrite::NotFound => Err(CoreError::not_found("Lead", lead_id)),
            LockedWrite::Rejected(err) => Err(err),
        }
    }
}

/// A successful update plus the status it replaced.
#[derive(Debug, Clone)]
pub struct LeadUpdate {
    pub lead: Lead,
    pub previous_status: LeadStatus,
}

/// DTO for creating a lead. New leads always start as `new`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateLead {
    pub full_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub campaign_id: Option<DbId>,
    pub platform: Platform,
    pub product: Option<String>,
    pub notes: Option<String>,
    pub lead_source: Option<String>,
    pub lead_quality: Option<LeadQuality>,
    pub next_follow_up: Option<Date>,
    pub assigned_to: Option<DbId>,
}

/// DTO for editing a lead. All fields are optional.
///
/// When the status moves off `new` and no `last_contact_date` is given,
/// [`LeadRepo::update`](crate::repositories::LeadRepo::update) fills in today.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateLead {
    pub status: Option<LeadStatus>,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub product: Option<String>,
    pub notes: Option<String>,
    pub sale_value: Option<f64>,
    pub lead_quality: Option<LeadQuality>,
    pub next_follow_up: Option<Date>,
    pub last_contact_date: Option<Date>,
}

/// Query filters for the lead list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeadFilter {
    pub status: Option<LeadStatus>,
    pub platform: Option<Platform>,
    pub campaign_id: Option<DbId>,
    pub assigned_to: Option<DbId>,
    /// Only leads with no assignee.
    #[serde(default)]
    pub unassigned: bool,
}
