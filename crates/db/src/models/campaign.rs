//! Campaign entity model and DTOs.

use leadflow_core::campaign::CampaignStatus;
use leadflow_core::platform::{Platform, PlatformSet};
use leadflow_core::types::{Date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `campaigns` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Campaign {
    pub id: DbId,
    pub title: String,
    pub product_name: String,
    #[sqlx(try_from = "Vec<String>")]
    pub platforms: PlatformSet,
    pub budget: f64,
    pub target_audience: Option<String>,
    pub objectives: Option<String>,
    pub description: Option<String>,
    pub created_by: DbId,
    pub assigned_to: Option<DbId>,
    pub start_date: Date,
    pub end_date: Date,
    #[sqlx(try_from = "String")]
    pub status: CampaignStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a campaign. New campaigns always start as `draft`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCampaign {
    pub title: String,
    pub product_name: String,
    pub platforms: Vec<Platform>,
    pub budget: f64,
    pub target_audience: Option<String>,
    pub objectives: Option<String>,
    pub description: Option<String>,
    pub assigned_to: Option<DbId>,
    pub start_date: Date,
    pub end_date: Date,
}

/// DTO for updating a campaign. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCampaign {
    pub title: Option<String>,
    pub product_name: Option<String>,
    pub platforms: Option<Vec<Platform>>,
    pub budget: Option<f64>,
    pub target_audience: Option<String>,
    pub objectives: Option<String>,
    pub description: Option<String>,
    pub assigned_to: Option<DbId>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
}

/// Result of a guarded campaign delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CampaignDeletion {
    Deleted,
    NotFound,
    /// The campaign still owns this many leads and was left in place.
    HasLeads(i64),
}
