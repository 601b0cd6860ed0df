//! Shared query parameter types for API handlers.

use leadflow_core::campaign::CampaignStatus;
use leadflow_core::metrics::GroupBy;
use leadflow_core::roles::Role;
use leadflow_core::types::Date;
use serde::Deserialize;

/// `?limit=` for endpoints returning the most recent N rows.
#[derive(Debug, Deserialize)]
pub struct LimitParams {
    pub limit: Option<i64>,
}

/// `?date=` for day- or week-based rollups; defaults to today.
#[derive(Debug, Deserialize)]
pub struct DateParams {
    pub date: Option<Date>,
}

/// `?role=` filter for the admin user list.
#[derive(Debug, Deserialize)]
pub struct RoleFilterParams {
    pub role: Option<Role>,
}

/// `?status=` filter for the campaign list.
#[derive(Debug, Deserialize)]
pub struct CampaignListParams {
    pub status: Option<CampaignStatus>,
}

/// `?from=&to=&group_by=` for the metrics report.
#[derive(Debug, Deserialize)]
pub struct MetricsParams {
    pub from: Option<Date>,
    pub to: Option<Date>,
    pub group_by: Option<GroupBy>,
}
