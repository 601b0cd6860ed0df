//! Campaign statuses, boundary validation and the duplicate/toggle rules.

use chrono::Duration;

use crate::error::CoreError;
use crate::types::Date;

/// Maximum length for a campaign title.
pub const MAX_TITLE_LENGTH: usize = 200;

/// A duplicated campaign runs from today for this many days.
pub const DUPLICATE_WINDOW_DAYS: i64 = 30;

/// Appended to the title of a duplicated campaign.
pub const COPY_SUFFIX: &str = " (Copy)";

define_text_enum! {
    /// Campaign lifecycle status. Any status may be set from any other.
    CampaignStatus("campaign status") {
        Draft = "draft",
        Active = "active",
        Paused = "paused",
        Completed = "completed",
        Cancelled = "cancelled",
    }
}

impl Default for CampaignStatus {
    fn default() -> Self {
        CampaignStatus::Draft
    }
}

pub fn validate_title(title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation(
            "Campaign title must not be empty".to_string(),
        ));
    }
    if title.len() > MAX_TITLE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Campaign title exceeds maximum length of {MAX_TITLE_LENGTH} characters"
        )));
    }
    Ok(())
}

pub fn validate_budget(budget: f64) -> Result<(), CoreError> {
    if !budget.is_finite() || budget <= 0.0 {
        return Err(CoreError::Validation(
            "Campaign budget must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

/// The start date must fall strictly before the end date.
pub fn validate_window(start_date: Date, end_date: Date) -> Result<(), CoreError> {
    if start_date >= end_date {
        return Err(CoreError::Validation(format!(
            "Campaign start date {start_date} must be before end date {end_date}"
        )));
    }
    Ok(())
}

/// Validate the scalar fields shared by create and update.
pub fn validate_campaign(
    title: &str,
    budget: f64,
    start_date: Date,
    end_date: Date,
) -> Result<(), CoreError> {
    validate_title(title)?;
    validate_budget(budget)?;
    validate_window(start_date, end_date)
}

/// Flip between `active` and `paused`.
///
/// Toggling any other status is refused; use an explicit status set instead.
pub fn toggled_status(current: CampaignStatus) -> Result<CampaignStatus, CoreError> {
    match current {
        CampaignStatus::Active => Ok(CampaignStatus::Paused),
        CampaignStatus::Paused => Ok(CampaignStatus::Active),
        other => Err(CoreError::Conflict(format!(
            "Only active or paused campaigns can be toggled (current status: {other})"
        ))),
    }
}

pub fn duplicate_title(title: &str) -> String {
    format!("{title}{COPY_SUFFIX}")
}

/// Date window for a duplicated campaign: `today` to `today + 30 days`.
pub fn duplicate_window(today: Date) -> (Date, Date) {
    (today, today + Duration::days(DUPLICATE_WINDOW_DAYS))
}
