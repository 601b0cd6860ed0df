//! Lead pipeline statuses, quality tiers and the rules for changing them.
//!
//! The pipeline is deliberately loose: an authorized actor may move a lead
//! from any status to any other. Two transitions are guarded:
//!
//! - `closed-lost` is only reachable through the feedback workflow
//!   ([`crate::feedback`]), never through a plain status update.
//! - Once a lead has been closed through feedback its status is frozen.

use validator::ValidateEmail;

use crate::error::CoreError;

/// Maximum length for free-text lead notes.
pub const MAX_NOTES_LENGTH: usize = 10_000;

/// Minimum number of digits a phone number must contain.
pub const MIN_PHONE_DIGITS: usize = 6;

define_text_enum! {
    /// Position of a lead in the sales pipeline.
    LeadStatus("lead status") {
        New = "new",
        Contacted = "contacted",
        Interested = "interested",
        FollowUp = "follow-up",
        ClosedWon = "closed-won",
        ClosedLost = "closed-lost",
        NoResponse = "no-response",
    }
}

impl LeadStatus {
    /// Sort rank for default list ordering; the lead list query is built from
    /// it. Not enforced as a transition order.
    pub fn pipeline_rank(self) -> u8 {
        match self {
            LeadStatus::New => 0,
            LeadStatus::Contacted => 1,
            LeadStatus::Interested => 2,
            LeadStatus::FollowUp => 3,
            LeadStatus::ClosedWon => 4,
            LeadStatus::ClosedLost => 5,
            LeadStatus::NoResponse => 6,
        }
    }
}

define_text_enum! {
    /// Sales team's estimate of how likely a lead is to convert.
    LeadQuality("lead quality") {
        Hot = "hot",
        Warm = "warm",
        Cold = "cold",
    }
}

impl Default for LeadQuality {
    fn default() -> Self {
        LeadQuality::Warm
    }
}

/// Check a requested status change against the pipeline guards.
///
/// `has_feedback` is whether a feedback row already exists for the lead.
pub fn validate_status_change(
    current: LeadStatus,
    next: LeadStatus,
    has_feedback: bool,
) -> Result<(), CoreError> {
    if has_feedback && next != current {
        return Err(CoreError::Conflict(
            "Lead was closed through feedback and its status can no longer change".to_string(),
        ));
    }
    if next == LeadStatus::ClosedLost && current != LeadStatus::ClosedLost {
        return Err(CoreError::Conflict(
            "Leads are closed as lost by submitting feedback, not by a status update".to_string(),
        ));
    }
    Ok(())
}

/// Whether moving from `current` to `next` counts as contacting the lead.
pub fn counts_as_contact(current: LeadStatus, next: LeadStatus) -> bool {
    next != current && next != LeadStatus::New
}

/// `closed-won` leads without a sale value are counted as zero revenue.
pub fn missing_sale_value(status: LeadStatus, sale_value: Option<f64>) -> bool {
    status == LeadStatus::ClosedWon && sale_value.is_none()
}

/// Validate the contact fields of a new or edited lead.
pub fn validate_contact(
    full_name: &str,
    phone: &str,
    email: Option<&str>,
) -> Result<(), CoreError> {
    if full_name.trim().is_empty() {
        return Err(CoreError::Validation(
            "Lead name must not be empty".to_string(),
        ));
    }
    validate_phone(phone)?;
    validate_email(email)
}

/// Like [`validate_contact`], but only the fields present in a patch are
/// checked.
pub fn validate_contact_patch(
    full_name: Option<&str>,
    phone: Option<&str>,
    email: Option<&str>,
) -> Result<(), CoreError> {
    if full_name.is_some_and(|n| n.trim().is_empty()) {
        return Err(CoreError::Validation(
            "Lead name must not be empty".to_string(),
        ));
    }
    if let Some(phone) = phone {
        validate_phone(phone)?;
    }
    validate_email(email)
}

/// An empty string is treated as "no email".
fn validate_email(email: Option<&str>) -> Result<(), CoreError> {
    match email {
        Some(email) if !email.is_empty() && !email.validate_email() => Err(
            CoreError::Validation(format!("Invalid email address '{email}'")),
        ),
        _ => Ok(()),
    }
}

/// Accepts digits plus `+`, spaces, dashes and parentheses.
pub fn validate_phone(phone: &str) -> Result<(), CoreError> {
    let allowed = |c: char| c.is_ascii_digit() || matches!(c, '+' | ' ' | '-' | '(' | ')');
    if !phone.chars().all(allowed) {
        return Err(CoreError::Validation(format!(
            "Invalid phone number '{phone}'"
        )));
    }
    let digits = phone.chars().filter(char::is_ascii_digit).count();
    if digits < MIN_PHONE_DIGITS {
        return Err(CoreError::Validation(format!(
            "Phone number must contain at least {MIN_PHONE_DIGITS} digits"
        )));
    }
    Ok(())
}

pub fn validate_sale_value(sale_value: Option<f64>) -> Result<(), CoreError> {
    match sale_value {
        Some(v) if !v.is_finite() || v < 0.0 => Err(CoreError::Validation(
            "Sale value must be a non-negative number".to_string(),
        )),
        _ => Ok(()),
    }
}

pub fn validate_notes(notes: Option<&str>) -> Result<(), CoreError> {
    if notes.is_some_and(|n| n.len() > MAX_NOTES_LENGTH) {
        return Err(CoreError::Validation(format!(
            "Notes exceed maximum length of {MAX_NOTES_LENGTH} characters"
        )));
    }
    Ok(())
}
