//! Lost-lead feedback: reason categories and submission checks.
//!
//! A lead carries at most one feedback row, and submitting it is the only way
//! a lead reaches `closed-lost`.

use crate::error::CoreError;
use crate::types::Date;

/// Maximum length for the free-text reason.
pub const MAX_REASON_LENGTH: usize = 2_000;

define_text_enum! {
    /// Why a lead did not convert.
    FeedbackType("feedback type") {
        NotInterested = "not_interested",
        BudgetIssue = "budget_issue",
        Competitor = "competitor",
        Timing = "timing",
        Other = "other",
    }
}

pub fn validate_reason(reason_text: &str) -> Result<(), CoreError> {
    if reason_text.trim().is_empty() {
        return Err(CoreError::Validation(
            "Feedback must include a reason".to_string(),
        ));
    }
    if reason_text.len() > MAX_REASON_LENGTH {
        return Err(CoreError::Validation(format!(
            "Feedback reason exceeds maximum length of {MAX_REASON_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Resolve the follow-up date to store.
///
/// The date is dropped when no follow-up is required, and may not lie in the
/// past when one is.
pub fn resolve_follow_up(
    follow_up_required: bool,
    follow_up_date: Option<Date>,
    today: Date,
) -> Result<Option<Date>, CoreError> {
    if !follow_up_required {
        return Ok(None);
    }
    match follow_up_date {
        Some(date) if date < today => Err(CoreError::Validation(format!(
            "Follow-up date {date} is in the past"
        ))),
        other => Ok(other),
    }
}

/// A lead that already has feedback cannot receive a second one.
pub fn ensure_no_prior_feedback(already_submitted: bool) -> Result<(), CoreError> {
    if already_submitted {
        return Err(CoreError::Conflict(
            "Feedback has already been submitted for this lead".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn feedback_type_spellings() {
        assert_eq!(FeedbackType::BudgetIssue.as_str(), "budget_issue");
        assert_eq!(
            "not_interested".parse::<FeedbackType>().unwrap(),
            FeedbackType::NotInterested
        );
        assert!("lost".parse::<FeedbackType>().is_err());
    }

    #[test]
    fn reason_required_and_capped() {
        assert!(validate_reason("Went with a competitor").is_ok());
        assert!(validate_reason("  ").is_err());
        assert!(validate_reason(&"r".repeat(MAX_REASON_LENGTH + 1)).is_err());
    }

    #[test]
    fn follow_up_dropped_when_not_required() {
        let today = date(2024, 3, 10);
        assert_eq!(
            resolve_follow_up(false, Some(date(2024, 4, 1)), today).unwrap(),
            None
        );
    }

    #[test]
    fn follow_up_date_kept_when_required() {
        let today = date(2024, 3, 10);
        assert_eq!(
            resolve_follow_up(true, Some(today), today).unwrap(),
            Some(today)
        );
        assert_eq!(resolve_follow_up(true, None, today).unwrap(), None);
    }

    #[test]
    fn past_follow_up_rejected() {
        let today = date(2024, 3, 10);
        assert_matches!(
            resolve_follow_up(true, Some(date(2024, 3, 9)), today),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn second_feedback_is_a_conflict() {
        assert!(ensure_no_prior_feedback(false).is_ok());
        assert_matches!(ensure_no_prior_feedback(true), Err(CoreError::Conflict(_)));
    }
}
