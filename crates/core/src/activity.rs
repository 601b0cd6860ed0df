//! Daily activity counters and the weekly / team rollups built from them.
//!
//! One row exists per `(user, day)`. The rollups here are pure: the caller
//! loads the rows for the period and passes them in.

use chrono::{Datelike, Duration};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::metrics::round_to;
use crate::types::{Date, DbId};

/// Maximum length for the free-text notes on a daily report.
pub const MAX_ACTIVITY_NOTES_LENGTH: usize = 5_000;

/// Upper bound for a single day's contact and call counters. Keep in sync with
/// the `range` attributes on [`ActivityCounters`].
pub const MAX_DAILY_COUNT: i32 = 10_000;

/// Counters an agent reports for a single day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct ActivityCounters {
    #[validate(range(min = 0, max = 10000))]
    pub leads_contacted: i32,
    #[validate(range(min = 0, max = 10000))]
    pub calls_made: i32,
    /// Revenue closed that day, in QAR.
    #[validate(range(min = 0.0))]
    pub qar_closed: f64,
}

impl ActivityCounters {
    /// Saturating: the stored columns are not capped.
    fn add(self, other: ActivityCounters) -> ActivityCounters {
        ActivityCounters {
            leads_contacted: self.leads_contacted.saturating_add(other.leads_contacted),
            calls_made: self.calls_made.saturating_add(other.calls_made),
            qar_closed: self.qar_closed + other.qar_closed,
        }
    }
}

pub fn validate_counters(counters: &ActivityCounters) -> Result<(), CoreError> {
    if !counters.qar_closed.is_finite() {
        return Err(CoreError::Validation(
            "qar_closed must be a finite number".to_string(),
        ));
    }
    counters
        .validate()
        .map_err(|e| {
            CoreError::Validation(format!(
                "Activity counters must be between 0 and {MAX_DAILY_COUNT}: {e}"
            ))
        })
}

/// Reports may be filed for today or any earlier day.
pub fn validate_activity_date(activity_date: Date, today: Date) -> Result<(), CoreError> {
    if activity_date > today {
        return Err(CoreError::Validation(format!(
            "Cannot report activity for a future date ({activity_date})"
        )));
    }
    Ok(())
}

pub fn validate_activity_notes(notes: Option<&str>) -> Result<(), CoreError> {
    if notes.is_some_and(|n| n.len() > MAX_ACTIVITY_NOTES_LENGTH) {
        return Err(CoreError::Validation(format!(
            "Activity notes exceed maximum length of {MAX_ACTIVITY_NOTES_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Monday and Sunday of the ISO week containing `date`.
pub fn week_bounds(date: Date) -> (Date, Date) {
    let offset = i64::from(date.weekday().num_days_from_monday());
    let start = date - Duration::days(offset);
    (start, start + Duration::days(6))
}

/// One day's counters for a single agent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayActivity {
    pub activity_date: Date,
    pub counters: ActivityCounters,
    pub reported: bool,
}

/// An agent's own week at a glance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklySummary {
    pub week_start: Date,
    pub week_end: Date,
    /// Always seven entries, Monday first; unreported days are zero.
    pub days: Vec<DayActivity>,
    pub totals: ActivityCounters,
    pub days_reported: usize,
    /// Averages over reported days only; zero when nothing was reported.
    pub avg_calls_per_day: f64,
    pub avg_contacts_per_day: f64,
}

/// Roll a set of `(date, counters)` rows into the week containing `date`.
///
/// Rows outside the week are ignored.
pub fn summarize_week(date: Date, rows: &[(Date, ActivityCounters)]) -> WeeklySummary {
    let (week_start, week_end) = week_bounds(date);

    let days: Vec<DayActivity> = (0..7)
        .map(|i| {
            let day = week_start + Duration::days(i);
            match rows.iter().find(|(d, _)| *d == day) {
                Some((_, counters)) => DayActivity {
                    activity_date: day,
                    counters: *counters,
                    reported: true,
                },
                None => DayActivity {
                    activity_date: day,
                    counters: ActivityCounters::default(),
                    reported: false,
                },
            }
        })
        .collect();

    let totals = days
        .iter()
        .fold(ActivityCounters::default(), |acc, d| acc.add(d.counters));
    let days_reported = days.iter().filter(|d| d.reported).count();

    let (avg_calls_per_day, avg_contacts_per_day) = if days_reported == 0 {
        (0.0, 0.0)
    } else {
        let n = days_reported as f64;
        (
            round_to(f64::from(totals.calls_made) / n, 2),
            round_to(f64::from(totals.leads_contacted) / n, 2),
        )
    };

    WeeklySummary {
        week_start,
        week_end,
        days,
        totals,
        days_reported,
        avg_calls_per_day,
        avg_contacts_per_day,
    }
}

/// One agent's report inside a team rollup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentActivity {
    pub user_id: DbId,
    pub name: String,
    pub counters: ActivityCounters,
    pub notes: Option<String>,
}

/// Team-wide view of a single day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamDailySummary {
    pub activity_date: Date,
    /// Sorted by revenue closed, highest first; ties keep input order.
    pub agents: Vec<AgentActivity>,
    pub totals: ActivityCounters,
    pub agents_reported: usize,
}

pub fn summarize_team(activity_date: Date, mut agents: Vec<AgentActivity>) -> TeamDailySummary {
    agents.sort_by(|a, b| b.counters.qar_closed.total_cmp(&a.counters.qar_closed));
    let totals = agents
        .iter()
        .fold(ActivityCounters::default(), |acc, a| acc.add(a.counters));
    TeamDailySummary {
        activity_date,
        agents_reported: agents.len(),
        agents,
        totals,
    }
}
