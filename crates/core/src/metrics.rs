//! Performance metrics over lead and campaign rows.
//!
//! All functions are pure. The repository layer loads one [`LeadFact`] per
//! lead in range (already filtered to the actor's [`RecordScope`]) and the
//! budgets of the campaigns involved; this module turns them into the
//! summary, leaderboards, ROI and the daily trend series.
//!
//! [`RecordScope`]: crate::access::RecordScope

use std::collections::HashMap;

use chrono::Duration;
use serde::Serialize;

use crate::error::CoreError;
use crate::lead::LeadStatus;
use crate::platform::Platform;
use crate::types::{Date, DbId};

/// Longest range accepted for a report, in days.
pub const MAX_RANGE_DAYS: i64 = 366;

/// Default report window when the caller gives no `from`.
pub const DEFAULT_RANGE_DAYS: i64 = 30;

define_text_enum! {
    /// Grouping key for a metrics report.
    GroupBy("group_by") {
        Platform = "platform",
        Agent = "agent",
        Campaign = "campaign",
        Day = "day",
    }
}

/// The slice of a lead row the aggregator needs.
#[derive(Debug, Clone, PartialEq)]
pub struct LeadFact {
    pub lead_id: DbId,
    pub status: LeadStatus,
    pub platform: Platform,
    pub sale_value: Option<f64>,
    pub campaign_id: Option<DbId>,
    pub campaign_title: Option<String>,
    pub assigned_to: Option<DbId>,
    pub agent_name: Option<String>,
    /// Calendar date (UTC) the lead was created.
    pub created_on: Date,
}

impl LeadFact {
    fn is_won(&self) -> bool {
        self.status == LeadStatus::ClosedWon
    }

    /// Revenue contributed by this lead; missing sale values count as zero.
    fn revenue(&self) -> f64 {
        if self.is_won() {
            self.sale_value.unwrap_or(0.0)
        } else {
            0.0
        }
    }
}

/// Inclusive calendar date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub from: Date,
    pub to: Date,
}

impl DateRange {
    pub fn new(from: Date, to: Date) -> Result<Self, CoreError> {
        if from > to {
            return Err(CoreError::Validation(format!(
                "Range start {from} is after range end {to}"
            )));
        }
        if (to - from).num_days() >= MAX_RANGE_DAYS {
            return Err(CoreError::Validation(format!(
                "Report range may not exceed {MAX_RANGE_DAYS} days"
            )));
        }
        Ok(Self { from, to })
    }

    /// Resolve optional bounds: `to` defaults to `today`, `from` to 30 days
    /// before `to`.
    pub fn resolve(from: Option<Date>, to: Option<Date>, today: Date) -> Result<Self, CoreError> {
        let to = to.unwrap_or(today);
        let from = from.unwrap_or(to - Duration::days(DEFAULT_RANGE_DAYS));
        Self::new(from, to)
    }

    pub fn days(&self) -> impl Iterator<Item = Date> {
        let from = self.from;
        let len = (self.to - self.from).num_days();
        (0..=len).map(move |i| from + Duration::days(i))
    }
}

/// Percentage of leads that closed as won, 2 decimals; 0 for no leads.
pub fn conversion_rate(conversions: i64, total: i64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round_to(conversions as f64 / total as f64 * 100.0, 2)
}

/// Campaign ROI in percent, 1 decimal; 0 when the budget is zero.
pub fn roi(revenue: f64, budget: f64) -> f64 {
    if budget == 0.0 {
        return 0.0;
    }
    round_to((revenue - budget) / budget * 100.0, 1)
}

/// Sum of sale values over won leads.
pub fn revenue(facts: &[LeadFact]) -> f64 {
    round_to(facts.iter().map(LeadFact::revenue).sum(), 2)
}

pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusCount {
    pub status: LeadStatus,
    pub count: i64,
}

/// Headline numbers for a report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsSummary {
    pub total_leads: i64,
    pub conversions: i64,
    pub revenue: f64,
    pub conversion_rate: f64,
    /// Every status in pipeline order, including zero counts.
    pub status_breakdown: Vec<StatusCount>,
}

pub fn summarize(facts: &[LeadFact]) -> MetricsSummary {
    let total_leads = facts.len() as i64;
    let conversions = facts.iter().filter(|f| f.is_won()).count() as i64;
    let status_breakdown = LeadStatus::ALL
        .iter()
        .map(|&status| StatusCount {
            status,
            count: facts.iter().filter(|f| f.status == status).count() as i64,
        })
        .collect();

    MetricsSummary {
        total_leads,
        conversions,
        revenue: revenue(facts),
        conversion_rate: conversion_rate(conversions, total_leads),
        status_breakdown,
    }
}

/// Per-group metrics row (leaderboard entry or daily bar).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupMetrics {
    /// Stable machine key: platform spelling, user id, campaign id or date.
    pub key: String,
    pub label: String,
    pub lead_count: i64,
    pub conversions: i64,
    pub revenue: f64,
    pub conversion_rate: f64,
    /// Only set when grouping by campaign.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roi: Option<f64>,
}

impl GroupMetrics {
    fn empty(key: String, label: String) -> Self {
        Self {
            key,
            label,
            lead_count: 0,
            conversions: 0,
            revenue: 0.0,
            conversion_rate: 0.0,
            budget: None,
            roi: None,
        }
    }

    fn record(&mut self, fact: &LeadFact) {
        self.lead_count += 1;
        if fact.is_won() {
            self.conversions += 1;
        }
        self.revenue += fact.revenue();
    }

    fn finish(&mut self) {
        self.revenue = round_to(self.revenue, 2);
        self.conversion_rate = conversion_rate(self.conversions, self.lead_count);
    }
}

/// Budget lookup entry for ROI on campaign groups.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CampaignBudget {
    pub campaign_id: DbId,
    pub budget: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsReport {
    pub from: Date,
    pub to: Date,
    pub group_by: GroupBy,
    pub summary: MetricsSummary,
    pub groups: Vec<GroupMetrics>,
}

/// Build a full report for `range`.
///
/// Facts outside the range are ignored. Leaderboard groups are sorted by
/// revenue, highest first, ties keeping first-seen order; the `day` grouping
/// is a zero-filled series in date order.
pub fn compute_report(
    range: DateRange,
    group_by: GroupBy,
    facts: &[LeadFact],
    budgets: &[CampaignBudget],
) -> MetricsReport {
    let in_range: Vec<LeadFact> = facts
        .iter()
        .filter(|f| f.created_on >= range.from && f.created_on <= range.to)
        .cloned()
        .collect();

    let groups = match group_by {
        GroupBy::Day => daily_series(range, &in_range),
        other => leaderboard(other, &in_range, budgets),
    };

    MetricsReport {
        from: range.from,
        to: range.to,
        group_by,
        summary: summarize(&in_range),
        groups,
    }
}

fn group_key(group_by: GroupBy, fact: &LeadFact) -> (String, String) {
    match group_by {
        GroupBy::Platform => (
            fact.platform.as_str().to_string(),
            fact.platform.display_name().to_string(),
        ),
        GroupBy::Agent => match fact.assigned_to {
            Some(id) => (
                id.to_string(),
                fact.agent_name.clone().unwrap_or_else(|| format!("User #{id}")),
            ),
            None => ("unassigned".to_string(), "Unassigned".to_string()),
        },
        GroupBy::Campaign => match fact.campaign_id {
            Some(id) => (
                id.to_string(),
                fact.campaign_title
                    .clone()
                    .unwrap_or_else(|| format!("Campaign #{id}")),
            ),
            None => ("none".to_string(), "No campaign".to_string()),
        },
        GroupBy::Day => {
            let day = fact.created_on.to_string();
            (day.clone(), day)
        }
    }
}

/// Group facts by platform, agent or campaign and rank by revenue.
pub fn leaderboard(
    group_by: GroupBy,
    facts: &[LeadFact],
    budgets: &[CampaignBudget],
) -> Vec<GroupMetrics> {
    let mut groups: Vec<GroupMetrics> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for fact in facts {
        let (key, label) = group_key(group_by, fact);
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            groups.push(GroupMetrics::empty(key, label));
            groups.len() - 1
        });
        groups[slot].record(fact);
    }

    for group in &mut groups {
        group.finish();
        if group_by == GroupBy::Campaign {
            let budget = group
                .key
                .parse::<DbId>()
                .ok()
                .and_then(|id| budgets.iter().find(|b| b.campaign_id == id))
                .map(|b| b.budget);
            if let Some(budget) = budget {
                group.budget = Some(budget);
                group.roi = Some(roi(group.revenue, budget));
            }
        }
    }

    // `sort_by` is stable, so equal revenue keeps first-seen order.
    groups.sort_by(|a, b| b.revenue.total_cmp(&a.revenue));
    groups
}

/// One bar per calendar day in `range`; days without leads are zero.
pub fn daily_series(range: DateRange, facts: &[LeadFact]) -> Vec<GroupMetrics> {
    range
        .days()
        .map(|day| {
            let key = day.to_string();
            let mut bar = GroupMetrics::empty(key.clone(), key);
            for fact in facts.iter().filter(|f| f.created_on == day) {
                bar.record(fact);
            }
            bar.finish();
            bar
        })
        .collect()
}

/// Lifetime performance of a single campaign.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignReport {
    pub campaign_id: DbId,
    pub title: String,
    pub budget: f64,
    pub leads: i64,
    pub conversions: i64,
    pub revenue: f64,
    pub conversion_rate: f64,
    pub roi: f64,
}

pub fn campaign_report(
    campaign_id: DbId,
    title: &str,
    budget: f64,
    facts: &[LeadFact],
) -> CampaignReport {
    let own: Vec<&LeadFact> = facts
        .iter()
        .filter(|f| f.campaign_id == Some(campaign_id))
        .collect();
    let leads = own.len() as i64;
    let conversions = own.iter().filter(|f| f.is_won()).count() as i64;
    let revenue = round_to(own.iter().map(|f| f.revenue()).sum(), 2);

    CampaignReport {
        campaign_id,
        title: title.to_string(),
        budget,
        leads,
        conversions,
        revenue,
        conversion_rate: conversion_rate(conversions, leads),
        roi: roi(revenue, budget),
    }
}
