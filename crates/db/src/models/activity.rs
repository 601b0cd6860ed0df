//! Daily activity report model and DTOs.

use leadflow_core::activity::{ActivityCounters, AgentActivity};
use leadflow_core::types::{Date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `daily_activities` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DailyActivity {
    pub id: DbId,
    pub user_id: DbId,
    pub activity_date: Date,
    pub leads_contacted: i32,
    pub calls_made: i32,
    pub qar_closed: f64,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl DailyActivity {
    pub fn counters(&self) -> ActivityCounters {
        ActivityCounters {
            leads_contacted: self.leads_contacted,
            calls_made: self.calls_made,
            qar_closed: self.qar_closed,
        }
    }
}

/// DTO for filing (or re-filing) a day's report. `activity_date` defaults
/// to today.
#[derive(Debug, Clone, Deserialize)]
pub struct UpsertDailyActivity {
    pub activity_date: Option<Date>,
    #[serde(default)]
    pub leads_contacted: i32,
    #[serde(default)]
    pub calls_made: i32,
    #[serde(default)]
    pub qar_closed: f64,
    pub notes: Option<String>,
}

impl UpsertDailyActivity {
    pub fn counters(&self) -> ActivityCounters {
        ActivityCounters {
            leads_contacted: self.leads_contacted,
            calls_made: self.calls_made,
            qar_closed: self.qar_closed,
        }
    }
}

/// A day's report joined with the reporting agent's name.
#[derive(Debug, Clone, FromRow)]
pub struct TeamActivityRow {
    pub user_id: DbId,
    pub name: String,
    pub leads_contacted: i32,
    pub calls_made: i32,
    pub qar_closed: f64,
    pub notes: Option<String>,
}

impl From<TeamActivityRow> for AgentActivity {
    fn from(row: TeamActivityRow) -> Self {
        AgentActivity {
            user_id: row.user_id,
            name: row.name,
            counters: ActivityCounters {
                leads_contacted: row.leads_contacted,
                calls_made: row.calls_made,
                qar_closed: row.qar_closed,
            },
            notes: row.notes,
        }
    }
}
