//! Repository for the `daily_activities` table.

use leadflow_core::activity::ActivityCounters;
use leadflow_core::types::{Date, DbId};
use sqlx::PgPool;

use crate::models::activity::{DailyActivity, TeamActivityRow};

const COLUMNS: &str = "id, user_id, activity_date, leads_contacted, calls_made, qar_closed, \
                       notes, created_at, updated_at";

pub struct DailyActivityRepo;

impl DailyActivityRepo {
    /// Insert or overwrite the report for `(user_id, activity_date)`.
    pub async fn upsert(
        pool: &PgPool,
        user_id: DbId,
        activity_date: Date,
        counters: &ActivityCounters,
        notes: Option<&str>,
    ) -> Result<DailyActivity, sqlx::Error> {
        let query = format!(
            "INSERT INTO daily_activities
                (user_id, activity_date, leads_contacted, calls_made, qar_closed, notes)
             VALUES ($1, $2, $3, $4, $5, $6)
             ON CONFLICT ON CONSTRAINT uq_daily_activities_user_date DO UPDATE SET
                leads_contacted = EXCLUDED.leads_contacted,
                calls_made = EXCLUDED.calls_made,
                qar_closed = EXCLUDED.qar_closed,
                notes = EXCLUDED.notes
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DailyActivity>(&query)
            .bind(user_id)
            .bind(activity_date)
            .bind(counters.leads_contacted)
            .bind(counters.calls_made)
            .bind(counters.qar_closed)
            .bind(notes)
            .fetch_one(pool)
            .await
    }

    /// One user's reports between `from` and `to` inclusive, oldest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        from: Date,
        to: Date,
    ) -> Result<Vec<DailyActivity>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM daily_activities
             WHERE user_id = $1 AND activity_date BETWEEN $2 AND $3
             ORDER BY activity_date ASC"
        );
        sqlx::query_as::<_, DailyActivity>(&query)
            .bind(user_id)
            .bind(from)
            .bind(to)
            .fetch_all(pool)
            .await
    }

    /// Every report filed for `activity_date`, with the agent's name.
    pub async fn list_team_for_date(
        pool: &PgPool,
        activity_date: Date,
    ) -> Result<Vec<TeamActivityRow>, sqlx::Error> {
        sqlx::query_as::<_, TeamActivityRow>(
            "SELECT d.user_id, u.name, d.leads_contacted, d.calls_made, d.qar_closed, d.notes
             FROM daily_activities d
             JOIN users u ON u.id = d.user_id
             WHERE d.activity_date = $1
             ORDER BY u.name ASC",
        )
        .bind(activity_date)
        .fetch_all(pool)
        .await
    }
}
