//! Repository for the `activity_logs` table.

use sqlx::{PgExecutor, PgPool};

use crate::models::activity_log::{ActivityLog, CreateActivityLog};

const COLUMNS: &str = "id, user_id, action, entity_type, entity_id, details, created_at";

/// Upper bound on rows returned by [`ActivityLogRepo::list_recent`].
pub const MAX_LIST_LIMIT: i64 = 500;

pub struct ActivityLogRepo;

impl ActivityLogRepo {
    /// Append an entry. Accepts a pool or `&mut *tx` so callers can write the
    /// entry inside the transaction that performed the action.
    pub async fn insert<'e, E>(
        executor: E,
        entry: &CreateActivityLog,
    ) -> Result<ActivityLog, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO activity_logs (user_id, action, entity_type, entity_id, details)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ActivityLog>(&query)
            .bind(entry.user_id)
            .bind(entry.action)
            .bind(entry.entity_type)
            .bind(entry.entity_id)
            .bind(&entry.details)
            .fetch_one(executor)
            .await
    }

    /// Most recent entries first. `limit` is clamped to `1..=MAX_LIST_LIMIT`.
    pub async fn list_recent(pool: &PgPool, limit: i64) -> Result<Vec<ActivityLog>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM activity_logs
             ORDER BY created_at DESC, id DESC
             LIMIT $1"
        );
        sqlx::query_as::<_, ActivityLog>(&query)
            .bind(limit.clamp(1, MAX_LIST_LIMIT))
            .fetch_all(pool)
            .await
    }

    /// All entries for one entity, oldest first.
    pub async fn list_for_entity(
        pool: &PgPool,
        entity_type: &str,
        entity_id: i64,
    ) -> Result<Vec<ActivityLog>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM activity_logs
             WHERE entity_type = $1 AND entity_id = $2
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, ActivityLog>(&query)
            .bind(entity_type)
            .bind(entity_id)
            .fetch_all(pool)
            .await
    }
}
