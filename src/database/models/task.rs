use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Repeat cadence applied to a task after it fires. Stored lowercase as
/// nullable TEXT; a NULL column means the task is one-time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Recurrence {
    Daily,
    Weekly,
    Monthly,
}

#[derive(Debug, Error)]
#[error("Recurrence must be daily, weekly, or monthly.")]
pub struct ParseRecurrenceError;

impl FromStr for Recurrence {
    type Err = ParseRecurrenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "daily" => Ok(Recurrence::Daily),
            "weekly" => Ok(Recurrence::Weekly),
            "monthly" => Ok(Recurrence::Monthly),
            _ => Err(ParseRecurrenceError),
        }
    }
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Recurrence::Daily => "daily",
            Recurrence::Weekly => "weekly",
            Recurrence::Monthly => "monthly",
        };
        f.write_str(name)
    }
}

impl Recurrence {
    /// Offset added to a task's scheduled time when it fires. Monthly is a
    /// fixed 30-day step, not calendar-month arithmetic.
    pub fn interval(&self) -> Duration {
        match self {
            Recurrence::Daily => Duration::days(1),
            Recurrence::Weekly => Duration::days(7),
            Recurrence::Monthly => Duration::days(30),
        }
    }

    /// Next occurrence computed from the prior scheduled time, not from the
    /// moment the reconciler runs.
    pub fn next_occurrence(&self, from: DateTime<Utc>) -> DateTime<Utc> {
        from + self.interval()
    }
}

/// A persisted reminder. Owner-scoped operations match both `id` and
/// `owner_id`; the reconciler variants (`advance`, `delete`) match `id` alone.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub owner_id: i64,
    pub description: String,
    pub scheduled_time: DateTime<Utc>,
    pub recurrence: Option<Recurrence>,
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Inserts a one-time task and returns the store-assigned id.
    pub async fn create(
        pool: &sqlx::SqlitePool,
        owner_id: i64,
        description: &str,
        scheduled_time: DateTime<Utc>,
    ) -> Result<i64, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO tasks (owner_id, description, scheduled_time, created_at) VALUES (?, ?, ?, ?)"
        )
        .bind(owner_id)
        .bind(description)
        .bind(scheduled_time)
        .bind(Utc::now())
        .execute(pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    pub async fn find_by_id(
        pool: &sqlx::SqlitePool,
        task_id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Task>(
            "SELECT id, owner_id, description, scheduled_time, recurrence, created_at
             FROM tasks WHERE id = ?"
        )
        .bind(task_id)
        .fetch_optional(pool)
        .await
    }

    /// Tasks owned by `owner_id` that are still in the future, soonest first,
    /// capped at `limit`.
    pub async fn find_upcoming(
        pool: &sqlx::SqlitePool,
        owner_id: i64,
        now: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Task>(
            "SELECT id, owner_id, description, scheduled_time, recurrence, created_at
             FROM tasks
             WHERE owner_id = ? AND scheduled_time > ?
             ORDER BY scheduled_time
             LIMIT ?"
        )
        .bind(owner_id)
        .bind(now)
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// All due tasks across all owners, soonest first. One reconciler pass
    /// processes the whole result set.
    pub async fn find_due(
        pool: &sqlx::SqlitePool,
        now: DateTime<Utc>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Task>(
            "SELECT id, owner_id, description, scheduled_time, recurrence, created_at
             FROM tasks
             WHERE scheduled_time <= ?
             ORDER BY scheduled_time"
        )
        .bind(now)
        .fetch_all(pool)
        .await
    }

    /// Deletes a task if it belongs to `owner_id`. Returns the affected row
    /// count; 0 means no such task or not the caller's.
    pub async fn delete_owned(
        pool: &sqlx::SqlitePool,
        task_id: i64,
        owner_id: i64,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ? AND owner_id = ?")
            .bind(task_id)
            .bind(owner_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Reschedules a task if it belongs to `owner_id`. Returns the affected
    /// row count.
    pub async fn update_time_owned(
        pool: &sqlx::SqlitePool,
        task_id: i64,
        owner_id: i64,
        new_time: DateTime<Utc>,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE tasks SET scheduled_time = ? WHERE id = ? AND owner_id = ?"
        )
        .bind(new_time)
        .bind(task_id)
        .bind(owner_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Sets the recurrence rule if the task belongs to `owner_id`. Returns the
    /// affected row count.
    pub async fn update_recurrence_owned(
        pool: &sqlx::SqlitePool,
        task_id: i64,
        owner_id: i64,
        recurrence: Recurrence,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE tasks SET recurrence = ? WHERE id = ? AND owner_id = ?"
        )
        .bind(recurrence)
        .bind(task_id)
        .bind(owner_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Reconciler variant: moves a recurring task to its next occurrence.
    /// No owner filter; the reconciler acts on every owner's tasks.
    pub async fn advance(
        pool: &sqlx::SqlitePool,
        task_id: i64,
        new_time: DateTime<Utc>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE tasks SET scheduled_time = ? WHERE id = ?")
            .bind(new_time)
            .bind(task_id)
            .execute(pool)
            .await?;

        Ok(())
    }

    /// Reconciler variant: removes a one-time task after it fired.
    pub async fn delete(
        pool: &sqlx::SqlitePool,
        task_id: i64,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(task_id)
            .execute(pool)
            .await?;

        Ok(())
    }
}
