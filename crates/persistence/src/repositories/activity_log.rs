//! Activity log repository for database operations.

use sqlx::PgPool;
use tracing::error;
use uuid::Uuid;

use domain::models::CreateActivityInput;

use crate::entities::ActivityLogEntity;
use crate::metrics::QueryTimer;

const ACTIVITY_COLUMNS: &str = "id, user_id, lead_id, action, details, created_at";

/// Repository for activity log database operations.
#[derive(Clone)]
pub struct ActivityLogRepository {
    pool: PgPool,
}

impl ActivityLogRepository {
    /// Creates a new ActivityLogRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new activity entry.
    pub async fn insert(
        &self,
        input: CreateActivityInput,
    ) -> Result<ActivityLogEntity, sqlx::Error> {
        let timer = QueryTimer::new("insert_activity_log");
        let result = sqlx::query_as::<_, ActivityLogEntity>(&format!(
            r#"
            INSERT INTO activity_logs (user_id, lead_id, action, details)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            ACTIVITY_COLUMNS
        ))
        .bind(input.user_id)
        .bind(input.lead_id)
        .bind(input.action.as_str())
        .bind(&input.details)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Insert an activity entry without blocking the caller. A failed write
    /// is logged and dropped; activity logging never fails the operation it
    /// records.
    pub fn insert_async(&self, input: CreateActivityInput) {
        let repo = self.clone();
        tokio::spawn(async move {
            if let Err(e) = repo.insert(input).await {
                error!(error = %e, "failed to write activity log entry");
            }
        });
    }

    /// List the most recent activity entries.
    pub async fn list_recent(&self, limit: i64) -> Result<Vec<ActivityLogEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_recent_activity");
        let result = sqlx::query_as::<_, ActivityLogEntity>(&format!(
            "SELECT {} FROM activity_logs ORDER BY created_at DESC LIMIT $1",
            ACTIVITY_COLUMNS
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List activity entries for a single lead, newest first.
    pub async fn list_for_lead(
        &self,
        lead_id: Uuid,
        limit: i64,
    ) -> Result<Vec<ActivityLogEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_lead_activity");
        let result = sqlx::query_as::<_, ActivityLogEntity>(&format!(
            r#"
            SELECT {}
            FROM activity_logs
            WHERE lead_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
            ACTIVITY_COLUMNS
        ))
        .bind(lead_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}

#[cfg(test)]
mod tests {
    // Note: ActivityLogRepository tests require a database connection and are
    // covered by integration tests.
}
