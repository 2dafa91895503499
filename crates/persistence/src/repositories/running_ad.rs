//! Running ad (campaign) repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use domain::models::{CreateRunningAdRequest, UpdateRunningAdRequest};

use crate::entities::RunningAdEntity;
use crate::metrics::QueryTimer;

const RUNNING_AD_COLUMNS: &str = "id, ad_name, service_id, platform, budget, start_date, end_date, \
     target_audience, ad_copy, assigned_sales_member, is_active, created_by, \
     created_at, updated_at";

/// Repository for campaign database operations.
#[derive(Clone)]
pub struct RunningAdRepository {
    pool: PgPool,
}

impl RunningAdRepository {
    /// Creates a new RunningAdRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new campaign.
    pub async fn insert(
        &self,
        request: &CreateRunningAdRequest,
        created_by: Uuid,
    ) -> Result<RunningAdEntity, sqlx::Error> {
        let timer = QueryTimer::new("insert_running_ad");
        let result = sqlx::query_as::<_, RunningAdEntity>(&format!(
            r#"
            INSERT INTO running_ads (
                ad_name, service_id, platform, budget, start_date, end_date,
                target_audience, ad_copy, assigned_sales_member, is_active, created_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, true, $10)
            RETURNING {}
            "#,
            RUNNING_AD_COLUMNS
        ))
        .bind(&request.ad_name)
        .bind(request.service_id)
        .bind(&request.platform)
        .bind(request.budget)
        .bind(request.start_date)
        .bind(request.end_date)
        .bind(&request.target_audience)
        .bind(&request.ad_copy)
        .bind(request.assigned_sales_member)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a campaign by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<RunningAdEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_running_ad_by_id");
        let result = sqlx::query_as::<_, RunningAdEntity>(&format!(
            "SELECT {} FROM running_ads WHERE id = $1",
            RUNNING_AD_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List campaigns, optionally restricted to active ones, newest first.
    pub async fn list(&self, only_active: bool) -> Result<Vec<RunningAdEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_running_ads");
        let result = sqlx::query_as::<_, RunningAdEntity>(&format!(
            r#"
            SELECT {}
            FROM running_ads
            WHERE ($1 = false OR is_active = true)
            ORDER BY created_at DESC
            "#,
            RUNNING_AD_COLUMNS
        ))
        .bind(only_active)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Apply a partial update. Absent fields keep their current values.
    ///
    /// `end_date` cannot be cleared through this path; clearing it would be
    /// indistinguishable from leaving it unchanged.
    pub async fn update(
        &self,
        id: Uuid,
        request: &UpdateRunningAdRequest,
    ) -> Result<Option<RunningAdEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_running_ad");
        let result = sqlx::query_as::<_, RunningAdEntity>(&format!(
            r#"
            UPDATE running_ads
            SET ad_name = COALESCE($2, ad_name),
                service_id = COALESCE($3, service_id),
                platform = COALESCE($4, platform),
                budget = COALESCE($5, budget),
                start_date = COALESCE($6, start_date),
                end_date = COALESCE($7, end_date),
                target_audience = COALESCE($8, target_audience),
                ad_copy = COALESCE($9, ad_copy),
                assigned_sales_member = COALESCE($10, assigned_sales_member),
                is_active = COALESCE($11, is_active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            RUNNING_AD_COLUMNS
        ))
        .bind(id)
        .bind(&request.ad_name)
        .bind(request.service_id)
        .bind(&request.platform)
        .bind(request.budget)
        .bind(request.start_date)
        .bind(request.end_date)
        .bind(&request.target_audience)
        .bind(&request.ad_copy)
        .bind(request.assigned_sales_member)
        .bind(request.is_active)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }
}

#[cfg(test)]
mod tests {
    // Note: RunningAdRepository tests require a database connection and are
    // covered by integration tests.
}
