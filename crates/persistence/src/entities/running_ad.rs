//! Running ad (campaign) entity (database row mapping).

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the running_ads table.
#[derive(Debug, Clone, FromRow)]
pub struct RunningAdEntity {
    pub id: Uuid,
    pub ad_name: String,
    pub service_id: Uuid,
    pub platform: String,
    pub budget: f64,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub target_audience: Option<String>,
    pub ad_copy: Option<String>,
    pub assigned_sales_member: Uuid,
    pub is_active: bool,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<RunningAdEntity> for domain::models::RunningAd {
    fn from(entity: RunningAdEntity) -> Self {
        Self {
            id: entity.id,
            ad_name: entity.ad_name,
            service_id: entity.service_id,
            platform: entity.platform,
            budget: entity.budget,
            start_date: entity.start_date,
            end_date: entity.end_date,
            target_audience: entity.target_audience,
            ad_copy: entity.ad_copy,
            assigned_sales_member: entity.assigned_sales_member,
            is_active: entity.is_active,
            created_by: entity.created_by,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
