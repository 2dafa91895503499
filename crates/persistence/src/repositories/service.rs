//! Service catalog repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use domain::models::{CreateServiceRequest, UpdateServiceRequest};

use crate::entities::ServiceEntity;
use crate::metrics::QueryTimer;

const SERVICE_COLUMNS: &str = "id, service_name, service_category, description, is_active, \
     created_by, created_at, updated_at";

/// Repository for service catalog database operations.
#[derive(Clone)]
pub struct ServiceRepository {
    pool: PgPool,
}

impl ServiceRepository {
    /// Creates a new ServiceRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new service.
    pub async fn insert(
        &self,
        request: &CreateServiceRequest,
        created_by: Uuid,
    ) -> Result<ServiceEntity, sqlx::Error> {
        let timer = QueryTimer::new("insert_service");
        let result = sqlx::query_as::<_, ServiceEntity>(&format!(
            r#"
            INSERT INTO services (service_name, service_category, description, is_active, created_by)
            VALUES ($1, $2, $3, true, $4)
            RETURNING {}
            "#,
            SERVICE_COLUMNS
        ))
        .bind(&request.service_name)
        .bind(&request.service_category)
        .bind(&request.description)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a service by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<ServiceEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_service_by_id");
        let result = sqlx::query_as::<_, ServiceEntity>(&format!(
            "SELECT {} FROM services WHERE id = $1",
            SERVICE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List services, optionally restricted to active ones.
    pub async fn list(&self, only_active: bool) -> Result<Vec<ServiceEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_services");
        let result = sqlx::query_as::<_, ServiceEntity>(&format!(
            r#"
            SELECT {}
            FROM services
            WHERE ($1 = false OR is_active = true)
            ORDER BY service_name
            "#,
            SERVICE_COLUMNS
        ))
        .bind(only_active)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Apply a partial update. Absent fields keep their current values.
    pub async fn update(
        &self,
        id: Uuid,
        request: &UpdateServiceRequest,
    ) -> Result<Option<ServiceEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_service");
        let result = sqlx::query_as::<_, ServiceEntity>(&format!(
            r#"
            UPDATE services
            SET service_name = COALESCE($2, service_name),
                service_category = COALESCE($3, service_category),
                description = COALESCE($4, description),
                is_active = COALESCE($5, is_active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            SERVICE_COLUMNS
        ))
        .bind(id)
        .bind(&request.service_name)
        .bind(&request.service_category)
        .bind(&request.description)
        .bind(request.is_active)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }
}

#[cfg(test)]
mod tests {
    // Note: ServiceRepository tests require a database connection and are
    // covered by integration tests.
}
