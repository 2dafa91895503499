//! Service catalog models.
//!
//! Services are admin-managed reference data. They are only ever
//! soft-deactivated because ads and lead tagging reference them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A service offered to clients.
#[derive(Debug, Clone, Serialize)]
pub struct Service {
    pub id: Uuid,
    pub service_name: String,
    pub service_category: Option<String>,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to create a service (admin-only).
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateServiceRequest {
    #[validate(length(min = 1, max = 100, message = "service_name must be 1-100 characters"))]
    pub service_name: String,

    #[validate(length(max = 100, message = "service_category must be at most 100 characters"))]
    pub service_category: Option<String>,

    #[validate(length(max = 1000, message = "description must be at most 1000 characters"))]
    pub description: Option<String>,
}

/// Request to update a service. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateServiceRequest {
    #[validate(length(min = 1, max = 100, message = "service_name must be 1-100 characters"))]
    pub service_name: Option<String>,

    #[validate(length(max = 100, message = "service_category must be at most 100 characters"))]
    pub service_category: Option<String>,

    #[validate(length(max = 1000, message = "description must be at most 1000 characters"))]
    pub description: Option<String>,

    pub is_active: Option<bool>,
}
