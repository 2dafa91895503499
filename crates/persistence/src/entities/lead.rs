//! Lead entity (database row mapping).

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use std::str::FromStr;
use uuid::Uuid;

use domain::models::ClientStatus;

/// Database row mapping for the leads table.
#[derive(Debug, Clone, FromRow)]
pub struct LeadEntity {
    pub id: Uuid,
    pub client_name: String,
    pub required_services: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub call_enquiry: Option<String>,
    pub mail: Option<String>,
    pub whatsapp: Option<String>,
    pub follow_up: Option<NaiveDate>,
    pub client_status: Option<String>,
    pub notes: Option<String>,
    pub industry: Option<String>,
    pub assigned_to: Option<Uuid>,
    pub source_ad_id: Option<Uuid>,
    pub lead_source: String,
    pub selected_service_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<LeadEntity> for domain::models::Lead {
    fn from(entity: LeadEntity) -> Self {
        Self {
            id: entity.id,
            client_name: entity.client_name,
            required_services: entity.required_services,
            website: entity.website,
            phone: entity.phone,
            email: entity.email,
            call_enquiry: entity.call_enquiry,
            mail: entity.mail,
            whatsapp: entity.whatsapp,
            follow_up: entity.follow_up,
            // The column has a CHECK constraint; an unparsable value means
            // no status rather than a failed read.
            client_status: entity
                .client_status
                .as_deref()
                .and_then(|s| ClientStatus::from_str(s).ok()),
            notes: entity.notes,
            industry: entity.industry,
            assigned_to: entity.assigned_to,
            source_ad_id: entity.source_ad_id,
            lead_source: entity.lead_source,
            selected_service_ids: entity.selected_service_ids,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
