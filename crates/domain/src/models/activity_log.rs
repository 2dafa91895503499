//! Activity log models.
//!
//! Every mutating lead or user operation records an activity entry so the
//! activity feed reflects actual system history.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Recorded action kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityAction {
    LeadCreated,
    LeadUpdated,
    LeadFieldUpdated,
    LeadBulkUpdated,
    LeadAssigned,
    LeadDeleted,
    LeadsImported,
    UserCreated,
    UserStatusChanged,
}

impl ActivityAction {
    /// Database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityAction::LeadCreated => "lead_created",
            ActivityAction::LeadUpdated => "lead_updated",
            ActivityAction::LeadFieldUpdated => "lead_field_updated",
            ActivityAction::LeadBulkUpdated => "lead_bulk_updated",
            ActivityAction::LeadAssigned => "lead_assigned",
            ActivityAction::LeadDeleted => "lead_deleted",
            ActivityAction::LeadsImported => "leads_imported",
            ActivityAction::UserCreated => "user_created",
            ActivityAction::UserStatusChanged => "user_status_changed",
        }
    }
}

impl std::fmt::Display for ActivityAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A persisted activity entry.
#[derive(Debug, Clone, Serialize)]
pub struct ActivityLog {
    pub id: Uuid,
    pub user_id: Uuid,
    pub lead_id: Option<Uuid>,
    pub action: String,
    pub details: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for recording an activity entry.
#[derive(Debug, Clone)]
pub struct CreateActivityInput {
    pub user_id: Uuid,
    pub lead_id: Option<Uuid>,
    pub action: ActivityAction,
    pub details: Option<String>,
}

impl CreateActivityInput {
    pub fn new(user_id: Uuid, action: ActivityAction) -> Self {
        Self {
            user_id,
            lead_id: None,
            action,
            details: None,
        }
    }

    pub fn on_lead(mut self, lead_id: Uuid) -> Self {
        self.lead_id = Some(lead_id);
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_action_as_str() {
        assert_eq!(ActivityAction::LeadCreated.as_str(), "lead_created");
        assert_eq!(ActivityAction::LeadsImported.as_str(), "leads_imported");
        assert_eq!(ActivityAction::UserStatusChanged.as_str(), "user_status_changed");
    }

    #[test]
    fn test_create_activity_input_builder() {
        let user_id = Uuid::new_v4();
        let lead_id = Uuid::new_v4();
        let input = CreateActivityInput::new(user_id, ActivityAction::LeadAssigned)
            .on_lead(lead_id)
            .with_details("Reassigned to campaign owner");

        assert_eq!(input.user_id, user_id);
        assert_eq!(input.lead_id, Some(lead_id));
        assert_eq!(input.details.as_deref(), Some("Reassigned to campaign owner"));
    }
}
