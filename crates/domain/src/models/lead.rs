//! Lead domain models, form validation, and updatable field sets.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use shared::validation::{
    normalize_website, parse_follow_up_date, validate_email_field, validate_phone_field,
};

/// Lead source recorded for rows created through CSV import.
pub const CSV_IMPORT_SOURCE: &str = "CSV Import";

/// Default lead source for interactive entry.
pub const MANUAL_SOURCE: &str = "Manual";

/// Fixed industry list used for tagging and analytics breakdowns.
pub const INDUSTRIES: [&str; 10] = [
    "Technology",
    "Healthcare",
    "Finance",
    "Education",
    "Retail",
    "Real Estate",
    "Manufacturing",
    "Hospitality",
    "Marketing",
    "Other",
];

/// Returns true when a lead source denotes an ad-derived origin
/// (e.g. "Facebook Ad", "Google Ad", "Running Ad").
pub fn is_ad_derived_source(source: &str) -> bool {
    let s = source.trim().to_lowercase();
    s.ends_with(" ad") || s.ends_with(" ads") || s == "ad" || s == "ads"
}

/// Pipeline status of a lead. Absence means "no status yet".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClientStatus {
    Interested,
    #[serde(rename = "Not Interested")]
    NotInterested,
    #[serde(rename = "Budget Not Met")]
    BudgetNotMet,
    #[serde(rename = "Meeting Scheduled")]
    MeetingScheduled,
}

impl ClientStatus {
    /// Database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ClientStatus::Interested => "Interested",
            ClientStatus::NotInterested => "Not Interested",
            ClientStatus::BudgetNotMet => "Budget Not Met",
            ClientStatus::MeetingScheduled => "Meeting Scheduled",
        }
    }
}

impl std::fmt::Display for ClientStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ClientStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Interested" => Ok(ClientStatus::Interested),
            "Not Interested" => Ok(ClientStatus::NotInterested),
            "Budget Not Met" => Ok(ClientStatus::BudgetNotMet),
            "Meeting Scheduled" => Ok(ClientStatus::MeetingScheduled),
            other => Err(format!("Unknown client status: {}", other)),
        }
    }
}

/// A lead record, the central entity of the system.
#[derive(Debug, Clone, Serialize)]
pub struct Lead {
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
    pub client_status: Option<ClientStatus>,
    pub notes: Option<String>,
    pub industry: Option<String>,
    pub assigned_to: Option<Uuid>,
    pub source_ad_id: Option<Uuid>,
    pub lead_source: String,
    pub selected_service_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Raw lead form input as submitted for create or full edit.
///
/// All string fields are trimmed; empty strings are treated as absent.
/// `assigned_to` and `confirm_reassign` feed the assignment resolver and are
/// not stored verbatim.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeadForm {
    pub client_name: String,
    pub required_services: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub call_enquiry: Option<String>,
    pub mail: Option<String>,
    pub whatsapp: Option<String>,
    pub follow_up: Option<String>,
    pub client_status: Option<String>,
    pub notes: Option<String>,
    pub industry: Option<String>,
    pub lead_source: Option<String>,
    pub source_ad_id: Option<Uuid>,
    pub assigned_to: Option<Uuid>,
    #[serde(default)]
    pub confirm_reassign: bool,
    pub selected_service_ids: Option<Vec<Uuid>>,
}

/// Lead form content after validation and normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedLead {
    pub client_name: String,
    pub required_services: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub call_enquiry: Option<String>,
    pub mail: Option<String>,
    pub whatsapp: Option<String>,
    pub follow_up: Option<NaiveDate>,
    pub client_status: Option<ClientStatus>,
    pub notes: Option<String>,
    pub industry: Option<String>,
    pub lead_source: String,
    pub source_ad_id: Option<Uuid>,
    pub selected_service_ids: Vec<Uuid>,
}

fn clean(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

impl LeadForm {
    /// Validates the form, returning normalized values or the complete list
    /// of field-level errors. No partial results are produced on failure.
    pub fn validate(&self) -> Result<ValidatedLead, Vec<FieldError>> {
        let mut errors = Vec::new();

        let client_name = self.client_name.trim().to_string();
        if client_name.is_empty() {
            errors.push(FieldError::new("client_name", "Client name is required"));
        }

        let email = clean(&self.email);
        if let Some(ref email) = email {
            if let Err(e) = validate_email_field(email) {
                errors.push(FieldError::new("email", message_of(e)));
            }
        }

        let mail = clean(&self.mail);
        if let Some(ref mail) = mail {
            if let Err(e) = validate_email_field(mail) {
                errors.push(FieldError::new("mail", message_of(e)));
            }
        }

        let phone = clean(&self.phone);
        if let Some(ref phone) = phone {
            if let Err(e) = validate_phone_field(phone) {
                errors.push(FieldError::new("phone", message_of(e)));
            }
        }

        let website = match clean(&self.website) {
            Some(raw) => match normalize_website(&raw) {
                Ok(fixed) => Some(fixed),
                Err(e) => {
                    errors.push(FieldError::new("website", message_of(e)));
                    None
                }
            },
            None => None,
        };

        let follow_up = match clean(&self.follow_up) {
            Some(raw) => match parse_follow_up_date(&raw) {
                Ok(date) => Some(date),
                Err(e) => {
                    errors.push(FieldError::new("follow_up", message_of(e)));
                    None
                }
            },
            None => None,
        };

        let client_status = match clean(&self.client_status) {
            Some(raw) => match ClientStatus::from_str(&raw) {
                Ok(status) => Some(status),
                Err(msg) => {
                    errors.push(FieldError::new("client_status", msg));
                    None
                }
            },
            None => None,
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(ValidatedLead {
            client_name,
            required_services: clean(&self.required_services),
            website,
            phone,
            email,
            call_enquiry: clean(&self.call_enquiry),
            mail,
            whatsapp: clean(&self.whatsapp),
            follow_up,
            client_status,
            notes: clean(&self.notes),
            industry: clean(&self.industry),
            lead_source: clean(&self.lead_source).unwrap_or_else(|| MANUAL_SOURCE.to_string()),
            source_ad_id: self.source_ad_id,
            selected_service_ids: self.selected_service_ids.clone().unwrap_or_default(),
        })
    }
}

fn message_of(err: validator::ValidationError) -> String {
    err.message
        .map(|m| m.to_string())
        .unwrap_or_else(|| "Invalid value".to_string())
}

/// Insertable lead data: validated form content plus the resolved owner.
#[derive(Debug, Clone)]
pub struct LeadDraft {
    pub fields: ValidatedLead,
    pub assigned_to: Option<Uuid>,
}

/// Fields settable through the single-field inline edit path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InlineField {
    FollowUp,
    ClientStatus,
    Notes,
    Industry,
}

impl InlineField {
    pub fn column(&self) -> &'static str {
        match self {
            InlineField::FollowUp => "follow_up",
            InlineField::ClientStatus => "client_status",
            InlineField::Notes => "notes",
            InlineField::Industry => "industry",
        }
    }
}

impl FromStr for InlineField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "follow_up" => Ok(InlineField::FollowUp),
            "client_status" => Ok(InlineField::ClientStatus),
            "notes" => Ok(InlineField::Notes),
            "industry" => Ok(InlineField::Industry),
            other => Err(format!("Field '{}' cannot be updated inline", other)),
        }
    }
}

/// Fields settable through the bulk update path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkField {
    ClientStatus,
    Industry,
    AssignedTo,
}

impl BulkField {
    pub fn column(&self) -> &'static str {
        match self {
            BulkField::ClientStatus => "client_status",
            BulkField::Industry => "industry",
            BulkField::AssignedTo => "assigned_to",
        }
    }
}

impl FromStr for BulkField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "client_status" => Ok(BulkField::ClientStatus),
            "industry" => Ok(BulkField::Industry),
            "assigned_to" => Ok(BulkField::AssignedTo),
            other => Err(format!("Field '{}' cannot be bulk-updated", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_form() -> LeadForm {
        LeadForm {
            client_name: "Acme Corp".to_string(),
            ..LeadForm::default()
        }
    }

    #[test]
    fn test_client_status_roundtrip() {
        for status in [
            ClientStatus::Interested,
            ClientStatus::NotInterested,
            ClientStatus::BudgetNotMet,
            ClientStatus::MeetingScheduled,
        ] {
            assert_eq!(ClientStatus::from_str(status.as_str()).unwrap(), status);
        }
        assert!(ClientStatus::from_str("Lost").is_err());
    }

    #[test]
    fn test_is_ad_derived_source() {
        assert!(is_ad_derived_source("Facebook Ad"));
        assert!(is_ad_derived_source("google ad"));
        assert!(is_ad_derived_source("Instagram Ads"));
        assert!(!is_ad_derived_source("Manual"));
        assert!(!is_ad_derived_source("CSV Import"));
        assert!(!is_ad_derived_source("Referral"));
    }

    #[test]
    fn test_validate_requires_client_name() {
        let form = LeadForm {
            client_name: "   ".to_string(),
            ..LeadForm::default()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "client_name");
    }

    #[test]
    fn test_validate_collects_all_errors() {
        let form = LeadForm {
            client_name: String::new(),
            email: Some("bad-email".to_string()),
            phone: Some("xx".to_string()),
            follow_up: Some("not-a-date".to_string()),
            ..LeadForm::default()
        };
        let errors = form.validate().unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert!(fields.contains(&"client_name"));
        assert!(fields.contains(&"email"));
        assert!(fields.contains(&"phone"));
        assert!(fields.contains(&"follow_up"));
    }

    #[test]
    fn test_validate_website_autofix() {
        let form = LeadForm {
            website: Some("acme.example.com".to_string()),
            ..base_form()
        };
        let validated = form.validate().unwrap();
        assert_eq!(validated.website.as_deref(), Some("http://acme.example.com"));
    }

    #[test]
    fn test_validate_website_rejected_after_autofix() {
        let form = LeadForm {
            website: Some("not a website".to_string()),
            ..base_form()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors[0].field, "website");
    }

    #[test]
    fn test_validate_empty_strings_become_none() {
        let form = LeadForm {
            email: Some("  ".to_string()),
            notes: Some(String::new()),
            ..base_form()
        };
        let validated = form.validate().unwrap();
        assert!(validated.email.is_none());
        assert!(validated.notes.is_none());
    }

    #[test]
    fn test_validate_defaults_lead_source_to_manual() {
        let validated = base_form().validate().unwrap();
        assert_eq!(validated.lead_source, MANUAL_SOURCE);
    }

    #[test]
    fn test_validate_parses_status_and_date() {
        let form = LeadForm {
            client_status: Some("Meeting Scheduled".to_string()),
            follow_up: Some("2025-06-01".to_string()),
            ..base_form()
        };
        let validated = form.validate().unwrap();
        assert_eq!(validated.client_status, Some(ClientStatus::MeetingScheduled));
        assert_eq!(
            validated.follow_up,
            Some(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap())
        );
    }

    #[test]
    fn test_inline_field_parsing() {
        assert_eq!(
            InlineField::from_str("follow_up").unwrap(),
            InlineField::FollowUp
        );
        assert_eq!(InlineField::from_str("notes").unwrap(), InlineField::Notes);
        // Disallowed fields are rejected, not ignored
        assert!(InlineField::from_str("client_name").is_err());
        assert!(InlineField::from_str("assigned_to").is_err());
    }

    #[test]
    fn test_bulk_field_parsing() {
        assert_eq!(
            BulkField::from_str("assigned_to").unwrap(),
            BulkField::AssignedTo
        );
        assert!(BulkField::from_str("follow_up").is_err());
        assert!(BulkField::from_str("notes").is_err());
    }
}
