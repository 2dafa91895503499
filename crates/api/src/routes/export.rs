//! CSV lead export endpoint.
//!
//! Exports the caller's visible leads, honoring the same filters as the list
//! endpoint. Output is UTF-8 with a BOM so spreadsheet tools detect the
//! encoding. The assigned-user name column is only present for callers who
//! can see other users' leads.

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Extension,
};
use chrono::Utc;
use std::collections::HashMap;
use uuid::Uuid;

use domain::models::{Lead, LeadFilter};
use domain::services::policy::{self, Permission};
use persistence::repositories::{LeadRepository, UserRepository};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::{require, SessionAuth};

const EXPORT_HEADERS: [&str; 15] = [
    "ID",
    "Client Name",
    "Required Services",
    "Website",
    "Phone",
    "Email",
    "Call Enquiry",
    "Secondary Email",
    "WhatsApp",
    "Follow Up",
    "Client Status",
    "Notes",
    "Industry",
    "Created At",
    "Updated At",
];

const ASSIGNED_HEADER: &str = "Assigned To";

fn export_record(lead: &Lead, assigned_names: Option<&HashMap<Uuid, String>>) -> Vec<String> {
    let mut record = vec![
        lead.id.to_string(),
        lead.client_name.clone(),
        lead.required_services.clone().unwrap_or_default(),
        lead.website.clone().unwrap_or_default(),
        lead.phone.clone().unwrap_or_default(),
        lead.email.clone().unwrap_or_default(),
        lead.call_enquiry.clone().unwrap_or_default(),
        lead.mail.clone().unwrap_or_default(),
        lead.whatsapp.clone().unwrap_or_default(),
        lead.follow_up.map(|d| d.to_string()).unwrap_or_default(),
        lead.client_status.map(|s| s.to_string()).unwrap_or_default(),
        lead.notes.clone().unwrap_or_default(),
        lead.industry.clone().unwrap_or_default(),
        lead.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        lead.updated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
    ];

    if let Some(names) = assigned_names {
        record.push(
            lead.assigned_to
                .map(|id| names.get(&id).cloned().unwrap_or_else(|| id.to_string()))
                .unwrap_or_default(),
        );
    }

    record
}

fn render_csv(
    leads: &[Lead],
    assigned_names: Option<&HashMap<Uuid, String>>,
) -> Result<Vec<u8>, ApiError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let mut headers: Vec<&str> = EXPORT_HEADERS.to_vec();
    if assigned_names.is_some() {
        headers.push(ASSIGNED_HEADER);
    }
    writer
        .write_record(&headers)
        .map_err(|e| ApiError::Internal(format!("CSV write failed: {}", e)))?;

    for lead in leads {
        writer
            .write_record(export_record(lead, assigned_names))
            .map_err(|e| ApiError::Internal(format!("CSV write failed: {}", e)))?;
    }

    let data = writer
        .into_inner()
        .map_err(|e| ApiError::Internal(format!("CSV write failed: {}", e)))?;

    // UTF-8 BOM for spreadsheet tools.
    let mut out = Vec::with_capacity(data.len() + 3);
    out.extend_from_slice(b"\xEF\xBB\xBF");
    out.extend_from_slice(&data);
    Ok(out)
}

/// GET /api/v1/leads/export
pub async fn export_leads(
    State(state): State<AppState>,
    Extension(auth): Extension<SessionAuth>,
    Query(filter): Query<LeadFilter>,
) -> Result<impl IntoResponse, ApiError> {
    require(&auth, Permission::ExportLeads)?;

    let filter = filter.normalized();
    let assigned = filter.assigned_filter().map_err(|e| vec![e])?;

    let lead_repo = LeadRepository::new(state.pool.clone());
    let leads: Vec<Lead> = lead_repo
        .list(
            policy::visibility(auth.role, auth.user_id),
            &filter,
            assigned,
            state.config.limits.max_export_rows,
        )
        .await?
        .into_iter()
        .map(Lead::from)
        .collect();

    let assigned_names: Option<HashMap<Uuid, String>> =
        if policy::can(auth.role, Permission::ViewAllLeads) {
            let users = UserRepository::new(state.pool.clone()).list_users().await?;
            Some(users.into_iter().map(|u| (u.id, u.full_name)).collect())
        } else {
            None
        };

    let body = render_csv(&leads, assigned_names.as_ref())?;
    let filename = format!("leads_export_{}.csv", Utc::now().format("%Y%m%d"));

    Ok((
        [
            (
                header::CONTENT_TYPE,
                "text/csv; charset=utf-8".to_string(),
            ),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use domain::models::ClientStatus;

    fn sample_lead(assigned_to: Option<Uuid>) -> Lead {
        Lead {
            id: Uuid::new_v4(),
            client_name: "Acme, Inc.".to_string(),
            required_services: Some("SEO".to_string()),
            website: None,
            phone: Some("+15551234567".to_string()),
            email: Some("ops@acme.example".to_string()),
            call_enquiry: None,
            mail: None,
            whatsapp: None,
            follow_up: None,
            client_status: Some(ClientStatus::Interested),
            notes: None,
            industry: Some("Technology".to_string()),
            assigned_to,
            source_ad_id: None,
            lead_source: "Manual".to_string(),
            selected_service_ids: vec![],
            created_at: Utc.with_ymd_and_hms(2025, 5, 1, 9, 30, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2025, 5, 1, 9, 30, 0).unwrap(),
        }
    }

    #[test]
    fn test_render_csv_starts_with_bom_and_header() {
        let data = render_csv(&[], None).unwrap();
        assert_eq!(&data[..3], b"\xEF\xBB\xBF");
        let text = String::from_utf8(data[3..].to_vec()).unwrap();
        assert!(text.starts_with("ID,Client Name,Required Services"));
        assert!(!text.contains("Assigned To"));
    }

    #[test]
    fn test_render_csv_quotes_embedded_commas() {
        let data = render_csv(&[sample_lead(None)], None).unwrap();
        let text = String::from_utf8(data[3..].to_vec()).unwrap();
        assert!(text.contains("\"Acme, Inc.\""));
        assert!(text.contains("Interested"));
        assert!(text.contains("2025-05-01 09:30:00"));
    }

    #[test]
    fn test_assigned_column_resolves_owner_name() {
        let owner = Uuid::new_v4();
        let mut names = HashMap::new();
        names.insert(owner, "Dana Reyes".to_string());

        let record = export_record(&sample_lead(Some(owner)), Some(&names));
        assert_eq!(record.len(), EXPORT_HEADERS.len() + 1);
        assert_eq!(record[15], "Dana Reyes");

        let record = export_record(&sample_lead(None), Some(&names));
        assert_eq!(record[15], "");
    }

    #[test]
    fn test_assigned_column_absent_without_names() {
        let record = export_record(&sample_lead(Some(Uuid::new_v4())), None);
        assert_eq!(record.len(), EXPORT_HEADERS.len());
    }
}
