//! CSV lead import endpoint.
//!
//! Best-effort semantics: the file either fails as a whole (unreadable, no
//! client name column, too large) or imports row by row, skipping blank rows
//! and recording per-row errors without aborting the rest.

use axum::{extract::Multipart, extract::State, Extension, Json};
use uuid::Uuid;

use domain::models::csv_import::MAX_ERROR_MESSAGES;
use domain::models::{
    ActivityAction, CreateActivityInput, ImportRowError, ImportSummary, LeadDraft, ValidatedLead,
    CSV_IMPORT_SOURCE,
};
use domain::services::assignment::{resolve_assignment, AssignmentInput, AssignmentOp};
use domain::services::csv_import::{parse_leads_csv, ImportedRow};
use domain::services::policy::Permission;
use persistence::repositories::{ActivityLogRepository, LeadRepository};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::record_leads_imported;
use crate::middleware::{require, SessionAuth};
use crate::routes::leads::ensure_lead_owner;

fn draft_from_row(row: ImportedRow, assigned_to: Option<Uuid>) -> LeadDraft {
    LeadDraft {
        fields: ValidatedLead {
            client_name: row.client_name,
            required_services: row.required_services,
            website: row.website,
            phone: row.phone,
            email: row.email,
            call_enquiry: row.call_enquiry,
            mail: None,
            whatsapp: None,
            follow_up: None,
            client_status: None,
            notes: row.notes,
            industry: row.industry,
            lead_source: CSV_IMPORT_SOURCE.to_string(),
            source_ad_id: None,
            selected_service_ids: Vec::new(),
        },
        assigned_to,
    }
}

/// POST /api/v1/leads/import
pub async fn import_leads(
    State(state): State<AppState>,
    Extension(auth): Extension<SessionAuth>,
    mut multipart: Multipart,
) -> Result<Json<ImportSummary>, ApiError> {
    require(&auth, Permission::AddLeads)?;

    let mut data: Option<Vec<u8>> = None;
    let mut default_assignee: Option<Uuid> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(format!("Invalid multipart request: {}", e)))?
    {
        let Some(filename) = field.file_name().map(str::to_string) else {
            // Optional batch-wide assignee, honored for admin callers only.
            if field.name() == Some("assigned_to") {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::Validation(format!("Could not read field: {}", e)))?;
                let value = value.trim();
                if !value.is_empty() {
                    let id = value.parse::<Uuid>().map_err(|_| {
                        ApiError::Validation("assigned_to must be a user id".to_string())
                    })?;
                    ensure_lead_owner(&state, id).await?;
                    default_assignee = Some(id);
                }
            }
            continue;
        };

        if !filename.to_lowercase().ends_with(".csv") {
            return Err(ApiError::Validation(
                "Only .csv files are accepted".to_string(),
            ));
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::Validation(format!("Could not read upload: {}", e)))?;

        if bytes.len() > state.config.limits.max_import_file_bytes {
            return Err(ApiError::Validation(format!(
                "File exceeds the {} byte import limit",
                state.config.limits.max_import_file_bytes
            )));
        }

        // First file wins; later fields may still carry assigned_to.
        if data.is_none() {
            data = Some(bytes.to_vec());
        }
    }

    let data = data.ok_or_else(|| ApiError::Validation("No CSV file provided".to_string()))?;

    let parsed = parse_leads_csv(&data).map_err(|e| ApiError::Validation(e.to_string()))?;

    // Imported rows follow the same ownership rules as manual creation with
    // no campaign: sales imports to themselves, admin imports land on the
    // batch assignee when given and unassigned otherwise.
    let assigned_to = resolve_assignment(&AssignmentInput {
        actor_role: auth.role,
        actor_id: auth.user_id,
        lead_source: CSV_IMPORT_SOURCE,
        campaign_owner: None,
        manual_selection: default_assignee,
        op: AssignmentOp::Create,
    });

    let repo = LeadRepository::new(state.pool.clone());
    let mut errors = parsed.errors;
    let mut imported = 0usize;

    for row in parsed.rows {
        let row_number = row.row;
        match repo.insert(&draft_from_row(row, assigned_to)).await {
            Ok(_) => imported += 1,
            Err(e) => {
                tracing::error!(error = %e, row = row_number, "Import row insert failed");
                errors.push(ImportRowError::new(row_number, "Database error"));
            }
        }
    }

    errors.sort_by_key(|e| e.row);

    record_leads_imported(imported);

    ActivityLogRepository::new(state.pool.clone()).insert_async(
        CreateActivityInput::new(auth.user_id, ActivityAction::LeadsImported).with_details(
            format!("Imported {} lead(s) from CSV, {} error(s)", imported, errors.len()),
        ),
    );

    let error_messages = errors
        .iter()
        .take(MAX_ERROR_MESSAGES)
        .map(|e| format!("Row {}: {}", e.row, e.message))
        .collect();

    Ok(Json(ImportSummary {
        total_rows: parsed.total_rows,
        imported,
        skipped: parsed.skipped,
        error_count: errors.len(),
        error_messages,
        row_errors: errors,
    }))
}
