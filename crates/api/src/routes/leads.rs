//! Lead CRUD, inline edits, bulk updates, and assignment endpoints.
//!
//! Every handler scopes its queries with the caller's lead visibility, so a
//! lead outside visibility produces the same 404 as a missing one.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use domain::models::{
    BulkField, ClientStatus, CreateActivityInput, ActivityAction, InlineField, Lead, LeadDraft,
    LeadFilter, LeadForm, User,
};
use domain::services::assignment::{resolve_assignment, AssignmentInput, AssignmentOp};
use domain::services::policy::{self, LeadVisibility, Permission};
use persistence::repositories::{
    ActivityLogRepository, BulkValue, InlineValue, LeadRepository, RunningAdRepository,
    UserRepository,
};
use shared::validation::parse_follow_up_date;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::record_lead_created;
use crate::middleware::{require, SessionAuth};

fn visibility_of(auth: &SessionAuth) -> LeadVisibility {
    policy::visibility(auth.role, auth.user_id)
}

/// Owner assigned by the campaign referenced in the form, when one was
/// selected and it still exists. A dangling campaign id is not an error;
/// assignment falls back to the manual rules.
async fn campaign_owner(
    state: &AppState,
    source_ad_id: Option<Uuid>,
) -> Result<Option<Uuid>, ApiError> {
    match source_ad_id {
        Some(ad_id) => {
            let repo = RunningAdRepository::new(state.pool.clone());
            Ok(repo
                .find_by_id(ad_id)
                .await?
                .map(|ad| ad.assigned_sales_member))
        }
        None => Ok(None),
    }
}

/// Lead owners must be active sales users.
fn check_lead_owner(user: &User) -> Result<(), ApiError> {
    if !user.is_active {
        return Err(ApiError::Validation(
            "Assigned user account is deactivated".to_string(),
        ));
    }
    if !policy::can_own_leads(user.role) {
        return Err(ApiError::Validation(
            "Leads can only be assigned to sales users".to_string(),
        ));
    }
    Ok(())
}

pub(crate) async fn ensure_lead_owner(state: &AppState, user_id: Uuid) -> Result<(), ApiError> {
    let repo = UserRepository::new(state.pool.clone());
    let entity = repo
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| ApiError::Validation("Assigned user does not exist".to_string()))?;
    check_lead_owner(&User::from(entity))
}

/// A manual owner pick only takes effect for callers who may assign leads,
/// and then the target must be eligible to own them.
async fn ensure_manual_selection(
    state: &AppState,
    auth: &SessionAuth,
    manual_selection: Option<Uuid>,
) -> Result<(), ApiError> {
    if let Some(user_id) = manual_selection {
        if policy::can(auth.role, Permission::AssignLeads) {
            ensure_lead_owner(state, user_id).await?;
        }
    }
    Ok(())
}

/// GET /api/v1/leads
pub async fn list_leads(
    State(state): State<AppState>,
    Extension(auth): Extension<SessionAuth>,
    Query(filter): Query<LeadFilter>,
) -> Result<Json<Vec<Lead>>, ApiError> {
    let filter = filter.normalized();
    let assigned = filter.assigned_filter().map_err(|e| vec![e])?;

    let repo = LeadRepository::new(state.pool.clone());
    let entities = repo
        .list(
            visibility_of(&auth),
            &filter,
            assigned,
            state.config.limits.max_list_rows,
        )
        .await?;

    Ok(Json(entities.into_iter().map(Lead::from).collect()))
}

/// GET /api/v1/leads/:lead_id
pub async fn get_lead(
    State(state): State<AppState>,
    Extension(auth): Extension<SessionAuth>,
    Path(lead_id): Path<Uuid>,
) -> Result<Json<Lead>, ApiError> {
    let repo = LeadRepository::new(state.pool.clone());
    let entity = repo
        .find_by_id(lead_id, visibility_of(&auth))
        .await?
        .ok_or_else(|| ApiError::NotFound("Lead not found".to_string()))?;
    Ok(Json(entity.into()))
}

/// POST /api/v1/leads
pub async fn create_lead(
    State(state): State<AppState>,
    Extension(auth): Extension<SessionAuth>,
    Json(form): Json<LeadForm>,
) -> Result<(StatusCode, Json<Lead>), ApiError> {
    require(&auth, Permission::AddLeads)?;

    let validated = form.validate()?;
    ensure_manual_selection(&state, &auth, form.assigned_to).await?;
    let campaign_owner = campaign_owner(&state, validated.source_ad_id).await?;

    let assigned_to = resolve_assignment(&AssignmentInput {
        actor_role: auth.role,
        actor_id: auth.user_id,
        lead_source: &validated.lead_source,
        campaign_owner,
        manual_selection: form.assigned_to,
        op: AssignmentOp::Create,
    });

    let repo = LeadRepository::new(state.pool.clone());
    let entity = repo
        .insert(&LeadDraft {
            fields: validated,
            assigned_to,
        })
        .await?;

    record_lead_created(&entity.lead_source);

    ActivityLogRepository::new(state.pool.clone()).insert_async(
        CreateActivityInput::new(auth.user_id, ActivityAction::LeadCreated)
            .on_lead(entity.id)
            .with_details(format!("Created lead '{}'", entity.client_name)),
    );

    Ok((StatusCode::CREATED, Json(entity.into())))
}

/// PUT /api/v1/leads/:lead_id
pub async fn update_lead(
    State(state): State<AppState>,
    Extension(auth): Extension<SessionAuth>,
    Path(lead_id): Path<Uuid>,
    Json(form): Json<LeadForm>,
) -> Result<Json<Lead>, ApiError> {
    require(&auth, Permission::EditLeads)?;

    let visibility = visibility_of(&auth);
    let repo = LeadRepository::new(state.pool.clone());

    let existing = repo
        .find_by_id(lead_id, visibility)
        .await?
        .ok_or_else(|| ApiError::NotFound("Lead not found".to_string()))?;

    let validated = form.validate()?;
    ensure_manual_selection(&state, &auth, form.assigned_to).await?;
    let campaign_owner = campaign_owner(&state, validated.source_ad_id).await?;

    let assigned_to = resolve_assignment(&AssignmentInput {
        actor_role: auth.role,
        actor_id: auth.user_id,
        lead_source: &validated.lead_source,
        campaign_owner,
        manual_selection: form.assigned_to,
        op: AssignmentOp::Edit {
            current: existing.assigned_to,
            confirm_reassign: form.confirm_reassign,
        },
    });

    let entity = repo
        .update(lead_id, &validated, assigned_to, visibility)
        .await?
        .ok_or_else(|| ApiError::NotFound("Lead not found".to_string()))?;

    ActivityLogRepository::new(state.pool.clone()).insert_async(
        CreateActivityInput::new(auth.user_id, ActivityAction::LeadUpdated)
            .on_lead(entity.id)
            .with_details(format!("Updated lead '{}'", entity.client_name)),
    );

    Ok(Json(entity.into()))
}

#[derive(Debug, Deserialize)]
pub struct FieldUpdateRequest {
    pub field: String,
    /// Absent or null clears the field.
    pub value: Option<String>,
}

fn parse_inline_value(
    field: InlineField,
    value: Option<String>,
) -> Result<InlineValue, ApiError> {
    let value = value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
    match field {
        InlineField::FollowUp => match value {
            Some(raw) => {
                let date = parse_follow_up_date(&raw).map_err(|e| {
                    ApiError::Validation(
                        e.message
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| "Invalid date".to_string()),
                    )
                })?;
                Ok(InlineValue::Date(Some(date)))
            }
            None => Ok(InlineValue::Date(None)),
        },
        InlineField::ClientStatus => match value {
            Some(raw) => {
                let status =
                    ClientStatus::from_str(&raw).map_err(ApiError::Validation)?;
                Ok(InlineValue::Status(Some(status)))
            }
            None => Ok(InlineValue::Status(None)),
        },
        InlineField::Notes | InlineField::Industry => Ok(InlineValue::Text(value)),
    }
}

/// PATCH /api/v1/leads/:lead_id/field
pub async fn update_lead_field(
    State(state): State<AppState>,
    Extension(auth): Extension<SessionAuth>,
    Path(lead_id): Path<Uuid>,
    Json(request): Json<FieldUpdateRequest>,
) -> Result<Json<Lead>, ApiError> {
    require(&auth, Permission::EditLeads)?;

    let field = InlineField::from_str(&request.field).map_err(ApiError::Validation)?;
    let value = parse_inline_value(field, request.value)?;

    let repo = LeadRepository::new(state.pool.clone());
    let entity = repo
        .update_inline(lead_id, field, value, visibility_of(&auth))
        .await?
        .ok_or_else(|| ApiError::NotFound("Lead not found".to_string()))?;

    ActivityLogRepository::new(state.pool.clone()).insert_async(
        CreateActivityInput::new(auth.user_id, ActivityAction::LeadFieldUpdated)
            .on_lead(entity.id)
            .with_details(format!("Updated {}", field.column())),
    );

    Ok(Json(entity.into()))
}

#[derive(Debug, Deserialize)]
pub struct BulkUpdateRequest {
    pub ids: Vec<Uuid>,
    pub field: String,
    /// Absent or null clears the field on every selected lead.
    pub value: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BulkUpdateResponse {
    /// Number of leads actually updated. Ids outside the caller's visibility
    /// are skipped, not errors.
    pub updated: u64,
}

/// POST /api/v1/leads/bulk
pub async fn bulk_update_leads(
    State(state): State<AppState>,
    Extension(auth): Extension<SessionAuth>,
    Json(request): Json<BulkUpdateRequest>,
) -> Result<Json<BulkUpdateResponse>, ApiError> {
    require(&auth, Permission::EditLeads)?;

    if request.ids.is_empty() {
        return Err(ApiError::Validation("No lead ids provided".to_string()));
    }
    if request.ids.len() > state.config.limits.max_bulk_ids {
        return Err(ApiError::Validation(format!(
            "Bulk update limited to {} leads per request",
            state.config.limits.max_bulk_ids
        )));
    }

    let field = BulkField::from_str(&request.field).map_err(ApiError::Validation)?;
    let value = request
        .value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    let bulk_value = match field {
        BulkField::ClientStatus => match value {
            Some(raw) => BulkValue::Status(Some(
                ClientStatus::from_str(&raw).map_err(ApiError::Validation)?,
            )),
            None => BulkValue::Status(None),
        },
        BulkField::Industry => BulkValue::Text(value),
        BulkField::AssignedTo => {
            // Reassignment is stricter than plain editing.
            require(&auth, Permission::AssignLeads)?;
            match value {
                Some(raw) => {
                    let user_id = Uuid::parse_str(&raw).map_err(|_| {
                        ApiError::Validation("Expected a user id or empty value".to_string())
                    })?;
                    ensure_lead_owner(&state, user_id).await?;
                    BulkValue::Owner(Some(user_id))
                }
                None => BulkValue::Owner(None),
            }
        }
    };

    let repo = LeadRepository::new(state.pool.clone());
    let updated = repo
        .bulk_update(&request.ids, field, bulk_value, visibility_of(&auth))
        .await?;

    ActivityLogRepository::new(state.pool.clone()).insert_async(
        CreateActivityInput::new(auth.user_id, ActivityAction::LeadBulkUpdated).with_details(
            format!("Bulk updated {} on {} lead(s)", field.column(), updated),
        ),
    );

    Ok(Json(BulkUpdateResponse { updated }))
}

#[derive(Debug, Deserialize)]
pub struct AssignRequest {
    /// New owner; null clears the assignment.
    pub assigned_to: Option<Uuid>,
}

/// POST /api/v1/leads/:lead_id/assign
pub async fn assign_lead(
    State(state): State<AppState>,
    Extension(auth): Extension<SessionAuth>,
    Path(lead_id): Path<Uuid>,
    Json(request): Json<AssignRequest>,
) -> Result<Json<Lead>, ApiError> {
    require(&auth, Permission::AssignLeads)?;

    if let Some(user_id) = request.assigned_to {
        ensure_lead_owner(&state, user_id).await?;
    }

    let repo = LeadRepository::new(state.pool.clone());
    let entity = repo
        .set_owner(lead_id, request.assigned_to)
        .await?
        .ok_or_else(|| ApiError::NotFound("Lead not found".to_string()))?;

    let details = match request.assigned_to {
        Some(user_id) => format!("Assigned to {}", user_id),
        None => "Cleared assignment".to_string(),
    };
    ActivityLogRepository::new(state.pool.clone()).insert_async(
        CreateActivityInput::new(auth.user_id, ActivityAction::LeadAssigned)
            .on_lead(entity.id)
            .with_details(details),
    );

    Ok(Json(entity.into()))
}

/// DELETE /api/v1/leads/:lead_id
pub async fn delete_lead(
    State(state): State<AppState>,
    Extension(auth): Extension<SessionAuth>,
    Path(lead_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    require(&auth, Permission::DeleteLeads)?;

    let repo = LeadRepository::new(state.pool.clone());
    if !repo.delete(lead_id).await? {
        return Err(ApiError::NotFound("Lead not found".to_string()));
    }

    ActivityLogRepository::new(state.pool.clone()).insert_async(
        CreateActivityInput::new(auth.user_id, ActivityAction::LeadDeleted)
            .on_lead(lead_id)
            .with_details("Deleted lead"),
    );

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use domain::models::Role;

    fn user_with(role: Role, is_active: bool) -> User {
        User {
            id: Uuid::new_v4(),
            username: "priya".to_string(),
            password_hash: String::new(),
            full_name: "Priya Nair".to_string(),
            role,
            is_active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_active_sales_user_may_own_leads() {
        assert!(check_lead_owner(&user_with(Role::Sales, true)).is_ok());
    }

    #[test]
    fn test_inactive_sales_user_rejected_as_owner() {
        let err = check_lead_owner(&user_with(Role::Sales, false)).unwrap_err();
        match err {
            ApiError::Validation(msg) => {
                assert_eq!(msg, "Assigned user account is deactivated")
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_non_sales_users_rejected_as_owner() {
        for role in [Role::Admin, Role::Marketing] {
            let err = check_lead_owner(&user_with(role, true)).unwrap_err();
            match err {
                ApiError::Validation(msg) => {
                    assert_eq!(msg, "Leads can only be assigned to sales users")
                }
                other => panic!("expected validation error, got {:?}", other),
            }
        }
    }
}
