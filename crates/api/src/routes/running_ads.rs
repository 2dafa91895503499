//! Running ad (campaign) endpoints.
//!
//! Campaigns must always point at an existing service and an active sales
//! user, since the assignment resolver trusts `assigned_sales_member`.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use domain::models::{CreateRunningAdRequest, RunningAd, UpdateRunningAdRequest, User};
use domain::services::policy::{self, Permission};
use persistence::repositories::{RunningAdRepository, ServiceRepository, UserRepository};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::{require, SessionAuth};

async fn ensure_service_exists(state: &AppState, service_id: Uuid) -> Result<(), ApiError> {
    let repo = ServiceRepository::new(state.pool.clone());
    repo.find_by_id(service_id)
        .await?
        .ok_or_else(|| ApiError::Validation("Service does not exist".to_string()))?;
    Ok(())
}

async fn ensure_active_sales_user(state: &AppState, user_id: Uuid) -> Result<(), ApiError> {
    let repo = UserRepository::new(state.pool.clone());
    let entity = repo
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| ApiError::Validation("Assigned sales member does not exist".to_string()))?;
    let user = User::from(entity);
    if !user.is_active || !policy::can_own_leads(user.role) {
        return Err(ApiError::Validation(
            "Assigned sales member must be an active sales user".to_string(),
        ));
    }
    Ok(())
}

#[derive(Debug, Default, Deserialize)]
pub struct ListRunningAdsQuery {
    #[serde(default)]
    pub include_inactive: bool,
}

/// GET /api/v1/running-ads
pub async fn list_running_ads(
    State(state): State<AppState>,
    Extension(auth): Extension<SessionAuth>,
    Query(query): Query<ListRunningAdsQuery>,
) -> Result<Json<Vec<RunningAd>>, ApiError> {
    let include_inactive =
        query.include_inactive && policy::can(auth.role, Permission::ManageCampaigns);

    let repo = RunningAdRepository::new(state.pool.clone());
    let entities = repo.list(!include_inactive).await?;
    Ok(Json(entities.into_iter().map(RunningAd::from).collect()))
}

/// POST /api/v1/running-ads
pub async fn create_running_ad(
    State(state): State<AppState>,
    Extension(auth): Extension<SessionAuth>,
    Json(request): Json<CreateRunningAdRequest>,
) -> Result<(StatusCode, Json<RunningAd>), ApiError> {
    require(&auth, Permission::ManageCampaigns)?;
    request.validate()?;

    ensure_service_exists(&state, request.service_id).await?;
    ensure_active_sales_user(&state, request.assigned_sales_member).await?;

    let repo = RunningAdRepository::new(state.pool.clone());
    let entity = repo.insert(&request, auth.user_id).await?;
    Ok((StatusCode::CREATED, Json(entity.into())))
}

/// PUT /api/v1/running-ads/:ad_id
pub async fn update_running_ad(
    State(state): State<AppState>,
    Extension(auth): Extension<SessionAuth>,
    Path(ad_id): Path<Uuid>,
    Json(request): Json<UpdateRunningAdRequest>,
) -> Result<Json<RunningAd>, ApiError> {
    require(&auth, Permission::ManageCampaigns)?;
    request.validate()?;

    if let Some(service_id) = request.service_id {
        ensure_service_exists(&state, service_id).await?;
    }
    if let Some(user_id) = request.assigned_sales_member {
        ensure_active_sales_user(&state, user_id).await?;
    }

    let repo = RunningAdRepository::new(state.pool.clone());
    let entity = repo
        .update(ad_id, &request)
        .await?
        .ok_or_else(|| ApiError::NotFound("Campaign not found".to_string()))?;
    Ok(Json(entity.into()))
}
