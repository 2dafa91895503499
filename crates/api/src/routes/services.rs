//! Service catalog endpoints.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use domain::models::{CreateServiceRequest, Service, UpdateServiceRequest};
use domain::services::policy::{self, Permission};
use persistence::repositories::ServiceRepository;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::{require, SessionAuth};

#[derive(Debug, Default, Deserialize)]
pub struct ListServicesQuery {
    #[serde(default)]
    pub include_inactive: bool,
}

/// GET /api/v1/services
///
/// Any authenticated user sees active services; only catalog managers may
/// request deactivated ones.
pub async fn list_services(
    State(state): State<AppState>,
    Extension(auth): Extension<SessionAuth>,
    Query(query): Query<ListServicesQuery>,
) -> Result<Json<Vec<Service>>, ApiError> {
    let include_inactive =
        query.include_inactive && policy::can(auth.role, Permission::ManageServices);

    let repo = ServiceRepository::new(state.pool.clone());
    let entities = repo.list(!include_inactive).await?;
    Ok(Json(entities.into_iter().map(Service::from).collect()))
}

/// POST /api/v1/services
pub async fn create_service(
    State(state): State<AppState>,
    Extension(auth): Extension<SessionAuth>,
    Json(request): Json<CreateServiceRequest>,
) -> Result<(StatusCode, Json<Service>), ApiError> {
    require(&auth, Permission::ManageServices)?;
    request.validate()?;

    let repo = ServiceRepository::new(state.pool.clone());
    let entity = repo.insert(&request, auth.user_id).await?;
    Ok((StatusCode::CREATED, Json(entity.into())))
}

/// PUT /api/v1/services/:service_id
pub async fn update_service(
    State(state): State<AppState>,
    Extension(auth): Extension<SessionAuth>,
    Path(service_id): Path<Uuid>,
    Json(request): Json<UpdateServiceRequest>,
) -> Result<Json<Service>, ApiError> {
    require(&auth, Permission::ManageServices)?;
    request.validate()?;

    let repo = ServiceRepository::new(state.pool.clone());
    let entity = repo
        .update(service_id, &request)
        .await?
        .ok_or_else(|| ApiError::NotFound("Service not found".to_string()))?;
    Ok(Json(entity.into()))
}
