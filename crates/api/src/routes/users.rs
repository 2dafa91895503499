//! User management endpoints.
//!
//! Accounts are never deleted, only toggled inactive. Deactivation drops the
//! user's open sessions immediately, and two guards apply: a user cannot
//! deactivate themselves, and the last active admin cannot be deactivated.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use domain::models::{
    ActivityAction, CreateActivityInput, CreateUserRequest, Role, User, UserSummary,
};
use domain::services::policy::Permission;
use persistence::repositories::{ActivityLogRepository, UserRepository};
use shared::password::hash_password;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::{require, SessionAuth};

/// GET /api/v1/users
pub async fn list_users(
    State(state): State<AppState>,
    Extension(auth): Extension<SessionAuth>,
) -> Result<Json<Vec<UserSummary>>, ApiError> {
    require(&auth, Permission::ManageUsers)?;

    let repo = UserRepository::new(state.pool.clone());
    let users = repo
        .list_users()
        .await?
        .into_iter()
        .map(|entity| UserSummary::from(User::from(entity)))
        .collect();
    Ok(Json(users))
}

/// POST /api/v1/users
pub async fn create_user(
    State(state): State<AppState>,
    Extension(auth): Extension<SessionAuth>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserSummary>), ApiError> {
    require(&auth, Permission::ManageUsers)?;
    request.validate()?;

    let password_hash = hash_password(&request.password)
        .map_err(|e| ApiError::Internal(format!("Password hashing failed: {}", e)))?;

    let repo = UserRepository::new(state.pool.clone());
    let entity = repo
        .create_user(
            request.username.trim(),
            &password_hash,
            request.full_name.trim(),
            request.role,
        )
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
                ApiError::Conflict("Username already exists".to_string())
            }
            _ => e.into(),
        })?;

    ActivityLogRepository::new(state.pool.clone()).insert_async(
        CreateActivityInput::new(auth.user_id, ActivityAction::UserCreated)
            .with_details(format!("Created user '{}'", entity.username)),
    );

    let user = User::from(entity);
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// GET /api/v1/users/sales
///
/// Active sales users, for campaign owner pickers. Available to campaign
/// managers, not just user admins.
pub async fn list_sales_users(
    State(state): State<AppState>,
    Extension(auth): Extension<SessionAuth>,
) -> Result<Json<Vec<UserSummary>>, ApiError> {
    require(&auth, Permission::ManageCampaigns)?;

    let repo = UserRepository::new(state.pool.clone());
    let users = repo
        .list_active_by_role(Role::Sales)
        .await?
        .into_iter()
        .map(|entity| UserSummary::from(User::from(entity)))
        .collect();
    Ok(Json(users))
}

#[derive(Debug, Deserialize)]
pub struct SetStatusRequest {
    pub is_active: bool,
}

/// PATCH /api/v1/users/:user_id/status
pub async fn set_user_status(
    State(state): State<AppState>,
    Extension(auth): Extension<SessionAuth>,
    Path(user_id): Path<Uuid>,
    Json(request): Json<SetStatusRequest>,
) -> Result<Json<UserSummary>, ApiError> {
    require(&auth, Permission::ManageUsers)?;

    let repo = UserRepository::new(state.pool.clone());

    if !request.is_active {
        if user_id == auth.user_id {
            return Err(ApiError::Conflict(
                "Cannot deactivate your own account".to_string(),
            ));
        }

        let target = repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;
        let target = User::from(target);

        if target.role == Role::Admin
            && target.is_active
            && repo.count_active_admins().await? <= 1
        {
            return Err(ApiError::Conflict(
                "At least one active admin account is required".to_string(),
            ));
        }
    }

    let entity = repo
        .set_active(user_id, request.is_active)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    // Deactivation locks the user out now, not at their next session expiry.
    if !request.is_active {
        repo.delete_sessions_for_user(user_id).await?;
    }

    ActivityLogRepository::new(state.pool.clone()).insert_async(
        CreateActivityInput::new(auth.user_id, ActivityAction::UserStatusChanged).with_details(
            format!(
                "{} user '{}'",
                if request.is_active {
                    "Activated"
                } else {
                    "Deactivated"
                },
                entity.username
            ),
        ),
    );

    let user = User::from(entity);
    Ok(Json(user.into()))
}
