//! Authentication endpoints: login, logout, current user.

use axum::{extract::State, http::StatusCode, Extension, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use domain::models::UserSummary;
use persistence::repositories::UserRepository;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::record_login_attempt;
use crate::middleware::SessionAuth;
use crate::services::auth as auth_service;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub csrf_token: String,
    pub user: UserSummary,
    pub expires_at: DateTime<Utc>,
}

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let result = auth_service::login(
        &state.pool,
        request.username.trim(),
        &request.password,
        state.config.session.idle_timeout_secs,
    )
    .await;

    record_login_attempt(result.is_ok());

    let outcome = result?;
    Ok(Json(LoginResponse {
        token: outcome.token,
        csrf_token: outcome.csrf_token,
        user: outcome.user,
        expires_at: outcome.expires_at,
    }))
}

/// POST /api/v1/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    Extension(auth): Extension<SessionAuth>,
) -> Result<StatusCode, ApiError> {
    auth_service::logout(&state.pool, &auth.token_hash).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/auth/me
pub async fn me(
    State(state): State<AppState>,
    Extension(auth): Extension<SessionAuth>,
) -> Result<Json<UserSummary>, ApiError> {
    let repo = UserRepository::new(state.pool.clone());
    let entity = repo
        .find_by_id(auth.user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid or expired session".to_string()))?;
    let user = domain::models::User::from(entity);
    Ok(Json(user.into()))
}
