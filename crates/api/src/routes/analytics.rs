//! Dashboard and analytics endpoints.
//!
//! Aggregations run over the caller's visible lead set, so a sales user's
//! dashboard only ever reflects their own pipeline.

use axum::{extract::State, Extension, Json};
use chrono::Utc;
use uuid::Uuid;

use domain::models::{AnalyticsReport, DashboardStats, Lead, Role};
use domain::services::analytics::{analytics_report, dashboard_stats};
use domain::services::policy::{self, Permission};
use persistence::repositories::{LeadRepository, UserRepository};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::{require, SessionAuth};

async fn visible_leads(state: &AppState, auth: &SessionAuth) -> Result<Vec<Lead>, ApiError> {
    let repo = LeadRepository::new(state.pool.clone());
    let entities = repo
        .list_visible(policy::visibility(auth.role, auth.user_id))
        .await?;
    Ok(entities.into_iter().map(Lead::from).collect())
}

/// GET /api/v1/analytics/dashboard
///
/// Available to every role; visibility scoping makes it role-appropriate.
pub async fn dashboard(
    State(state): State<AppState>,
    Extension(auth): Extension<SessionAuth>,
) -> Result<Json<DashboardStats>, ApiError> {
    let leads = visible_leads(&state, &auth).await?;
    Ok(Json(dashboard_stats(&leads, Utc::now().date_naive())))
}

/// GET /api/v1/analytics/report
///
/// The assignment breakdown exposes per-user workload, so it is only
/// included for callers who can manage users.
pub async fn report(
    State(state): State<AppState>,
    Extension(auth): Extension<SessionAuth>,
) -> Result<Json<AnalyticsReport>, ApiError> {
    require(&auth, Permission::ViewAnalytics)?;

    let leads = visible_leads(&state, &auth).await?;

    let sales_users: Option<Vec<(Uuid, String)>> =
        if policy::can(auth.role, Permission::ManageUsers) {
            let users = UserRepository::new(state.pool.clone())
                .list_active_by_role(Role::Sales)
                .await?;
            Some(users.into_iter().map(|u| (u.id, u.full_name)).collect())
        } else {
            None
        };

    Ok(Json(analytics_report(
        &leads,
        Utc::now().date_naive(),
        sales_users.as_deref(),
    )))
}
