//! Activity feed endpoints.

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use domain::models::ActivityLog;
use domain::services::policy::{self, Permission};
use persistence::repositories::{ActivityLogRepository, LeadRepository};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::{require, SessionAuth};

const DEFAULT_FEED_LIMIT: i64 = 50;
const MAX_FEED_LIMIT: i64 = 200;

#[derive(Debug, Default, Deserialize)]
pub struct FeedQuery {
    pub limit: Option<i64>,
}

fn clamp_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_FEED_LIMIT).clamp(1, MAX_FEED_LIMIT)
}

/// GET /api/v1/activity
pub async fn recent_activity(
    State(state): State<AppState>,
    Extension(auth): Extension<SessionAuth>,
    Query(query): Query<FeedQuery>,
) -> Result<Json<Vec<ActivityLog>>, ApiError> {
    require(&auth, Permission::ManageUsers)?;

    let repo = ActivityLogRepository::new(state.pool.clone());
    let entries = repo.list_recent(clamp_limit(query.limit)).await?;
    Ok(Json(entries.into_iter().map(ActivityLog::from).collect()))
}

/// GET /api/v1/leads/:lead_id/activity
///
/// Gated by lead visibility: if the caller cannot see the lead, its history
/// is a 404 like the lead itself.
pub async fn lead_activity(
    State(state): State<AppState>,
    Extension(auth): Extension<SessionAuth>,
    Path(lead_id): Path<Uuid>,
    Query(query): Query<FeedQuery>,
) -> Result<Json<Vec<ActivityLog>>, ApiError> {
    let lead_repo = LeadRepository::new(state.pool.clone());
    lead_repo
        .find_by_id(lead_id, policy::visibility(auth.role, auth.user_id))
        .await?
        .ok_or_else(|| ApiError::NotFound("Lead not found".to_string()))?;

    let repo = ActivityLogRepository::new(state.pool.clone());
    let entries = repo
        .list_for_lead(lead_id, clamp_limit(query.limit))
        .await?;
    Ok(Json(entries.into_iter().map(ActivityLog::from).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_limit_default() {
        assert_eq!(clamp_limit(None), DEFAULT_FEED_LIMIT);
    }

    #[test]
    fn test_clamp_limit_bounds() {
        assert_eq!(clamp_limit(Some(0)), 1);
        assert_eq!(clamp_limit(Some(-5)), 1);
        assert_eq!(clamp_limit(Some(10_000)), MAX_FEED_LIMIT);
        assert_eq!(clamp_limit(Some(25)), 25);
    }
}
