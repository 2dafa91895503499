//! Session authentication middleware.
//!
//! Validates the opaque bearer token against the sessions table, re-derives
//! the user's role on every request, and slides the session's idle expiry
//! forward. Deactivating a user therefore locks them out on their next
//! request even if their session row has not been cleaned up yet.

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{Duration, Utc};
use serde_json::json;
use uuid::Uuid;

use domain::models::Role;
use domain::services::policy::{self, Permission};
use persistence::repositories::UserRepository;
use shared::crypto::{sha256_hex, SESSION_TOKEN_PREFIX};

use crate::app::AppState;
use crate::error::ApiError;

/// Authenticated session information stored in request extensions.
#[derive(Debug, Clone)]
pub struct SessionAuth {
    pub user_id: Uuid,
    /// Role read from the users table at request time, not from the session.
    pub role: Role,
    pub session_id: Uuid,
    pub token_hash: String,
    pub csrf_token: String,
}

/// Middleware that requires a valid session token.
///
/// Expects `Authorization: Bearer lm_<token>`. The token is hashed and looked
/// up in the sessions table; only the hash is ever stored. On success the
/// [`SessionAuth`] is inserted into request extensions for downstream
/// handlers and the idle expiry is pushed forward.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok());

    let token = match auth_header {
        Some(header) if header.starts_with("Bearer ") => &header[7..],
        _ => {
            return unauthorized_response("Missing or invalid Authorization header");
        }
    };

    if !token.starts_with(SESSION_TOKEN_PREFIX) {
        return unauthorized_response("Invalid or expired session");
    }

    let token_hash = sha256_hex(token);
    let repo = UserRepository::new(state.pool.clone());

    let session = match repo.find_session_by_token(&token_hash).await {
        Ok(Some(session)) => session,
        Ok(None) => return unauthorized_response("Invalid or expired session"),
        Err(e) => {
            tracing::error!(error = %e, "Session lookup failed");
            return internal_error_response();
        }
    };

    let user = match repo.find_by_id(session.user_id).await {
        Ok(Some(user)) => domain::models::User::from(user),
        Ok(None) => return unauthorized_response("Invalid or expired session"),
        Err(e) => {
            tracing::error!(error = %e, "User lookup failed");
            return internal_error_response();
        }
    };

    if !user.is_active {
        return unauthorized_response("Invalid or expired session");
    }

    // Sliding idle timeout. A failed touch only shortens the session, so it
    // is logged rather than failing the request.
    let expires_at = Utc::now() + Duration::seconds(state.config.session.idle_timeout_secs);
    if let Err(e) = repo.touch_session(session.id, expires_at).await {
        tracing::debug!(error = %e, "Failed to slide session expiry");
    }

    req.extensions_mut().insert(SessionAuth {
        user_id: user.id,
        role: user.role,
        session_id: session.id,
        token_hash,
        csrf_token: session.csrf_token,
    });

    next.run(req).await
}

/// Checks the permission table for the authenticated session.
pub fn require(auth: &SessionAuth, permission: Permission) -> Result<(), ApiError> {
    if policy::can(auth.role, permission) {
        Ok(())
    } else {
        Err(ApiError::Forbidden(
            "You do not have permission to perform this action".to_string(),
        ))
    }
}

fn unauthorized_response(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "unauthorized",
            "message": message
        })),
    )
        .into_response()
}

fn internal_error_response() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "internal_error",
            "message": "An internal error occurred"
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth_with_role(role: Role) -> SessionAuth {
        SessionAuth {
            user_id: Uuid::new_v4(),
            role,
            session_id: Uuid::new_v4(),
            token_hash: "hash".to_string(),
            csrf_token: "csrf".to_string(),
        }
    }

    #[test]
    fn test_require_allows_permitted() {
        let auth = auth_with_role(Role::Sales);
        assert!(require(&auth, Permission::AddLeads).is_ok());
    }

    #[test]
    fn test_require_rejects_denied() {
        let auth = auth_with_role(Role::Marketing);
        let err = require(&auth, Permission::EditLeads).unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));
    }

    #[test]
    fn test_require_admin_unrestricted() {
        let auth = auth_with_role(Role::Admin);
        assert!(require(&auth, Permission::ManageUsers).is_ok());
        assert!(require(&auth, Permission::DeleteLeads).is_ok());
    }
}
