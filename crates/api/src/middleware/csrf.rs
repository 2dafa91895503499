//! CSRF protection middleware.
//!
//! Every mutating request must carry the session's CSRF token in the
//! `X-CSRF-Token` header. The token is issued at login together with the
//! session token. Comparison is constant-time; a mismatch answers 409 so
//! clients can distinguish a stale token from an expired session.

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use shared::crypto::constant_time_eq;

use super::auth::SessionAuth;

/// Header carrying the per-session CSRF token.
pub const CSRF_HEADER: &str = "X-CSRF-Token";

/// Middleware enforcing the CSRF token on mutating methods.
///
/// Must run after [`super::require_auth`] so the session is available in
/// request extensions. Safe methods pass through untouched.
pub async fn csrf_middleware(req: Request<Body>, next: Next) -> Response {
    if matches!(*req.method(), Method::GET | Method::HEAD | Method::OPTIONS) {
        return next.run(req).await;
    }

    // Without auth info the request fails auth anyway.
    let auth = match req.extensions().get::<SessionAuth>() {
        Some(auth) => auth.clone(),
        None => return next.run(req).await,
    };

    let header = req
        .headers()
        .get(CSRF_HEADER)
        .and_then(|v| v.to_str().ok());

    match header {
        Some(token) if constant_time_eq(token, &auth.csrf_token) => next.run(req).await,
        _ => csrf_mismatch_response(),
    }
}

fn csrf_mismatch_response() -> Response {
    (
        StatusCode::CONFLICT,
        Json(json!({
            "error": "csrf_mismatch",
            "message": "Missing or invalid CSRF token"
        })),
    )
        .into_response()
}
