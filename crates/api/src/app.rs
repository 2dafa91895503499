use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, patch, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{
    csrf_middleware, metrics_handler, metrics_middleware, rate_limit_middleware, require_auth,
    security_headers_middleware, trace_id, RateLimiterState,
};
use crate::routes::{
    activity, analytics, auth, export, health, import, leads, running_ads, services, users,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub rate_limiter: Option<Arc<RateLimiterState>>,
}

pub fn create_app(config: Config, pool: PgPool) -> Router {
    let config = Arc::new(config);

    // Rate limiting is disabled when the configured limit is 0
    let rate_limiter = if config.security.rate_limit_per_minute > 0 {
        Some(Arc::new(RateLimiterState::new(
            config.security.rate_limit_per_minute,
        )))
    } else {
        None
    };

    let state = AppState {
        pool,
        config: config.clone(),
        rate_limiter,
    };

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Protected routes (require a session token).
    // Middleware order: auth runs first, then rate limiting (which needs the
    // session), then CSRF (which needs the session's CSRF token).
    let protected_routes = Router::new()
        // Session routes (v1)
        .route("/api/v1/auth/logout", post(auth::logout))
        .route("/api/v1/auth/me", get(auth::me))
        // Lead routes (v1)
        .route("/api/v1/leads", get(leads::list_leads).post(leads::create_lead))
        .route("/api/v1/leads/export", get(export::export_leads))
        .route("/api/v1/leads/import", post(import::import_leads))
        .route("/api/v1/leads/bulk", post(leads::bulk_update_leads))
        .route(
            "/api/v1/leads/:lead_id",
            get(leads::get_lead)
                .put(leads::update_lead)
                .delete(leads::delete_lead),
        )
        .route("/api/v1/leads/:lead_id/field", patch(leads::update_lead_field))
        .route("/api/v1/leads/:lead_id/assign", post(leads::assign_lead))
        .route("/api/v1/leads/:lead_id/activity", get(activity::lead_activity))
        // Service catalog routes (v1)
        .route(
            "/api/v1/services",
            get(services::list_services).post(services::create_service),
        )
        .route("/api/v1/services/:service_id", put(services::update_service))
        // Ad campaign routes (v1)
        .route(
            "/api/v1/running-ads",
            get(running_ads::list_running_ads).post(running_ads::create_running_ad),
        )
        .route(
            "/api/v1/running-ads/:ad_id",
            put(running_ads::update_running_ad),
        )
        // User management routes (v1)
        .route("/api/v1/users", get(users::list_users).post(users::create_user))
        .route("/api/v1/users/sales", get(users::list_sales_users))
        .route("/api/v1/users/:user_id/status", patch(users::set_user_status))
        // Analytics routes (v1)
        .route("/api/v1/analytics/dashboard", get(analytics::dashboard))
        .route("/api/v1/analytics/report", get(analytics::report))
        // Activity feed (v1)
        .route("/api/v1/activity", get(activity::recent_activity))
        // CSRF runs after rate limiting (innermost of the three)
        .route_layer(middleware::from_fn(csrf_middleware))
        // Rate limiting runs after auth (needs the user id from auth)
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        // Auth runs first (outermost layer = runs first)
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/metrics", get(metrics_handler));

    // Merge all routes
    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(DefaultBodyLimit::max(config.server.max_body_size))
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
