//! Session lifecycle: login, logout.

use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;

use domain::models::UserSummary;
use persistence::repositories::UserRepository;
use shared::crypto::{generate_csrf_token, generate_session_token, sha256_hex};
use shared::password::verify_password;

use crate::error::ApiError;

/// Successful login payload. The raw session token appears here exactly once;
/// only its hash is persisted.
#[derive(Debug)]
pub struct LoginResult {
    pub token: String,
    pub csrf_token: String,
    pub user: UserSummary,
    pub expires_at: DateTime<Utc>,
}

/// Authenticates a username/password pair and opens a session.
///
/// Unknown usernames, wrong passwords, and deactivated accounts all produce
/// the same error so the response does not reveal which accounts exist.
pub async fn login(
    pool: &PgPool,
    username: &str,
    password: &str,
    idle_timeout_secs: i64,
) -> Result<LoginResult, ApiError> {
    let repo = UserRepository::new(pool.clone());

    let invalid = || ApiError::Unauthorized("Invalid username or password".to_string());

    let entity = repo
        .find_by_username(username)
        .await?
        .ok_or_else(invalid)?;

    let user = domain::models::User::from(entity);

    let password_ok = verify_password(password, &user.password_hash)
        .map_err(|e| ApiError::Internal(format!("Password verification failed: {}", e)))?;

    if !password_ok || !user.is_active {
        return Err(invalid());
    }

    let token = generate_session_token();
    let csrf_token = generate_csrf_token();
    let expires_at = Utc::now() + Duration::seconds(idle_timeout_secs);

    repo.create_session(user.id, &sha256_hex(&token), &csrf_token, expires_at)
        .await?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(LoginResult {
        token,
        csrf_token,
        user: user.into(),
        expires_at,
    })
}

/// Ends the session identified by its token hash.
///
/// Idempotent: logging out an already-deleted session succeeds.
pub async fn logout(pool: &PgPool, token_hash: &str) -> Result<(), ApiError> {
    let repo = UserRepository::new(pool.clone());
    repo.delete_session_by_token(token_hash).await?;
    Ok(())
}
