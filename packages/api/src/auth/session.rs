//! Who the request's cookie session belongs to.

use uuid::Uuid;

use crate::config::ServerConfig;
use crate::error::ApiError;
use crate::models::User;

/// Key for storing the user id in the session.
pub const SESSION_USER_ID_KEY: &str = "user_id";

/// The signed-in user, if the session names one that still exists.
pub async fn session_user(
    session: &tower_sessions::Session,
    pool: &sqlx::PgPool,
) -> Result<Option<User>, ApiError> {
    let user_id: Option<String> = session.get(SESSION_USER_ID_KEY).await?;
    let Some(user_id) = user_id else {
        return Ok(None);
    };

    let Ok(user_uuid) = Uuid::parse_str(&user_id) else {
        tracing::warn!(%user_id, "session carries a malformed user id");
        return Ok(None);
    };

    let user = sqlx::query_as("SELECT * FROM users WHERE id = $1")
        .bind(user_uuid)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

/// The signed-in user, provided they hold the admin claim.
pub async fn require_admin(
    session: &tower_sessions::Session,
    pool: &sqlx::PgPool,
    config: &ServerConfig,
) -> Result<User, ApiError> {
    let user = session_user(session, pool)
        .await?
        .ok_or(ApiError::NotAuthenticated)?;

    if !user.has_admin_claim(config) {
        tracing::warn!(email = %user.email, "non-admin attempted a write");
        return Err(ApiError::Forbidden);
    }
    Ok(user)
}
