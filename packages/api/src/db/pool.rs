//! Database connection pool, migrations and the admin bootstrap.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tokio::sync::OnceCell;

use crate::auth::hash_password;
use crate::config::{config, ServerConfig};
use crate::error::ApiError;

static POOL: OnceCell<PgPool> = OnceCell::const_new();

/// Get or initialize the pool from [`ServerConfig`].
pub async fn get_pool() -> Result<&'static PgPool, ApiError> {
    POOL.get_or_try_init(|| async {
        let config = config().await?;
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.database_url)
            .await?;
        tracing::info!(max_connections = config.max_connections, "database pool ready");
        Ok(pool)
    })
    .await
}

pub async fn migrate(pool: &PgPool) -> Result<(), ApiError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::info!("migrations applied");
    Ok(())
}

/// Create the configured bootstrap admin, or reset its password and claim.
pub async fn seed_admin(pool: &PgPool, config: &ServerConfig) -> Result<(), ApiError> {
    let Some(admin) = &config.bootstrap_admin else {
        return Ok(());
    };

    let password_hash = hash_password(&admin.password)?;
    sqlx::query(
        "INSERT INTO users (email, password_hash, is_admin) VALUES ($1, $2, TRUE)
         ON CONFLICT (email) DO UPDATE SET
            password_hash = EXCLUDED.password_hash,
            is_admin = TRUE,
            updated_at = NOW()",
    )
    .bind(&admin.email)
    .bind(&password_hash)
    .execute(pool)
    .await?;

    tracing::info!(email = %admin.email, "bootstrap admin account ready");
    Ok(())
}
