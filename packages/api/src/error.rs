//! Server-side error type. Server functions turn it into a `ServerFnError` at
//! the boundary with [`server_error`].

use dioxus::prelude::ServerFnError;

pub use crate::config::ConfigError;

#[cfg(feature = "server")]
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),
    #[error("password hashing failed: {0}")]
    Password(String),
    #[error("Not authenticated")]
    NotAuthenticated,
    #[error("Only admins can write posts")]
    Forbidden,
}

/// Flatten any error into the message carried by `ServerFnError`.
pub fn server_error(err: impl std::fmt::Display) -> ServerFnError {
    ServerFnError::new(err.to_string())
}
