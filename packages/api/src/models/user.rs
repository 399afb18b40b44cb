//! # User model
//!
//! ## [`User`] (server only)
//!
//! A row of the `users` table, loaded with [`sqlx::FromRow`]:
//!
//! - `id`: primary key (UUID v4).
//! - `email`: the sign-in name, stored lower-cased.
//! - `name`: optional display name.
//! - `password_hash`: Argon2id PHC string.
//! - `is_admin`: the admin claim. `ADMIN_EMAILS` grants it as well, see
//!   [`User::has_admin_claim`].
//!
//! ## [`UserInfo`]
//!
//! The client-safe projection sent through server functions. No hash, no
//! timestamps, the id as a string so it works in WASM.

use serde::{Deserialize, Serialize};

#[cfg(feature = "server")]
use chrono::{DateTime, Utc};
#[cfg(feature = "server")]
use sqlx::FromRow;
#[cfg(feature = "server")]
use uuid::Uuid;

#[cfg(feature = "server")]
use crate::config::ServerConfig;

#[cfg(feature = "server")]
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub password_hash: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(feature = "server")]
impl User {
    pub fn has_admin_claim(&self, config: &ServerConfig) -> bool {
        self.is_admin || config.is_admin_email(&self.email)
    }

    pub fn to_info(&self, config: &ServerConfig) -> UserInfo {
        UserInfo {
            id: self.id.to_string(),
            email: self.email.clone(),
            name: self.name.clone(),
            is_admin: self.has_admin_claim(config),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserInfo {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub is_admin: bool,
}

impl UserInfo {
    /// Name, falling back to the email.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.email)
    }
}
