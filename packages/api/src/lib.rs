//! # API crate: fullstack server functions for the portfolio site
//!
//! Every Dioxus server function the web frontend calls lives here, with the
//! server-side modules behind them.
//!
//! ## Modules
//!
//! | Module | Feature gate | Purpose |
//! |--------|-------------|---------|
//! | [`auth`] | `server` | Argon2 password hashing, session user lookup, admin claim check |
//! | [`config`] | none | [`ServerConfig`](config::ServerConfig) read from the environment |
//! | [`db`] | `server` | PostgreSQL pool, migrations, admin bootstrap, [`PgContentStore`](db::PgContentStore) |
//! | [`error`] | none | `ApiError` (server) and the `ServerFnError` conversion |
//! | [`models`] | none | `User` row and the client-safe [`UserInfo`] |
//!
//! ## Server functions exposed here
//!
//! Each public `async fn` below is compiled twice: the real body behind
//! `#[cfg(feature = "server")]`, and a client stub whose call is forwarded over
//! HTTP.
//!
//! - **Authentication**: `get_current_user`, `login_password`, `logout`
//! - **Posts, read**: `list_posts`, `query_posts_by_slug`
//! - **Posts, write** (admin claim required): `create_post`, `update_post`,
//!   `post_saved_redirect`
//!
//! Post functions return a [`StoreResult`] inside the transport result, so a
//! duplicate slug reaches the client as `StoreError::SlugTaken` and not as an
//! opaque message.

use dioxus::prelude::*;
use store::{Post, PostFields, PostId, StoreError};

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod models;

#[cfg(feature = "server")]
pub use error::ApiError;
pub use models::UserInfo;

/// Outcome of a content store operation as seen by the client.
pub type StoreResult<T> = Result<T, StoreError>;

impl From<UserInfo> for admin::Identity {
    fn from(user: UserInfo) -> Self {
        admin::Identity {
            uid: user.id,
            email: user.email,
            display_name: user.name,
            is_admin: user.is_admin,
        }
    }
}

#[cfg(feature = "server")]
async fn post_repository(
    author: Option<&models::User>,
) -> Result<store::PostRepository<db::PgContentStore>, ServerFnError> {
    let pool = db::get_pool().await.map_err(error::server_error)?;
    let mut store = db::PgContentStore::new(pool.clone());
    if let Some(user) = author {
        store = store.authored_by(user.id);
    }
    Ok(store::PostRepository::new(store))
}

/// Check the admin claim for a write. Auth failures become a rejected write.
#[cfg(feature = "server")]
async fn authorize_write(
    session: &tower_sessions::Session,
) -> Result<Result<models::User, StoreError>, ServerFnError> {
    let pool = db::get_pool().await.map_err(error::server_error)?;
    let config = config::config().await.map_err(error::server_error)?;

    match auth::require_admin(session, pool, config).await {
        Ok(user) => Ok(Ok(user)),
        Err(e @ (ApiError::NotAuthenticated | ApiError::Forbidden)) => {
            Ok(Err(StoreError::Rejected(e.to_string())))
        }
        Err(e) => Err(error::server_error(e)),
    }
}

/// Server-side re-check of what the form validates.
#[cfg(feature = "server")]
fn check_fields(fields: &PostFields) -> StoreResult<()> {
    if fields.title.trim().is_empty() {
        return Err(StoreError::Rejected("Title is required.".to_string()));
    }
    if !store::slug::is_valid_slug(&fields.slug) {
        return Err(StoreError::Rejected(format!("invalid slug '{}'", fields.slug)));
    }
    Ok(())
}

/// Get the current authenticated user from the session.
#[cfg(feature = "server")]
#[get("/api/auth/me", session: tower_sessions::Session)]
pub async fn get_current_user() -> Result<Option<UserInfo>, ServerFnError> {
    let pool = db::get_pool().await.map_err(error::server_error)?;
    let config = config::config().await.map_err(error::server_error)?;

    let user = auth::session_user(&session, pool)
        .await
        .map_err(error::server_error)?;
    Ok(user.map(|u| u.to_info(config)))
}

#[cfg(not(feature = "server"))]
#[get("/api/auth/me")]
pub async fn get_current_user() -> Result<Option<UserInfo>, ServerFnError> {
    Ok(None)
}

/// Log in with email and password. `None` means the credentials were wrong.
#[cfg(feature = "server")]
#[post("/api/auth/login-password", session: tower_sessions::Session)]
pub async fn login_password(
    email: String,
    password: String,
) -> Result<Option<UserInfo>, ServerFnError> {
    let email = config::normalize_email(&email);
    let pool = db::get_pool().await.map_err(error::server_error)?;
    let config = config::config().await.map_err(error::server_error)?;

    let user: Option<models::User> = sqlx::query_as("SELECT * FROM users WHERE email = $1")
        .bind(&email)
        .fetch_optional(pool)
        .await
        .map_err(error::server_error)?;

    let Some(user) = user else {
        tracing::info!(%email, "sign-in for unknown account");
        return Ok(None);
    };

    let valid = auth::verify_password(&password, &user.password_hash)
        .map_err(error::server_error)?;
    if !valid {
        tracing::info!(%email, "sign-in with wrong password");
        return Ok(None);
    }

    session.cycle_id().await.map_err(error::server_error)?;
    session
        .insert(auth::SESSION_USER_ID_KEY, user.id.to_string())
        .await
        .map_err(error::server_error)?;

    tracing::info!(%email, "signed in");
    Ok(Some(user.to_info(config)))
}

#[cfg(not(feature = "server"))]
#[post("/api/auth/login-password")]
pub async fn login_password(
    email: String,
    password: String,
) -> Result<Option<UserInfo>, ServerFnError> {
    Err(ServerFnError::new("Server only"))
}

/// Log out the current user by clearing the session.
#[cfg(feature = "server")]
#[post("/api/auth/logout", session: tower_sessions::Session)]
pub async fn logout() -> Result<(), ServerFnError> {
    session.flush().await.map_err(error::server_error)?;
    Ok(())
}

#[cfg(not(feature = "server"))]
#[post("/api/auth/logout")]
pub async fn logout() -> Result<(), ServerFnError> {
    Ok(())
}

/// All posts, newest first.
#[cfg(feature = "server")]
#[get("/api/posts")]
pub async fn list_posts() -> Result<StoreResult<Vec<Post>>, ServerFnError> {
    let repo = post_repository(None).await?;
    Ok(repo.list_posts().await)
}

#[cfg(not(feature = "server"))]
#[get("/api/posts")]
pub async fn list_posts() -> Result<StoreResult<Vec<Post>>, ServerFnError> {
    Err(ServerFnError::new("Server only"))
}

/// Posts carrying `slug` (zero or one, given the unique constraint).
#[cfg(feature = "server")]
#[get("/api/posts/by-slug/:slug")]
pub async fn query_posts_by_slug(slug: String) -> Result<StoreResult<Vec<Post>>, ServerFnError> {
    let repo = post_repository(None).await?;
    Ok(store::ContentStore::query_by_slug(repo.store(), &slug).await)
}

#[cfg(not(feature = "server"))]
#[get("/api/posts/by-slug/:slug")]
pub async fn query_posts_by_slug(slug: String) -> Result<StoreResult<Vec<Post>>, ServerFnError> {
    Err(ServerFnError::new("Server only"))
}

/// Insert a post. Requires the admin claim.
#[cfg(feature = "server")]
#[post("/api/posts/create", session: tower_sessions::Session)]
pub async fn create_post(fields: PostFields) -> Result<StoreResult<PostId>, ServerFnError> {
    let user = match authorize_write(&session).await? {
        Ok(user) => user,
        Err(e) => return Ok(Err(e)),
    };
    if let Err(e) = check_fields(&fields) {
        return Ok(Err(e));
    }
    let repo = post_repository(Some(&user)).await?;
    Ok(repo.create_post(fields).await)
}

#[cfg(not(feature = "server"))]
#[post("/api/posts/create")]
pub async fn create_post(fields: PostFields) -> Result<StoreResult<PostId>, ServerFnError> {
    Err(ServerFnError::new("Server only"))
}

/// Overwrite a post's editable fields. Requires the admin claim.
#[cfg(feature = "server")]
#[post("/api/posts/update", session: tower_sessions::Session)]
pub async fn update_post(id: PostId, fields: PostFields) -> Result<StoreResult<()>, ServerFnError> {
    if let Err(e) = authorize_write(&session).await? {
        return Ok(Err(e));
    }
    if let Err(e) = check_fields(&fields) {
        return Ok(Err(e));
    }
    let repo = post_repository(None).await?;
    Ok(repo.update_post(&id, fields).await)
}

#[cfg(not(feature = "server"))]
#[post("/api/posts/update")]
pub async fn update_post(id: PostId, fields: PostFields) -> Result<StoreResult<()>, ServerFnError> {
    Err(ServerFnError::new("Server only"))
}

/// Post-save action: confirms the post exists and returns the edit URL to
/// navigate to. Every page reads posts live, so there is no cache to refresh.
#[cfg(feature = "server")]
#[post("/api/posts/saved", session: tower_sessions::Session)]
pub async fn post_saved_redirect(slug: String) -> Result<StoreResult<String>, ServerFnError> {
    if let Err(e) = authorize_write(&session).await? {
        return Ok(Err(e));
    }
    let repo = post_repository(None).await?;
    match repo.get_by_slug(&slug).await {
        Ok(Some(_)) => {
            tracing::debug!(%slug, "post saved, redirecting to editor");
            Ok(Ok(admin::post_saved_path(&slug)))
        }
        Ok(None) => Ok(Err(StoreError::NotFound(slug))),
        Err(e) => Ok(Err(e)),
    }
}

#[cfg(not(feature = "server"))]
#[post("/api/posts/saved")]
pub async fn post_saved_redirect(slug: String) -> Result<StoreResult<String>, ServerFnError> {
    Err(ServerFnError::new("Server only"))
}
