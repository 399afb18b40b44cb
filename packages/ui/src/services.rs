//! Client-side adapters from the framework-free traits to the server functions.
//!
//! - [`ServerAuth`]: [`AuthService`] over `login_password`, `logout` and
//!   `get_current_user`.
//! - [`ServerPosts`]: [`ContentStore`] over the post server functions.
//! - [`make_draft_slot`]: the platform's [`DraftSlot`]. `localStorage` on the
//!   web (WASM + `web` feature), process memory elsewhere.

use admin::{AuthError, AuthService, Identity};
use dioxus::prelude::ServerFnError;
use store::{ContentStore, DraftSlot, Post, PostFields, PostId, PostRepository, StoreError};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ServerAuth;

fn auth_unavailable(err: ServerFnError) -> AuthError {
    AuthError::ServiceUnavailable(err.to_string())
}

impl AuthService for ServerAuth {
    async fn sign_in(&self, email: &str, secret: &str) -> Result<Identity, AuthError> {
        api::login_password(email.to_string(), secret.to_string())
            .await
            .map_err(auth_unavailable)?
            .map(Identity::from)
            .ok_or(AuthError::InvalidCredentials)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        api::logout().await.map_err(auth_unavailable)
    }

    async fn current_identity(&self) -> Result<Option<Identity>, AuthError> {
        Ok(api::get_current_user()
            .await
            .map_err(auth_unavailable)?
            .map(Identity::from))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ServerPosts;

fn transport(err: ServerFnError) -> StoreError {
    StoreError::Unavailable(err.to_string())
}

impl ContentStore for ServerPosts {
    async fn query_by_slug(&self, slug: &str) -> Result<Vec<Post>, StoreError> {
        api::query_posts_by_slug(slug.to_string())
            .await
            .map_err(transport)?
    }

    async fn list(&self) -> Result<Vec<Post>, StoreError> {
        api::list_posts().await.map_err(transport)?
    }

    async fn create(&self, fields: PostFields) -> Result<PostId, StoreError> {
        api::create_post(fields).await.map_err(transport)?
    }

    async fn update(&self, id: &PostId, fields: PostFields) -> Result<(), StoreError> {
        api::update_post(id.clone(), fields)
            .await
            .map_err(transport)?
    }
}

/// The post repository every page reads and writes through.
pub fn post_repository() -> PostRepository<ServerPosts> {
    PostRepository::new(ServerPosts)
}

/// Create the platform's draft slot.
pub fn make_draft_slot() -> impl DraftSlot + Clone + 'static {
    #[cfg(all(target_arch = "wasm32", feature = "web"))]
    {
        store::LocalStorageSlot::new()
    }
    #[cfg(not(all(target_arch = "wasm32", feature = "web")))]
    {
        store::MemoryDraftSlot::new()
    }
}
