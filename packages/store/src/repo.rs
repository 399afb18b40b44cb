//! # Repository: the one content interface every page goes through
//!
//! [`PostRepository`] provides the post operations the site needs on top of an
//! abstract [`ContentStore`]. The blog list, the single-post page and the
//! authoring form all read and write through it, so the same logic runs against
//! the in-memory store (tests, SSR fallback), the PostgreSQL store on the server,
//! or the server-function adapter on the client.
//!
//! ## [`ContentStore`] trait
//!
//! An async interface with four methods: `query_by_slug` and `list` on the read
//! side, `create` and `update` on the write side. Stores assign ids and
//! timestamps, and must reject a write whose slug belongs to another post with
//! [`StoreError::SlugTaken`]; that constraint is what makes the repository's
//! pre-save check race-free.
//!
//! ## Read path
//!
//! | Method | Description |
//! |--------|-------------|
//! | [`list_posts`](PostRepository::list_posts) | All posts, newest first. |
//! | [`list_summaries`](PostRepository::list_summaries) | Same order, projected to [`PostSummary`]. |
//! | [`get_by_slug`](PostRepository::get_by_slug) | First post carrying the slug. |
//! | [`slug_in_use`](PostRepository::slug_in_use) | Whether any *other* post carries the slug. |
//!
//! ## Write path
//!
//! | Method | Description |
//! |--------|-------------|
//! | [`create_post`](PostRepository::create_post) | Inserts a post; `created_at` and `updated_at` set by the store. |
//! | [`update_post`](PostRepository::update_post) | Overwrites the editable fields; refreshes `updated_at`. |

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::models::{Post, PostFields, PostId, PostSummary};

/// Failures surfaced by a [`ContentStore`]. Serializable so server functions
/// can hand them back to the client unchanged.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum StoreError {
    #[error("slug '{0}' is already in use")]
    SlugTaken(String),
    #[error("post {0} not found")]
    NotFound(String),
    #[error("write rejected: {0}")]
    Rejected(String),
    #[error("content store unavailable: {0}")]
    Unavailable(String),
}

/// Async trait for storing and querying posts.
pub trait ContentStore {
    fn query_by_slug(&self, slug: &str) -> impl Future<Output = Result<Vec<Post>, StoreError>>;
    fn list(&self) -> impl Future<Output = Result<Vec<Post>, StoreError>>;
    fn create(&self, fields: PostFields) -> impl Future<Output = Result<PostId, StoreError>>;
    fn update(
        &self,
        id: &PostId,
        fields: PostFields,
    ) -> impl Future<Output = Result<(), StoreError>>;
}

/// Post collection backed by a ContentStore.
#[derive(Clone, Debug)]
pub struct PostRepository<S: ContentStore> {
    store: S,
}

impl<S: ContentStore> PostRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// All posts, newest first.
    pub async fn list_posts(&self) -> Result<Vec<Post>, StoreError> {
        let mut posts = self.store.list().await?;
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts)
    }

    pub async fn list_summaries(&self) -> Result<Vec<PostSummary>, StoreError> {
        Ok(self
            .list_posts()
            .await?
            .iter()
            .map(Post::summary)
            .collect())
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<Post>, StoreError> {
        Ok(self.store.query_by_slug(slug).await?.into_iter().next())
    }

    /// Whether a post other than `excluding` already uses `slug`.
    pub async fn slug_in_use(
        &self,
        slug: &str,
        excluding: Option<&PostId>,
    ) -> Result<bool, StoreError> {
        let matches = self.store.query_by_slug(slug).await?;
        Ok(matches.iter().any(|post| Some(&post.id) != excluding))
    }

    pub async fn create_post(&self, fields: PostFields) -> Result<PostId, StoreError> {
        let slug = fields.slug.clone();
        let id = self.store.create(fields).await?;
        tracing::info!(%id, %slug, "post created");
        Ok(id)
    }

    pub async fn update_post(&self, id: &PostId, fields: PostFields) -> Result<(), StoreError> {
        let slug = fields.slug.clone();
        self.store.update(id, fields).await?;
        tracing::info!(%id, %slug, "post updated");
        Ok(())
    }
}
