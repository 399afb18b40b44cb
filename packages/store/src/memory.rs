use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;

use crate::models::{Post, PostFields, PostId};
use crate::repo::{ContentStore, StoreError};

/// In-memory ContentStore for testing and the server-rendering fallback.
///
/// Slug uniqueness is enforced under the same lock as the write, so two racing
/// creates cannot both succeed.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    posts: Arc<Mutex<Vec<Post>>>,
    next_id: Arc<AtomicUsize>,
    writes: Arc<AtomicUsize>,
    offline: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful create/update calls.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Make every operation fail with [`StoreError::Unavailable`].
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<Post>>, StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store offline".to_string()));
        }
        self.posts
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store poisoned".to_string()))
    }
}

impl ContentStore for MemoryStore {
    async fn query_by_slug(&self, slug: &str) -> Result<Vec<Post>, StoreError> {
        let posts = self.lock()?;
        Ok(posts.iter().filter(|p| p.slug == slug).cloned().collect())
    }

    async fn list(&self) -> Result<Vec<Post>, StoreError> {
        Ok(self.lock()?.clone())
    }

    async fn create(&self, fields: PostFields) -> Result<PostId, StoreError> {
        let mut posts = self.lock()?;
        if posts.iter().any(|p| p.slug == fields.slug) {
            return Err(StoreError::SlugTaken(fields.slug));
        }

        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let id = PostId(format!("post-{n}"));
        let now = Utc::now();
        posts.push(Post {
            id: id.clone(),
            title: fields.title,
            slug: fields.slug,
            body: fields.body,
            tags: fields.tags,
            author_name: fields.author_name,
            created_at: now,
            updated_at: now,
        });
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(id)
    }

    async fn update(&self, id: &PostId, fields: PostFields) -> Result<(), StoreError> {
        let mut posts = self.lock()?;
        if posts.iter().any(|p| p.slug == fields.slug && &p.id != id) {
            return Err(StoreError::SlugTaken(fields.slug));
        }
        let post = posts
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        post.title = fields.title;
        post.slug = fields.slug;
        post.body = fields.body;
        post.tags = fields.tags;
        post.author_name = fields.author_name;
        post.updated_at = Utc::now();
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::PostRepository;

    fn fields(title: &str, slug: &str) -> PostFields {
        PostFields {
            title: title.to_string(),
            slug: slug.to_string(),
            body: format!("# {title}\n\nBody of {slug}."),
            tags: vec!["ctf".to_string()],
            author_name: "Guest Author".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_get_by_slug() {
        let repo = PostRepository::new(MemoryStore::new());

        assert!(repo.list_posts().await.unwrap().is_empty());
        assert!(repo.get_by_slug("lame").await.unwrap().is_none());

        let id = repo.create_post(fields("Lame", "lame")).await.unwrap();

        let post = repo.get_by_slug("lame").await.unwrap().unwrap();
        assert_eq!(post.id, id);
        assert_eq!(post.title, "Lame");
        assert_eq!(post.tags, vec!["ctf".to_string()]);
        assert_eq!(post.created_at, post.updated_at);
        assert_eq!(repo.store().write_count(), 1);
    }

    #[tokio::test]
    async fn test_update_keeps_created_at() {
        let repo = PostRepository::new(MemoryStore::new());
        let id = repo.create_post(fields("Lame", "lame")).await.unwrap();
        let before = repo.get_by_slug("lame").await.unwrap().unwrap();

        let mut changed = before.fields();
        changed.body = "rewritten".to_string();
        repo.update_post(&id, changed).await.unwrap();

        let after = repo.get_by_slug("lame").await.unwrap().unwrap();
        assert_eq!(after.body, "rewritten");
        assert_eq!(after.created_at, before.created_at);
        assert!(after.updated_at >= before.updated_at);
        assert_eq!(repo.list_posts().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_rejects_taken_slug() {
        let repo = PostRepository::new(MemoryStore::new());
        repo.create_post(fields("Lame", "lame")).await.unwrap();

        let err = repo.create_post(fields("Lame again", "lame")).await.unwrap_err();
        assert_eq!(err, StoreError::SlugTaken("lame".to_string()));
        assert_eq!(repo.list_posts().await.unwrap().len(), 1);
        assert_eq!(repo.store().write_count(), 1);
    }

    #[tokio::test]
    async fn test_update_rejects_slug_of_other_post() {
        let repo = PostRepository::new(MemoryStore::new());
        repo.create_post(fields("Lame", "lame")).await.unwrap();
        let id = repo.create_post(fields("Blue", "blue")).await.unwrap();

        let err = repo.update_post(&id, fields("Blue", "lame")).await.unwrap_err();
        assert_eq!(err, StoreError::SlugTaken("lame".to_string()));

        // Keeping its own slug is fine.
        repo.update_post(&id, fields("Blue v2", "blue")).await.unwrap();
    }

    #[tokio::test]
    async fn test_update_unknown_post() {
        let repo = PostRepository::new(MemoryStore::new());
        let err = repo
            .update_post(&PostId("nope".to_string()), fields("X", "x"))
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::NotFound("nope".to_string()));
    }

    #[tokio::test]
    async fn test_slug_in_use_excludes_self() {
        let repo = PostRepository::new(MemoryStore::new());
        let id = repo.create_post(fields("Lame", "lame")).await.unwrap();

        assert!(repo.slug_in_use("lame", None).await.unwrap());
        assert!(!repo.slug_in_use("lame", Some(&id)).await.unwrap());
        assert!(!repo.slug_in_use("blue", None).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let repo = PostRepository::new(MemoryStore::new());
        repo.create_post(fields("First", "first")).await.unwrap();
        std::thread::sleep(std::time::Duration::from_millis(2));
        repo.create_post(fields("Second", "second")).await.unwrap();

        let summaries = repo.list_summaries().await.unwrap();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].slug, "second");
        assert_eq!(summaries[1].slug, "first");
        assert_eq!(summaries[0].summary, "Body of second.");
    }

    #[tokio::test]
    async fn test_offline_store_fails() {
        let store = MemoryStore::new();
        store.set_offline(true);
        let repo = PostRepository::new(store);

        assert!(matches!(
            repo.list_posts().await,
            Err(StoreError::Unavailable(_))
        ));
        assert!(matches!(
            repo.create_post(fields("Lame", "lame")).await,
            Err(StoreError::Unavailable(_))
        ));
    }
}
