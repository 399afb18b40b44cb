//! PostgreSQL-backed [`ContentStore`].
//!
//! The `posts.slug` column carries a `UNIQUE` constraint. A write that would
//! duplicate a slug fails inside the database with SQLSTATE `23505`, which is
//! reported as [`StoreError::SlugTaken`]; no check-then-write window exists at
//! this layer.
//!
//! A store built with [`PgContentStore::authored_by`] records that user in
//! `posts.author_id` on create. Updates leave the original author in place.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use store::{ContentStore, Post, PostFields, PostId, StoreError};
use uuid::Uuid;

const UNIQUE_VIOLATION: &str = "23505";

#[derive(Clone, Debug)]
pub struct PgContentStore {
    pool: PgPool,
    author: Option<Uuid>,
}

impl PgContentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool, author: None }
    }

    /// Record `user_id` as the author of posts created through this store.
    pub fn authored_by(mut self, user_id: Uuid) -> Self {
        self.author = Some(user_id);
        self
    }

    pub fn author(&self) -> Option<Uuid> {
        self.author
    }
}

#[derive(Debug, FromRow)]
struct PostRow {
    id: Uuid,
    title: String,
    slug: String,
    body: String,
    tags: Vec<String>,
    author_name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        Post {
            id: PostId(row.id.to_string()),
            title: row.title,
            slug: row.slug,
            body: row.body,
            tags: row.tags,
            author_name: row.author_name,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

fn store_error(err: sqlx::Error, slug: &str) -> StoreError {
    if let sqlx::Error::Database(db) = &err {
        if db.code().as_deref() == Some(UNIQUE_VIOLATION) {
            return StoreError::SlugTaken(slug.to_string());
        }
    }
    tracing::error!("posts query failed: {err}");
    StoreError::Unavailable(err.to_string())
}

fn parse_id(id: &PostId) -> Result<Uuid, StoreError> {
    Uuid::parse_str(id.as_str()).map_err(|_| StoreError::NotFound(id.to_string()))
}

impl ContentStore for PgContentStore {
    async fn query_by_slug(&self, slug: &str) -> Result<Vec<Post>, StoreError> {
        let rows: Vec<PostRow> = sqlx::query_as("SELECT * FROM posts WHERE slug = $1")
            .bind(slug)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| store_error(e, slug))?;
        Ok(rows.into_iter().map(Post::from).collect())
    }

    async fn list(&self) -> Result<Vec<Post>, StoreError> {
        let rows: Vec<PostRow> = sqlx::query_as("SELECT * FROM posts ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| store_error(e, ""))?;
        Ok(rows.into_iter().map(Post::from).collect())
    }

    async fn create(&self, fields: PostFields) -> Result<PostId, StoreError> {
        let (id,): (Uuid,) = sqlx::query_as(
            "INSERT INTO posts (title, slug, body, tags, author_name, author_id)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING id",
        )
        .bind(&fields.title)
        .bind(&fields.slug)
        .bind(&fields.body)
        .bind(&fields.tags)
        .bind(&fields.author_name)
        .bind(self.author)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| store_error(e, &fields.slug))?;
        Ok(PostId(id.to_string()))
    }

    async fn update(&self, id: &PostId, fields: PostFields) -> Result<(), StoreError> {
        let uuid = parse_id(id)?;
        let result = sqlx::query(
            "UPDATE posts SET
                title = $2,
                slug = $3,
                body = $4,
                tags = $5,
                author_name = $6,
                updated_at = NOW()
             WHERE id = $1",
        )
        .bind(uuid)
        .bind(&fields.title)
        .bind(&fields.slug)
        .bind(&fields.body)
        .bind(&fields.tags)
        .bind(&fields.author_name)
        .execute(&self.pool)
        .await
        .map_err(|e| store_error(e, &fields.slug))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }
}
