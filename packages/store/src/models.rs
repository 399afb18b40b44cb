//! # Domain models for posts
//!
//! Defines the records returned by [`crate::PostRepository`]. These types are
//! `Serialize + Deserialize` so they can cross the server/client boundary via
//! Dioxus server functions.
//!
//! ## Types
//!
//! | Struct | Represents |
//! |--------|-----------|
//! | [`Post`] | A persisted writeup. Owned by the content store; `created_at` is set once on create, `updated_at` on every write. |
//! | [`PostFields`] | The editable part of a post: what the authoring form writes back on save. |
//! | [`PostSummary`] | The list-view projection used by `/blogs`. |
//!
//! ## Helper functions
//!
//! - [`parse_tags`]: splits the comma-separated tag input into an ordered list.
//! - [`summarize`]: first prose paragraph of a markdown body, clipped for list views.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Author name used when the form is left at its default.
pub const DEFAULT_AUTHOR: &str = "Guest Author";

/// Maximum characters kept by [`summarize`] for the blog list.
pub const SUMMARY_MAX_CHARS: usize = 200;

/// Store-assigned identifier of a post.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PostId(pub String);

impl PostId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PostId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A persisted blog post.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    /// URL segment: `/blog/{slug}`. Unique across all posts.
    pub slug: String,
    /// Raw markdown body.
    pub body: String,
    pub tags: Vec<String>,
    pub author_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// The editable fields of this post, as the form would hold them.
    pub fn fields(&self) -> PostFields {
        PostFields {
            title: self.title.clone(),
            slug: self.slug.clone(),
            body: self.body.clone(),
            tags: self.tags.clone(),
            author_name: self.author_name.clone(),
        }
    }

    pub fn summary(&self) -> PostSummary {
        PostSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            slug: self.slug.clone(),
            summary: summarize(&self.body, SUMMARY_MAX_CHARS),
            tags: self.tags.clone(),
            created_at: self.created_at,
        }
    }
}

/// Fields written by a create or update. Timestamps are store-assigned.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PostFields {
    pub title: String,
    pub slug: String,
    pub body: String,
    pub tags: Vec<String>,
    pub author_name: String,
}

/// List-view projection of a post.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PostSummary {
    pub id: PostId,
    pub title: String,
    pub slug: String,
    pub summary: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Split comma-separated tag input. Entries are trimmed, empties dropped,
/// order preserved.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Inverse of [`parse_tags`] for populating the tag input.
pub fn join_tags(tags: &[String]) -> String {
    tags.join(", ")
}

/// First prose paragraph of a markdown body with whitespace collapsed,
/// clipped to `max_chars` (an ellipsis marks the cut).
///
/// Headings, fenced code, block quotes, tables and images are skipped.
pub fn summarize(body: &str, max_chars: usize) -> String {
    let mut in_fence = false;
    let mut paragraph: Vec<&str> = Vec::new();

    for line in body.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            in_fence = !in_fence;
            if !paragraph.is_empty() {
                break;
            }
            continue;
        }
        if in_fence {
            continue;
        }
        if trimmed.is_empty() {
            if !paragraph.is_empty() {
                break;
            }
            continue;
        }
        let skipped = ['#', '>', '|', '!', '<']
            .iter()
            .any(|c| trimmed.starts_with(*c));
        if skipped {
            if !paragraph.is_empty() {
                break;
            }
            continue;
        }
        paragraph.push(trimmed);
    }

    let text = paragraph.join(" ");
    if text.chars().count() <= max_chars {
        return text;
    }
    let clipped: String = text.chars().take(max_chars).collect();
    format!("{}…", clipped.trim_end())
}
