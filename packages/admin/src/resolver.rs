//! Which body the editor starts with.
//!
//! Priority: an existing post with a non-empty body, then a recovered draft,
//! then nothing. Editing a saved post must never pick up a leftover draft from
//! an abandoned "new post" session.

use store::{Draft, Post};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContentSource {
    Existing,
    RecoveredDraft { label: String },
    Blank,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InitialContent {
    pub body: String,
    pub source: ContentSource,
}

pub fn resolve_initial_content(existing: Option<&Post>, draft: Option<Draft>) -> InitialContent {
    if let Some(post) = existing.filter(|post| !post.body.is_empty()) {
        return InitialContent {
            body: post.body.clone(),
            source: ContentSource::Existing,
        };
    }

    if let Some(draft) = draft {
        return InitialContent {
            body: draft.body,
            source: ContentSource::RecoveredDraft { label: draft.label },
        };
    }

    InitialContent {
        body: String::new(),
        source: ContentSource::Blank,
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use store::PostId;

    use super::*;

    fn post(body: &str) -> Post {
        let now = Utc::now();
        Post {
            id: PostId("post-1".to_string()),
            title: "Lame".to_string(),
            slug: "lame".to_string(),
            body: body.to_string(),
            tags: Vec::new(),
            author_name: "Guest Author".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_existing_post_beats_stale_draft() {
        let initial = resolve_initial_content(
            Some(&post("saved body")),
            Some(Draft::new("stale draft", "old.md")),
        );
        assert_eq!(initial.body, "saved body");
        assert_eq!(initial.source, ContentSource::Existing);
    }

    #[test]
    fn test_recovered_draft_for_new_post() {
        let initial = resolve_initial_content(None, Some(Draft::new("X", "f.md")));
        assert_eq!(initial.body, "X");
        assert_eq!(
            initial.source,
            ContentSource::RecoveredDraft {
                label: "f.md".to_string()
            }
        );
    }

    #[test]
    fn test_empty_existing_body_falls_through_to_draft() {
        let initial = resolve_initial_content(Some(&post("")), Some(Draft::new("X", "f.md")));
        assert_eq!(initial.body, "X");
    }

    #[test]
    fn test_blank() {
        let initial = resolve_initial_content(None, None);
        assert_eq!(initial.body, "");
        assert_eq!(initial.source, ContentSource::Blank);
    }
}
