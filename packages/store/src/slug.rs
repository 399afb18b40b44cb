//! URL slugs for posts.
//!
//! A slug is the `/blog/{slug}` path segment of a post. [`slugify`] derives one
//! from a title; [`is_valid_slug`] checks a hand-typed one before it is written.

/// Derive a slug from free text.
///
/// Lower-cases the input, collapses every run of characters outside
/// `[a-z0-9]` into a single `-`, and trims hyphens from both ends.
///
/// `"My First Post!"` → `"my-first-post"`.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;

    for ch in text.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(ch);
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

/// A slug is valid when it is non-empty, uses only `[a-z0-9-]`, and has no
/// leading, trailing, or doubled hyphen. Exactly the shape [`slugify`] produces.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && !slug.contains("--")
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}
