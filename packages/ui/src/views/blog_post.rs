use dioxus::prelude::*;

use super::{format_date, TagList, ViewError, VIEWS_CSS};
use crate::markdown::MarkdownView;
use crate::services::post_repository;

/// One writeup, looked up by slug.
#[component]
pub fn BlogPostView(slug: String) -> Element {
    // Track the slug in a signal so the resource re-runs on route param change
    let mut slug_signal = use_signal(|| slug.clone());
    if *slug_signal.peek() != slug {
        slug_signal.set(slug.clone());
    }

    let post = use_resource(move || {
        let slug = slug_signal();
        async move { post_repository().get_by_slug(&slug).await }
    });

    rsx! {
        document::Link { rel: "stylesheet", href: VIEWS_CSS }
        div {
            class: "view-page",
            match &*post.read() {
                None => rsx! { p { class: "view-muted", "Loading..." } },
                Some(Err(e)) => rsx! { ViewError { message: format!("Could not load the post: {e}") } },
                Some(Ok(None)) => rsx! {
                    div {
                        class: "not-found",
                        h1 { class: "view-title", "Post not found" }
                        p { class: "view-muted", "No writeup is published at /blog/{slug}." }
                        Link { to: "/blogs", class: "btn btn-secondary", "All writeups" }
                    }
                },
                Some(Ok(Some(post))) => rsx! {
                    header {
                        class: "post-header",
                        h1 { class: "view-title", "{post.title}" }
                        p {
                            class: "view-muted",
                            "{format_date(&post.created_at)} · {post.author_name}"
                        }
                        TagList { tags: post.tags.clone() }
                    }
                    MarkdownView { source: post.body.clone(), show_toc: true }
                },
            }
        }
    }
}
