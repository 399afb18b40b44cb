use dioxus::prelude::*;
use store::PostSummary;

use super::{format_date, TagList, ViewError, VIEWS_CSS};
use crate::services::post_repository;

/// All writeups, newest first.
#[component]
pub fn BlogsView() -> Element {
    let posts = use_resource(|| async move { post_repository().list_summaries().await });

    rsx! {
        document::Link { rel: "stylesheet", href: VIEWS_CSS }
        div {
            class: "view-page max-w-3xl",
            h1 { class: "view-title", "Writeups" }

            match &*posts.read() {
                None => rsx! { p { class: "view-muted", "Loading posts..." } },
                Some(Err(e)) => rsx! { ViewError { message: format!("Could not load posts: {e}") } },
                Some(Ok(list)) if list.is_empty() => rsx! { p { class: "view-muted", "No writeups yet." } },
                Some(Ok(list)) => rsx! {
                    ul {
                        class: "post-list",
                        for post in list.iter() {
                            PostCard { key: "{post.id}", post: post.clone() }
                        }
                    }
                },
            }
        }
    }
}

#[component]
fn PostCard(post: PostSummary) -> Element {
    rsx! {
        li {
            class: "card post-card",
            Link {
                to: format!("/blog/{}", post.slug),
                class: "card-title",
                "{post.title}"
            }
            p { class: "view-muted", "{format_date(&post.created_at)}" }
            TagList { tags: post.tags.clone() }
            if !post.summary.is_empty() {
                p { class: "view-text", "{post.summary}" }
            }
        }
    }
}
