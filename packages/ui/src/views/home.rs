use dioxus::prelude::*;

use super::{format_date, load_profile, ViewError, VIEWS_CSS};
use crate::services::post_repository;

const LATEST_COUNT: usize = 3;

/// Landing page: owner hero and the newest writeups.
#[component]
pub fn HomeView() -> Element {
    let latest = use_resource(|| async move {
        post_repository()
            .list_summaries()
            .await
            .map(|mut posts| {
                posts.truncate(LATEST_COUNT);
                posts
            })
    });

    let profile = match load_profile() {
        Ok(profile) => profile,
        Err(message) => return rsx! { ViewError { message } },
    };

    rsx! {
        document::Link { rel: "stylesheet", href: VIEWS_CSS }
        div {
            class: "view-page",

            section {
                class: "hero",
                h1 { class: "hero-name", "{profile.owner.name}" }
                p { class: "hero-headline", "{profile.owner.headline}" }
                div {
                    class: "hero-links",
                    for link in profile.owner.links.iter() {
                        a { key: "{link.url}", class: "btn btn-secondary", href: "{link.url}", "{link.label}" }
                    }
                }
            }

            section {
                h2 { class: "view-section-title", "Latest writeups" }
                match &*latest.read() {
                    None => rsx! { p { class: "view-muted", "Loading..." } },
                    Some(Err(e)) => rsx! { ViewError { message: format!("Could not load posts: {e}") } },
                    Some(Ok(posts)) if posts.is_empty() => rsx! { p { class: "view-muted", "Nothing published yet." } },
                    Some(Ok(posts)) => rsx! {
                        ul {
                            class: "post-list compact",
                            for post in posts.iter() {
                                li {
                                    key: "{post.id}",
                                    Link { to: format!("/blog/{}", post.slug), "{post.title}" }
                                    span { class: "view-muted", " · {format_date(&post.created_at)}" }
                                }
                            }
                        }
                    },
                }
            }
        }
    }
}
