use dioxus::prelude::*;

use super::{ViewError, VIEWS_CSS};
use crate::auth::{AdminGuard, SignOutButton};
use crate::post_form::PostForm;
use crate::services::post_repository;

/// `/admin`: the editor, behind the admin guard. A non-empty `edit` slug
/// loads that post for editing.
#[component]
pub fn AdminView(edit: String) -> Element {
    let heading = if edit.is_empty() {
        "New writeup"
    } else {
        "Edit writeup"
    };

    rsx! {
        document::Link { rel: "stylesheet", href: VIEWS_CSS }
        AdminGuard {
            div {
                class: "view-page",
                div {
                    class: "admin-header",
                    h1 { class: "view-title", "{heading}" }
                    SignOutButton { class: "btn btn-secondary" }
                }
                if edit.is_empty() {
                    PostForm { existing: None }
                } else {
                    EditLoader { key: "{edit}", slug: edit.clone() }
                }
            }
        }
    }
}

#[component]
fn EditLoader(slug: String) -> Element {
    let lookup = slug.clone();
    let post = use_resource(move || {
        let slug = lookup.clone();
        async move { post_repository().get_by_slug(&slug).await }
    });

    let view = match &*post.read() {
        None => rsx! { p { class: "view-muted", "Loading post..." } },
        Some(Err(e)) => rsx! { ViewError { message: format!("Could not load the post: {e}") } },
        Some(Ok(None)) => rsx! { ViewError { message: format!("No post with slug '{slug}'.") } },
        Some(Ok(Some(existing))) => rsx! {
            PostForm { key: "{existing.id}", existing: Some(existing.clone()) }
        },
    };
    view
}
