use dioxus::prelude::*;

use super::{load_profile, TagList, ViewError, VIEWS_CSS};

#[component]
pub fn ProjectsView() -> Element {
    let profile = match load_profile() {
        Ok(profile) => profile,
        Err(message) => return rsx! { ViewError { message } },
    };

    rsx! {
        document::Link { rel: "stylesheet", href: VIEWS_CSS }
        div {
            class: "view-page",
            h1 { class: "view-title", "Projects" }

            div {
                class: "card-grid",
                for project in profile.projects.iter() {
                    article {
                        key: "{project.name}",
                        class: "card",
                        h2 { class: "card-title", "{project.name}" }
                        p { class: "view-text", "{project.description}" }
                        TagList { tags: project.tags.clone() }
                        if let Some(url) = &project.url {
                            a {
                                class: "card-link",
                                href: "{url}",
                                target: "_blank",
                                rel: "noopener noreferrer",
                                "View project"
                            }
                        }
                    }
                }
            }
        }
    }
}
