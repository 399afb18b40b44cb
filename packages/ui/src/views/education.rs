use dioxus::prelude::*;

use super::{load_profile, ViewError, VIEWS_CSS};

#[component]
pub fn EducationView() -> Element {
    let profile = match load_profile() {
        Ok(profile) => profile,
        Err(message) => return rsx! { ViewError { message } },
    };

    rsx! {
        document::Link { rel: "stylesheet", href: VIEWS_CSS }
        div {
            class: "view-page max-w-3xl",
            h1 { class: "view-title", "Education" }

            for entry in profile.education.iter() {
                article {
                    key: "{entry.degree}-{entry.period}",
                    class: "card",
                    div {
                        class: "card-header",
                        h2 { class: "card-title", "{entry.degree}" }
                        span { class: "view-muted", "{entry.period}" }
                    }
                    p { class: "view-muted", "{entry.institution}, {entry.location}" }
                    if !entry.description.is_empty() {
                        p { class: "view-text", "{entry.description}" }
                    }
                    if !entry.achievements.is_empty() {
                        ul {
                            class: "achievement-list",
                            for achievement in entry.achievements.iter() {
                                li { key: "{achievement}", "{achievement}" }
                            }
                        }
                    }
                }
            }
        }
    }
}
