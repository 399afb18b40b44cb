use dioxus::prelude::*;

use super::{load_profile, ViewError, VIEWS_CSS};

#[component]
pub fn AboutView() -> Element {
    let profile = match load_profile() {
        Ok(profile) => profile,
        Err(message) => return rsx! { ViewError { message } },
    };

    rsx! {
        document::Link { rel: "stylesheet", href: VIEWS_CSS }
        div {
            class: "view-page max-w-3xl",
            h1 { class: "view-title", "About" }

            for (i, paragraph) in profile.about.paragraphs.iter().enumerate() {
                p { key: "{i}", class: "view-text", "{paragraph}" }
            }

            if !profile.about.interests.is_empty() {
                h2 { class: "view-section-title", "Interests" }
                ul {
                    class: "interest-list",
                    for interest in profile.about.interests.iter() {
                        li { key: "{interest}", "{interest}" }
                    }
                }
            }
        }
    }
}
