use chrono::{DateTime, Utc};
use dioxus::prelude::*;
use store::SiteProfile;

mod home;
pub use home::HomeView;

mod about;
pub use about::AboutView;

mod education;
pub use education::EducationView;

mod projects;
pub use projects::ProjectsView;

mod blogs;
pub use blogs::BlogsView;

mod blog_post;
pub use blog_post::BlogPostView;

mod admin;
pub use admin::AdminView;

mod admin_login;
pub use admin_login::AdminLoginView;

pub(crate) const VIEWS_CSS: Asset = asset!("/src/views/views.css");

/// The bundled `site.toml`, or the parse error as text.
pub(crate) fn load_profile() -> Result<SiteProfile, String> {
    SiteProfile::bundled().map_err(|e| {
        tracing::error!("{} is invalid: {e}", SiteProfile::filename());
        e.to_string()
    })
}

pub(crate) fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%B %-d, %Y").to_string()
}

#[component]
pub(crate) fn ViewError(message: String) -> Element {
    rsx! {
        p { class: "view-error", "{message}" }
    }
}

#[component]
pub(crate) fn TagList(tags: Vec<String>) -> Element {
    rsx! {
        if !tags.is_empty() {
            ul {
                class: "tag-list",
                for tag in tags {
                    li { key: "{tag}", class: "tag", "{tag}" }
                }
            }
        }
    }
}
