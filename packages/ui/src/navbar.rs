use dioxus::prelude::*;

use crate::views::VIEWS_CSS;

const SECTIONS: [(&str, &str); 4] = [
    ("/about", "About"),
    ("/education", "Education"),
    ("/projects", "Projects"),
    ("/blogs", "Writeups"),
];

#[component]
pub fn Navbar(brand: String) -> Element {
    rsx! {
        document::Link { rel: "stylesheet", href: VIEWS_CSS }
        nav {
            class: "navbar",
            Link { to: "/", class: "navbar-brand", "{brand}" }
            div {
                class: "navbar-links",
                for (path, label) in SECTIONS {
                    Link { key: "{path}", to: path, class: "navbar-link", active_class: "active", "{label}" }
                }
            }
        }
    }
}
