use dioxus::prelude::*;

use super::VIEWS_CSS;
use crate::auth::{use_session, LoginGuard};

/// `/admin-login`: the sign-in form. Privileged visitors are sent on to `/admin`.
#[component]
pub fn AdminLoginView() -> Element {
    rsx! {
        document::Link { rel: "stylesheet", href: VIEWS_CSS }
        LoginGuard {
            div {
                class: "login-container",
                h1 { class: "view-title", "Admin sign-in" }
                LoginForm {}
            }
        }
    }
}

#[component]
fn LoginForm() -> Element {
    let ctx = use_session();
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut error = use_signal(|| Option::<String>::None);
    let mut busy = use_signal(|| false);

    let onsubmit = move |evt: FormEvent| {
        evt.prevent_default();
        let store = ctx.store();
        async move {
            busy.set(true);
            error.set(None);
            if let Err(e) = store.sign_in(&email(), &password()).await {
                error.set(Some(e.to_string()));
            }
            busy.set(false);
        }
    };

    rsx! {
        form {
            class: "login-form",
            onsubmit: onsubmit,

            label { class: "form-label", r#for: "login-email", "Email" }
            input {
                id: "login-email",
                class: "form-input",
                r#type: "email",
                autocomplete: "username",
                value: "{email}",
                oninput: move |evt: FormEvent| email.set(evt.value()),
            }

            label { class: "form-label", r#for: "login-password", "Password" }
            input {
                id: "login-password",
                class: "form-input",
                r#type: "password",
                autocomplete: "current-password",
                value: "{password}",
                oninput: move |evt: FormEvent| password.set(evt.value()),
            }

            if let Some(message) = error() {
                p { class: "form-notice error", "{message}" }
            }

            button {
                class: "btn btn-primary",
                r#type: "submit",
                disabled: busy(),
                if busy() { "Signing in..." } else { "Sign in" }
            }
        }
    }
}
