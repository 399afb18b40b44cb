//! The authoring form: an [`AuthoringController`] in a signal, wired to inputs.
//!
//! Saving follows the controller's split: `begin_submit` synchronously (so a
//! second click while saving is refused before any await), then
//! [`execute_save`] in a spawned task, then `finish`. A newly created post
//! goes through the post-saved action and lands on `/admin?edit={slug}`.

use admin::{execute_save, post_saved_path, AuthoringController, SaveState};
use dioxus::prelude::*;
use store::Post;

use crate::auth::use_session;
use crate::markdown::MarkdownView;
use crate::services::{make_draft_slot, post_repository};

#[component]
pub fn PostForm(
    /// The post being edited; `None` creates a new one.
    existing: Option<Post>,
) -> Element {
    let ctx = use_session();
    let navigator = use_navigator();
    let drafts = use_hook(make_draft_slot);
    let mut controller = use_signal({
        let drafts = drafts.clone();
        move || match &existing {
            Some(post) => AuthoringController::edit_post(post, &drafts),
            None => AuthoringController::new_post(&drafts),
        }
    });

    let on_body = {
        let drafts = drafts.clone();
        move |evt: FormEvent| controller.write().edit_body(evt.value(), &drafts)
    };

    let on_upload = {
        let drafts = drafts.clone();
        move |evt: FormEvent| {
            let drafts = drafts.clone();
            async move {
                let Some(file) = evt.files().into_iter().next() else {
                    return;
                };
                let name = file.name();
                match file.read_string().await {
                    Ok(content) => {
                        if let Err(e) = controller.write().load_upload(&name, content, &drafts) {
                            tracing::warn!("upload refused: {e}");
                        }
                    }
                    Err(e) => {
                        tracing::error!("Failed to read {name}: {e}");
                        controller.write().report_error(format!("Could not read {name}: {e}"));
                    }
                }
            }
        }
    };

    let on_submit = move |evt: FormEvent| {
        evt.prevent_default();
        let session = ctx.session();
        let Ok(request) = controller.write().begin_submit(&session) else {
            return;
        };
        let drafts = drafts.clone();
        spawn(async move {
            let result = execute_save(request, &post_repository(), &drafts).await;
            let Some(slug) = controller.write().finish(result) else {
                return;
            };
            let path = match api::post_saved_redirect(slug.clone()).await {
                Ok(Ok(path)) => path,
                Ok(Err(e)) => {
                    tracing::warn!(%slug, "post-saved action refused: {e}");
                    post_saved_path(&slug)
                }
                Err(e) => {
                    tracing::warn!(%slug, "post-saved action failed: {e}");
                    post_saved_path(&slug)
                }
            };
            navigator.replace(path);
        });
    };

    let snapshot = controller.read().clone();
    let form = snapshot.form();
    let saving = snapshot.is_saving();
    let notice_class = match snapshot.state() {
        SaveState::Succeeded => "form-notice success",
        // Notices outside a finished save are refusals and storage errors.
        SaveState::Failed(_) | SaveState::Editing | SaveState::Saving => "form-notice error",
    };
    let submit_label = match (saving, snapshot.is_new()) {
        (true, _) => "Saving...",
        (false, true) => "Publish post",
        (false, false) => "Update post",
    };

    rsx! {
        form {
            class: "post-form",
            onsubmit: on_submit,

            label { class: "form-label", r#for: "post-title", "Title" }
            input {
                id: "post-title",
                class: "form-input",
                value: "{form.title}",
                placeholder: "HTB: Lame",
                oninput: move |evt: FormEvent| controller.write().set_title(evt.value()),
            }

            label { class: "form-label", r#for: "post-slug", "Slug" }
            input {
                id: "post-slug",
                class: "form-input",
                value: "{form.slug}",
                placeholder: "htb-lame",
                oninput: move |evt: FormEvent| controller.write().set_slug(evt.value()),
            }
            p { class: "form-hint", "URL: {snapshot.url_preview()}" }

            label { class: "form-label", r#for: "post-tags", "Tags (comma separated)" }
            input {
                id: "post-tags",
                class: "form-input",
                value: "{form.tags}",
                placeholder: "htb, smb, easy",
                oninput: move |evt: FormEvent| controller.write().set_tags(evt.value()),
            }

            label { class: "form-label", r#for: "post-author", "Author" }
            input {
                id: "post-author",
                class: "form-input",
                value: "{form.author_name}",
                oninput: move |evt: FormEvent| controller.write().set_author_name(evt.value()),
            }

            label { class: "form-label", r#for: "post-upload", "Upload a markdown file" }
            input {
                id: "post-upload",
                r#type: "file",
                accept: ".md",
                onchange: on_upload,
            }
            if let Some(label) = snapshot.recovered_label() {
                p { class: "form-hint", "{label} loaded" }
            }

            div {
                class: "editor-split",
                div {
                    label { class: "form-label", r#for: "post-body", "Content (markdown)" }
                    textarea {
                        id: "post-body",
                        class: "form-textarea",
                        rows: 24,
                        value: "{form.body}",
                        oninput: on_body,
                    }
                }
                div {
                    class: "editor-preview",
                    span { class: "form-label", "Preview" }
                    MarkdownView { source: form.body.clone() }
                }
            }

            if let Some(notice) = snapshot.notice() {
                p { class: "{notice_class}", "{notice}" }
            }

            button {
                class: "btn btn-primary",
                r#type: "submit",
                disabled: saving,
                "{submit_label}"
            }
        }
    }
}
