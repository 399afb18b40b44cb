//! This crate contains all shared UI for the site: session context and route
//! guards, the authoring form, markdown rendering and the page views.

mod auth;
pub use auth::{use_session, AdminGuard, AppSessionStore, LoginGuard, SessionContext, SessionProvider, SignOutButton};

pub mod markdown;
pub use markdown::{render_markdown, MarkdownView, RenderedMarkdown, TocEntry};

mod navbar;
pub use navbar::Navbar;

mod post_form;
pub use post_form::PostForm;

mod services;
pub use services::{make_draft_slot, post_repository, ServerAuth, ServerPosts};

pub mod views;
