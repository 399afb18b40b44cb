//! Route guards for `/admin` and `/admin-login`.
//!
//! [`GuardKind::decide`] is the pure decision; [`enforce`] applies it to every
//! session the store publishes and navigates at most once.

use tokio::sync::watch;

use crate::session::Session;

/// The protected editor page.
pub const ADMIN_PATH: &str = "/admin";
/// The sign-in page.
pub const LOGIN_PATH: &str = "/admin-login";

/// Where the post-save action sends the author after creating a post.
pub fn post_saved_path(slug: &str) -> String {
    format!("{ADMIN_PATH}?edit={slug}")
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardKind {
    /// Admits privileged visitors, sends everyone else to the login page.
    Protected,
    /// Shows the sign-in form, sends already-privileged visitors to the admin page.
    Login,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session not resolved yet: show a waiting state, do not navigate.
    Wait,
    Render,
    Redirect(&'static str),
}

impl GuardKind {
    pub fn decide(self, session: &Session) -> GuardDecision {
        if !session.is_resolved() {
            return GuardDecision::Wait;
        }
        match (self, session.is_privileged()) {
            (GuardKind::Protected, true) | (GuardKind::Login, false) => GuardDecision::Render,
            (GuardKind::Protected, false) => GuardDecision::Redirect(LOGIN_PATH),
            (GuardKind::Login, true) => GuardDecision::Redirect(ADMIN_PATH),
        }
    }
}

/// Client-side navigation (replace, no full reload).
pub trait Navigator {
    fn navigate(&self, path: &str);
}

/// Watch the session and navigate as soon as `kind` calls for a redirect.
///
/// Runs until it has navigated (returning that decision) or the session store
/// is dropped (returning the last decision). Dropping the future cancels it.
pub async fn enforce<N: Navigator>(
    kind: GuardKind,
    mut sessions: watch::Receiver<Session>,
    navigator: &N,
) -> GuardDecision {
    loop {
        let decision = kind.decide(&sessions.borrow_and_update());
        tracing::debug!(?kind, ?decision, "guard evaluated");

        if let GuardDecision::Redirect(path) = decision {
            navigator.navigate(path);
            return decision;
        }
        if sessions.changed().await.is_err() {
            return decision;
        }
    }
}
