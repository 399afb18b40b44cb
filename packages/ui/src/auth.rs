//! Session context, route guards and the sign-out button.
//!
//! [`SessionProvider`] owns the app's [`SessionStore`], resolves it on mount,
//! and mirrors every published [`Session`] into a signal so components re-render.
//! The guards read that signal to decide what to render and run
//! [`admin::enforce`] against the store's watch channel to navigate.

use std::rc::Rc;

use admin::{enforce, GuardDecision, GuardKind, Session, SessionStore};
use dioxus::prelude::*;

use crate::services::ServerAuth;

/// The session store type used by the app.
pub type AppSessionStore = SessionStore<ServerAuth>;

/// Shared session state. Cheap to clone.
#[derive(Clone)]
pub struct SessionContext {
    store: Rc<AppSessionStore>,
    session: Signal<Session>,
}

impl SessionContext {
    /// The current session (subscribes the calling component).
    pub fn session(&self) -> Session {
        (self.session)()
    }

    pub fn store(&self) -> Rc<AppSessionStore> {
        self.store.clone()
    }
}

pub fn use_session() -> SessionContext {
    use_context::<SessionContext>()
}

/// Wrap the app with this to provide [`use_session`].
#[component]
pub fn SessionProvider(children: Element) -> Element {
    let store = use_hook(|| Rc::new(AppSessionStore::new(ServerAuth)));
    let mut session = use_signal(Session::pending);

    let watched = store.clone();
    use_future(move || {
        let mut sessions = watched.subscribe();
        async move {
            loop {
                let latest = sessions.borrow_and_update().clone();
                session.set(latest);
                if sessions.changed().await.is_err() {
                    break;
                }
            }
        }
    });

    let resolving = store.clone();
    use_future(move || {
        let store = resolving.clone();
        async move {
            store.resolve().await;
        }
    });

    use_context_provider(|| SessionContext { store, session });

    rsx! {
        {children}
    }
}

/// [`admin::Navigator`] over the Dioxus router. Replaces the history entry.
struct RouterNavigator(dioxus::router::Navigator);

impl admin::Navigator for RouterNavigator {
    fn navigate(&self, path: &str) {
        self.0.replace(path.to_string());
    }
}

#[component]
fn RouteGuard(kind: GuardKind, children: Element) -> Element {
    let ctx = use_session();
    let navigator = use_navigator();

    let sessions = ctx.store();
    use_future(move || {
        let receiver = sessions.subscribe();
        async move {
            enforce(kind, receiver, &RouterNavigator(navigator)).await;
        }
    });

    match kind.decide(&ctx.session()) {
        GuardDecision::Render => children,
        GuardDecision::Wait => rsx! {
            div { class: "guard-wait", "Checking your session..." }
        },
        GuardDecision::Redirect(_) => rsx! {},
    }
}

/// Renders its children only for privileged visitors; everyone else is sent
/// to the login page once the session resolves.
#[component]
pub fn AdminGuard(children: Element) -> Element {
    rsx! {
        RouteGuard { kind: GuardKind::Protected, {children} }
    }
}

/// Renders its children (the sign-in form) for visitors without privilege;
/// privileged visitors are sent to the admin page.
#[component]
pub fn LoginGuard(children: Element) -> Element {
    rsx! {
        RouteGuard { kind: GuardKind::Login, {children} }
    }
}

#[component]
pub fn SignOutButton(
    #[props(default = "Sign out".to_string())] label: String,
    #[props(default = "".to_string())] class: String,
) -> Element {
    let ctx = use_session();
    let mut busy = use_signal(|| false);
    let mut error = use_signal(|| Option::<String>::None);

    let onclick = move |_| {
        let store = ctx.store();
        async move {
            busy.set(true);
            error.set(None);
            if let Err(e) = store.sign_out().await {
                tracing::error!("Failed to sign out: {e}");
                error.set(Some(format!("Sign-out failed: {e}")));
            }
            busy.set(false);
        }
    };

    rsx! {
        button {
            class: "{class}",
            disabled: busy(),
            onclick: onclick,
            "{label}"
        }
        if let Some(message) = error() {
            p { class: "form-notice error", "{message}" }
        }
    }
}
