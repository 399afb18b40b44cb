//! # Session store: the resolved authentication state of the visitor
//!
//! [`SessionStore`] wraps an [`AuthService`] and publishes a [`Session`] through a
//! [`tokio::sync::watch`] channel. Every guard and form subscribes to it.
//!
//! ## Lifecycle
//!
//! A store starts `Pending`. [`resolve`](SessionStore::resolve) asks the service
//! who is signed in and moves the session to `Resolved`; a service failure still
//! resolves (as signed out) so the pages never hang on a spinner.
//! [`sign_in`](SessionStore::sign_in) and [`sign_out`](SessionStore::sign_out)
//! publish the new session *before* they return, so a caller that saw `Ok` can
//! never observe the old identity afterwards.
//!
//! ## Stale resolutions
//!
//! Sign-in and sign-out bump a generation counter. A `resolve` that started
//! before the bump discards its answer instead of overwriting the newer session.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::policy::{AdminClaim, PrivilegePolicy};

/// An authenticated user as reported by the [`AuthService`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub uid: String,
    pub email: String,
    pub display_name: Option<String>,
    /// Server-issued admin claim.
    pub is_admin: bool,
}

impl Identity {
    pub fn display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.email)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Readiness {
    #[default]
    Pending,
    Resolved,
}

/// Snapshot of the visitor's authentication state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    identity: Option<Identity>,
    privileged: bool,
    readiness: Readiness,
}

impl Session {
    pub fn pending() -> Self {
        Self::default()
    }

    /// A resolved session; privilege comes from `policy`.
    pub fn resolved(identity: Option<Identity>, policy: &impl PrivilegePolicy) -> Self {
        let privileged = identity
            .as_ref()
            .is_some_and(|identity| policy.is_privileged(identity));
        Self {
            identity,
            privileged,
            readiness: Readiness::Resolved,
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn is_privileged(&self) -> bool {
        self.privileged
    }

    pub fn readiness(&self) -> Readiness {
        self.readiness
    }

    pub fn is_resolved(&self) -> bool {
        self.readiness == Readiness::Resolved
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Login failed. Check your credentials.")]
    InvalidCredentials,
    #[error("Authentication service unavailable: {0}")]
    ServiceUnavailable(String),
}

/// Async trait for the external authentication service.
pub trait AuthService {
    fn sign_in(
        &self,
        email: &str,
        secret: &str,
    ) -> impl Future<Output = Result<Identity, AuthError>>;
    fn sign_out(&self) -> impl Future<Output = Result<(), AuthError>>;
    /// Who is signed in right now, if anyone.
    fn current_identity(&self) -> impl Future<Output = Result<Option<Identity>, AuthError>>;
}

/// Observable session backed by an AuthService.
pub struct SessionStore<A: AuthService, P: PrivilegePolicy = AdminClaim> {
    auth: A,
    policy: P,
    state: watch::Sender<Session>,
    generation: AtomicU64,
}

impl<A: AuthService> SessionStore<A> {
    pub fn new(auth: A) -> Self {
        Self::with_policy(auth, AdminClaim)
    }
}

impl<A: AuthService, P: PrivilegePolicy> SessionStore<A, P> {
    pub fn with_policy(auth: A, policy: P) -> Self {
        let (state, _) = watch::channel(Session::pending());
        Self {
            auth,
            policy,
            state,
            generation: AtomicU64::new(0),
        }
    }

    /// The current session.
    pub fn session(&self) -> Session {
        self.state.borrow().clone()
    }

    /// Receiver that observes every published session.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    /// Ask the service who is signed in and publish a resolved session.
    pub async fn resolve(&self) -> Session {
        let generation = self.generation.load(Ordering::SeqCst);

        let identity = match self.auth.current_identity().await {
            Ok(identity) => identity,
            Err(e) => {
                tracing::warn!("session check failed, treating visitor as signed out: {e}");
                None
            }
        };

        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!("discarding stale session resolution");
            return self.session();
        }

        let session = self.publish(identity);
        tracing::info!(
            signed_in = session.identity().is_some(),
            privileged = session.is_privileged(),
            "session resolved"
        );
        session
    }

    pub async fn sign_in(&self, email: &str, secret: &str) -> Result<Session, AuthError> {
        tracing::info!(email, "attempting sign-in");

        let identity = self.auth.sign_in(email, secret).await.inspect_err(|e| {
            tracing::warn!(email, "sign-in failed: {e}");
        })?;

        self.generation.fetch_add(1, Ordering::SeqCst);
        let session = self.publish(Some(identity));
        tracing::info!(email, privileged = session.is_privileged(), "signed in");
        Ok(session)
    }

    pub async fn sign_out(&self) -> Result<(), AuthError> {
        self.auth.sign_out().await.inspect_err(|e| {
            tracing::warn!("sign-out failed: {e}");
        })?;

        self.generation.fetch_add(1, Ordering::SeqCst);
        self.publish(None);
        tracing::info!("signed out");
        Ok(())
    }

    fn publish(&self, identity: Option<Identity>) -> Session {
        let session = Session::resolved(identity, &self.policy);
        self.state.send_replace(session.clone());
        session
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::{Arc, Mutex};

    use tokio::sync::Notify;

    use super::*;

    pub(crate) const ADMIN_EMAIL: &str = "admin@example.com";
    pub(crate) const ADMIN_SECRET: &str = "correct horse";

    pub(crate) fn admin_identity() -> Identity {
        Identity {
            uid: "admin-1".to_string(),
            email: ADMIN_EMAIL.to_string(),
            display_name: Some("Admin".to_string()),
            is_admin: true,
        }
    }

    /// AuthService double with one admin account.
    #[derive(Default)]
    pub(crate) struct FakeAuth {
        current: Mutex<Option<Identity>>,
        offline: bool,
        /// When set, `current_identity` snapshots the signed-in user and then
        /// waits here before answering.
        gate: Option<Arc<Notify>>,
    }

    impl FakeAuth {
        pub(crate) fn signed_in(identity: Identity) -> Self {
            Self {
                current: Mutex::new(Some(identity)),
                ..Self::default()
            }
        }

        fn offline() -> Self {
            Self {
                offline: true,
                ..Self::default()
            }
        }

        fn gated(gate: Arc<Notify>) -> Self {
            Self {
                gate: Some(gate),
                ..Self::default()
            }
        }
    }

    impl AuthService for FakeAuth {
        async fn sign_in(&self, email: &str, secret: &str) -> Result<Identity, AuthError> {
            if self.offline {
                return Err(AuthError::ServiceUnavailable("offline".to_string()));
            }
            if email != ADMIN_EMAIL || secret != ADMIN_SECRET {
                return Err(AuthError::InvalidCredentials);
            }
            let identity = admin_identity();
            *self.current.lock().unwrap() = Some(identity.clone());
            Ok(identity)
        }

        async fn sign_out(&self) -> Result<(), AuthError> {
            *self.current.lock().unwrap() = None;
            Ok(())
        }

        async fn current_identity(&self) -> Result<Option<Identity>, AuthError> {
            if self.offline {
                return Err(AuthError::ServiceUnavailable("offline".to_string()));
            }
            let snapshot = self.current.lock().unwrap().clone();
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            Ok(snapshot)
        }
    }

    #[tokio::test]
    async fn test_starts_pending() {
        let store = SessionStore::new(FakeAuth::default());
        assert_eq!(store.session(), Session::pending());
        assert_eq!(store.session().readiness(), Readiness::Pending);
    }

    #[tokio::test]
    async fn test_resolve_signed_out() {
        let store = SessionStore::new(FakeAuth::default());
        let session = store.resolve().await;
        assert!(session.is_resolved());
        assert!(session.identity().is_none());
        assert!(!session.is_privileged());
    }

    #[tokio::test]
    async fn test_resolve_existing_admin() {
        let store = SessionStore::new(FakeAuth::signed_in(admin_identity()));
        let session = store.resolve().await;
        assert!(session.is_resolved());
        assert!(session.is_privileged());
        assert_eq!(session.identity().unwrap().display_name(), "Admin");
    }

    #[tokio::test]
    async fn test_resolve_when_service_down_still_resolves() {
        let store = SessionStore::new(FakeAuth::offline());
        let session = store.resolve().await;
        assert!(session.is_resolved());
        assert!(session.identity().is_none());
    }

    #[tokio::test]
    async fn test_sign_in_visible_before_return() {
        let store = SessionStore::new(FakeAuth::default());
        let rx = store.subscribe();

        store.sign_in(ADMIN_EMAIL, ADMIN_SECRET).await.unwrap();

        let observed = rx.borrow().clone();
        assert!(observed.is_resolved());
        assert_eq!(observed.identity(), Some(&admin_identity()));
        assert!(observed.is_privileged());
    }

    #[tokio::test]
    async fn test_sign_in_rejects_bad_credentials() {
        let store = SessionStore::new(FakeAuth::default());
        store.resolve().await;

        let err = store.sign_in(ADMIN_EMAIL, "wrong").await.unwrap_err();
        assert_eq!(err, AuthError::InvalidCredentials);
        assert!(store.session().identity().is_none());
    }

    #[tokio::test]
    async fn test_sign_in_service_unavailable() {
        let store = SessionStore::new(FakeAuth::offline());
        let err = store.sign_in(ADMIN_EMAIL, ADMIN_SECRET).await.unwrap_err();
        assert!(matches!(err, AuthError::ServiceUnavailable(_)));
    }

    #[tokio::test]
    async fn test_sign_out_clears_identity() {
        let store = SessionStore::new(FakeAuth::signed_in(admin_identity()));
        store.resolve().await;
        store.sign_out().await.unwrap();

        let session = store.session();
        assert!(session.is_resolved());
        assert!(session.identity().is_none());
        assert!(!session.is_privileged());
    }

    #[tokio::test]
    async fn test_non_admin_identity_is_not_privileged() {
        let mut identity = admin_identity();
        identity.is_admin = false;
        let store = SessionStore::new(FakeAuth::signed_in(identity));
        let session = store.resolve().await;
        assert!(session.identity().is_some());
        assert!(!session.is_privileged());
    }

    #[tokio::test]
    async fn test_stale_resolution_is_discarded() {
        let gate = Arc::new(Notify::new());
        let store = SessionStore::new(FakeAuth::gated(gate.clone()));

        let resolve = store.resolve();
        let sign_in = async {
            store.sign_in(ADMIN_EMAIL, ADMIN_SECRET).await.unwrap();
            gate.notify_one();
        };
        let (resolved, ()) = tokio::join!(resolve, sign_in);

        // The resolution began while signed out but must not undo the sign-in.
        assert!(resolved.is_privileged());
        assert!(store.session().is_privileged());
    }
}
