//! # Admin crate: session-gated authoring, free of any UI framework
//!
//! Everything the `/admin` and `/admin-login` pages decide lives here, so it can
//! be driven by the Dioxus components in `ui` and by plain `#[tokio::test]`s alike.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`session`] | [`Session`] state, the [`AuthService`] seam and the observable [`SessionStore`] |
//! | [`policy`] | [`PrivilegePolicy`]: the single predicate deciding who may author posts |
//! | [`guard`] | Route guard decisions for the protected and login pages, plus the reactive [`enforce`] loop |
//! | [`resolver`] | Which body the editor starts with: existing post, recovered draft, or blank |
//! | [`authoring`] | [`AuthoringController`], the form state machine, and [`execute_save`] |
//!
//! ## Flow
//!
//! ```text
//! SessionStore ──watch──▶ guard::enforce ──admit──▶ resolver ──▶ AuthoringController
//!                                                                   │ begin_submit
//!                                                                   ▼
//!                                               execute_save (slug check → write → clear draft)
//!                                                                   │ finish
//!                                                                   ▼
//!                                                     post_saved_path(slug) redirect
//! ```

pub mod authoring;
pub mod guard;
pub mod policy;
pub mod resolver;
pub mod session;

pub use authoring::{
    execute_save, AuthoringController, AuthoringError, FormFields, Mode, SaveOutcome,
    SaveRequest, SaveState,
};
pub use guard::{enforce, post_saved_path, GuardDecision, GuardKind, Navigator, ADMIN_PATH, LOGIN_PATH};
pub use policy::{AdminClaim, PrivilegePolicy};
pub use resolver::{resolve_initial_content, ContentSource, InitialContent};
pub use session::{AuthError, AuthService, Identity, Readiness, Session, SessionStore};
