//! Email + password authentication against the `users` table.

#[cfg(feature = "server")]
mod password;
#[cfg(feature = "server")]
mod session;

#[cfg(feature = "server")]
pub use password::{hash_password, verify_password};
#[cfg(feature = "server")]
pub use session::{require_admin, session_user, SESSION_USER_ID_KEY};
