//! # Database module
//!
//! Everything here is behind `#[cfg(feature = "server")]` so WASM builds never
//! pull in SQLx.
//!
//! - [`get_pool`]: lazy process-wide `PgPool` (a [`tokio::sync::OnceCell`]),
//!   sized from `DATABASE_MAX_CONNECTIONS`.
//! - [`migrate`]: applies `packages/api/migrations`.
//! - [`seed_admin`]: creates the `ADMIN_BOOTSTRAP_*` account, if configured.
//! - [`PgContentStore`]: the `posts` table as a `store::ContentStore`.

#[cfg(feature = "server")]
mod pool;
#[cfg(feature = "server")]
mod posts;

#[cfg(feature = "server")]
pub use pool::{get_pool, migrate, seed_admin};
#[cfg(feature = "server")]
pub use posts::PgContentStore;
