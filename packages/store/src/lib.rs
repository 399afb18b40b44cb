pub mod draft;
pub mod models;
pub mod profile;
pub mod repo;
pub mod slug;

mod memory;
pub use memory::MemoryStore;

#[cfg(all(target_arch = "wasm32", feature = "web"))]
mod local_storage;
#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub use local_storage::LocalStorageSlot;

pub use draft::{Draft, DraftSlot, MemoryDraftSlot};
pub use models::{Post, PostFields, PostId, PostSummary};
pub use profile::SiteProfile;
pub use repo::{ContentStore, PostRepository, StoreError};
