//! Who may author posts.
//!
//! Privilege is derived in exactly one place, [`PrivilegePolicy::is_privileged`],
//! when a [`Session`](crate::Session) is resolved. Swapping the policy changes
//! every guard and the save gate at once.

use crate::session::Identity;

/// Decides whether an authenticated identity may use the admin pages.
pub trait PrivilegePolicy {
    fn is_privileged(&self, identity: &Identity) -> bool;
}

/// Grants privilege to identities carrying the server-issued admin claim.
#[derive(Clone, Copy, Debug, Default)]
pub struct AdminClaim;

impl PrivilegePolicy for AdminClaim {
    fn is_privileged(&self, identity: &Identity) -> bool {
        identity.is_admin
    }
}
