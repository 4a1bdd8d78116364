//! Stored user records.

use crate::role::Role;

/// A credential record held by the user store.
///
/// Passwords are kept only as argon2 hashes; the plaintext never outlives
/// the seeding call that produced the hash.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub username: String,
    pub password_hash: String,
    pub enabled: bool,
    pub authorities: Vec<Role>,
}

impl UserRecord {
    pub fn has_role(&self, role: Role) -> bool {
        self.authorities.contains(&role)
    }
}
