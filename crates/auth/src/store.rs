//! Seeded in-memory credential store.
//!
//! Users are seeded once at startup if absent and are not managed through
//! the CRUD surface; there are no user-management endpoints.

use std::collections::HashMap;
use std::sync::RwLock;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use thiserror::Error;

use crate::role::Role;
use crate::user::UserRecord;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Unknown username or wrong password. Deliberately indistinguishable.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("account disabled")]
    Disabled,

    #[error("password hashing failed: {0}")]
    Hash(String),

    #[error("user store lock poisoned")]
    Poisoned,
}

/// The authenticated identity attached to a request after a successful
/// Basic-auth check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub username: String,
    pub roles: Vec<Role>,
}

impl AuthenticatedUser {
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

/// Username → credential record map guarded by a `RwLock`.
#[derive(Debug, Default)]
pub struct UserStore {
    users: RwLock<HashMap<String, UserRecord>>,
}

impl UserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the two built-in accounts if they are not present yet:
    /// `user`/`password` (ROLE_USER) and `admin`/`admin` (ROLE_USER +
    /// ROLE_ADMIN). Existing records are left untouched.
    pub fn seed_defaults(&self) -> Result<(), AuthError> {
        self.seed_user("user", "password", vec![Role::User])?;
        self.seed_user("admin", "admin", vec![Role::User, Role::Admin])?;
        Ok(())
    }

    /// Insert a user with a freshly hashed password unless the username is
    /// already taken.
    pub fn seed_user(
        &self,
        username: &str,
        password: &str,
        authorities: Vec<Role>,
    ) -> Result<(), AuthError> {
        {
            let users = self.users.read().map_err(|_| AuthError::Poisoned)?;
            if users.contains_key(username) {
                return Ok(());
            }
        }

        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::Hash(e.to_string()))?
            .to_string();

        let record = UserRecord {
            username: username.to_string(),
            password_hash: hash,
            enabled: true,
            authorities,
        };

        let mut users = self.users.write().map_err(|_| AuthError::Poisoned)?;
        users.entry(username.to_string()).or_insert(record);
        tracing::debug!(username, "seeded user");
        Ok(())
    }

    /// Verify a username/password pair and return the identity on success.
    pub fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<AuthenticatedUser, AuthError> {
        let record = {
            let users = self.users.read().map_err(|_| AuthError::Poisoned)?;
            users.get(username).cloned()
        };

        let Some(record) = record else {
            return Err(AuthError::InvalidCredentials);
        };

        let parsed = PasswordHash::new(&record.password_hash)
            .map_err(|e| AuthError::Hash(e.to_string()))?;
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .map_err(|_| AuthError::InvalidCredentials)?;

        if !record.enabled {
            return Err(AuthError::Disabled);
        }

        Ok(AuthenticatedUser {
            username: record.username,
            roles: record.authorities,
        })
    }
}
