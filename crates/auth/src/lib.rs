//! `statsvc-auth` — authentication primitives, decoupled from HTTP.
//!
//! Credential parsing and route policy live in the API layer; this crate
//! only knows usernames, password hashes, and roles.

pub mod role;
pub mod store;
pub mod user;

pub use role::Role;
pub use store::{AuthError, AuthenticatedUser, UserStore};
pub use user::UserRecord;
