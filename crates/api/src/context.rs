//! Per-request context inserted by the auth middleware.

use statsvc_auth::AuthenticatedUser;

/// The authenticated caller, available to handlers behind protected routes
/// via `Extension`. Public routes carry no context.
#[derive(Debug, Clone)]
pub struct AuthContext(pub AuthenticatedUser);

impl AuthContext {
    pub fn username(&self) -> &str {
        &self.0.username
    }
}
