//! Static per-route access policy.
//!
//! One table maps method + path pattern to the access level the middleware
//! enforces. A `*` segment matches exactly one path segment. The first
//! matching entry wins, so specific rows must precede wildcard rows for the
//! same prefix. Unlisted paths under `/api` require an authenticated user.

use axum::http::Method;

use statsvc_auth::{AuthenticatedUser, Role};

/// Required access level for a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// No credentials needed.
    Public,
    /// Any authenticated account (ROLE_USER or ROLE_ADMIN).
    User,
    /// ROLE_ADMIN only.
    Admin,
}

const TABLE: &[(Method, &str, Access)] = &[
    (Method::GET, "/health", Access::Public),
    // Earthquakes
    (Method::GET, "/api/earthquakes", Access::User),
    (Method::POST, "/api/earthquakes", Access::Admin),
    (
        Method::GET,
        "/api/earthquakes/stats/avg-magnitude",
        Access::Public,
    ),
    (Method::GET, "/api/earthquakes/magnitude-above", Access::User),
    (Method::GET, "/api/earthquakes/search", Access::User),
    (Method::GET, "/api/earthquakes/*", Access::User),
    (Method::PUT, "/api/earthquakes/*", Access::Admin),
    (Method::DELETE, "/api/earthquakes/*", Access::Admin),
    // Players: statistics
    (Method::GET, "/api/players/stats/average-age", Access::Public),
    (
        Method::GET,
        "/api/players/stats/average-height",
        Access::Public,
    ),
    (
        Method::GET,
        "/api/players/stats/average-weight",
        Access::Public,
    ),
    (Method::GET, "/api/players/stats/height", Access::User),
    (Method::GET, "/api/players/stats/weight", Access::User),
    (Method::GET, "/api/players/stats/teams", Access::User),
    (Method::GET, "/api/players/stats/positions", Access::User),
    (
        Method::GET,
        "/api/players/stats/team-composition/*",
        Access::User,
    ),
    (Method::GET, "/api/players/stats/overall", Access::User),
    // Players: filters
    (Method::GET, "/api/players/team/*", Access::User),
    (Method::GET, "/api/players/team/*/position/*", Access::User),
    (Method::GET, "/api/players/position/*", Access::User),
    (Method::GET, "/api/players/age-range", Access::User),
    (Method::GET, "/api/players/height-above", Access::User),
    (Method::GET, "/api/players/weight-above", Access::User),
    (Method::GET, "/api/players/search", Access::User),
    (Method::GET, "/api/players/bmi-above", Access::User),
    (Method::GET, "/api/players/youngest", Access::User),
    (Method::GET, "/api/players/oldest", Access::User),
    (Method::GET, "/api/players/top10/tallest", Access::User),
    (Method::GET, "/api/players/top10/heaviest", Access::User),
    // Players: CRUD
    (Method::GET, "/api/players", Access::User),
    (Method::POST, "/api/players", Access::Admin),
    (Method::GET, "/api/players/*", Access::User),
    (Method::PUT, "/api/players/*", Access::Admin),
    (Method::DELETE, "/api/players/*", Access::Admin),
    // CSV admin
    (Method::POST, "/api/admin/csv/upload", Access::Admin),
    (Method::POST, "/api/admin/csv/validate", Access::Admin),
    (Method::DELETE, "/api/admin/csv/clear", Access::Admin),
    (Method::GET, "/api/admin/csv/info", Access::Admin),
    (Method::GET, "/api/admin/csv/template", Access::Admin),
];

/// Access level required for a request. Unknown `/api` paths still demand
/// an authenticated user, so probing returns 401 before 404.
pub fn required(method: &Method, path: &str) -> Access {
    TABLE
        .iter()
        .find(|(m, pattern, _)| m == method && matches(pattern, path))
        .map(|(_, _, access)| *access)
        .unwrap_or(Access::User)
}

/// Whether `user`'s roles satisfy `access`.
pub fn permits(access: Access, user: &AuthenticatedUser) -> bool {
    match access {
        Access::Public => true,
        Access::User => user.has_role(Role::User) || user.has_role(Role::Admin),
        Access::Admin => user.has_role(Role::Admin),
    }
}

fn matches(pattern: &str, path: &str) -> bool {
    let mut pattern_segments = pattern.split('/');
    let mut path_segments = path.split('/');
    loop {
        match (pattern_segments.next(), path_segments.next()) {
            (None, None) => return true,
            (Some(p), Some(s)) if p == "*" && !s.is_empty() => continue,
            (Some(p), Some(s)) if p == s => continue,
            _ => return false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(roles: Vec<Role>) -> AuthenticatedUser {
        AuthenticatedUser {
            username: "t".to_string(),
            roles,
        }
    }

    #[test]
    fn wildcard_matches_exactly_one_segment() {
        assert!(matches("/api/earthquakes/*", "/api/earthquakes/nc1"));
        assert!(!matches("/api/earthquakes/*", "/api/earthquakes"));
        assert!(!matches("/api/earthquakes/*", "/api/earthquakes/a/b"));
    }

    #[test]
    fn stats_routes_are_public_and_listed_before_the_id_wildcard() {
        assert_eq!(
            required(&Method::GET, "/api/earthquakes/stats/avg-magnitude"),
            Access::Public
        );
        assert_eq!(
            required(&Method::GET, "/api/players/stats/average-height"),
            Access::Public
        );
        assert_eq!(required(&Method::GET, "/api/players/youngest"), Access::User);
    }

    #[test]
    fn mutations_require_admin_and_reads_require_user() {
        assert_eq!(required(&Method::POST, "/api/players"), Access::Admin);
        assert_eq!(required(&Method::PUT, "/api/players/x"), Access::Admin);
        assert_eq!(required(&Method::DELETE, "/api/earthquakes/x"), Access::Admin);
        assert_eq!(required(&Method::GET, "/api/players/x"), Access::User);
    }

    #[test]
    fn unknown_paths_default_to_authenticated() {
        assert_eq!(required(&Method::GET, "/api/nope"), Access::User);
    }

    #[test]
    fn role_checks_follow_the_hierarchy() {
        let plain = user(vec![Role::User]);
        let admin = user(vec![Role::User, Role::Admin]);

        assert!(permits(Access::Public, &plain));
        assert!(permits(Access::User, &plain));
        assert!(!permits(Access::Admin, &plain));
        assert!(permits(Access::Admin, &admin));
    }
}
