//! HTTP Basic authentication middleware.
//!
//! Looks up the required access level in the static route table, verifies
//! credentials against the user store, and attaches the caller identity to
//! the request. Missing or bad credentials get a 401 with a
//! `WWW-Authenticate: Basic` challenge; a valid account with an
//! insufficient role gets a 403.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::Response,
};
use base64::Engine;

use crate::access::{self, Access};
use crate::app::errors::json_error;
use crate::app::state::AppState;
use crate::context::AuthContext;

pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let required = access::required(req.method(), req.uri().path());
    if required == Access::Public {
        return next.run(req).await;
    }

    let Some((username, password)) = extract_basic(req.headers()) else {
        return challenge();
    };

    let user = match state.users.authenticate(&username, &password) {
        Ok(user) => user,
        Err(e) => {
            tracing::debug!(username, error = %e, "authentication failed");
            return challenge();
        }
    };

    if !access::permits(required, &user) {
        return json_error(
            StatusCode::FORBIDDEN,
            "forbidden",
            "insufficient privileges",
        );
    }

    req.extensions_mut().insert(AuthContext(user));
    next.run(req).await
}

/// 401 with the Basic challenge header.
fn challenge() -> Response {
    let mut response = json_error(
        StatusCode::UNAUTHORIZED,
        "unauthorized",
        "valid credentials are required",
    );
    response.headers_mut().insert(
        header::WWW_AUTHENTICATE,
        HeaderValue::from_static("Basic realm=\"statsvc\""),
    );
    response
}

/// Decode an `Authorization: Basic <base64(user:pass)>` header.
fn extract_basic(headers: &HeaderMap) -> Option<(String, String)> {
    let header = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let encoded = header.strip_prefix("Basic ")?.trim();

    let decoded = base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .ok()?;
    let decoded = String::from_utf8(decoded).ok()?;

    let (username, password) = decoded.split_once(':')?;
    if username.is_empty() {
        return None;
    }
    Some((username.to_string(), password.to_string()))
}
