//! HTTP application wiring (axum router + backend wiring).
//!
//! - `state.rs`: backend selection and service construction
//! - `routes/`: HTTP routes + handlers (one file per resource)
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router};

use crate::middleware;

pub mod errors;
pub mod routes;
pub mod state;

/// Build the full HTTP router (public entrypoint used by `main.rs` and the
/// black-box tests). Every route, `/health` included, passes through the
/// auth middleware; the route table decides which ones are public.
pub fn build_app(state: Arc<state::AppState>) -> Router {
    Router::new()
        .route("/health", axum::routing::get(routes::system::health))
        .nest("/api", routes::router())
        .layer(Extension(state.clone()))
        .layer(axum::middleware::from_fn_with_state(
            state,
            middleware::auth_middleware,
        ))
}
