//! HTTP routes, one module per resource.

use axum::Router;

pub mod admin_csv;
pub mod earthquakes;
pub mod players;
pub mod system;

pub fn router() -> Router {
    Router::new()
        .nest("/earthquakes", earthquakes::router())
        .nest("/players", players::router())
        .nest("/admin/csv", admin_csv::router())
}
