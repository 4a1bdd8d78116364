use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use statsvc_earthquakes::Earthquake;

use crate::app::errors;
use crate::app::state::AppState;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list).post(create))
        .route("/stats/avg-magnitude", get(avg_magnitude))
        .route("/magnitude-above", get(magnitude_above))
        .route("/search", get(search))
        .route("/:id", get(get_by_id).put(update).delete(delete_by_id))
}

pub async fn list(Extension(state): Extension<Arc<AppState>>) -> axum::response::Response {
    match state.earthquakes.get_all().await {
        Ok(quakes) => (StatusCode::OK, Json(quakes)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn get_by_id(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match state.earthquakes.get_by_id(&id).await {
        Ok(quake) => (StatusCode::OK, Json(quake)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn create(
    Extension(state): Extension<Arc<AppState>>,
    Json(body): Json<Earthquake>,
) -> axum::response::Response {
    match state.earthquakes.create(body).await {
        Ok(quake) => (StatusCode::CREATED, Json(quake)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// Full overwrite; the path id wins over whatever the body carries.
pub async fn update(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<String>,
    Json(mut body): Json<Earthquake>,
) -> axum::response::Response {
    body.id = id;
    match state.earthquakes.update(body).await {
        Ok(quake) => (StatusCode::OK, Json(quake)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn delete_by_id(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match state.earthquakes.delete(&id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn avg_magnitude(
    Extension(state): Extension<Arc<AppState>>,
) -> axum::response::Response {
    match state.earthquakes.avg_magnitude().await {
        Ok(avg) => (StatusCode::OK, Json(avg)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

#[derive(Deserialize)]
pub struct MagnitudeQuery {
    pub min: f64,
}

pub async fn magnitude_above(
    Extension(state): Extension<Arc<AppState>>,
    Query(query): Query<MagnitudeQuery>,
) -> axum::response::Response {
    match state.earthquakes.with_magnitude_above(query.min).await {
        Ok(quakes) => (StatusCode::OK, Json(quakes)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

#[derive(Deserialize)]
pub struct PlaceQuery {
    pub place: String,
}

pub async fn search(
    Extension(state): Extension<Arc<AppState>>,
    Query(query): Query<PlaceQuery>,
) -> axum::response::Response {
    match state.earthquakes.search_by_place(&query.place).await {
        Ok(quakes) => (StatusCode::OK, Json(quakes)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
