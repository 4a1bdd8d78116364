use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use statsvc_players::Player;

use crate::app::errors;
use crate::app::state::AppState;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list).post(create))
        .route("/team/:team", get(by_team))
        .route("/team/:team/position/:position", get(by_team_and_position))
        .route("/position/:position", get(by_position))
        .route("/age-range", get(by_age_range))
        .route("/height-above", get(by_min_height))
        .route("/weight-above", get(by_min_weight))
        .route("/search", get(search))
        .route("/bmi-above", get(bmi_above))
        .route("/youngest", get(youngest))
        .route("/oldest", get(oldest))
        .route("/top10/tallest", get(top10_tallest))
        .route("/top10/heaviest", get(top10_heaviest))
        .route("/stats/average-age", get(average_age))
        .route("/stats/average-height", get(average_height))
        .route("/stats/average-weight", get(average_weight))
        .route("/stats/height", get(height_stats))
        .route("/stats/weight", get(weight_stats))
        .route("/stats/teams", get(count_by_team))
        .route("/stats/positions", get(count_by_position))
        .route("/stats/team-composition/:team", get(team_composition))
        .route("/stats/overall", get(overall))
        .route("/:id", get(get_by_id).put(update).delete(delete_by_id))
}

// ----- CRUD -----

pub async fn list(Extension(state): Extension<Arc<AppState>>) -> axum::response::Response {
    match state.players.get_all().await {
        Ok(players) => (StatusCode::OK, Json(players)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn get_by_id(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match state.players.get_by_id(&id).await {
        Ok(player) => (StatusCode::OK, Json(player)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn create(
    Extension(state): Extension<Arc<AppState>>,
    Json(body): Json<Player>,
) -> axum::response::Response {
    match state.players.create(body).await {
        Ok(player) => (StatusCode::CREATED, Json(player)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// Full overwrite; the path id wins over whatever the body carries.
pub async fn update(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<Player>,
) -> axum::response::Response {
    match state.players.update(body.with_id(id)).await {
        Ok(player) => (StatusCode::OK, Json(player)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn delete_by_id(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match state.players.delete(&id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

// ----- Filters -----

pub async fn by_team(
    Extension(state): Extension<Arc<AppState>>,
    Path(team): Path<String>,
) -> axum::response::Response {
    match state.players.by_team(&team).await {
        Ok(players) => (StatusCode::OK, Json(players)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn by_position(
    Extension(state): Extension<Arc<AppState>>,
    Path(position): Path<String>,
) -> axum::response::Response {
    match state.players.by_position(&position).await {
        Ok(players) => (StatusCode::OK, Json(players)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn by_team_and_position(
    Extension(state): Extension<Arc<AppState>>,
    Path((team, position)): Path<(String, String)>,
) -> axum::response::Response {
    match state.players.by_team_and_position(&team, &position).await {
        Ok(players) => (StatusCode::OK, Json(players)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgeRangeQuery {
    pub min_age: f64,
    pub max_age: f64,
}

pub async fn by_age_range(
    Extension(state): Extension<Arc<AppState>>,
    Query(query): Query<AgeRangeQuery>,
) -> axum::response::Response {
    match state.players.by_age_range(query.min_age, query.max_age).await {
        Ok(players) => (StatusCode::OK, Json(players)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

#[derive(Deserialize)]
pub struct MinQuery {
    pub min: i32,
}

pub async fn by_min_height(
    Extension(state): Extension<Arc<AppState>>,
    Query(query): Query<MinQuery>,
) -> axum::response::Response {
    match state.players.by_min_height(query.min).await {
        Ok(players) => (StatusCode::OK, Json(players)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn by_min_weight(
    Extension(state): Extension<Arc<AppState>>,
    Query(query): Query<MinQuery>,
) -> axum::response::Response {
    match state.players.by_min_weight(query.min).await {
        Ok(players) => (StatusCode::OK, Json(players)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

#[derive(Deserialize)]
pub struct NameQuery {
    pub name: String,
}

pub async fn search(
    Extension(state): Extension<Arc<AppState>>,
    Query(query): Query<NameQuery>,
) -> axum::response::Response {
    match state.players.search_by_name(&query.name).await {
        Ok(players) => (StatusCode::OK, Json(players)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

#[derive(Deserialize)]
pub struct BmiQuery {
    pub threshold: f64,
}

pub async fn bmi_above(
    Extension(state): Extension<Arc<AppState>>,
    Query(query): Query<BmiQuery>,
) -> axum::response::Response {
    match state.players.with_bmi_above(query.threshold).await {
        Ok(players) => (StatusCode::OK, Json(players)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn youngest(Extension(state): Extension<Arc<AppState>>) -> axum::response::Response {
    match state.players.youngest().await {
        Ok(players) => (StatusCode::OK, Json(players)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn oldest(Extension(state): Extension<Arc<AppState>>) -> axum::response::Response {
    match state.players.oldest().await {
        Ok(players) => (StatusCode::OK, Json(players)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn top10_tallest(
    Extension(state): Extension<Arc<AppState>>,
) -> axum::response::Response {
    match state.players.top10_tallest().await {
        Ok(players) => (StatusCode::OK, Json(players)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn top10_heaviest(
    Extension(state): Extension<Arc<AppState>>,
) -> axum::response::Response {
    match state.players.top10_heaviest().await {
        Ok(players) => (StatusCode::OK, Json(players)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

// ----- Statistics -----

pub async fn average_age(Extension(state): Extension<Arc<AppState>>) -> axum::response::Response {
    match state.players.average_age().await {
        Ok(avg) => (StatusCode::OK, Json(avg)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn average_height(
    Extension(state): Extension<Arc<AppState>>,
) -> axum::response::Response {
    match state.players.average_height().await {
        Ok(avg) => (StatusCode::OK, Json(avg)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn average_weight(
    Extension(state): Extension<Arc<AppState>>,
) -> axum::response::Response {
    match state.players.average_weight().await {
        Ok(avg) => (StatusCode::OK, Json(avg)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn height_stats(Extension(state): Extension<Arc<AppState>>) -> axum::response::Response {
    match state.players.height_stats().await {
        Ok(stats) => (StatusCode::OK, Json(stats)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn weight_stats(Extension(state): Extension<Arc<AppState>>) -> axum::response::Response {
    match state.players.weight_stats().await {
        Ok(stats) => (StatusCode::OK, Json(stats)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn count_by_team(
    Extension(state): Extension<Arc<AppState>>,
) -> axum::response::Response {
    match state.players.count_by_team().await {
        Ok(counts) => (StatusCode::OK, Json(counts)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn count_by_position(
    Extension(state): Extension<Arc<AppState>>,
) -> axum::response::Response {
    match state.players.count_by_position().await {
        Ok(counts) => (StatusCode::OK, Json(counts)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn team_composition(
    Extension(state): Extension<Arc<AppState>>,
    Path(team): Path<String>,
) -> axum::response::Response {
    match state.players.team_statistics(&team).await {
        Ok(stats) => (StatusCode::OK, Json(stats)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn overall(Extension(state): Extension<Arc<AppState>>) -> axum::response::Response {
    match state.players.overall_statistics().await {
        Ok(stats) => (StatusCode::OK, Json(stats)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
