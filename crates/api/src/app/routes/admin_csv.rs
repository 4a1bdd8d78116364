//! Admin CSV endpoints for the player resource: bulk upload, structure
//! validation, store reset, backend info, and a downloadable template.

use std::sync::Arc;

use axum::{
    extract::{Extension, Multipart},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::json;

use statsvc_players::csv::{EXPECTED_HEADERS, TEMPLATE};

use crate::app::errors::{self, json_error};
use crate::app::state::AppState;
use crate::context::AuthContext;

pub fn router() -> Router {
    Router::new()
        .route("/upload", post(upload))
        .route("/validate", post(validate))
        .route("/clear", delete(clear))
        .route("/info", get(info))
        .route("/template", get(template))
}

pub async fn upload(
    Extension(state): Extension<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
    multipart: Multipart,
) -> axum::response::Response {
    let bytes = match read_file_field(multipart).await {
        Ok(bytes) => bytes,
        Err(response) => return response,
    };

    if !statsvc_players::csv::validate_structure(bytes.as_slice()) {
        return json_error(
            StatusCode::BAD_REQUEST,
            "invalid_csv",
            format!("csv headers must be {EXPECTED_HEADERS:?}"),
        );
    }

    let players = match statsvc_players::csv::parse_reader(bytes.as_slice()) {
        Ok(players) => players,
        Err(e) => return json_error(StatusCode::BAD_REQUEST, "invalid_csv", e.to_string()),
    };

    tracing::info!(user = auth.username(), rows = players.len(), "csv upload");
    match state.players.import(players).await {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn validate(multipart: Multipart) -> axum::response::Response {
    let bytes = match read_file_field(multipart).await {
        Ok(bytes) => bytes,
        Err(response) => return response,
    };

    if statsvc_players::csv::validate_structure(bytes.as_slice()) {
        (
            StatusCode::OK,
            Json(json!({
                "valid": true,
                "message": "csv structure is valid",
            })),
        )
            .into_response()
    } else {
        (
            StatusCode::OK,
            Json(json!({
                "valid": false,
                "message": "csv headers do not match the expected structure",
                "expectedHeaders": EXPECTED_HEADERS,
            })),
        )
            .into_response()
    }
}

pub async fn clear(
    Extension(state): Extension<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
) -> axum::response::Response {
    match state.players.clear_all().await {
        Ok(deleted) => {
            tracing::info!(user = auth.username(), deleted, "player store cleared");
            (
                StatusCode::OK,
                Json(json!({
                    "success": true,
                    "deletedRecords": deleted,
                    "backend": state.backend,
                })),
            )
                .into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn info(Extension(state): Extension<Arc<AppState>>) -> axum::response::Response {
    (
        StatusCode::OK,
        Json(json!({
            "backend": state.backend,
            "resource": "players",
            "expectedHeaders": EXPECTED_HEADERS,
            "templateEndpoint": "/api/admin/csv/template",
        })),
    )
        .into_response()
}

pub async fn template() -> axum::response::Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"players-template.csv\"",
            ),
        ],
        TEMPLATE,
    )
        .into_response()
}

/// Pull the bytes of the `file` part out of a multipart body.
async fn read_file_field(mut multipart: Multipart) -> Result<Vec<u8>, axum::response::Response> {
    loop {
        let field = multipart.next_field().await.map_err(|e| {
            json_error(StatusCode::BAD_REQUEST, "invalid_multipart", e.to_string())
        })?;
        let Some(field) = field else {
            return Err(json_error(
                StatusCode::BAD_REQUEST,
                "missing_file",
                "multipart field 'file' is required",
            ));
        };
        if field.name() == Some("file") {
            let bytes = field.bytes().await.map_err(|e| {
                json_error(StatusCode::BAD_REQUEST, "invalid_multipart", e.to_string())
            })?;
            return Ok(bytes.to_vec());
        }
    }
}
