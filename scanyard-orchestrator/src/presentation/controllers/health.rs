use axum::{
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Json, Response},
};
use tracing::warn;

use crate::presentation::controllers::AppState;
use crate::presentation::models::ErrorResponse;

/// GET / - Service banner
pub async fn root() -> &'static str {
    concat!("scanyard ", env!("CARGO_PKG_VERSION"), " - container image scanning service")
}

/// GET /healthz - Liveness probe
#[utoipa::path(
    get,
    path = "/healthz",
    responses(
        (status = 200, description = "Service is alive", body = String)
    ),
    tag = "health"
)]
pub async fn healthz() -> &'static str {
    "OK"
}

/// GET /version - Versions of the bundled scanners and their databases
#[utoipa::path(
    get,
    path = "/version",
    responses(
        (status = 200, description = "Contents of the versions file"),
        (status = 404, description = "Versions file not available", body = ErrorResponse)
    ),
    tag = "health"
)]
pub async fn version(State(state): State<AppState>) -> Response {
    match tokio::fs::read_to_string(state.versions_file.as_ref()).await {
        Ok(contents) => ([(header::CONTENT_TYPE, "application/json")], contents).into_response(),
        Err(e) => {
            warn!(
                path = %state.versions_file.display(),
                error = %e,
                "Failed to read versions file"
            );
            (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse::new("Version information is not available")),
            )
                .into_response()
        }
    }
}

/// Fallback for unmatched routes
pub async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "404 Not Found")
}
