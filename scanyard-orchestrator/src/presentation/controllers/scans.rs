use axum::{
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::Json,
};
use tracing::{debug, warn};

use crate::domain::{ScanId, ScanRequest};
use crate::infrastructure::job_queue::DispatchError;
use crate::infrastructure::scan_store::ScanStoreError;
use crate::presentation::controllers::AppState;
use crate::presentation::models::{
    CreateScanRequest, ErrorResponse, ScanAcceptedResponse, ScanStatusResponse,
};

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(ErrorResponse::new(message)))
}

/// POST /scans - Queue an image scan
#[utoipa::path(
    post,
    path = "/scans",
    request_body = CreateScanRequest,
    responses(
        (status = 200, description = "Scan queued", body = ScanAcceptedResponse),
        (status = 400, description = "Malformed request", body = ErrorResponse),
        (status = 503, description = "Service is shutting down or the scan store is unavailable", body = ErrorResponse)
    ),
    tag = "scans"
)]
pub async fn create_scan(
    State(state): State<AppState>,
    payload: Result<Json<CreateScanRequest>, JsonRejection>,
) -> Result<Json<ScanAcceptedResponse>, ApiError> {
    let Json(body) = payload.map_err(|e| {
        debug!(error = %e, "Rejected scan request body");
        api_error(StatusCode::BAD_REQUEST, "Failed to decode request params")
    })?;

    let request = ScanRequest::new(body.image, body.username, body.password)
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, e.to_string()))?;

    let scan_id = state
        .scanning_service
        .submit(request)
        .await
        .map_err(|e| {
            warn!(error = %e, "Scan submission refused");
            let message = match e {
                DispatchError::Closed => "Scan queue is closed",
                DispatchError::Store(_) => "Failed to record scan",
            };
            api_error(StatusCode::SERVICE_UNAVAILABLE, message)
        })?;

    Ok(Json(ScanAcceptedResponse { scan_id }))
}

/// GET /scans/{scan_id}/status - Get scan status
///
/// Unknown ids report `ERROR`.
#[utoipa::path(
    get,
    path = "/scans/{scan_id}/status",
    params(
        ("scan_id" = String, Path, description = "Scan ID")
    ),
    responses(
        (status = 200, description = "Current scan status", body = ScanStatusResponse)
    ),
    tag = "scans"
)]
pub async fn get_scan_status(
    State(state): State<AppState>,
    Path(scan_id): Path<String>,
) -> Json<ScanStatusResponse> {
    let status = state
        .scanning_service
        .get_status(&ScanId::from(scan_id))
        .await;

    Json(ScanStatusResponse { status })
}

/// GET /scans/{scan_id} - Get scan report
#[utoipa::path(
    get,
    path = "/scans/{scan_id}",
    params(
        ("scan_id" = String, Path, description = "Scan ID")
    ),
    responses(
        (status = 200, description = "Scan report", body = crate::domain::ScanReport),
        (status = 404, description = "Report not found or expired", body = ErrorResponse)
    ),
    tag = "scans"
)]
pub async fn get_scan_report(
    State(state): State<AppState>,
    Path(scan_id): Path<String>,
) -> Result<Json<crate::domain::ScanReport>, ApiError> {
    let scan_id = ScanId::from(scan_id);

    match state.scanning_service.get_report(&scan_id).await {
        Ok(report) => Ok(Json(report)),
        Err(ScanStoreError::NotFound(_)) => Err(api_error(
            StatusCode::NOT_FOUND,
            format!("No report found for scan {scan_id}"),
        )),
        Err(e) => {
            warn!(scan_id = %scan_id, error = %e, "Failed to read scan report");
            Err(api_error(
                StatusCode::NOT_FOUND,
                format!("Report for scan {scan_id} is unavailable"),
            ))
        }
    }
}
