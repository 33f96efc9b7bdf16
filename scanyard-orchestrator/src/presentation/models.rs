//! API request/response models

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{ScanId, ScanStatus};

/// Request to scan a container image
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateScanRequest {
    /// Image reference (`registry/repo:tag` or digest)
    #[schema(example = "alpine:latest")]
    pub image: String,

    /// Registry username, used only together with `password`
    #[serde(default)]
    pub username: Option<String>,

    /// Registry password, used only together with `username`
    #[serde(default)]
    pub password: Option<String>,
}

/// Scan accepted for processing
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ScanAcceptedResponse {
    pub scan_id: ScanId,
}

/// Current status of a scan
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ScanStatusResponse {
    pub status: ScanStatus,
}

/// Error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = "Failed to decode request params")]
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
