//! Scan job entities

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use scanyard_core::domain::{
    AuditReport, ImageReference, ImageReferenceError, RegistryCredentials, VulnerabilityReport,
};

use super::value_objects::{ScanId, ScanStatus, ScanTransitionError};

/// Version stamped on every report
pub const REPORT_VERSION: &str = "1";

/// What to scan and how to authenticate against its registry
#[derive(Debug, Clone, PartialEq)]
pub struct ScanRequest {
    pub image: ImageReference,
    pub credentials: Option<RegistryCredentials>,
}

impl ScanRequest {
    /// Build a request from raw submission fields.
    ///
    /// Credentials are kept only when both username and password are present.
    pub fn new(
        image: impl Into<String>,
        username: Option<String>,
        password: Option<String>,
    ) -> Result<Self, ImageReferenceError> {
        Ok(Self {
            image: ImageReference::parse(image)?,
            credentials: RegistryCredentials::from_parts(username, password),
        })
    }
}

/// One unit of scan work. Immutable once created.
#[derive(Debug, Clone)]
pub struct ScanJob {
    scan_id: ScanId,
    request: ScanRequest,
}

impl ScanJob {
    pub fn new(request: ScanRequest) -> Self {
        Self {
            scan_id: ScanId::generate(),
            request,
        }
    }

    pub fn scan_id(&self) -> &ScanId {
        &self.scan_id
    }

    pub fn request(&self) -> &ScanRequest {
        &self.request
    }
}

/// Worker-side view of a job's lifecycle.
///
/// Status changes go through [`ScanProgress::transition`], which enforces the
/// state machine defined on [`ScanStatus`].
#[derive(Debug, Clone)]
pub struct ScanProgress {
    pub scan_id: ScanId,
    pub status: ScanStatus,
}

impl ScanProgress {
    pub fn new(scan_id: ScanId) -> Self {
        Self {
            scan_id,
            status: ScanStatus::New,
        }
    }

    pub fn transition(&mut self, target: ScanStatus) -> Result<(), ScanTransitionError> {
        if !self.status.can_transition_to(&target) {
            return Err(ScanTransitionError {
                from: self.status,
                to: target,
            });
        }
        self.status = target;
        Ok(())
    }
}

/// Combined output of both scanners for one job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ScanReport {
    #[schema(example = "1")]
    pub version: String,
    pub vulnerabilities: VulnerabilityReport,
    pub audit: AuditReport,
}

impl ScanReport {
    pub fn new(vulnerabilities: VulnerabilityReport, audit: AuditReport) -> Self {
        Self {
            version: REPORT_VERSION.to_string(),
            vulnerabilities,
            audit,
        }
    }
}
