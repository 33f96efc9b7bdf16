//! Scan pipeline: pull → re-tag (best effort) → vulnerability scan → audit scan
//!
//! Only the pull is fatal. A failed re-tag falls back to the original
//! reference, and a failed scanner leaves its report section empty.

use std::sync::Arc;

use tracing::{debug, error, info, instrument, warn};

use scanyard_core::domain::{
    AuditReport, AuditScanner, ContainerRuntime, RuntimeError, VulnerabilityReport,
    VulnerabilityScanner,
};

use crate::domain::{ScanReport, ScanRequest};

/// Errors that abort a scan.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Image provisioning failed: {0}")]
    Provisioning(#[from] RuntimeError),
}

/// Composes image provisioning and both scanners into one report.
#[derive(Clone)]
pub struct ScanPipeline {
    runtime: Arc<dyn ContainerRuntime>,
    vulnerability_scanner: Arc<dyn VulnerabilityScanner>,
    audit_scanner: Arc<dyn AuditScanner>,
}

impl ScanPipeline {
    pub fn new(
        runtime: Arc<dyn ContainerRuntime>,
        vulnerability_scanner: Arc<dyn VulnerabilityScanner>,
        audit_scanner: Arc<dyn AuditScanner>,
    ) -> Self {
        Self {
            runtime,
            vulnerability_scanner,
            audit_scanner,
        }
    }

    #[instrument(skip(self, request), fields(image_ref = %request.image))]
    pub async fn run(&self, request: &ScanRequest) -> Result<ScanReport, PipelineError> {
        self.runtime
            .pull(&request.image, request.credentials.as_ref())
            .await
            .map_err(|e| {
                error!(error = %e, "Image pull failed, aborting scan");
                e
            })?;

        // Scanners use the local alias so they never reach out to the registry
        let target = match self.runtime.tag(&request.image).await {
            Ok(alias) => {
                debug!(alias = %alias, "Scanning re-tagged image");
                alias
            }
            Err(e) => {
                warn!(error = %e, "Re-tag failed, scanning original reference");
                request.image.clone()
            }
        };

        let vulnerabilities = match self.vulnerability_scanner.scan(&target).await {
            Ok(report) => report,
            Err(e) => {
                warn!(
                    scanner = self.vulnerability_scanner.name(),
                    error = %e,
                    "Vulnerability scan failed, recording empty section"
                );
                VulnerabilityReport::default()
            }
        };

        let audit = match self.audit_scanner.scan(&target).await {
            Ok(report) => report,
            Err(e) => {
                warn!(
                    scanner = self.audit_scanner.name(),
                    error = %e,
                    "Audit scan failed, recording empty section"
                );
                AuditReport::default()
            }
        };

        info!(
            vulnerability_count = vulnerabilities.vulnerabilities.len(),
            audit_issue_count = audit.details.len(),
            "Scan pipeline finished"
        );

        Ok(ScanReport::new(vulnerabilities, audit))
    }
}
