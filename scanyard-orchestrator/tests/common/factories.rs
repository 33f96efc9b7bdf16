//! Factories and polling helpers

use std::sync::Arc;
use std::time::Duration;

use scanyard_orchestrator::application::{ScanPipeline, ScanningService};
use scanyard_orchestrator::domain::{ScanId, ScanRequest, ScanStatus};
use scanyard_orchestrator::infrastructure::{InMemoryScanStore, ScanStore};

use super::mocks::{CallLog, MockAuditScanner, MockRuntime, MockVulnerabilityScanner};

pub const DEFAULT_TTL: Duration = Duration::from_secs(60);

pub fn request(image: &str) -> ScanRequest {
    ScanRequest::new(image, None, None).expect("valid image reference")
}

pub fn pipeline(
    runtime: MockRuntime,
    vulnerability_scanner: MockVulnerabilityScanner,
    audit_scanner: MockAuditScanner,
) -> ScanPipeline {
    ScanPipeline::new(
        Arc::new(runtime),
        Arc::new(vulnerability_scanner),
        Arc::new(audit_scanner),
    )
}

/// Pipeline whose collaborators all succeed
pub fn healthy_pipeline(log: &CallLog) -> ScanPipeline {
    pipeline(
        MockRuntime::new(log.clone()),
        MockVulnerabilityScanner::new(log.clone()),
        MockAuditScanner::new(log.clone()),
    )
}

pub fn service(pipeline: ScanPipeline, capacity: usize, report_ttl: Duration) -> Arc<ScanningService> {
    service_with_store(pipeline, capacity, Arc::new(InMemoryScanStore::new(report_ttl)))
}

pub fn service_with_store(
    pipeline: ScanPipeline,
    capacity: usize,
    store: Arc<dyn ScanStore>,
) -> Arc<ScanningService> {
    Arc::new(ScanningService::start(store, pipeline, capacity))
}

/// Poll until the scan reaches `expected`, panicking after five seconds.
pub async fn wait_for_status(service: &ScanningService, scan_id: &ScanId, expected: ScanStatus) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    loop {
        let status = service.get_status(scan_id).await;
        if status == expected {
            return;
        }
        assert!(
            tokio::time::Instant::now() < deadline,
            "scan {scan_id} stuck at {status}, expected {expected}"
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}
