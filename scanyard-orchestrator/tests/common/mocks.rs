//! Mock implementations of the pipeline's capability traits

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

use scanyard_core::domain::{
    AuditIssue, AuditReport, AuditScanner, ContainerRuntime, ImageReference, RegistryCredentials,
    RuntimeError, ScannerError, Vulnerability, VulnerabilityReport, VulnerabilityScanner,
};
use scanyard_core::infrastructure::cache::CacheError;
use scanyard_orchestrator::domain::{ScanId, ScanReport, ScanStatus};
use scanyard_orchestrator::infrastructure::{InMemoryScanStore, ScanStore, ScanStoreError};

/// Ordered record of collaborator calls, shared between mocks
#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    /// Entries starting with `prefix`, prefix stripped
    pub fn with_prefix(&self, prefix: &str) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter_map(|e| e.strip_prefix(prefix).map(str::to_string))
            .collect()
    }
}

/// Mock container runtime
pub struct MockRuntime {
    log: CallLog,
    fail_pull: bool,
    fail_tag: bool,
    /// Pulls of this image panic
    panic_on: Option<String>,
    /// When set, every pull waits for one permit
    gate: Option<Arc<Semaphore>>,
    credentials_seen: Mutex<Vec<Option<RegistryCredentials>>>,
}

impl MockRuntime {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            fail_pull: false,
            fail_tag: false,
            panic_on: None,
            gate: None,
            credentials_seen: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_pull(mut self) -> Self {
        self.fail_pull = true;
        self
    }

    pub fn failing_tag(mut self) -> Self {
        self.fail_tag = true;
        self
    }

    pub fn panicking_on(mut self, image: &str) -> Self {
        self.panic_on = Some(image.to_string());
        self
    }

    pub fn gated(mut self, gate: Arc<Semaphore>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn credentials_seen(&self) -> Vec<Option<RegistryCredentials>> {
        self.credentials_seen.lock().unwrap().clone()
    }

    pub fn alias_for(image: &ImageReference) -> String {
        format!("re-tagged-{}:1", image.as_str().replace([':', '/'], "-"))
    }
}

#[async_trait]
impl ContainerRuntime for MockRuntime {
    async fn pull(
        &self,
        image: &ImageReference,
        credentials: Option<&RegistryCredentials>,
    ) -> Result<(), RuntimeError> {
        self.log.push(format!("pull:{image}"));
        self.credentials_seen
            .lock()
            .unwrap()
            .push(credentials.cloned());

        if let Some(gate) = &self.gate {
            gate.acquire().await.expect("gate closed").forget();
        }

        if self.panic_on.as_deref() == Some(image.as_str()) {
            panic!("runtime crashed pulling {image}");
        }

        if self.fail_pull {
            return Err(RuntimeError::Pull {
                image: image.to_string(),
                stderr: "manifest unknown".to_string(),
            });
        }
        Ok(())
    }

    async fn tag(&self, image: &ImageReference) -> Result<ImageReference, RuntimeError> {
        let alias = Self::alias_for(image);
        if self.fail_tag {
            return Err(RuntimeError::Tag {
                image: image.to_string(),
                alias,
                stderr: "no such image".to_string(),
            });
        }
        Ok(ImageReference::parse(alias).expect("valid alias"))
    }
}

pub fn sample_vulnerability_report(target: &str) -> VulnerabilityReport {
    VulnerabilityReport {
        target: target.to_string(),
        vulnerabilities: vec![Vulnerability {
            vulnerability_id: "CVE-2023-5363".to_string(),
            pkg_name: "libssl3".to_string(),
            installed_version: "3.1.2-r0".to_string(),
            fixed_version: Some("3.1.4-r0".to_string()),
            severity: "HIGH".to_string(),
            ..Default::default()
        }],
    }
}

pub fn sample_audit_report() -> AuditReport {
    AuditReport {
        summary: [("fatal".to_string(), 0), ("warn".to_string(), 1)]
            .into_iter()
            .collect(),
        details: vec![AuditIssue {
            code: "CIS-DI-0001".to_string(),
            title: "Create a user for the container".to_string(),
            level: "WARN".to_string(),
            alerts: vec!["Last user should not be root".to_string()],
        }],
    }
}

/// Mock vulnerability scanner
pub struct MockVulnerabilityScanner {
    log: CallLog,
    fail: bool,
}

impl MockVulnerabilityScanner {
    pub fn new(log: CallLog) -> Self {
        Self { log, fail: false }
    }

    pub fn failing(log: CallLog) -> Self {
        Self { log, fail: true }
    }
}

#[async_trait]
impl VulnerabilityScanner for MockVulnerabilityScanner {
    fn name(&self) -> &'static str {
        "mock-vuln"
    }

    async fn scan(&self, image: &ImageReference) -> Result<VulnerabilityReport, ScannerError> {
        self.log.push(format!("vuln:{image}"));
        if self.fail {
            return Err(ScannerError::ExitStatus {
                scanner: "mock-vuln".to_string(),
                code: Some(1),
                stderr: "database download failed".to_string(),
            });
        }
        Ok(sample_vulnerability_report(image.as_str()))
    }
}

/// Mock audit scanner
pub struct MockAuditScanner {
    log: CallLog,
    fail: bool,
}

impl MockAuditScanner {
    pub fn new(log: CallLog) -> Self {
        Self { log, fail: false }
    }

    pub fn failing(log: CallLog) -> Self {
        Self { log, fail: true }
    }
}

#[async_trait]
impl AuditScanner for MockAuditScanner {
    fn name(&self) -> &'static str {
        "mock-audit"
    }

    async fn scan(&self, image: &ImageReference) -> Result<AuditReport, ScannerError> {
        self.log.push(format!("audit:{image}"));
        if self.fail {
            return Err(ScannerError::NotInstalled("mock-audit".to_string()));
        }
        Ok(sample_audit_report())
    }
}

fn backend_down() -> ScanStoreError {
    ScanStoreError::Cache(CacheError::Connection("connection refused".to_string()))
}

/// In-memory store with injectable write failures
pub struct FailingStore {
    inner: InMemoryScanStore,
    /// Number of upcoming `set_status` calls that fail
    status_failures: AtomicUsize,
    fail_reports: bool,
}

impl FailingStore {
    pub fn new() -> Self {
        Self {
            inner: InMemoryScanStore::new(super::DEFAULT_TTL),
            status_failures: AtomicUsize::new(0),
            fail_reports: false,
        }
    }

    pub fn failing_status_writes(self, count: usize) -> Self {
        self.status_failures.store(count, Ordering::SeqCst);
        self
    }

    pub fn failing_reports(mut self) -> Self {
        self.fail_reports = true;
        self
    }
}

#[async_trait]
impl ScanStore for FailingStore {
    async fn set_status(&self, scan_id: &ScanId, status: ScanStatus) -> Result<(), ScanStoreError> {
        let failing = self
            .status_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(backend_down());
        }
        self.inner.set_status(scan_id, status).await
    }

    async fn get_status(&self, scan_id: &ScanId) -> ScanStatus {
        self.inner.get_status(scan_id).await
    }

    async fn set_report(&self, scan_id: &ScanId, report: &ScanReport) -> Result<(), ScanStoreError> {
        if self.fail_reports {
            return Err(backend_down());
        }
        self.inner.set_report(scan_id, report).await
    }

    async fn get_report(&self, scan_id: &ScanId) -> Result<ScanReport, ScanStoreError> {
        self.inner.get_report(scan_id).await
    }

    async fn ping(&self) -> Result<(), ScanStoreError> {
        self.inner.ping().await
    }
}
