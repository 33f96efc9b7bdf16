use async_trait::async_trait;

use scanyard_core::infrastructure::cache::CacheError;

use crate::domain::{ScanId, ScanReport, ScanStatus};

/// Scan persistence errors.
#[derive(Debug, thiserror::Error)]
pub enum ScanStoreError {
    #[error("Report not found for scan {0}")]
    NotFound(ScanId),
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Cache operation failed: {0}")]
    Cache(#[from] CacheError),
}

/// Scan status and report storage.
///
/// Status records never expire. Reports expire after the store's retention
/// window, counted from the most recent write.
#[async_trait]
pub trait ScanStore: Send + Sync {
    /// Overwrite the status of a scan.
    async fn set_status(&self, scan_id: &ScanId, status: ScanStatus) -> Result<(), ScanStoreError>;

    /// Read the status of a scan.
    ///
    /// Absent records, backend failures and unreadable values all read as
    /// [`ScanStatus::Error`].
    async fn get_status(&self, scan_id: &ScanId) -> ScanStatus;

    /// Store a report, (re)starting its retention window.
    async fn set_report(&self, scan_id: &ScanId, report: &ScanReport) -> Result<(), ScanStoreError>;

    /// Read a report, failing with [`ScanStoreError::NotFound`] once it expired.
    async fn get_report(&self, scan_id: &ScanId) -> Result<ScanReport, ScanStoreError>;

    /// Check that the backend is reachable.
    async fn ping(&self) -> Result<(), ScanStoreError>;
}

pub fn status_key(scan_id: &ScanId) -> String {
    format!("scans:{}:status", scan_id)
}

pub fn report_key(scan_id: &ScanId) -> String {
    format!("scans:{}:report", scan_id)
}
