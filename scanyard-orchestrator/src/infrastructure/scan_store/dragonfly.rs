use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use scanyard_core::infrastructure::cache::DragonflyCache;

use super::store::{ScanStore, ScanStoreError, report_key, status_key};
use crate::domain::{ScanId, ScanReport, ScanStatus};

/// Dragonfly-backed scan store with a configurable report retention window.
pub struct DragonflyScanStore {
    cache: Arc<DragonflyCache>,
    report_ttl: Duration,
}

impl DragonflyScanStore {
    pub fn new(cache: Arc<DragonflyCache>, report_ttl: Duration) -> Self {
        Self { cache, report_ttl }
    }
}

#[async_trait]
impl ScanStore for DragonflyScanStore {
    async fn set_status(&self, scan_id: &ScanId, status: ScanStatus) -> Result<(), ScanStoreError> {
        self.cache
            .set(&status_key(scan_id), status.as_str(), None)
            .await?;

        debug!(scan_id = %scan_id, status = %status, "Scan status saved to Dragonfly");
        Ok(())
    }

    async fn get_status(&self, scan_id: &ScanId) -> ScanStatus {
        match self.cache.get(&status_key(scan_id)).await {
            Ok(Some(value)) => value.parse().unwrap_or_else(|e| {
                warn!(scan_id = %scan_id, error = %e, "Stored scan status is unreadable");
                ScanStatus::Error
            }),
            Ok(None) => {
                debug!(scan_id = %scan_id, "Scan status not found in Dragonfly");
                ScanStatus::Error
            }
            Err(e) => {
                warn!(scan_id = %scan_id, error = %e, "Failed to read scan status");
                ScanStatus::Error
            }
        }
    }

    async fn set_report(&self, scan_id: &ScanId, report: &ScanReport) -> Result<(), ScanStoreError> {
        let json = serde_json::to_string(report)?;

        self.cache
            .set(&report_key(scan_id), &json, Some(self.report_ttl))
            .await?;

        tracing::info!(
            scan_id = %scan_id,
            "Scan report saved to Dragonfly with TTL {}s",
            self.report_ttl.as_secs()
        );
        Ok(())
    }

    async fn get_report(&self, scan_id: &ScanId) -> Result<ScanReport, ScanStoreError> {
        let json = self
            .cache
            .get(&report_key(scan_id))
            .await?
            .ok_or_else(|| ScanStoreError::NotFound(scan_id.clone()))?;

        Ok(serde_json::from_str(&json)?)
    }

    async fn ping(&self) -> Result<(), ScanStoreError> {
        Ok(self.cache.ping().await?)
    }
}
