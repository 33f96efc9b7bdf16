//! In-process scan store backed by moka caches.
//!
//! Reports are kept as serialized JSON so that reads go through the same
//! decoding path as the Dragonfly store.

use async_trait::async_trait;
use moka::future::Cache;
use std::time::Duration;
use tracing::debug;

use super::store::{ScanStore, ScanStoreError};
use crate::domain::{ScanId, ScanReport, ScanStatus};

pub struct InMemoryScanStore {
    statuses: Cache<ScanId, ScanStatus>,
    reports: Cache<ScanId, Vec<u8>>,
}

impl InMemoryScanStore {
    pub fn new(report_ttl: Duration) -> Self {
        Self {
            statuses: Cache::builder().build(),
            reports: Cache::builder().time_to_live(report_ttl).build(),
        }
    }

    /// Store raw report bytes, bypassing serialization
    #[cfg(test)]
    async fn put_raw_report(&self, scan_id: &ScanId, data: &[u8]) {
        self.reports.insert(scan_id.clone(), data.to_vec()).await;
    }
}

#[async_trait]
impl ScanStore for InMemoryScanStore {
    async fn set_status(&self, scan_id: &ScanId, status: ScanStatus) -> Result<(), ScanStoreError> {
        self.statuses.insert(scan_id.clone(), status).await;
        debug!(scan_id = %scan_id, status = %status, "Scan status saved");
        Ok(())
    }

    async fn get_status(&self, scan_id: &ScanId) -> ScanStatus {
        self.statuses
            .get(scan_id)
            .await
            .unwrap_or(ScanStatus::Error)
    }

    async fn set_report(&self, scan_id: &ScanId, report: &ScanReport) -> Result<(), ScanStoreError> {
        let data = serde_json::to_vec(report)?;
        self.reports.insert(scan_id.clone(), data).await;
        Ok(())
    }

    async fn get_report(&self, scan_id: &ScanId) -> Result<ScanReport, ScanStoreError> {
        let data = self
            .reports
            .get(scan_id)
            .await
            .ok_or_else(|| ScanStoreError::NotFound(scan_id.clone()))?;

        Ok(serde_json::from_slice(&data)?)
    }

    async fn ping(&self) -> Result<(), ScanStoreError> {
        Ok(())
    }
}
