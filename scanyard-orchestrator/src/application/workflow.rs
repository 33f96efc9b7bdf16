//! Scan Workflow — state-machine controller for scan jobs.
//!
//! Every status change goes through [`ScanWorkflow`], which validates the
//! transition against the state machine defined on [`ScanStatus`] and
//! persists the new status.
//!
//! ```text
//! Dispatcher         ScanWorkflow          ScanStore
//!     │                   │                    │
//!     ├─ register() ─────►│── set_status NEW ─►│
//!     │                   │                    │
//!     │  (worker picks)   │                    │
//!     ├─ start() ────────►│── set_status ─────►│
//!     │                   │                    │
//!     ├─ complete() ─────►│── set_report ─────►│
//!     │                   │── set_status ─────►│
//! ```
//!
//! The in-memory [`ScanProgress`] moves before the write is attempted, so a
//! failed write leaves the stored status behind the worker's view rather
//! than blocking the job.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::{ScanId, ScanProgress, ScanReport, ScanStatus, ScanTransitionError};
use crate::infrastructure::scan_store::{ScanStore, ScanStoreError};

/// Errors from the workflow layer.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("Invalid state transition: {0}")]
    InvalidTransition(#[from] ScanTransitionError),

    #[error("Persistence error: {0}")]
    Store(#[from] ScanStoreError),
}

/// Centralised scan lifecycle controller.
#[derive(Clone)]
pub struct ScanWorkflow {
    store: Arc<dyn ScanStore>,
}

impl ScanWorkflow {
    pub fn new(store: Arc<dyn ScanStore>) -> Self {
        Self { store }
    }

    /// Record a freshly submitted scan as [`ScanStatus::New`].
    pub async fn register(&self, scan_id: &ScanId) -> Result<(), WorkflowError> {
        self.store.set_status(scan_id, ScanStatus::New).await?;
        info!(scan_id = %scan_id, "Scan registered as NEW");
        Ok(())
    }

    /// Transition a scan to [`ScanStatus::InProgress`] and persist.
    pub async fn start(&self, progress: &mut ScanProgress) -> Result<(), WorkflowError> {
        self.advance(progress, ScanStatus::InProgress).await?;
        info!(scan_id = %progress.scan_id, "Scan transitioned to IN-PROGRESS");
        Ok(())
    }

    /// Persist the report, then transition to [`ScanStatus::Completed`].
    ///
    /// When the report cannot be written the status is left untouched so the
    /// caller can fail the scan instead.
    pub async fn complete(
        &self,
        progress: &mut ScanProgress,
        report: &ScanReport,
    ) -> Result<(), WorkflowError> {
        if !progress.status.can_transition_to(&ScanStatus::Completed) {
            return Err(ScanTransitionError {
                from: progress.status,
                to: ScanStatus::Completed,
            }
            .into());
        }

        self.store.set_report(&progress.scan_id, report).await?;
        self.advance(progress, ScanStatus::Completed).await?;

        info!(scan_id = %progress.scan_id, "Scan transitioned to COMPLETED");
        Ok(())
    }

    /// Transition a scan to [`ScanStatus::Error`] and persist.
    pub async fn fail(&self, progress: &mut ScanProgress, error: &str) -> Result<(), WorkflowError> {
        self.advance(progress, ScanStatus::Error).await?;
        warn!(scan_id = %progress.scan_id, error, "Scan transitioned to ERROR");
        Ok(())
    }

    /// Record [`ScanStatus::Error`] for a scan whose task died mid-run.
    ///
    /// The task's in-memory progress is gone, so the status is written
    /// without a transition check.
    pub async fn abort(&self, scan_id: &ScanId) -> Result<(), WorkflowError> {
        self.store.set_status(scan_id, ScanStatus::Error).await?;
        warn!(scan_id = %scan_id, "Aborted scan marked as ERROR");
        Ok(())
    }

    async fn advance(
        &self,
        progress: &mut ScanProgress,
        target: ScanStatus,
    ) -> Result<(), WorkflowError> {
        progress.transition(target)?;
        self.store.set_status(&progress.scan_id, target).await?;
        Ok(())
    }
}
