//! Scanning service façade
//!
//! The only entry point the HTTP layer talks to. Owns the job queue, the
//! worker task and the scan store for the lifetime of the process.

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::application::pipeline::ScanPipeline;
use crate::application::workflow::ScanWorkflow;
use crate::domain::{ScanId, ScanReport, ScanRequest, ScanStatus};
use crate::infrastructure::job_queue::{
    DispatchError, JobQueueHandle, ScanWorkerContext, spawn_scan_worker,
};
use crate::infrastructure::scan_store::{ScanStore, ScanStoreError};

pub struct ScanningService {
    queue: JobQueueHandle,
    store: Arc<dyn ScanStore>,
    shutdown: CancellationToken,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl ScanningService {
    /// Build the queue and spawn the worker. Must be called inside a Tokio runtime.
    pub fn start(store: Arc<dyn ScanStore>, pipeline: ScanPipeline, queue_capacity: usize) -> Self {
        let workflow = Arc::new(ScanWorkflow::new(store.clone()));
        let (queue, receiver) = JobQueueHandle::new(queue_capacity, workflow.clone());
        let shutdown = CancellationToken::new();

        let worker = spawn_scan_worker(
            ScanWorkerContext {
                pipeline: Arc::new(pipeline),
                workflow,
            },
            receiver,
            shutdown.clone(),
        );

        info!(queue_capacity, "Scanning service started");

        Self {
            queue,
            store,
            shutdown,
            worker: Mutex::new(Some(worker)),
        }
    }

    /// Queue a scan and return its id. Waits while the queue is full.
    pub async fn submit(&self, request: ScanRequest) -> Result<ScanId, DispatchError> {
        self.queue.submit(request).await
    }

    pub async fn get_status(&self, scan_id: &ScanId) -> ScanStatus {
        self.store.get_status(scan_id).await
    }

    pub async fn get_report(&self, scan_id: &ScanId) -> Result<ScanReport, ScanStoreError> {
        self.store.get_report(scan_id).await
    }

    /// Stop accepting scans and wait for the worker to finish the queued ones.
    ///
    /// Calling this more than once is harmless.
    pub async fn shutdown(&self) {
        self.shutdown.cancel();

        let Some(worker) = self.worker.lock().await.take() else {
            return;
        };

        if let Err(e) = worker.await {
            error!(error = %e, "Scan worker terminated abnormally");
        }
        info!("Scanning service stopped");
    }
}
