//! Bounded scan job queue with a single background worker.
//!
//! Jobs run strictly one at a time in submission order. When the queue is
//! full, [`JobQueueHandle::submit`] waits for a free slot instead of
//! rejecting the job.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::application::pipeline::ScanPipeline;
use crate::application::workflow::{ScanWorkflow, WorkflowError};
use crate::domain::{ScanId, ScanJob, ScanProgress, ScanRequest};

/// Errors that can occur when submitting a scan.
#[derive(thiserror::Error, Debug)]
pub enum DispatchError {
    #[error("Scan queue is closed")]
    Closed,

    #[error("Failed to record scan: {0}")]
    Store(#[from] WorkflowError),
}

/// Handle that allows HTTP handlers to push jobs into the worker queue.
#[derive(Clone)]
pub struct JobQueueHandle {
    sender: mpsc::Sender<ScanJob>,
    workflow: Arc<ScanWorkflow>,
}

impl JobQueueHandle {
    /// Create the queue, returning the producer handle and the worker's receiver.
    pub fn new(capacity: usize, workflow: Arc<ScanWorkflow>) -> (Self, mpsc::Receiver<ScanJob>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self { sender, workflow }, receiver)
    }

    /// Accept a scan request and return its id without waiting for the scan.
    ///
    /// A queue slot is reserved before the NEW status is written, so a caller
    /// that gives up while waiting for capacity leaves no record behind. If
    /// the NEW status cannot be written the slot is released and the job is
    /// never queued.
    ///
    /// NEW must be stored before the job is sent, otherwise it could overwrite
    /// the worker's IN-PROGRESS. A caller cancelled while the NEW write is in
    /// flight can therefore leave a NEW record for an id it never received.
    pub async fn submit(&self, request: ScanRequest) -> Result<ScanId, DispatchError> {
        let permit = self.sender.reserve().await.map_err(|_| {
            warn!("Rejected scan submission, queue is closed");
            DispatchError::Closed
        })?;

        let job = ScanJob::new(request);
        let scan_id = job.scan_id().clone();

        if let Err(e) = self.workflow.register(&scan_id).await {
            error!(scan_id = %scan_id, error = %e, "Failed to record NEW status, dropping job");
            return Err(e.into());
        }

        permit.send(job);
        info!(
            scan_id = %scan_id,
            free_slots = self.sender.capacity(),
            "Scan job queued"
        );
        Ok(scan_id)
    }
}

/// Shared dependencies required by the scan worker.
#[derive(Clone)]
pub struct ScanWorkerContext {
    pub pipeline: Arc<ScanPipeline>,
    pub workflow: Arc<ScanWorkflow>,
}

enum Next {
    Job(ScanJob),
    Shutdown,
    Drained,
}

/// Spawn the single worker that consumes queued jobs.
///
/// Once `shutdown` fires the queue stops accepting new jobs; the worker
/// finishes everything already queued and then exits.
pub fn spawn_scan_worker(
    context: ScanWorkerContext,
    mut receiver: mpsc::Receiver<ScanJob>,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Scan worker started");
        let mut draining = false;

        loop {
            let next = tokio::select! {
                _ = shutdown.cancelled(), if !draining => Next::Shutdown,
                job = receiver.recv() => job.map_or(Next::Drained, Next::Job),
            };

            match next {
                Next::Job(job) => run_isolated(&context, job).await,
                Next::Shutdown => {
                    info!(pending = receiver.len(), "Shutdown requested, draining scan queue");
                    receiver.close();
                    draining = true;
                }
                Next::Drained => break,
            }
        }

        warn!("Scan worker exiting");
    })
}

/// Run one job in its own task so a panicking adapter fails that job only.
/// The worker still waits for the task, keeping jobs sequential.
async fn run_isolated(ctx: &ScanWorkerContext, job: ScanJob) {
    let scan_id = job.scan_id().clone();
    let task = tokio::spawn(process_job(ctx.clone(), job));

    if let Err(e) = task.await {
        error!(scan_id = %scan_id, error = %e, "Scan task aborted");
        if let Err(e) = ctx.workflow.abort(&scan_id).await {
            error!(scan_id = %scan_id, error = %e, "Failed to mark aborted scan as ERROR");
        }
    }
}

async fn process_job(ctx: ScanWorkerContext, job: ScanJob) {
    let mut progress = ScanProgress::new(job.scan_id().clone());
    let scan_id = progress.scan_id.clone();

    info!(scan_id = %scan_id, image_ref = %job.request().image, "Processing scan job");

    // ── Workflow: New → InProgress ──────────────────────────────────
    if let Err(e) = ctx.workflow.start(&mut progress).await {
        error!(scan_id = %scan_id, error = %e, "Failed to transition scan to IN-PROGRESS");
    }

    match ctx.pipeline.run(job.request()).await {
        Ok(report) => {
            // ── Workflow: InProgress → Completed ────────────────────
            if let Err(e) = ctx.workflow.complete(&mut progress, &report).await {
                error!(scan_id = %scan_id, error = %e, "Failed to complete scan");

                if !progress.status.is_terminal()
                    && let Err(e) = ctx.workflow.fail(&mut progress, &e.to_string()).await
                {
                    error!(scan_id = %scan_id, error = %e, "Failed to transition scan to ERROR");
                }
            }
        }
        Err(e) => {
            // ── Workflow: InProgress → Error ────────────────────────
            if let Err(e) = ctx.workflow.fail(&mut progress, &e.to_string()).await {
                error!(scan_id = %scan_id, error = %e, "Failed to transition scan to ERROR");
            }
        }
    }
}
