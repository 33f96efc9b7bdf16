//! Orchestrator infrastructure: scan persistence and the job queue

pub mod job_queue;
pub mod scan_store;

pub use job_queue::{DispatchError, JobQueueHandle, ScanWorkerContext, spawn_scan_worker};
pub use scan_store::{DragonflyScanStore, InMemoryScanStore, ScanStore, ScanStoreError};
