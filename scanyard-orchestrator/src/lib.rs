//! Scanyard Orchestrator - asynchronous container image scan jobs
//!
//! Accepts scan requests, runs them one at a time on a background worker and
//! keeps each job's status and report in a scan store.
//!
//! # Architecture
//!
//! ```text
//! scanyard-orchestrator/
//! ├── presentation/     # HTTP layer
//! │   ├── controllers/  # Request handlers
//! │   ├── models.rs     # DTOs with OpenAPI schemas
//! │   └── routes.rs     # Router and middleware stack
//! ├── application/      # Scan pipeline, workflow, service façade
//! ├── infrastructure/   # Job queue + worker, scan stores
//! └── domain/           # Scan request, job, status, report
//! ```
//!
//! # API Endpoints
//!
//! | Endpoint | Method | Description |
//! |----------|--------|-------------|
//! | `/scans` | POST | Queue a scan |
//! | `/scans/{scan_id}/status` | GET | Get scan status |
//! | `/scans/{scan_id}` | GET | Get scan report |
//! | `/healthz` | GET | Liveness probe |
//! | `/version` | GET | Scanner versions |
//!
//! # Known limitations
//!
//! Pipeline stages run without timeouts. A hung `docker` or scanner process
//! stalls the single worker, and once the queue fills, submissions wait
//! until the HTTP request timeout fires.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

pub use application::{ScanPipeline, ScanningService};
pub use infrastructure::{DragonflyScanStore, InMemoryScanStore, ScanStore};
pub use presentation::{AppState, create_router};
