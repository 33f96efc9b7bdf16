//! Orchestrator application layer

pub mod pipeline;
pub mod service;
pub mod workflow;

pub use pipeline::{PipelineError, ScanPipeline};
pub use service::ScanningService;
pub use workflow::{ScanWorkflow, WorkflowError};
