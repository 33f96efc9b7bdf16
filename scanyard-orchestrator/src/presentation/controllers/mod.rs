//! Orchestrator API controllers

pub mod health;
pub mod scans;

use std::path::PathBuf;
use std::sync::Arc;

use crate::application::service::ScanningService;

/// Application state shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub scanning_service: Arc<ScanningService>,
    /// JSON file served at `/version`
    pub versions_file: Arc<PathBuf>,
}
