//! Scanyard - Main application library
//!
//! This is the main binary crate that wires together all modules

mod app;

pub use app::{AppHandle, create_app};
pub use scanyard_core::{Config, init_tracing};

// Re-export for convenience
pub use scanyard_core;
pub use scanyard_orchestrator;
pub use scanyard_scanners;
