//! Dockle image configuration auditor

pub mod executor;
pub mod output;

pub use executor::DockleScanner;
