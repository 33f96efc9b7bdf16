//! Process-backed adapters

pub mod docker;
pub mod dockle;
pub mod process;
pub mod trivy;
