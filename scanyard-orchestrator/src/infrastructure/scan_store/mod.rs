//! Scan status and report persistence

pub mod dragonfly;
pub mod memory;
pub mod store;

pub use dragonfly::DragonflyScanStore;
pub use memory::InMemoryScanStore;
pub use store::{ScanStore, ScanStoreError, report_key, status_key};
