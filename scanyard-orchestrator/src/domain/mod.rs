//! Scan job domain layer

pub mod entities;
pub mod value_objects;

pub use entities::*;
pub use value_objects::*;

// Re-export image types from core for convenience
pub use scanyard_core::domain::{
    AuditReport, ImageReference, ImageReferenceError, RegistryCredentials, VulnerabilityReport,
};
