//! Capabilities consumed by the scan pipeline

use async_trait::async_trait;

use super::entities::{AuditReport, VulnerabilityReport};
use super::value_objects::{ImageReference, RegistryCredentials};

/// Container runtime able to fetch images and create local aliases.
#[async_trait]
pub trait ContainerRuntime: Send + Sync {
    /// Pull an image, authenticating when credentials are supplied.
    ///
    /// Returns only once the image is fully available locally.
    async fn pull(
        &self,
        image: &ImageReference,
        credentials: Option<&RegistryCredentials>,
    ) -> Result<(), RuntimeError>;

    /// Create a new, locally unique tag pointing at `image` and return it.
    async fn tag(&self, image: &ImageReference) -> Result<ImageReference, RuntimeError>;
}

/// Scanner producing a vulnerability inventory for an image.
#[async_trait]
pub trait VulnerabilityScanner: Send + Sync {
    fn name(&self) -> &'static str;

    async fn scan(&self, image: &ImageReference) -> Result<VulnerabilityReport, ScannerError>;
}

/// Scanner auditing an image's configuration against best practices.
#[async_trait]
pub trait AuditScanner: Send + Sync {
    fn name(&self) -> &'static str;

    async fn scan(&self, image: &ImageReference) -> Result<AuditReport, ScannerError>;
}

/// Container runtime errors
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("Container runtime '{0}' not found")]
    NotInstalled(String),

    #[error("Registry login to {registry} failed: {stderr}")]
    Login { registry: String, stderr: String },

    #[error("Failed to pull image {image}: {stderr}")]
    Pull { image: String, stderr: String },

    #[error("Failed to tag image {image} as {alias}: {stderr}")]
    Tag {
        image: String,
        alias: String,
        stderr: String,
    },

    #[error("Runtime I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while running an external scanner
#[derive(Debug, thiserror::Error)]
pub enum ScannerError {
    #[error("Scanner '{0}' not found in PATH")]
    NotInstalled(String),

    #[error("Scanner I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{scanner} exited with status {code:?}: {stderr}")]
    ExitStatus {
        scanner: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("Failed to parse {scanner} report: {message}")]
    Parse { scanner: String, message: String },
}
