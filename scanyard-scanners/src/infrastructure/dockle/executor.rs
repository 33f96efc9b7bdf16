//! Dockle image audit executor

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, error, instrument};

use scanyard_core::config::DockleConfig;
use scanyard_core::domain::{AuditReport, AuditScanner, ImageReference, ScannerError};

use super::output::parse_report;
use crate::infrastructure::process::{self, SpawnFailure};

const SCANNER_NAME: &str = "dockle";

/// Dockle scanner
pub struct DockleScanner {
    config: DockleConfig,
}

impl DockleScanner {
    pub fn new(config: DockleConfig) -> Self {
        Self { config }
    }

    /// Check if Dockle is installed and accessible
    #[instrument(skip(self))]
    pub async fn check_installation(&self) -> Result<String, ScannerError> {
        let version = process::tool_version(&self.config.executable)
            .await
            .map_err(|e| self.spawn_error(e))?;
        debug!(version = %version, "Dockle found");
        Ok(version)
    }

    fn spawn_error(&self, failure: SpawnFailure) -> ScannerError {
        match failure {
            SpawnFailure::NotFound => ScannerError::NotInstalled(self.config.executable.clone()),
            SpawnFailure::Io(e) => ScannerError::Io(e),
        }
    }
}

#[async_trait]
impl AuditScanner for DockleScanner {
    fn name(&self) -> &'static str {
        SCANNER_NAME
    }

    #[instrument(skip(self), fields(image_ref = %image))]
    async fn scan(&self, image: &ImageReference) -> Result<AuditReport, ScannerError> {
        tokio::fs::create_dir_all(&self.config.report_dir).await?;

        let report_file = tempfile::Builder::new()
            .prefix("dockle_report_")
            .suffix(".json")
            .tempfile_in(&self.config.report_dir)?;

        let mut cmd = Command::new(&self.config.executable);
        cmd.arg("--format")
            .arg("json")
            .arg("--output")
            .arg(report_file.path())
            .arg(image.as_str());

        debug!(command = ?cmd, "Executing Dockle");
        let output = process::run(&mut cmd, None)
            .await
            .map_err(|e| self.spawn_error(e))?;

        let stderr = process::stderr_text(&output);
        if !output.status.success() {
            error!(
                exit_code = output.status.code(),
                stdout = %process::stdout_text(&output),
                stderr = %stderr,
                "Dockle execution failed"
            );
            return Err(ScannerError::ExitStatus {
                scanner: SCANNER_NAME.to_string(),
                code: output.status.code(),
                stderr,
            });
        }

        let data = tokio::fs::read(report_file.path()).await?;
        let report = parse_report(&data).map_err(|e| ScannerError::Parse {
            scanner: SCANNER_NAME.to_string(),
            message: e.to_string(),
        })?;

        debug!(issue_count = report.details.len(), "Dockle scan completed");
        Ok(report)
    }
}
