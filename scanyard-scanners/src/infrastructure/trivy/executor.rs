//! Trivy vulnerability scanner executor
//!
//! Runs `trivy image` against a locally available image and reads the JSON
//! report Trivy writes to a scratch file under the configured reports
//! directory. The scratch file is removed once parsed.

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, error, instrument};

use scanyard_core::config::TrivyConfig;
use scanyard_core::domain::{ImageReference, ScannerError, VulnerabilityReport, VulnerabilityScanner};

use super::output::parse_report;
use crate::infrastructure::process::{self, SpawnFailure};

const SCANNER_NAME: &str = "trivy";

/// Trivy scanner
pub struct TrivyScanner {
    config: TrivyConfig,
}

impl TrivyScanner {
    pub fn new(config: TrivyConfig) -> Self {
        Self { config }
    }

    /// Check if Trivy is installed and accessible
    #[instrument(skip(self))]
    pub async fn check_installation(&self) -> Result<String, ScannerError> {
        let version = process::tool_version(&self.config.executable)
            .await
            .map_err(|e| self.spawn_error(e))?;
        debug!(version = %version, "Trivy found");
        Ok(version)
    }

    fn spawn_error(&self, failure: SpawnFailure) -> ScannerError {
        match failure {
            SpawnFailure::NotFound => ScannerError::NotInstalled(self.config.executable.clone()),
            SpawnFailure::Io(e) => ScannerError::Io(e),
        }
    }

    fn build_command(&self, image: &ImageReference, report_path: &std::path::Path) -> Command {
        let mut cmd = Command::new(&self.config.executable);
        cmd.arg("--cache-dir")
            .arg(&self.config.cache_dir)
            .arg("--quiet")
            .arg("image")
            .arg("--no-progress")
            .arg("--severity")
            .arg(&self.config.severity)
            .arg("--vuln-type")
            .arg(&self.config.vuln_type)
            .arg("--format")
            .arg("json")
            .arg("--output")
            .arg(report_path)
            .arg(image.as_str());
        cmd
    }
}

#[async_trait]
impl VulnerabilityScanner for TrivyScanner {
    fn name(&self) -> &'static str {
        SCANNER_NAME
    }

    #[instrument(skip(self), fields(image_ref = %image))]
    async fn scan(&self, image: &ImageReference) -> Result<VulnerabilityReport, ScannerError> {
        tokio::fs::create_dir_all(&self.config.cache_dir).await?;
        tokio::fs::create_dir_all(&self.config.reports_dir).await?;

        let report_file = tempfile::Builder::new()
            .prefix("trivy_report_")
            .suffix(".json")
            .tempfile_in(&self.config.reports_dir)?;

        let mut cmd = self.build_command(image, report_file.path());
        debug!(command = ?cmd, "Executing Trivy");

        let output = process::run(&mut cmd, None)
            .await
            .map_err(|e| self.spawn_error(e))?;

        if !output.status.success() {
            let stderr = process::stderr_text(&output);
            error!(
                exit_code = output.status.code(),
                stderr = %stderr,
                "Trivy execution failed"
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

        debug!(
            vulnerability_count = report.vulnerabilities.len(),
            "Trivy scan completed"
        );
        Ok(report)
    }
}
