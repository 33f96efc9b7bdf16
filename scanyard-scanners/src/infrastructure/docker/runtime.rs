//! Container runtime backed by the `docker` CLI
//!
//! The CLI honours `DOCKER_HOST`, `DOCKER_TLS_VERIFY` and `DOCKER_CERT_PATH`
//! from the environment, so the daemon connection is configured the same way
//! as for any other docker client on the host.

use async_trait::async_trait;
use std::path::Path;
use tokio::process::Command;
use tracing::{debug, error, instrument};
use uuid::Uuid;

use scanyard_core::config::RuntimeConfig;
use scanyard_core::domain::{ContainerRuntime, ImageReference, RegistryCredentials, RuntimeError};

use crate::infrastructure::process::{self, SpawnFailure};

/// Prefix of the local aliases created for pulled images
const RETAG_PREFIX: &str = "re-tagged-image";

/// Docker CLI runtime
pub struct DockerCliRuntime {
    executable: String,
}

impl DockerCliRuntime {
    pub fn new(executable: impl Into<String>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    pub fn from_config(config: &RuntimeConfig) -> Self {
        Self::new(config.docker_executable.clone())
    }

    /// Check that the docker CLI is installed, returning its version string
    pub async fn check_installation(&self) -> Result<String, RuntimeError> {
        process::tool_version(&self.executable)
            .await
            .map_err(|e| self.spawn_error(e))
    }

    /// Alias name for a re-tagged image. A fresh v4 UUID keeps concurrent
    /// jobs from ever sharing an alias.
    pub fn alias_name() -> String {
        format!("{}-{}:1", RETAG_PREFIX, Uuid::new_v4().simple())
    }

    fn spawn_error(&self, failure: SpawnFailure) -> RuntimeError {
        match failure {
            SpawnFailure::NotFound => RuntimeError::NotInstalled(self.executable.clone()),
            SpawnFailure::Io(e) => RuntimeError::Io(e),
        }
    }

    fn command(&self, config_dir: Option<&Path>) -> Command {
        let mut cmd = Command::new(&self.executable);
        if let Some(dir) = config_dir {
            cmd.arg("--config").arg(dir);
        }
        cmd
    }

    /// Log in to the image's registry with credentials scoped to `config_dir`.
    async fn login(
        &self,
        config_dir: &Path,
        image: &ImageReference,
        credentials: &RegistryCredentials,
    ) -> Result<(), RuntimeError> {
        let registry = image.registry_host();

        let mut cmd = self.command(Some(config_dir));
        cmd.arg("login")
            .arg("--username")
            .arg(&credentials.username)
            .arg("--password-stdin");
        if let Some(registry) = registry {
            cmd.arg(registry);
        }

        let output = process::run(&mut cmd, Some(credentials.password.as_bytes()))
            .await
            .map_err(|e| self.spawn_error(e))?;

        if !output.status.success() {
            let stderr = process::stderr_text(&output);
            error!(
                registry = registry.unwrap_or("docker hub"),
                exit_code = output.status.code(),
                stderr = %stderr,
                "Registry login failed"
            );
            return Err(RuntimeError::Login {
                registry: registry.unwrap_or("docker hub").to_string(),
                stderr,
            });
        }

        Ok(())
    }
}

#[async_trait]
impl ContainerRuntime for DockerCliRuntime {
    #[instrument(skip(self, credentials), fields(image_ref = %image, authenticated = credentials.is_some()))]
    async fn pull(
        &self,
        image: &ImageReference,
        credentials: Option<&RegistryCredentials>,
    ) -> Result<(), RuntimeError> {
        // Credentials live in a throw-away docker config for the duration of the pull
        let config_dir = match credentials {
            Some(credentials) => {
                let dir = tempfile::tempdir()?;
                self.login(dir.path(), image, credentials).await?;
                Some(dir)
            }
            None => None,
        };

        let mut cmd = self.command(config_dir.as_ref().map(|d| d.path()));
        cmd.arg("pull").arg("--quiet").arg(image.as_str());

        debug!("Waiting for image pull to finish");
        let output = process::run(&mut cmd, None)
            .await
            .map_err(|e| self.spawn_error(e))?;

        if !output.status.success() {
            let stderr = process::stderr_text(&output);
            error!(
                exit_code = output.status.code(),
                stderr = %stderr,
                "Failed to pull docker image"
            );
            return Err(RuntimeError::Pull {
                image: image.to_string(),
                stderr,
            });
        }

        debug!("Image pull completed");
        Ok(())
    }

    #[instrument(skip(self), fields(image_ref = %image))]
    async fn tag(&self, image: &ImageReference) -> Result<ImageReference, RuntimeError> {
        let alias = Self::alias_name();

        let mut cmd = self.command(None);
        cmd.arg("tag").arg(image.as_str()).arg(&alias);

        let output = process::run(&mut cmd, None)
            .await
            .map_err(|e| self.spawn_error(e))?;

        if !output.status.success() {
            let stderr = process::stderr_text(&output);
            error!(alias = %alias, stderr = %stderr, "Failed to re-tag docker image");
            return Err(RuntimeError::Tag {
                image: image.to_string(),
                alias,
                stderr,
            });
        }

        debug!(alias = %alias, "Re-tagged image");
        ImageReference::parse(alias.clone()).map_err(|e| RuntimeError::Tag {
            image: image.to_string(),
            alias,
            stderr: e.to_string(),
        })
    }
}
