//! Configuration validation module

use crate::config::{QueueConfig, RuntimeConfig, ScannersConfig, ServerConfig, StoreConfig};

/// Trait for validating configuration sections
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Configuration validation error
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Server configuration error: {message}")]
    Server { message: String },

    #[error("Store configuration error: {message}")]
    Store { message: String },

    #[error("Queue configuration error: {message}")]
    Queue { message: String },

    #[error("Scanner configuration error: {message}")]
    Scanner { message: String },

    #[error("Runtime configuration error: {message}")]
    Runtime { message: String },
}

impl ValidationError {
    pub fn server(message: impl Into<String>) -> Self {
        Self::Server {
            message: message.into(),
        }
    }

    pub fn store(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
        }
    }

    pub fn queue(message: impl Into<String>) -> Self {
        Self::Queue {
            message: message.into(),
        }
    }

    pub fn scanner(message: impl Into<String>) -> Self {
        Self::Scanner {
            message: message.into(),
        }
    }

    pub fn runtime(message: impl Into<String>) -> Self {
        Self::Runtime {
            message: message.into(),
        }
    }
}

impl Validate for ServerConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        // u16 cannot exceed 65535, so we only need to check for 0
        if self.port == 0 {
            return Err(ValidationError::server(format!(
                "Port must be in range 1-65535, got {}",
                self.port
            )));
        }

        if self.host.is_empty() {
            return Err(ValidationError::server("Host cannot be empty"));
        }

        if self.request_timeout_seconds == 0 {
            return Err(ValidationError::server(
                "Request timeout must be greater than 0",
            ));
        }

        Ok(())
    }
}

impl Validate for StoreConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.report_ttl_seconds == 0 {
            return Err(ValidationError::store(
                "Report TTL must be greater than 0 seconds",
            ));
        }

        if self.report_ttl_seconds > StoreConfig::MAX_REPORT_TTL_SECONDS {
            return Err(ValidationError::store(format!(
                "Report TTL must be at most {} seconds, got {}",
                StoreConfig::MAX_REPORT_TTL_SECONDS,
                self.report_ttl_seconds
            )));
        }

        if self.dragonfly_url.is_empty() {
            return Err(ValidationError::store("Dragonfly URL cannot be empty"));
        }

        Ok(())
    }
}

impl Validate for QueueConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.capacity == 0 {
            return Err(ValidationError::queue(
                "Queue capacity must be greater than 0",
            ));
        }

        Ok(())
    }
}

impl Validate for ScannersConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.trivy.executable.is_empty() {
            return Err(ValidationError::scanner("Trivy executable cannot be empty"));
        }

        if self.trivy.severity.is_empty() {
            return Err(ValidationError::scanner(
                "Trivy severity list cannot be empty",
            ));
        }

        if self.dockle.executable.is_empty() {
            return Err(ValidationError::scanner(
                "Dockle executable cannot be empty",
            ));
        }

        Ok(())
    }
}

impl Validate for RuntimeConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.docker_executable.is_empty() {
            return Err(ValidationError::runtime(
                "Docker executable cannot be empty",
            ));
        }

        Ok(())
    }
}
