//! Configuration management

pub mod validation;

pub use validation::{Validate, ValidationError};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub queue: QueueConfig,
    pub logging: LoggingConfig,
    pub scanners: ScannersConfig,
    pub runtime: RuntimeConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Whether to expose interactive API docs (Swagger UI).
    pub enable_docs: bool,
    /// Global request timeout in seconds applied at the HTTP layer.
    ///
    /// This also bounds how long a submission may wait for queue capacity.
    pub request_timeout_seconds: u64,
    /// Allowed CORS origins. Use ["*"] to allow any.
    pub allowed_origins: Vec<String>,
    /// JSON file describing the bundled scanner versions, served at `/version`.
    pub versions_file: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            enable_docs: true,
            request_timeout_seconds: 30,
            allowed_origins: vec!["*".to_string()],
            versions_file: PathBuf::from("./versions.json"),
        }
    }
}

/// Backend used for scan status and report persistence
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    /// Dragonfly/Redis key-value store (production)
    #[default]
    Dragonfly,
    /// Process-local store (development and tests, lost on restart)
    Memory,
}

/// Scan store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// Dragonfly DB connection URL (e.g., "redis://127.0.0.1:6379")
    pub dragonfly_url: String,
    /// Optional password sent on connect
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Retention window for scan reports, in seconds
    pub report_ttl_seconds: u64,
}

impl StoreConfig {
    /// Longest accepted report retention window (one year)
    pub const MAX_REPORT_TTL_SECONDS: u64 = 365 * 24 * 60 * 60;

    pub fn report_ttl(&self) -> Duration {
        Duration::from_secs(self.report_ttl_seconds)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Dragonfly,
            dragonfly_url: "redis://127.0.0.1:6379".to_string(),
            password: None,
            report_ttl_seconds: 15 * 60,
        }
    }
}

/// Job queue configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    /// Maximum number of pending jobs before submissions wait for capacity
    pub capacity: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self { capacity: 100 }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "json".to_string(),
        }
    }
}

/// External scanner configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ScannersConfig {
    pub trivy: TrivyConfig,
    pub dockle: DockleConfig,
}

/// Trivy vulnerability scanner configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrivyConfig {
    /// Path to the trivy executable (or "trivy" if in PATH)
    pub executable: String,
    /// Vulnerability database cache directory
    pub cache_dir: PathBuf,
    /// Directory the JSON reports are written to before parsing
    pub reports_dir: PathBuf,
    /// Comma separated severities to report
    pub severity: String,
    /// Comma separated vulnerability types to report
    pub vuln_type: String,
}

impl Default for TrivyConfig {
    fn default() -> Self {
        let home = home_dir();
        Self {
            executable: "trivy".to_string(),
            cache_dir: home.join(".cache"),
            reports_dir: home.join(".reports"),
            severity: "UNKNOWN,LOW,MEDIUM,HIGH,CRITICAL".to_string(),
            vuln_type: "os,library".to_string(),
        }
    }
}

/// Dockle audit scanner configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DockleConfig {
    /// Path to the dockle executable (or "dockle" if in PATH)
    pub executable: String,
    /// Directory for temporary report files
    pub report_dir: PathBuf,
}

impl Default for DockleConfig {
    fn default() -> Self {
        Self {
            executable: "dockle".to_string(),
            report_dir: std::env::temp_dir(),
        }
    }
}

/// Container runtime configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Path to the docker CLI (or "docker" if in PATH)
    pub docker_executable: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            docker_executable: "docker".to_string(),
        }
    }
}

fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

impl Validate for Config {
    fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.store.validate()?;
        self.queue.validate()?;
        self.scanners.validate()?;
        self.runtime.validate()?;
        Ok(())
    }
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigLoadError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false));

        // Add environment-specific config if ENV is set
        if let Ok(env) = std::env::var("ENV") {
            builder = builder
                .add_source(config::File::with_name(&format!("config/{}", env)).required(false));
        }

        builder = builder
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("SCANYARD").separator("__"));

        let mut config: Config = builder.build()?.try_deserialize()?;

        config.apply_env_overrides(|name| std::env::var(name).ok());

        config.validate()?;

        Ok(config)
    }

    /// Apply the plain environment variables understood by earlier deployments.
    ///
    /// `HOST`/`PORT` follow the Cloud Run listener convention, `REDIS_ENDPOINT` is a
    /// bare `host:port`, and `REPORT_EXPIRATION_WINDOW` is a number of seconds.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST").filter(|v| !v.is_empty()) {
            self.server.host = host;
        }

        if let Some(port) = lookup("PORT").filter(|v| !v.is_empty()) {
            match port.parse::<u16>() {
                Ok(port) => self.server.port = port,
                Err(e) => tracing::warn!(value = %port, error = %e, "Ignoring invalid PORT"),
            }
        }

        if let Some(endpoint) = lookup("REDIS_ENDPOINT").filter(|v| !v.is_empty()) {
            self.store.dragonfly_url = if endpoint.contains("://") {
                endpoint
            } else {
                format!("redis://{}", endpoint)
            };
        }

        if let Some(password) = lookup("REDIS_PASSWORD").filter(|v| !v.is_empty()) {
            self.store.password = Some(password);
        }

        if let Some(window) = lookup("REPORT_EXPIRATION_WINDOW").filter(|v| !v.is_empty()) {
            match window.parse::<u64>() {
                Ok(seconds) => {
                    tracing::debug!(seconds, "Setting report expiration window");
                    self.store.report_ttl_seconds = seconds;
                }
                Err(e) => {
                    tracing::warn!(value = %window, error = %e, "Ignoring invalid REPORT_EXPIRATION_WINDOW")
                }
            }
        }
    }
}

/// Error type for configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("Configuration file error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Configuration validation error: {0}")]
    Validation(#[from] ValidationError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults_match_service_contract() {
        let config = Config::default();
        assert_eq!(config.queue.capacity, 100);
        assert_eq!(config.store.report_ttl(), Duration::from_secs(900));
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.store.backend, StoreBackend::Dragonfly);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_legacy_overrides_are_applied() {
        let mut config = Config::default();
        config.apply_env_overrides(lookup_from(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "9090"),
            ("REDIS_ENDPOINT", "cache.internal:6380"),
            ("REDIS_PASSWORD", "hunter2"),
            ("REPORT_EXPIRATION_WINDOW", "60"),
        ]));

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.store.dragonfly_url, "redis://cache.internal:6380");
        assert_eq!(config.store.password.as_deref(), Some("hunter2"));
        assert_eq!(config.store.report_ttl_seconds, 60);
    }

    #[test]
    fn test_invalid_overrides_are_ignored() {
        let mut config = Config::default();
        config.apply_env_overrides(lookup_from(&[
            ("PORT", "not-a-port"),
            ("REPORT_EXPIRATION_WINDOW", "soon"),
        ]));

        assert_eq!(config.server.port, 8000);
        assert_eq!(config.store.report_ttl_seconds, 900);
    }

    #[test]
    fn test_redis_endpoint_with_scheme_is_kept() {
        let mut config = Config::default();
        config.apply_env_overrides(lookup_from(&[("REDIS_ENDPOINT", "rediss://secure:6379")]));
        assert_eq!(config.store.dragonfly_url, "rediss://secure:6379");
    }

    #[test]
    fn test_store_backend_deserializes_snake_case() {
        let backend: StoreBackend = serde_json::from_str("\"memory\"").unwrap();
        assert_eq!(backend, StoreBackend::Memory);
    }
}
