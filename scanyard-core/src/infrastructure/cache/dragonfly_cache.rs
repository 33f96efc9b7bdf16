//! Dragonfly database cache implementation
//!
//! Redis-compatible client for the Dragonfly database. Values are stored as
//! plain strings so other tooling can read the keys directly.
// cspell:ignore Dragonfly

use redis::aio::ConnectionManager;
use redis::{Client, IntoConnectionInfo};
use std::time::Duration;
use tracing::{debug, error};

/// Cache client errors
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Invalid Dragonfly URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to connect to the Dragonfly database: {0}")]
    Connection(String),

    #[error("Redis {command} error: {message}")]
    Command {
        command: &'static str,
        message: String,
    },
}

/// Dragonfly database cache implementation
#[derive(Clone)]
pub struct DragonflyCache {
    connection_manager: ConnectionManager,
}

impl DragonflyCache {
    /// Create a new Dragonfly cache instance
    ///
    /// # Arguments
    /// * `url` - Connection URL (e.g., "redis://127.0.0.1:6379")
    /// * `password` - Optional password, overriding any password in the URL
    ///
    /// # Errors
    /// Returns an error if the connection cannot be established or the
    /// initial `PING` fails.
    pub async fn new(url: &str, password: Option<&str>) -> Result<Self, CacheError> {
        let mut info = url.into_connection_info().map_err(|e| {
            error!("Invalid Dragonfly URL {}: {}", url, e);
            CacheError::InvalidUrl(e.to_string())
        })?;

        if let Some(password) = password {
            info.redis.password = Some(password.to_string());
        }

        let client = Client::open(info).map_err(|e| {
            error!("Failed to create Redis client: {}", e);
            CacheError::Connection(e.to_string())
        })?;

        let connection_manager = ConnectionManager::new(client).await.map_err(|e| {
            error!("Failed to create connection manager: {}", e);
            CacheError::Connection(e.to_string())
        })?;

        let cache = Self { connection_manager };
        cache.ping().await?;

        debug!(
            "Successfully connected to the Dragonfly database at {}",
            url
        );

        Ok(cache)
    }

    /// Check that the database answers
    pub async fn ping(&self) -> Result<(), CacheError> {
        let mut conn = self.connection_manager.clone();

        redis::cmd("PING")
            .query_async::<String>(&mut conn)
            .await
            .map_err(|e| {
                error!("Failed to ping the Dragonfly database: {}", e);
                CacheError::Command {
                    command: "PING",
                    message: e.to_string(),
                }
            })?;

        Ok(())
    }

    /// Read a string value, `None` when the key is absent or expired
    pub async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.connection_manager.clone();

        let value = redis::cmd("GET")
            .arg(key)
            .query_async::<Option<String>>(&mut conn)
            .await
            .map_err(|e| {
                error!("Failed to get cache key {}: {}", key, e);
                CacheError::Command {
                    command: "GET",
                    message: e.to_string(),
                }
            })?;

        if value.is_none() {
            debug!("Cache miss for key: {}", key);
        }

        Ok(value)
    }

    /// Write a string value, overwriting any previous value and expiry.
    ///
    /// With `ttl` of `None` the key never expires.
    pub async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), CacheError> {
        let mut conn = self.connection_manager.clone();

        let mut cmd = redis::cmd("SET");
        cmd.arg(key).arg(value);
        if let Some(ttl) = ttl {
            // PX keeps sub-second windows exact
            let millis = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX);
            cmd.arg("PX").arg(millis.max(1));
        }

        cmd.query_async::<String>(&mut conn).await.map_err(|e| {
            error!("Failed to set cache key {}: {}", key, e);
            CacheError::Command {
                command: "SET",
                message: e.to_string(),
            }
        })?;

        debug!(key, ttl_ms = ttl.map(|t| u64::try_from(t.as_millis()).unwrap_or(u64::MAX)), "Stored cache entry");
        Ok(())
    }

    /// Delete a key, returning whether it existed
    pub async fn delete(&self, key: &str) -> Result<bool, CacheError> {
        let mut conn = self.connection_manager.clone();

        let deleted = redis::cmd("DEL")
            .arg(key)
            .query_async::<i64>(&mut conn)
            .await
            .map_err(|e| {
                error!("Failed to delete cache key {}: {}", key, e);
                CacheError::Command {
                    command: "DEL",
                    message: e.to_string(),
                }
            })?;

        Ok(deleted > 0)
    }
}
