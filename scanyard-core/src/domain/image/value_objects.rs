//! Image value objects

use serde::{Deserialize, Serialize};
use std::fmt;

/// Registry host Docker uses when a reference names no registry.
pub const DOCKER_HUB_REGISTRY: &str = "docker.io";

/// A container image reference (`registry/repo:tag` or `repo@sha256:...`).
///
/// Only the shape needed to address the image is validated here; the
/// container runtime remains the authority on whether the reference resolves.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ImageReference(String);

/// Error returned for references that cannot name an image.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImageReferenceError {
    #[error("Image reference cannot be empty")]
    Empty,

    #[error("Image reference must not contain whitespace: {0:?}")]
    Whitespace(String),
}

impl ImageReference {
    pub fn parse(value: impl Into<String>) -> Result<Self, ImageReferenceError> {
        let value = value.into();
        let trimmed = value.trim();

        if trimmed.is_empty() {
            return Err(ImageReferenceError::Empty);
        }

        if trimmed.chars().any(char::is_whitespace) {
            return Err(ImageReferenceError::Whitespace(value));
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Registry host named by the reference, or `None` for Docker Hub.
    ///
    /// Follows the Docker convention: the first path component is a registry
    /// only when it contains a `.` or a `:`, or is exactly `localhost`.
    pub fn registry_host(&self) -> Option<&str> {
        let (first, _) = self.0.split_once('/')?;

        let is_registry = first.contains('.') || first.contains(':') || first == "localhost";
        if !is_registry || first == DOCKER_HUB_REGISTRY || first == "index.docker.io" {
            return None;
        }

        Some(first)
    }
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ImageReference {
    type Error = ImageReferenceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<ImageReference> for String {
    fn from(value: ImageReference) -> Self {
        value.0
    }
}

/// Username/password pair for a private registry.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryCredentials {
    pub username: String,
    pub password: String,
}

impl RegistryCredentials {
    /// Build credentials only when both halves are present and non-empty.
    ///
    /// A lone username or password is treated as no credentials at all.
    pub fn from_parts(username: Option<String>, password: Option<String>) -> Option<Self> {
        match (username, password) {
            (Some(username), Some(password)) if !username.is_empty() && !password.is_empty() => {
                Some(Self { username, password })
            }
            _ => None,
        }
    }
}

impl fmt::Debug for RegistryCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
