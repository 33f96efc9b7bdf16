//! Scanyard Core - Foundation crate for the scanyard image scanning service
//!
//! This crate provides functionality shared by the scanner adapters and the
//! orchestrator:
//!
//! # Modules
//!
//! - [`config`] — Strongly-typed configuration with TOML and environment variable support
//! - [`domain`] — Image references, registry credentials, scanner report types and
//!   the capability traits implemented by the scanner adapters
//! - [`infrastructure`] — Dragonfly/Redis cache client
//! - [`logging`] — Structured logging with tracing
//!
//! # Configuration
//!
//! ```rust,ignore
//! use scanyard_core::Config;
//!
//! let config = Config::load()?;
//! ```
//!
//! Environment variables use the `SCANYARD__` prefix with double underscore separators:
//!
//! ```bash
//! SCANYARD__SERVER__PORT=8000
//! SCANYARD__STORE__REPORT_TTL_SECONDS=900
//! ```
//!
//! The listener and store variables used by earlier container deployments
//! (`HOST`, `PORT`, `REDIS_ENDPOINT`, `REDIS_PASSWORD`, `REPORT_EXPIRATION_WINDOW`)
//! are honoured as well.

pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod logging;

pub use config::Config;
pub use logging::init_tracing;
