//! Scanyard Scanners - adapters for the external tools a scan depends on
//!
//! Every adapter drives a command line tool through `tokio::process` and
//! implements one of the capability traits from
//! [`scanyard_core::domain::image`]:
//!
//! | Adapter | Tool | Capability |
//! |---------|------|------------|
//! | [`DockerCliRuntime`] | `docker` | [`ContainerRuntime`](scanyard_core::domain::ContainerRuntime) |
//! | [`TrivyScanner`] | `trivy` | [`VulnerabilityScanner`](scanyard_core::domain::VulnerabilityScanner) |
//! | [`DockleScanner`] | `dockle` | [`AuditScanner`](scanyard_core::domain::AuditScanner) |
//!
//! None of the adapters impose a timeout on the underlying process.

pub mod infrastructure;

pub use infrastructure::docker::DockerCliRuntime;
pub use infrastructure::dockle::DockleScanner;
pub use infrastructure::trivy::TrivyScanner;
