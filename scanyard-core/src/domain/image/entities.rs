//! Scanner report entities
//!
//! These mirror the structured output of the external scanners closely enough
//! that callers familiar with Trivy and Dockle can read them directly.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

/// Vulnerabilities found in an image by the vulnerability scanner.
///
/// The default value is the empty section recorded when the scanner fails.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct VulnerabilityReport {
    #[serde(default)]
    pub target: String,
    #[serde(default)]
    pub vulnerabilities: Vec<Vulnerability>,
}

impl VulnerabilityReport {
    pub fn is_empty(&self) -> bool {
        self.target.is_empty() && self.vulnerabilities.is_empty()
    }
}

/// A single vulnerable package
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct Vulnerability {
    #[serde(rename = "VulnerabilityID")]
    pub vulnerability_id: String,
    pub pkg_name: String,
    #[serde(default)]
    pub installed_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_version: Option<String>,
    pub severity: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "PrimaryURL", default, skip_serializing_if = "Option::is_none")]
    pub primary_url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<String>,
}

/// Image configuration findings from the audit scanner.
///
/// The default value is the empty section recorded when the scanner fails.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AuditReport {
    /// Issue counts keyed by level (`fatal`, `warn`, `info`, `skip`, `pass`)
    #[serde(default)]
    pub summary: BTreeMap<String, u64>,
    #[serde(default)]
    pub details: Vec<AuditIssue>,
}

impl AuditReport {
    pub fn is_empty(&self) -> bool {
        self.summary.is_empty() && self.details.is_empty()
    }
}

/// A single failed checkpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AuditIssue {
    pub code: String,
    pub title: String,
    pub level: String,
    #[serde(default)]
    pub alerts: Vec<String>,
}
