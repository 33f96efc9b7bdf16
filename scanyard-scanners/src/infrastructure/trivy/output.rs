//! Trivy output parsing types
//!
//! Trivy 0.20+ writes an object with a `Results` array; older releases wrote
//! the results array at the top level. Both are accepted.

use serde::Deserialize;

use scanyard_core::domain::{Vulnerability, VulnerabilityReport};

/// Root Trivy JSON document
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TrivyDocument {
    Report(TrivyReport),
    Legacy(Vec<TrivyResult>),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct TrivyReport {
    #[serde(default)]
    artifact_name: Option<String>,
    #[serde(default)]
    results: Vec<TrivyResult>,
}

/// One scanned target (OS packages, a lockfile, ...)
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct TrivyResult {
    #[serde(default)]
    target: String,
    // Trivy emits `null` for targets without findings
    #[serde(default)]
    vulnerabilities: Option<Vec<Vulnerability>>,
}

/// Flatten a Trivy JSON report into a single [`VulnerabilityReport`].
///
/// The report target is the scanned artifact name when present, otherwise the
/// first result's target.
pub fn parse_report(data: &[u8]) -> Result<VulnerabilityReport, serde_json::Error> {
    let document: TrivyDocument = serde_json::from_slice(data)?;

    let (artifact_name, results) = match document {
        TrivyDocument::Report(report) => (report.artifact_name, report.results),
        TrivyDocument::Legacy(results) => (None, results),
    };

    let target = artifact_name
        .or_else(|| results.first().map(|r| r.target.clone()))
        .unwrap_or_default();

    let vulnerabilities = results
        .into_iter()
        .flat_map(|r| r.vulnerabilities.unwrap_or_default())
        .collect();

    Ok(VulnerabilityReport {
        target,
        vulnerabilities,
    })
}
