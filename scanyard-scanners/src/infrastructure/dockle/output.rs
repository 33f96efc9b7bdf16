//! Dockle output parsing

use serde::Deserialize;
use std::collections::BTreeMap;

use scanyard_core::domain::{AuditIssue, AuditReport};

/// Root Dockle JSON document
#[derive(Debug, Deserialize)]
struct DockleOutput {
    #[serde(default)]
    summary: BTreeMap<String, u64>,
    #[serde(default)]
    details: Vec<DockleDetail>,
}

#[derive(Debug, Deserialize)]
struct DockleDetail {
    code: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    level: String,
    // Dockle writes `null` when a checkpoint carries no alert text
    #[serde(default)]
    alerts: Option<Vec<String>>,
}

pub fn parse_report(data: &[u8]) -> Result<AuditReport, serde_json::Error> {
    let output: DockleOutput = serde_json::from_slice(data)?;

    Ok(AuditReport {
        summary: output.summary,
        details: output
            .details
            .into_iter()
            .map(|d| AuditIssue {
                code: d.code,
                title: d.title,
                level: d.level,
                alerts: d.alerts.unwrap_or_default(),
            })
            .collect(),
    })
}
