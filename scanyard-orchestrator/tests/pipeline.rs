//! Scan pipeline composition: fail-fast provisioning, fail-soft scanners

mod common;

use common::*;
use scanyard_orchestrator::application::PipelineError;

#[tokio::test]
async fn test_scanners_receive_the_local_alias() {
    let log = CallLog::default();
    let report = healthy_pipeline(&log)
        .run(&request("ghcr.io/acme/api:1.4"))
        .await
        .unwrap();

    let alias = "re-tagged-ghcr.io-acme-api-1.4:1";
    assert_eq!(log.with_prefix("vuln:"), vec![alias]);
    assert_eq!(log.with_prefix("audit:"), vec![alias]);
    assert_eq!(report.vulnerabilities.target, alias);
}

#[tokio::test]
async fn test_tag_failure_falls_back_to_original_reference() {
    let log = CallLog::default();
    let pipeline = pipeline(
        MockRuntime::new(log.clone()).failing_tag(),
        MockVulnerabilityScanner::new(log.clone()),
        MockAuditScanner::new(log.clone()),
    );

    let report = pipeline.run(&request("alpine:3.20")).await.unwrap();

    assert_eq!(log.with_prefix("vuln:"), vec!["alpine:3.20"]);
    assert_eq!(log.with_prefix("audit:"), vec!["alpine:3.20"]);
    assert_eq!(report.version, "1");
}

#[tokio::test]
async fn test_pull_failure_aborts_before_scanning() {
    let log = CallLog::default();
    let pipeline = pipeline(
        MockRuntime::new(log.clone()).failing_pull(),
        MockVulnerabilityScanner::new(log.clone()),
        MockAuditScanner::new(log.clone()),
    );

    let err = pipeline.run(&request("alpine:3.20")).await.unwrap_err();

    assert!(matches!(err, PipelineError::Provisioning(_)));
    assert_eq!(log.entries(), vec!["pull:alpine:3.20"]);
}

#[tokio::test]
async fn test_both_scanners_failing_yields_empty_report() {
    let log = CallLog::default();
    let pipeline = pipeline(
        MockRuntime::new(log.clone()),
        MockVulnerabilityScanner::failing(log.clone()),
        MockAuditScanner::failing(log.clone()),
    );

    let report = pipeline.run(&request("alpine:3.20")).await.unwrap();

    assert!(report.vulnerabilities.is_empty());
    assert!(report.audit.is_empty());
}
