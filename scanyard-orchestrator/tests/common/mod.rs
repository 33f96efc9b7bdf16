//! Common test utilities shared by the orchestrator integration tests
//!
//! This module provides:
//! - Mock container runtime and scanners with failure switches
//! - Factories for service, pipeline and reports
//! - Polling helpers

#![allow(dead_code)]

pub mod factories;
pub mod mocks;

pub use factories::*;
pub use mocks::*;
