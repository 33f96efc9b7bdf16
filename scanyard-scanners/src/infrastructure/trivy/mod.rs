//! Trivy vulnerability scanner

pub mod executor;
pub mod output;

pub use executor::TrivyScanner;
