//! Stable DTOs and IDs used across the mfaguard workspace.
//!
//! This crate is intentionally boring:
//! - data types for the emitted compliance report
//! - stable string IDs, codes and attribute names
//! - explain registry for remediation guidance

#![forbid(unsafe_code)]

pub mod explain;
pub mod ids;
pub mod receipt;

pub use explain::{ExamplePair, Explanation, lookup_explanation};
pub use receipt::{
    ComplianceData, ComplianceReport, Finding, ReportEnvelope, RuleSummary, RunMeta,
    SCHEMA_REPORT_V1, Severity, ToolMeta, Verdict, VerdictCounts, VerdictStatus,
};
