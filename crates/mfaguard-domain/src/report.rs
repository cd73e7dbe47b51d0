use crate::model::AccountKind;
use mfaguard_types::{ComplianceData, Finding, Severity, VerdictCounts, VerdictStatus};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComplianceStatus {
    Satisfied,
    Violated,
}

impl ComplianceStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ComplianceStatus::Satisfied => "satisfied",
            ComplianceStatus::Violated => "violated",
        }
    }
}

/// One (account, rule) pair whose observed value conflicts with the requirement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Violation {
    pub account: String,
    pub kind: AccountKind,
    pub rule_id: String,
    pub code: String,
    pub attribute: String,
    pub severity: Severity,
    pub observed: bool,
    pub required: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleOutcome {
    pub rule_id: String,
    pub attribute: String,
    /// Accounts the rule applied to (exempt and unbound kinds excluded).
    pub accounts_bound: usize,
    pub violators: Vec<String>,
}

/// Value object produced fresh by every evaluation pass.
#[derive(Clone, Debug, PartialEq)]
pub struct ComplianceResult {
    pub overall_status: ComplianceStatus,
    /// Accounts violating at least one rule, in population order, without duplicates.
    pub violators: Vec<String>,
    /// Population order, then rule order.
    pub violations: Vec<Violation>,
    pub rules: Vec<RuleOutcome>,
    pub accounts_evaluated: usize,
    /// Percentage in `[0, 100]`.
    pub compliance_ratio: f64,
}

impl ComplianceResult {
    pub fn is_satisfied(&self) -> bool {
        self.overall_status == ComplianceStatus::Satisfied
    }

    pub fn violator_count(&self) -> usize {
        self.violators.len()
    }

    /// Ratio rounded to one decimal place, the precision reports display.
    pub fn compliance_ratio_rounded(&self) -> f64 {
        (self.compliance_ratio * 10.0).round() / 10.0
    }
}

/// `(population - violators) / population * 100`; undefined for an empty population.
///
/// Used for both outcomes so a satisfied pass reports exactly `100.0`.
pub fn compliance_ratio(population: usize, violators: usize) -> Option<f64> {
    if population == 0 {
        return None;
    }
    let compliant = population.saturating_sub(violators);
    Some(compliant as f64 / population as f64 * 100.0)
}

pub fn counts_from_findings(findings: &[Finding]) -> VerdictCounts {
    let mut counts = VerdictCounts::default();
    for f in findings {
        match f.severity {
            Severity::Info => counts.info += 1,
            Severity::Warning => counts.warn += 1,
            Severity::Error => counts.error += 1,
        }
    }
    counts
}

#[derive(Clone, Debug)]
pub struct DomainReport {
    pub verdict: VerdictStatus,
    pub findings: Vec<Finding>,
    pub data: ComplianceData,
    pub counts: VerdictCounts,
    pub result: ComplianceResult,
}
