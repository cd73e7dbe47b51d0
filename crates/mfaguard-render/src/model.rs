//! Render-side view of a report, decoupled from the wire types.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderableSeverity {
    Info,
    Warning,
    Error,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderableVerdictStatus {
    Pass,
    Warn,
    Fail,
    Inconclusive,
}

impl RenderableVerdictStatus {
    pub(crate) fn label(self) -> &'static str {
        match self {
            RenderableVerdictStatus::Pass => "PASS",
            RenderableVerdictStatus::Warn => "WARN",
            RenderableVerdictStatus::Fail => "FAIL",
            RenderableVerdictStatus::Inconclusive => "INCONCLUSIVE",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableFinding {
    pub severity: RenderableSeverity,
    pub check_id: String,
    pub code: String,
    pub message: String,
    pub account: Option<String>,
    pub help: Option<String>,
    pub url: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableRule {
    pub check_id: String,
    pub attribute: String,
    pub accounts_bound: u32,
    pub violator_count: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RenderableData {
    pub accounts_scanned: u32,
    pub violator_count: u32,
    pub compliance_ratio: Option<f64>,
    /// Full violator list in population order (never truncated).
    pub violators: Vec<String>,
    pub rules: Vec<RenderableRule>,
    pub findings_emitted: u32,
    pub findings_total: u32,
    pub truncated_reason: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RenderableReport {
    pub verdict: RenderableVerdictStatus,
    pub findings: Vec<RenderableFinding>,
    pub data: RenderableData,
}
