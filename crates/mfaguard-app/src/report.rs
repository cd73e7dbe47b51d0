use anyhow::Context;
use mfaguard_render::{
    RenderableData, RenderableFinding, RenderableReport, RenderableRule, RenderableSeverity,
    RenderableVerdictStatus,
};
use mfaguard_types::{
    ComplianceData, ComplianceReport, Finding, RunMeta, SCHEMA_REPORT_V1, Severity, ToolMeta,
    Verdict, VerdictCounts, VerdictStatus, ids,
};
use time::OffsetDateTime;

pub(crate) fn tool_meta() -> ToolMeta {
    ToolMeta {
        name: "mfaguard".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }
}

pub fn parse_report_json(text: &str) -> anyhow::Result<ComplianceReport> {
    let value: serde_json::Value = serde_json::from_str(text).context("parse report json")?;

    let schema = value
        .get("schema")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();
    anyhow::ensure!(
        schema == SCHEMA_REPORT_V1,
        "unknown report schema: {schema:?} (expected {SCHEMA_REPORT_V1})"
    );

    serde_json::from_value(value).context("parse mfaguard v1 report")
}

pub fn serialize_report(report: &ComplianceReport) -> anyhow::Result<Vec<u8>> {
    serde_json::to_vec_pretty(report).context("serialize report")
}

pub fn to_renderable(report: &ComplianceReport) -> RenderableReport {
    let d = &report.data;
    RenderableReport {
        verdict: match report.verdict.status {
            VerdictStatus::Pass => RenderableVerdictStatus::Pass,
            VerdictStatus::Warn => RenderableVerdictStatus::Warn,
            VerdictStatus::Fail => RenderableVerdictStatus::Fail,
            VerdictStatus::Inconclusive => RenderableVerdictStatus::Inconclusive,
        },
        findings: report.findings.iter().map(renderable_finding).collect(),
        data: RenderableData {
            accounts_scanned: d.accounts_scanned,
            violator_count: d.violator_count,
            compliance_ratio: d.compliance_ratio,
            violators: d.violators.clone(),
            rules: d
                .rules
                .iter()
                .map(|r| RenderableRule {
                    check_id: r.check_id.clone(),
                    attribute: r.attribute.clone(),
                    accounts_bound: r.accounts_bound,
                    violator_count: r.violator_count,
                })
                .collect(),
            findings_emitted: d.findings_emitted,
            findings_total: d.findings_total,
            truncated_reason: d.truncated_reason.clone(),
        },
    }
}

fn renderable_finding(f: &Finding) -> RenderableFinding {
    RenderableFinding {
        severity: match f.severity {
            Severity::Info => RenderableSeverity::Info,
            Severity::Warning => RenderableSeverity::Warning,
            Severity::Error => RenderableSeverity::Error,
        },
        check_id: f.check_id.clone(),
        code: f.code.clone(),
        message: f.message.clone(),
        account: f.account.clone(),
        help: f.help.clone(),
        url: f.url.clone(),
    }
}

/// A report that reached no verdict: one tool-level finding, no ratio.
pub(crate) fn inconclusive_report(
    run: RunMeta,
    reason: &str,
    data: ComplianceData,
) -> ComplianceReport {
    tool_report(
        run,
        ids::CODE_CHECK_UNAVAILABLE,
        reason,
        "Raise `solver_budget` or use `strategy = \"direct\"`, then re-run mfaguard.",
        "check_unavailable",
        data,
    )
}

/// Report written when the tool itself failed (bad input, IO, config).
pub fn runtime_error_report(message: &str) -> ComplianceReport {
    let now = OffsetDateTime::now_utc();
    let run = RunMeta {
        started_at: now,
        ended_at: Some(now),
        duration_ms: Some(0),
        source: None,
    };
    let data = ComplianceData {
        profile: "unknown".to_string(),
        strategy: "unknown".to_string(),
        ..ComplianceData::default()
    };
    tool_report(
        run,
        ids::CODE_RUNTIME_ERROR,
        message,
        "Fix the tool error and re-run mfaguard.",
        "tool_error",
        data,
    )
}

fn tool_report(
    run: RunMeta,
    code: &str,
    message: &str,
    help: &str,
    reason: &str,
    mut data: ComplianceData,
) -> ComplianceReport {
    data.compliance_ratio = None;
    data.findings_total = 1;
    data.findings_emitted = 1;
    ComplianceReport {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: tool_meta(),
        run,
        verdict: Verdict {
            status: VerdictStatus::Inconclusive,
            counts: VerdictCounts {
                error: 1,
                ..VerdictCounts::default()
            },
            reasons: vec![reason.to_string()],
        },
        findings: vec![Finding {
            severity: Severity::Error,
            check_id: ids::CHECK_TOOL_RUNTIME.to_string(),
            code: code.to_string(),
            message: message.to_string(),
            account: None,
            help: Some(help.to_string()),
            url: None,
            fingerprint: None,
            data: serde_json::Value::Null,
        }],
        data,
    }
}
