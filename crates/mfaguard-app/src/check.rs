//! The `check` use case: load accounts, evaluate policy, produce a report.

use anyhow::Context;
use mfaguard_domain::EvaluationError;
use mfaguard_domain::report::DomainReport;
use mfaguard_settings::{Overrides, ResolvedConfig};
use mfaguard_source::AccountSource;
use mfaguard_types::{
    ComplianceData, ComplianceReport, RunMeta, SCHEMA_REPORT_V1, Verdict, VerdictStatus,
};
use time::OffsetDateTime;

use crate::report::{inconclusive_report, tool_meta};

/// Input for the check use case.
pub struct CheckInput<'a> {
    /// Config file contents (empty string if not found).
    pub config_text: &'a str,
    /// CLI overrides.
    pub overrides: Overrides,
    /// Where the account population comes from.
    pub source: &'a dyn AccountSource,
}

/// Output from the check use case.
#[derive(Clone, Debug)]
pub struct CheckOutput {
    pub report: ComplianceReport,
    /// The resolved configuration used.
    pub resolved_config: ResolvedConfig,
}

/// Run the check use case.
///
/// Invalid or empty populations are errors. A check that cannot reach a verdict is not:
/// it yields an `inconclusive` report.
pub fn run_check(input: CheckInput<'_>) -> anyhow::Result<CheckOutput> {
    let started_at = OffsetDateTime::now_utc();
    let source = input.source.describe();
    let _span = tracing::info_span!("check", source = %source).entered();

    // Parse config (empty is allowed, defaults apply).
    let cfg = if input.config_text.trim().is_empty() {
        mfaguard_settings::MfaguardConfigV1::default()
    } else {
        mfaguard_settings::parse_config_toml(input.config_text).context("parse config")?
    };

    let resolved = mfaguard_settings::resolve_config(cfg, input.overrides.clone())
        .context("resolve config")?;
    let effective = &resolved.effective;
    tracing::debug!(
        profile = %effective.profile,
        strategy = effective.options.strategy.as_str(),
        rules = effective.policy.rules.len(),
        "resolved config"
    );

    let population = input.source.load().context("load accounts")?;
    tracing::info!(accounts = population.len(), "loaded accounts");

    let outcome = mfaguard_domain::run_checks(&population, effective);

    let finished_at = OffsetDateTime::now_utc();
    let run = RunMeta {
        started_at,
        ended_at: Some(finished_at),
        duration_ms: Some((finished_at - started_at).whole_milliseconds().max(0) as u64),
        source: Some(source.clone()),
    };

    let report = match outcome {
        Ok(domain_report) => {
            tracing::info!(
                violators = domain_report.data.violator_count,
                verdict = ?domain_report.verdict,
                "evaluated policy"
            );
            envelope(run, domain_report)
        }
        Err(EvaluationError::PolicyCheckUnavailable { reason }) => {
            tracing::warn!(%reason, "policy check unavailable");
            let data = ComplianceData {
                profile: effective.profile.clone(),
                strategy: effective.options.strategy.as_str().to_string(),
                accounts_scanned: population.len() as u32,
                ..ComplianceData::default()
            };
            inconclusive_report(run, &reason, data)
        }
        Err(err) => return Err(anyhow::Error::new(err).context("evaluate policy")),
    };

    Ok(CheckOutput {
        report,
        resolved_config: resolved,
    })
}

fn envelope(run: RunMeta, domain: DomainReport) -> ComplianceReport {
    let reasons = match domain.verdict {
        VerdictStatus::Pass => Vec::new(),
        _ => vec!["policy_violated".to_string()],
    };
    ComplianceReport {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: tool_meta(),
        run,
        verdict: Verdict {
            status: domain.verdict,
            counts: domain.counts,
            reasons,
        },
        findings: domain.findings,
        data: domain.data,
    }
}

/// Map verdict to exit code: 0 = pass/warn, 2 = fail, 1 = inconclusive.
pub fn verdict_exit_code(status: VerdictStatus) -> i32 {
    match status {
        VerdictStatus::Pass => 0,
        VerdictStatus::Warn => 0,
        VerdictStatus::Fail => 2,
        VerdictStatus::Inconclusive => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mfaguard_domain::model::{Account, Population};
    use mfaguard_types::ids;

    struct Fixed(Vec<(&'static str, bool)>);

    impl AccountSource for Fixed {
        fn load(&self) -> anyhow::Result<Population> {
            Ok(Population::from_mfa_pairs(self.0.iter().copied()))
        }

        fn describe(&self) -> String {
            "fixture".to_string()
        }
    }

    fn check(config: &str, accounts: Vec<(&'static str, bool)>) -> anyhow::Result<CheckOutput> {
        let source = Fixed(accounts);
        run_check(CheckInput {
            config_text: config,
            overrides: Overrides::default(),
            source: &source,
        })
    }

    #[test]
    fn empty_config_uses_defaults() {
        let output = check("", vec![("alice", true)]).expect("run_check");
        assert_eq!(output.resolved_config.effective.profile, "mfa-only");
        assert_eq!(output.report.verdict.status, VerdictStatus::Pass);
        assert_eq!(output.report.run.source.as_deref(), Some("fixture"));
        assert!(output.report.run.ended_at.is_some());
    }

    #[test]
    fn violation_fails_with_reason_and_ratio() {
        let output = check("", vec![("alice", true), ("bob", false), ("carol", true)])
            .expect("run_check");
        let report = output.report;
        assert_eq!(report.verdict.status, VerdictStatus::Fail);
        assert_eq!(report.verdict.reasons, vec!["policy_violated".to_string()]);
        assert_eq!(report.data.violators, vec!["bob".to_string()]);
        assert_eq!(report.findings.len(), 1);
        assert_eq!(report.findings[0].account.as_deref(), Some("bob"));
        let ratio = report.data.compliance_ratio.expect("ratio");
        assert!((ratio - 200.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn report_ratio_is_unrounded_while_console_rounds() {
        let output = check("", vec![("alice", true), ("bob", false), ("carol", true)])
            .expect("run_check");
        let bytes = crate::serialize_report(&output.report).expect("serialize");
        let json: serde_json::Value = serde_json::from_slice(&bytes).expect("parse");
        let ratio = json["data"]["compliance_ratio"].as_f64().expect("ratio");
        assert_ne!(ratio, 66.7);
        assert!((ratio - 200.0 / 3.0).abs() < 1e-9);

        let console = crate::render_console(&crate::to_renderable(&output.report));
        assert!(console.contains("Compliance: 66.7%"), "{console}");
    }

    #[test]
    fn audit_profile_warns_instead_of_failing() {
        let config = r#"
profile = "audit"

[rules."identity.password_rotation"]
enabled = false

[rules."identity.no_stale_admin"]
enabled = false
"#;
        let output = check(config, vec![("bob", false)]).expect("run_check");
        assert_eq!(output.report.verdict.status, VerdictStatus::Warn);
        assert_eq!(verdict_exit_code(output.report.verdict.status), 0);
    }

    #[test]
    fn exhausted_budget_is_inconclusive_not_an_error() {
        let output = check("solver_budget = 1", vec![("alice", true), ("bob", true)])
            .expect("run_check");
        let report = output.report;
        assert_eq!(report.verdict.status, VerdictStatus::Inconclusive);
        assert_eq!(report.findings[0].code, ids::CODE_CHECK_UNAVAILABLE);
        assert_eq!(report.data.accounts_scanned, 2);
        assert_eq!(report.data.compliance_ratio, None);
    }

    #[test]
    fn invalid_populations_are_errors() {
        let err = check("", vec![("alice", true), ("alice", false)]).unwrap_err();
        assert!(format!("{err:#}").contains("duplicate account identifier 'alice'"));

        let err = check("", Vec::new()).unwrap_err();
        assert!(format!("{err:#}").contains("population is empty"));
    }

    #[test]
    fn missing_attribute_for_strict_profile_is_an_error() {
        struct MfaOnly;
        impl AccountSource for MfaOnly {
            fn load(&self) -> anyhow::Result<Population> {
                Ok(Population::new(vec![Account::with_mfa("alice", true)]))
            }
            fn describe(&self) -> String {
                "mfa-only".to_string()
            }
        }
        let err = run_check(CheckInput {
            config_text: "profile = \"strict\"",
            overrides: Overrides::default(),
            source: &MfaOnly,
        })
        .unwrap_err();
        assert!(format!("{err:#}").contains("password_rotated"));
    }

    #[test]
    fn verdict_exit_codes() {
        assert_eq!(verdict_exit_code(VerdictStatus::Pass), 0);
        assert_eq!(verdict_exit_code(VerdictStatus::Warn), 0);
        assert_eq!(verdict_exit_code(VerdictStatus::Fail), 2);
        assert_eq!(verdict_exit_code(VerdictStatus::Inconclusive), 1);
    }
}
