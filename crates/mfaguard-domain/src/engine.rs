use crate::error::EvaluationError;
use crate::findings;
use crate::model::Population;
use crate::policy::{EffectiveConfig, EvaluationOptions, FailOn, Policy, SolverBudget, Strategy};
use crate::predicate::{Binder, Binding};
use crate::report::{
    ComplianceResult, ComplianceStatus, DomainReport, RuleOutcome, Violation, compliance_ratio,
    counts_from_findings,
};
use crate::solver::{SatOutcome, Solver};
use mfaguard_types::{ComplianceData, Finding, RuleSummary, Severity, VerdictStatus};

/// Evaluate `population` against `policy` with the joint satisfiability check.
pub fn evaluate(
    population: &Population,
    policy: &Policy,
) -> Result<ComplianceResult, EvaluationError> {
    evaluate_with(population, policy, &EvaluationOptions::default())
}

/// Evaluate with a per-binding equality scan instead of the solver. Same contract.
pub fn evaluate_direct(
    population: &Population,
    policy: &Policy,
) -> Result<ComplianceResult, EvaluationError> {
    let options = EvaluationOptions {
        strategy: Strategy::Direct,
        ..EvaluationOptions::default()
    };
    evaluate_with(population, policy, &options)
}

/// Single-policy call surface: every account's `mfa_enabled` must equal `required`.
pub fn evaluate_accounts(
    accounts: &[(String, bool)],
    required: bool,
) -> Result<ComplianceResult, EvaluationError> {
    let population = Population::from_mfa_pairs(accounts.iter().map(|(id, v)| (id.as_str(), *v)));
    evaluate(&population, &Policy::mfa_only(required))
}

pub fn evaluate_with(
    population: &Population,
    policy: &Policy,
    options: &EvaluationOptions,
) -> Result<ComplianceResult, EvaluationError> {
    let bindings = bind_population(population, policy)?;

    let conflicting = match options.strategy {
        Strategy::Solver => solve_conflicts(&bindings, options.budget)?,
        Strategy::Direct => scan_conflicts(&bindings),
    };

    build_result(population, policy, &bindings, &conflicting)
}

/// Full check run: evaluate, then derive findings, verdict and report data.
pub fn run_checks(
    population: &Population,
    cfg: &EffectiveConfig,
) -> Result<DomainReport, EvaluationError> {
    let result = evaluate_with(population, &cfg.policy, &cfg.options)?;

    let findings = findings::from_violations(&result.violations);
    let total = findings.len() as u32;

    // Verdict and counts cover every finding, not only the emitted ones.
    let verdict = compute_verdict(&result, &findings, cfg.fail_on);
    let counts = counts_from_findings(&findings);

    let mut emitted = findings;
    let mut truncated_reason: Option<String> = None;
    if emitted.len() > cfg.max_listed {
        emitted.truncate(cfg.max_listed);
        truncated_reason = Some(format!(
            "findings truncated to max_listed={}",
            cfg.max_listed
        ));
    }

    let data = ComplianceData {
        profile: cfg.profile.clone(),
        strategy: cfg.options.strategy.as_str().to_string(),
        accounts_scanned: result.accounts_evaluated as u32,
        violator_count: result.violator_count() as u32,
        compliance_ratio: Some(result.compliance_ratio),
        violators: result.violators.clone(),
        rules: result
            .rules
            .iter()
            .map(|r| RuleSummary {
                check_id: r.rule_id.clone(),
                attribute: r.attribute.clone(),
                accounts_bound: r.accounts_bound as u32,
                violator_count: r.violators.len() as u32,
            })
            .collect(),
        findings_total: total,
        findings_emitted: emitted.len() as u32,
        truncated_reason,
    };

    Ok(DomainReport {
        verdict,
        findings: emitted,
        data,
        counts,
        result,
    })
}

fn bind_population<'a>(
    population: &'a Population,
    policy: &Policy,
) -> Result<Vec<Binding<'a>>, EvaluationError> {
    if population.is_empty() {
        return Err(EvaluationError::EmptyPopulation);
    }

    let mut binder = Binder::new();
    let mut bindings = Vec::new();
    for account in population.iter() {
        bindings.extend(binder.bind_account(account, &policy.rules)?);
    }
    Ok(bindings)
}

/// Indices of conflicting bindings, ascending.
fn scan_conflicts(bindings: &[Binding<'_>]) -> Vec<usize> {
    bindings
        .iter()
        .enumerate()
        .filter(|(_, b)| b.conflicts())
        .map(|(i, _)| i)
        .collect()
}

/// Joint check first; only an unsatisfiable constraint set is diagnosed per binding.
fn solve_conflicts(
    bindings: &[Binding<'_>],
    budget: SolverBudget,
) -> Result<Vec<usize>, EvaluationError> {
    let mut joint = Solver::new(budget);
    for b in bindings {
        joint.add_constraints(&b.constraints);
    }

    match joint.check() {
        SatOutcome::Satisfiable(_) => return Ok(Vec::new()),
        SatOutcome::Unknown { steps } => return Err(budget_exhausted("joint check", steps)),
        SatOutcome::Unsatisfiable => {}
    }

    let mut conflicting = Vec::new();
    for (i, b) in bindings.iter().enumerate() {
        let mut local = Solver::new(budget);
        local.add_constraints(&b.constraints);
        match local.check() {
            SatOutcome::Unsatisfiable => conflicting.push(i),
            SatOutcome::Satisfiable(_) => {}
            SatOutcome::Unknown { steps } => {
                return Err(budget_exhausted(&b.account.identifier, steps));
            }
        }
    }

    if conflicting.is_empty() {
        return Err(EvaluationError::PolicyCheckUnavailable {
            reason: "constraint set is unsatisfiable but no single account conflicts".to_string(),
        });
    }
    Ok(conflicting)
}

fn budget_exhausted(what: &str, steps: u64) -> EvaluationError {
    EvaluationError::PolicyCheckUnavailable {
        reason: format!("solver budget exhausted during {what} after {steps} steps"),
    }
}

fn build_result(
    population: &Population,
    policy: &Policy,
    bindings: &[Binding<'_>],
    conflicting: &[usize],
) -> Result<ComplianceResult, EvaluationError> {
    let mut rules: Vec<RuleOutcome> = policy
        .rules
        .iter()
        .map(|r| RuleOutcome {
            rule_id: r.id.clone(),
            attribute: r.attribute.clone(),
            accounts_bound: 0,
            violators: Vec::new(),
        })
        .collect();
    for b in bindings {
        rules[b.rule_index].accounts_bound += 1;
    }

    let mut violators: Vec<String> = Vec::new();
    let mut violations = Vec::with_capacity(conflicting.len());
    for &i in conflicting {
        let b = &bindings[i];
        let rule = &policy.rules[b.rule_index];
        let id = &b.account.identifier;

        rules[b.rule_index].violators.push(id.clone());
        // Bindings of one account are contiguous, so a last-element check dedups.
        if violators.last() != Some(id) {
            violators.push(id.clone());
        }
        violations.push(Violation {
            account: id.clone(),
            kind: b.account.kind,
            rule_id: rule.id.clone(),
            code: rule.code.clone(),
            attribute: rule.attribute.clone(),
            severity: rule.severity,
            observed: b.observed_value,
            required: b.required_value,
        });
    }

    let ratio = compliance_ratio(population.len(), violators.len())
        .ok_or(EvaluationError::EmptyPopulation)?;
    let overall_status = if violations.is_empty() {
        ComplianceStatus::Satisfied
    } else {
        ComplianceStatus::Violated
    };

    Ok(ComplianceResult {
        overall_status,
        violators,
        violations,
        rules,
        accounts_evaluated: population.len(),
        compliance_ratio: ratio,
    })
}

fn compute_verdict(result: &ComplianceResult, findings: &[Finding], fail_on: FailOn) -> VerdictStatus {
    if result.is_satisfied() {
        return VerdictStatus::Pass;
    }

    let has_error = findings.iter().any(|f| f.severity == Severity::Error);
    if has_error {
        return VerdictStatus::Fail;
    }

    let has_warn = findings.iter().any(|f| f.severity == Severity::Warning);
    if has_warn {
        return match fail_on {
            FailOn::Warning => VerdictStatus::Fail,
            FailOn::Error => VerdictStatus::Warn,
        };
    }

    VerdictStatus::Pass
}
