use crate::model::{MfaguardConfigV1, RuleConfig};
use crate::presets::{self, RuleSpec};
use anyhow::Context;
use mfaguard_domain::model::AccountKind;
use mfaguard_domain::policy::{
    EffectiveConfig, EvaluationOptions, FailOn, Policy, PolicyRule, Requirement, SolverBudget,
    Strategy,
};
use mfaguard_types::{Severity, ids};
use std::collections::BTreeSet;

#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub profile: Option<String>,
    pub max_listed: Option<u32>,
    pub strategy: Option<String>,
}

#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    pub effective: EffectiveConfig,
}

pub fn resolve_config(
    cfg: MfaguardConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    let profile = overrides
        .profile
        .clone()
        .or(cfg.profile.clone())
        .unwrap_or_else(|| presets::DEFAULT_PROFILE.to_string());

    let mut preset = presets::preset(&profile)?;

    if let Some(ml) = overrides.max_listed.or(cfg.max_listed) {
        preset.max_listed = ml as usize;
    }

    let mut options = EvaluationOptions::default();
    if let Some(strategy) = overrides.strategy.as_deref().or(cfg.strategy.as_deref()) {
        options.strategy = parse_strategy(strategy)?;
    }
    if let Some(max_steps) = cfg.solver_budget {
        anyhow::ensure!(max_steps > 0, "solver_budget must be greater than zero");
        options.budget = SolverBudget { max_steps };
    }

    // per-rule overrides; unknown ids declare custom rules
    for (rule_id, rc) in cfg.rules.iter() {
        match preset.rules.get_mut(rule_id) {
            Some(spec) => apply_rule_config(rule_id, spec, rc)?,
            None => {
                let spec = custom_rule(rule_id, rc)?;
                preset.rules.insert(rule_id.clone(), spec);
            }
        }
    }

    if let Some(fail_on_s) = cfg.fail_on.as_deref() {
        preset.fail_on = parse_fail_on(fail_on_s)?;
    }

    let mut rules = Vec::new();
    for (rule_id, spec) in preset.rules.into_iter().filter(|(_, s)| s.enabled) {
        rules.push(compile_rule(&rule_id, spec)?);
    }

    Ok(ResolvedConfig {
        effective: EffectiveConfig {
            profile: preset.profile,
            fail_on: preset.fail_on,
            max_listed: preset.max_listed,
            options,
            policy: Policy::new(rules),
        },
    })
}

fn apply_rule_config(rule_id: &str, spec: &mut RuleSpec, rc: &RuleConfig) -> anyhow::Result<()> {
    if let Some(enabled) = rc.enabled {
        spec.enabled = enabled;
    }
    if let Some(sev) = rc.severity.as_deref() {
        spec.severity =
            parse_severity(sev).with_context(|| format!("invalid severity for {rule_id}"))?;
    }
    if let Some(attribute) = rc.attribute.as_deref() {
        anyhow::ensure!(!attribute.is_empty(), "empty attribute for {rule_id}");
        spec.attribute = attribute.to_string();
    }
    if let Some(code) = rc.code.as_deref() {
        spec.code = code.to_string();
    }
    if let Some(required) = rc.required {
        spec.required = required;
    }
    if let Some(kinds) = rc.applies_to.as_deref() {
        anyhow::ensure!(!kinds.is_empty(), "empty applies_to for {rule_id}");
        spec.applies_to =
            Some(parse_kinds(kinds).with_context(|| format!("invalid applies_to for {rule_id}"))?);
    }
    if !rc.exempt.is_empty() {
        spec.exempt = rc.exempt.clone();
    }
    Ok(())
}

fn custom_rule(rule_id: &str, rc: &RuleConfig) -> anyhow::Result<RuleSpec> {
    let attribute = rc
        .attribute
        .clone()
        .with_context(|| format!("rule {rule_id} is not built in and needs an `attribute`"))?;
    let mut spec = RuleSpec {
        enabled: true,
        severity: Severity::Error,
        code: ids::CODE_POLICY_VIOLATION.to_string(),
        attribute,
        required: true,
        applies_to: None,
        exempt: Vec::new(),
    };
    apply_rule_config(rule_id, &mut spec, rc)?;
    Ok(spec)
}

fn compile_rule(rule_id: &str, spec: RuleSpec) -> anyhow::Result<PolicyRule> {
    let requirement = match &spec.applies_to {
        None => Requirement::Fixed(spec.required),
        Some(kinds) => {
            let pick = |kind| kinds.contains(&kind).then_some(spec.required);
            Requirement::ByKind {
                admin: pick(AccountKind::Admin),
                service: pick(AccountKind::Service),
                user: pick(AccountKind::User),
            }
        }
    };
    PolicyRule::new(rule_id, spec.code, spec.attribute, requirement)
        .with_severity(spec.severity)
        .with_exempt(&spec.exempt)
        .with_context(|| format!("invalid exempt glob for {rule_id}"))
}

fn parse_kinds(values: &[String]) -> anyhow::Result<BTreeSet<AccountKind>> {
    values
        .iter()
        .map(|v| match v.as_str() {
            "admin" => Ok(AccountKind::Admin),
            "service" => Ok(AccountKind::Service),
            "user" => Ok(AccountKind::User),
            other => anyhow::bail!("unknown account kind: {other} (expected admin|service|user)"),
        })
        .collect()
}

fn parse_strategy(v: &str) -> anyhow::Result<Strategy> {
    match v {
        "solver" => Ok(Strategy::Solver),
        "direct" => Ok(Strategy::Direct),
        other => anyhow::bail!("unknown strategy: {other} (expected solver|direct)"),
    }
}

fn parse_severity(v: &str) -> anyhow::Result<Severity> {
    match v {
        "info" => Ok(Severity::Info),
        "warning" | "warn" => Ok(Severity::Warning),
        "error" => Ok(Severity::Error),
        other => anyhow::bail!("unknown severity: {other} (expected info|warning|error)"),
    }
}

fn parse_fail_on(v: &str) -> anyhow::Result<FailOn> {
    match v {
        "error" => Ok(FailOn::Error),
        "warning" | "warn" => Ok(FailOn::Warning),
        other => anyhow::bail!("unknown fail_on: {other} (expected error|warning)"),
    }
}
