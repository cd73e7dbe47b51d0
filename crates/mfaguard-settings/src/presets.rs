use mfaguard_domain::model::AccountKind;
use mfaguard_domain::policy::FailOn;
use mfaguard_types::{Severity, ids};
use std::collections::{BTreeMap, BTreeSet};

/// A rule before it is compiled into a [`mfaguard_domain::policy::PolicyRule`].
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct RuleSpec {
    pub enabled: bool,
    pub severity: Severity,
    pub code: String,
    pub attribute: String,
    pub required: bool,
    /// `None` binds every kind.
    pub applies_to: Option<BTreeSet<AccountKind>>,
    pub exempt: Vec<String>,
}

impl RuleSpec {
    fn builtin(code: &str, attribute: &str, enabled: bool, severity: Severity) -> Self {
        Self {
            enabled,
            severity,
            code: code.to_string(),
            attribute: attribute.to_string(),
            required: true,
            applies_to: None,
            exempt: Vec::new(),
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Preset {
    pub profile: String,
    pub fail_on: FailOn,
    pub max_listed: usize,
    pub rules: BTreeMap<String, RuleSpec>,
}

/// Preset profiles are opinionated defaults.
///
/// Keep these small. Anything site-specific belongs in `[rules.<id>]` tables.
pub(crate) fn preset(profile: &str) -> anyhow::Result<Preset> {
    match profile {
        "mfa-only" => Ok(build("mfa-only", false, Severity::Error)),
        "strict" => Ok(build("strict", true, Severity::Error)),
        "audit" => Ok(build("audit", true, Severity::Warning)),
        other => anyhow::bail!("unknown profile: {other} (expected mfa-only|strict|audit)"),
    }
}

pub(crate) const DEFAULT_PROFILE: &str = "mfa-only";

fn build(profile: &str, hygiene: bool, severity: Severity) -> Preset {
    let mut rules = BTreeMap::new();
    rules.insert(
        ids::CHECK_IDENTITY_MFA_REQUIRED.to_string(),
        RuleSpec::builtin(ids::CODE_MFA_DISABLED, ids::ATTR_MFA_ENABLED, true, severity),
    );
    rules.insert(
        ids::CHECK_IDENTITY_PASSWORD_ROTATION.to_string(),
        RuleSpec::builtin(
            ids::CODE_PASSWORD_STALE,
            ids::ATTR_PASSWORD_ROTATED,
            hygiene,
            severity,
        ),
    );
    let mut stale_admin =
        RuleSpec::builtin(ids::CODE_STALE_ADMIN, ids::ATTR_ACTIVE, hygiene, severity);
    stale_admin.applies_to = Some(BTreeSet::from([AccountKind::Admin]));
    rules.insert(ids::CHECK_IDENTITY_NO_STALE_ADMIN.to_string(), stale_admin);

    Preset {
        profile: profile.to_string(),
        fail_on: FailOn::Error,
        max_listed: 200,
        rules,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mfa_only_enables_just_the_mfa_rule() {
        let p = preset("mfa-only").expect("preset");
        let enabled: Vec<_> = p
            .rules
            .iter()
            .filter(|(_, r)| r.enabled)
            .map(|(id, _)| id.as_str())
            .collect();
        assert_eq!(enabled, vec![ids::CHECK_IDENTITY_MFA_REQUIRED]);
    }

    #[test]
    fn audit_downgrades_everything_to_warning() {
        let p = preset("audit").expect("preset");
        assert!(p.rules.values().all(|r| r.enabled));
        assert!(p.rules.values().all(|r| r.severity == Severity::Warning));
    }

    #[test]
    fn unknown_profile_is_an_error() {
        assert!(preset("lenient").is_err());
    }
}
