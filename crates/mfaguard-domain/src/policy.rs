use crate::model::{Account, AccountKind};
use globset::{Glob, GlobSet, GlobSetBuilder};
use mfaguard_types::{Severity, ids};
use std::fmt;
use std::sync::Arc;

/// Per-account required-value function for the generalized mode.
///
/// `None` means the rule does not apply to the account.
pub type RequirementFn = Arc<dyn Fn(&Account) -> Option<bool> + Send + Sync>;

/// The value an attribute must hold, possibly depending on the account.
#[derive(Clone)]
pub enum Requirement {
    /// Every account must hold this value.
    Fixed(bool),
    /// Required value per account kind; `None` leaves that kind unbound.
    ByKind {
        admin: Option<bool>,
        service: Option<bool>,
        user: Option<bool>,
    },
    /// Arbitrary per-account function.
    Custom(RequirementFn),
}

impl Requirement {
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&Account) -> Option<bool> + Send + Sync + 'static,
    {
        Requirement::Custom(Arc::new(f))
    }

    pub fn required_for(&self, account: &Account) -> Option<bool> {
        match self {
            Requirement::Fixed(v) => Some(*v),
            Requirement::ByKind {
                admin,
                service,
                user,
            } => match account.kind {
                AccountKind::Admin => *admin,
                AccountKind::Service => *service,
                AccountKind::User => *user,
            },
            Requirement::Custom(f) => f(account),
        }
    }
}

impl fmt::Debug for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Requirement::Fixed(v) => f.debug_tuple("Fixed").field(v).finish(),
            Requirement::ByKind {
                admin,
                service,
                user,
            } => f
                .debug_struct("ByKind")
                .field("admin", admin)
                .field("service", service)
                .field("user", user)
                .finish(),
            Requirement::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// One boolean predicate every in-scope account must satisfy.
#[derive(Clone, Debug)]
pub struct PolicyRule {
    /// Stable check id, e.g. `identity.mfa_required`.
    pub id: String,
    /// Finding code emitted for violations of this rule.
    pub code: String,
    /// Observed attribute the rule constrains.
    pub attribute: String,
    pub requirement: Requirement,
    pub severity: Severity,
    exempt_patterns: Vec<String>,
    exempt: Option<GlobSet>,
}

impl PolicyRule {
    pub fn new(
        id: impl Into<String>,
        code: impl Into<String>,
        attribute: impl Into<String>,
        requirement: Requirement,
    ) -> Self {
        Self {
            id: id.into(),
            code: code.into(),
            attribute: attribute.into(),
            requirement,
            severity: Severity::Error,
            exempt_patterns: Vec::new(),
            exempt: None,
        }
    }

    /// The shipped policy: `mfa_enabled` must equal `required` for every account.
    pub fn mfa_required(required: bool) -> Self {
        Self::new(
            ids::CHECK_IDENTITY_MFA_REQUIRED,
            ids::CODE_MFA_DISABLED,
            ids::ATTR_MFA_ENABLED,
            Requirement::Fixed(required),
        )
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Exempt identifiers matching any of the glob patterns (case-sensitive).
    pub fn with_exempt(mut self, patterns: &[String]) -> Result<Self, globset::Error> {
        if patterns.is_empty() {
            self.exempt_patterns.clear();
            self.exempt = None;
            return Ok(self);
        }
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            builder.add(Glob::new(pattern)?);
        }
        self.exempt = Some(builder.build()?);
        self.exempt_patterns = patterns.to_vec();
        Ok(self)
    }

    pub fn exempt_patterns(&self) -> &[String] {
        &self.exempt_patterns
    }

    pub fn is_exempt(&self, identifier: &str) -> bool {
        self.exempt
            .as_ref()
            .map(|set| set.is_match(identifier))
            .unwrap_or(false)
    }

    /// Required value for `account`, or `None` when the rule does not bind it.
    pub fn required_for(&self, account: &Account) -> Option<bool> {
        if self.is_exempt(&account.identifier) {
            return None;
        }
        self.requirement.required_for(account)
    }
}

/// An ordered conjunction of rules.
#[derive(Clone, Debug, Default)]
pub struct Policy {
    pub rules: Vec<PolicyRule>,
}

impl Policy {
    pub fn new(rules: Vec<PolicyRule>) -> Self {
        Self { rules }
    }

    /// Single-policy mode: mandatory MFA with the given required value.
    pub fn mfa_only(required: bool) -> Self {
        Self {
            rules: vec![PolicyRule::mfa_required(required)],
        }
    }

    pub fn rule(&self, id: &str) -> Option<&PolicyRule> {
        self.rules.iter().find(|r| r.id == id)
    }
}

/// How the evaluator decides compliance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Strategy {
    /// Joint satisfiability check over the full constraint set.
    #[default]
    Solver,
    /// Per-binding equality scan. Same contract, no search.
    Direct,
}

impl Strategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::Solver => "solver",
            Strategy::Direct => "direct",
        }
    }
}

/// Work limit for one satisfiability check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SolverBudget {
    pub max_steps: u64,
}

impl Default for SolverBudget {
    fn default() -> Self {
        Self {
            max_steps: 1_000_000,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EvaluationOptions {
    pub strategy: Strategy,
    pub budget: SolverBudget,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailOn {
    Error,
    Warning,
}

/// Everything the engine needs for a full check run.
#[derive(Clone, Debug)]
pub struct EffectiveConfig {
    pub profile: String,
    pub fail_on: FailOn,
    /// Maximum number of findings emitted before truncation.
    pub max_listed: usize,
    pub options: EvaluationOptions,
    pub policy: Policy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn by_kind_leaves_unlisted_kinds_unbound() {
        let req = Requirement::ByKind {
            admin: Some(true),
            service: None,
            user: Some(false),
        };
        let admin = Account::new("admin01", AccountKind::Admin);
        let svc = Account::new("svc_001", AccountKind::Service);
        let user = Account::new("jdev.101", AccountKind::User);
        assert_eq!(req.required_for(&admin), Some(true));
        assert_eq!(req.required_for(&svc), None);
        assert_eq!(req.required_for(&user), Some(false));
    }

    #[test]
    fn exempt_globs_unbind_matching_accounts() {
        let rule = PolicyRule::mfa_required(true)
            .with_exempt(&["breakglass_*".to_string()])
            .expect("valid glob");
        let exempt = Account::with_mfa("breakglass_01", false);
        let normal = Account::with_mfa("alice", false);
        assert_eq!(rule.required_for(&exempt), None);
        assert_eq!(rule.required_for(&normal), Some(true));
        assert_eq!(rule.exempt_patterns(), ["breakglass_*".to_string()]);
    }

    #[test]
    fn invalid_exempt_glob_is_rejected() {
        assert!(
            PolicyRule::mfa_required(true)
                .with_exempt(&["[unclosed".to_string()])
                .is_err()
        );
    }

    #[test]
    fn custom_requirement_sees_the_account() {
        let req = Requirement::custom(|a| Some(a.identifier.starts_with("admin")));
        assert_eq!(req.required_for(&Account::with_mfa("admin02", true)), Some(true));
        assert_eq!(req.required_for(&Account::with_mfa("bob", true)), Some(false));
        assert_eq!(format!("{req:?}"), "Custom(..)");
    }
}
