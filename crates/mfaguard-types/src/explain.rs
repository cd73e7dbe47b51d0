//! Explain registry for checks and codes.
//!
//! Maps check IDs and codes to human-readable explanations with remediation guidance.

use crate::ids;

/// Explanation entry for a check or code.
#[derive(Debug, Clone)]
pub struct Explanation {
    /// Short description of the check/code.
    pub title: &'static str,
    /// What the check does and why it exists.
    pub description: &'static str,
    /// How to fix violations.
    pub remediation: &'static str,
    /// Before/after inventory examples.
    pub examples: ExamplePair,
}

/// Before and after inventory examples.
#[derive(Debug, Clone)]
pub struct ExamplePair {
    /// Inventory entry that would trigger a finding.
    pub before: &'static str,
    /// Inventory entry that passes the check.
    pub after: &'static str,
}

/// Look up an explanation by check_id or code.
///
/// Returns `None` if the identifier is not recognized.
pub fn lookup_explanation(identifier: &str) -> Option<Explanation> {
    match identifier {
        ids::CHECK_IDENTITY_MFA_REQUIRED | ids::CODE_MFA_DISABLED => Some(explain_mfa_required()),
        ids::CHECK_IDENTITY_PASSWORD_ROTATION | ids::CODE_PASSWORD_STALE => {
            Some(explain_password_rotation())
        }
        ids::CHECK_IDENTITY_NO_STALE_ADMIN | ids::CODE_STALE_ADMIN => {
            Some(explain_no_stale_admin())
        }
        ids::CODE_CHECK_UNAVAILABLE => Some(explain_check_unavailable()),
        _ => None,
    }
}

/// List all known check IDs.
pub fn all_check_ids() -> &'static [&'static str] {
    &[
        ids::CHECK_IDENTITY_MFA_REQUIRED,
        ids::CHECK_IDENTITY_PASSWORD_ROTATION,
        ids::CHECK_IDENTITY_NO_STALE_ADMIN,
    ]
}

/// List all known codes.
pub fn all_codes() -> &'static [&'static str] {
    &[
        ids::CODE_MFA_DISABLED,
        ids::CODE_PASSWORD_STALE,
        ids::CODE_STALE_ADMIN,
        ids::CODE_CHECK_UNAVAILABLE,
    ]
}

fn explain_mfa_required() -> Explanation {
    Explanation {
        title: "Mandatory Multi-Factor Authentication",
        description: "\
Every account in scope must have multi-factor authentication enabled.

Accounts without MFA can be taken over with a single leaked or guessed password:
- Password spraying against directory services succeeds against any account without a second factor
- Service accounts are rarely monitored, so a takeover goes unnoticed
- A single admin account without MFA undermines the whole tenant",
        remediation: "\
Enroll the account in MFA in the identity provider, then re-export the inventory.

Break-glass accounts that cannot carry MFA should be listed in the rule's
`exempt` globs in mfaguard.toml so the exception is explicit and reviewed.",
        examples: ExamplePair {
            before: r#"{ "id": "bob", "kind": "user", "mfa_enabled": false }"#,
            after: r#"{ "id": "bob", "kind": "user", "mfa_enabled": true }"#,
        },
    }
}

fn explain_password_rotation() -> Explanation {
    Explanation {
        title: "Password Rotation",
        description: "\
Every account in scope must have rotated its password within the directory's
rotation window. The inventory exporter records this as `password_rotated`.",
        remediation: "\
Force a password change at next sign-in, or rotate the service credential and
update the consumers that hold it.",
        examples: ExamplePair {
            before: r#"{ "id": "svc_007", "kind": "service", "mfa_enabled": true, "password_rotated": false }"#,
            after: r#"{ "id": "svc_007", "kind": "service", "mfa_enabled": true, "password_rotated": true }"#,
        },
    }
}

fn explain_no_stale_admin() -> Explanation {
    Explanation {
        title: "No Stale Admin Accounts",
        description: "\
Administrative accounts must be in active use. An admin account that has not
signed in recently is standing privilege nobody is watching.

The rule applies to accounts of kind `admin` only; other kinds are not bound.",
        remediation: "\
Disable or remove the admin account, or demote it to a regular account until it
is needed again.",
        examples: ExamplePair {
            before: r#"{ "id": "admin07", "kind": "admin", "mfa_enabled": true, "active": false }"#,
            after: r#"{ "id": "admin07", "kind": "admin", "mfa_enabled": true, "active": true }"#,
        },
    }
}

fn explain_check_unavailable() -> Explanation {
    Explanation {
        title: "Policy Check Unavailable",
        description: "\
The compliance engine could not reach a verdict, typically because the solver
exhausted its work budget. The report is marked `inconclusive`: it is neither a
pass nor a fail.",
        remediation: "\
Raise `solver_budget` in mfaguard.toml, or switch `strategy` to `direct` for
policies made only of per-account rules.",
        examples: ExamplePair {
            before: "solver_budget = 10",
            after: "solver_budget = 1000000",
        },
    }
}
