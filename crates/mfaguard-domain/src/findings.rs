use crate::fingerprint::fingerprint_for_violation;
use crate::report::Violation;
use mfaguard_types::{Finding, ids};
use serde_json::json;

/// One finding per violation, in violation order (population order, then rule order).
pub fn from_violations(violations: &[Violation]) -> Vec<Finding> {
    violations.iter().map(finding_for).collect()
}

fn finding_for(v: &Violation) -> Finding {
    Finding {
        severity: v.severity,
        check_id: v.rule_id.clone(),
        code: v.code.clone(),
        message: format!(
            "{} account '{}' has {} = {} (required: {})",
            v.kind.as_str(),
            v.account,
            v.attribute,
            v.observed,
            v.required
        ),
        account: Some(v.account.clone()),
        help: help_for(&v.rule_id).map(str::to_string),
        url: None,
        fingerprint: Some(fingerprint_for_violation(
            &v.rule_id,
            &v.code,
            &v.account,
            &v.attribute,
        )),
        data: json!({
            "account": v.account,
            "kind": v.kind.as_str(),
            "attribute": v.attribute,
            "observed": v.observed,
            "required": v.required,
        }),
    }
}

fn help_for(check_id: &str) -> Option<&'static str> {
    match check_id {
        ids::CHECK_IDENTITY_MFA_REQUIRED => {
            Some("Enroll the account in multi-factor authentication in the identity provider.")
        }
        ids::CHECK_IDENTITY_PASSWORD_ROTATION => {
            Some("Rotate the account's password or service credential.")
        }
        ids::CHECK_IDENTITY_NO_STALE_ADMIN => {
            Some("Disable the admin account or demote it until it is needed.")
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AccountKind;
    use mfaguard_types::Severity;

    #[test]
    fn finding_carries_account_payload_and_fingerprint() {
        let v = Violation {
            account: "bob".to_string(),
            kind: AccountKind::User,
            rule_id: ids::CHECK_IDENTITY_MFA_REQUIRED.to_string(),
            code: ids::CODE_MFA_DISABLED.to_string(),
            attribute: ids::ATTR_MFA_ENABLED.to_string(),
            severity: Severity::Error,
            observed: false,
            required: true,
        };
        let out = from_violations(std::slice::from_ref(&v));
        assert_eq!(out.len(), 1);
        let f = &out[0];
        assert_eq!(f.account.as_deref(), Some("bob"));
        assert_eq!(
            f.message,
            "user account 'bob' has mfa_enabled = false (required: true)"
        );
        assert_eq!(f.data["observed"], false);
        assert_eq!(f.data["required"], true);
        assert!(f.help.is_some());
        assert_eq!(f.fingerprint.as_ref().map(String::len), Some(64));
    }

    #[test]
    fn custom_rules_have_no_canned_help() {
        assert!(help_for("custom.vpn_enrolled").is_none());
    }
}
