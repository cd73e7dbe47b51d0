use crate::model::Population;
use crate::policy::{EffectiveConfig, EvaluationOptions, FailOn, Policy, PolicyRule, Requirement};
use mfaguard_types::ids;

pub fn mfa_population(pairs: &[(&str, bool)]) -> Population {
    Population::from_mfa_pairs(pairs.iter().copied())
}

/// MFA for everyone, password rotation for everyone, activity for admins.
pub fn strict_policy() -> Policy {
    Policy::new(vec![
        PolicyRule::mfa_required(true),
        PolicyRule::new(
            ids::CHECK_IDENTITY_PASSWORD_ROTATION,
            ids::CODE_PASSWORD_STALE,
            ids::ATTR_PASSWORD_ROTATED,
            Requirement::Fixed(true),
        ),
        PolicyRule::new(
            ids::CHECK_IDENTITY_NO_STALE_ADMIN,
            ids::CODE_STALE_ADMIN,
            ids::ATTR_ACTIVE,
            Requirement::ByKind {
                admin: Some(true),
                service: None,
                user: None,
            },
        ),
    ])
}

pub fn config_with_policy(policy: Policy, fail_on: FailOn) -> EffectiveConfig {
    EffectiveConfig {
        profile: "test".to_string(),
        fail_on,
        max_listed: 200,
        options: EvaluationOptions::default(),
        policy,
    }
}
