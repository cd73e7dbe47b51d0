//! Property-based tests for the domain crate.
//!
//! These tests use proptest to verify invariants around:
//! - Exactness and ordering of the violator list
//! - Equivalence of the solver path and the direct scan
//! - Compliance ratio bounds

use crate::engine::{evaluate, evaluate_direct, evaluate_with};
use crate::error::{EvaluationError, InvalidAccountError};
use crate::model::{Account, AccountKind, Population};
use crate::policy::{EvaluationOptions, Policy, Strategy as EvalStrategy};
use crate::report::ComplianceStatus;
use crate::test_support::strict_policy;
use mfaguard_types::ids;
use proptest::prelude::*;
use std::collections::BTreeSet;

// ============================================================================
// Strategies for generating arbitrary values
// ============================================================================

fn arb_kind() -> impl Strategy<Value = AccountKind> {
    prop_oneof![
        Just(AccountKind::Admin),
        Just(AccountKind::Service),
        Just(AccountKind::User),
    ]
}

/// Populations with unique identifiers: flags are attached to a deduplicated name set.
fn arb_mfa_population() -> impl Strategy<Value = Vec<(String, bool)>> {
    prop::collection::btree_set("[a-z][a-z0-9_.]{0,11}", 1..40).prop_flat_map(|names| {
        let names: Vec<String> = names.into_iter().collect();
        let len = names.len();
        (Just(names), prop::collection::vec(any::<bool>(), len))
            .prop_map(|(names, flags)| names.into_iter().zip(flags).collect())
    })
}

fn arb_strict_population() -> impl Strategy<Value = Population> {
    prop::collection::btree_set("[a-z][a-z0-9_]{0,9}", 1..30).prop_flat_map(|names| {
        let len = names.len();
        (
            Just(names.into_iter().collect::<Vec<_>>()),
            prop::collection::vec((arb_kind(), any::<bool>(), any::<bool>(), any::<bool>()), len),
        )
            .prop_map(|(names, attrs)| {
                names
                    .into_iter()
                    .zip(attrs)
                    .map(|(name, (kind, mfa, rotated, active))| {
                        Account::new(name, kind)
                            .with_attribute(ids::ATTR_MFA_ENABLED, mfa)
                            .with_attribute(ids::ATTR_PASSWORD_ROTATED, rotated)
                            .with_attribute(ids::ATTR_ACTIVE, active)
                    })
                    .collect()
            })
    })
}

fn population_of(pairs: &[(String, bool)]) -> Population {
    Population::from_mfa_pairs(pairs.iter().map(|(n, v)| (n.as_str(), *v)))
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn violators_are_exactly_the_false_accounts_in_order(pairs in arb_mfa_population()) {
        let result = evaluate(&population_of(&pairs), &Policy::mfa_only(true)).unwrap();

        let expected: Vec<String> = pairs
            .iter()
            .filter(|(_, v)| !*v)
            .map(|(n, _)| n.clone())
            .collect();
        prop_assert_eq!(&result.violators, &expected);

        if expected.is_empty() {
            prop_assert_eq!(result.overall_status, ComplianceStatus::Satisfied);
        } else {
            prop_assert_eq!(result.overall_status, ComplianceStatus::Violated);
        }
    }

    #[test]
    fn ratio_hits_bounds_exactly_at_the_extremes(pairs in arb_mfa_population()) {
        let result = evaluate(&population_of(&pairs), &Policy::mfa_only(true)).unwrap();
        prop_assert!((0.0..=100.0).contains(&result.compliance_ratio));
        prop_assert_eq!(result.compliance_ratio == 100.0, result.violators.is_empty());
        prop_assert_eq!(result.compliance_ratio == 0.0, result.violators.len() == pairs.len());
    }

    #[test]
    fn solver_and_direct_scan_agree_on_single_policy(pairs in arb_mfa_population()) {
        let population = population_of(&pairs);
        let policy = Policy::mfa_only(true);
        prop_assert_eq!(
            evaluate(&population, &policy).unwrap(),
            evaluate_direct(&population, &policy).unwrap()
        );
    }

    #[test]
    fn solver_and_direct_scan_agree_on_strict_policy(population in arb_strict_population()) {
        let policy = strict_policy();
        let solver = evaluate_with(
            &population,
            &policy,
            &EvaluationOptions { strategy: EvalStrategy::Solver, ..EvaluationOptions::default() },
        ).unwrap();
        let direct = evaluate_direct(&population, &policy).unwrap();
        prop_assert_eq!(&solver, &direct);

        let unique: BTreeSet<&String> = solver.violators.iter().collect();
        prop_assert_eq!(unique.len(), solver.violators.len());
    }

    #[test]
    fn any_duplicate_is_rejected(pairs in arb_mfa_population(), pick in any::<prop::sample::Index>()) {
        let mut pairs = pairs;
        let dup = pairs[pick.index(pairs.len())].clone();
        pairs.push((dup.0.clone(), !dup.1));

        let err = evaluate(&population_of(&pairs), &Policy::mfa_only(true)).unwrap_err();
        prop_assert_eq!(
            err,
            EvaluationError::InvalidAccount(InvalidAccountError::DuplicateIdentifier {
                identifier: dup.0,
            })
        );
    }
}
