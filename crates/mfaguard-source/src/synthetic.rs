use crate::{AccountSource, SERVICE_PREFIXES};
use mfaguard_domain::model::{Account, AccountKind, Population};
use mfaguard_types::ids;
use rand::rngs::StdRng;
use rand::seq::{IndexedRandom, index};
use rand::{Rng, SeedableRng};

const ADMIN_COUNT: usize = 20;
const SERVICE_COUNT: usize = 50;

const USER_INITIALS: &[&str] = &["j", "m", "s"];
const DEPARTMENTS: &[&str] = &["hr", "it", "finance", "sales", "dev", "qa"];
const USER_NUMBER_BASE: usize = 100;
const USER_NUMBER_SPAN: usize = 900;
const USER_NAME_SPACE: usize = USER_INITIALS.len() * DEPARTMENTS.len() * USER_NUMBER_SPAN;

/// A directory-shaped population generated from a seed.
///
/// Layout: 20 admins `adminNN` (95% MFA), 50 service accounts `<prefix>NNN` (80% MFA),
/// and regular users `<initial><dept>.<NNN>` (90% MFA) for the remainder. Smaller sizes
/// fill the blocks in that order. Service prefixes are the ones [`crate::infer_kind`]
/// recognises, so an exported population re-imports with the same kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SyntheticDirectory {
    pub size: usize,
    /// `None` draws a fresh seed per load; the seed used is logged.
    pub seed: Option<u64>,
}

impl SyntheticDirectory {
    pub fn new(size: usize, seed: Option<u64>) -> Self {
        Self { size, seed }
    }

    /// Generate the population for a fixed seed.
    pub fn generate(&self, seed: u64) -> anyhow::Result<Population> {
        let mut rng = StdRng::seed_from_u64(seed);
        let admins = self.size.min(ADMIN_COUNT);
        let services = (self.size - admins).min(SERVICE_COUNT);
        let users = self.size - admins - services;

        anyhow::ensure!(
            users <= USER_NAME_SPACE,
            "synthetic directory supports at most {} accounts",
            ADMIN_COUNT + SERVICE_COUNT + USER_NAME_SPACE
        );

        let mut accounts = Vec::with_capacity(self.size);
        for i in 0..admins {
            accounts.push(account(&mut rng, format!("admin{i:02}"), AccountKind::Admin, 0.95));
        }
        for i in 0..services {
            let prefix = SERVICE_PREFIXES.choose(&mut rng).copied().unwrap_or("svc_");
            accounts.push(account(
                &mut rng,
                format!("{prefix}{i:03}"),
                AccountKind::Service,
                0.80,
            ));
        }

        // Distinct slots of the name space, in random order.
        for slot in index::sample(&mut rng, USER_NAME_SPACE, users).into_vec() {
            accounts.push(account(&mut rng, user_name(slot), AccountKind::User, 0.90));
        }

        Ok(Population::new(accounts))
    }
}

impl AccountSource for SyntheticDirectory {
    fn load(&self) -> anyhow::Result<Population> {
        let seed = self.seed.unwrap_or_else(|| rand::rng().random());
        tracing::info!(size = self.size, seed, "generating synthetic directory");
        self.generate(seed)
    }

    fn describe(&self) -> String {
        match self.seed {
            Some(seed) => format!("synthetic:{}:seed={seed}", self.size),
            None => format!("synthetic:{}", self.size),
        }
    }
}

fn user_name(slot: usize) -> String {
    let per_initial = DEPARTMENTS.len() * USER_NUMBER_SPAN;
    let initial = USER_INITIALS[slot / per_initial];
    let dept = DEPARTMENTS[slot / USER_NUMBER_SPAN % DEPARTMENTS.len()];
    let number = USER_NUMBER_BASE + slot % USER_NUMBER_SPAN;
    format!("{initial}{dept}.{number}")
}

fn account(rng: &mut StdRng, name: String, kind: AccountKind, mfa_rate: f64) -> Account {
    let active_rate = if kind == AccountKind::Admin { 0.90 } else { 0.95 };
    let mfa = rng.random_bool(mfa_rate);
    let rotated = rng.random_bool(0.85);
    let active = rng.random_bool(active_rate);
    Account::new(name, kind)
        .with_attribute(ids::ATTR_MFA_ENABLED, mfa)
        .with_attribute(ids::ATTR_PASSWORD_ROTATED, rotated)
        .with_attribute(ids::ATTR_ACTIVE, active)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn same_seed_same_population() {
        let dir = SyntheticDirectory::new(500, Some(7));
        assert_eq!(dir.load().expect("first"), dir.load().expect("second"));
    }

    #[test]
    fn different_seeds_differ() {
        let a = SyntheticDirectory::new(500, Some(1)).load().expect("a");
        let b = SyntheticDirectory::new(500, Some(2)).load().expect("b");
        assert_ne!(a, b);
    }

    #[test]
    fn blocks_follow_directory_layout() {
        let p = SyntheticDirectory::new(100, Some(42)).load().expect("load");
        assert_eq!(p.len(), 100);
        let kinds: Vec<AccountKind> = p.iter().map(|a| a.kind).collect();
        assert!(kinds[..20].iter().all(|k| *k == AccountKind::Admin));
        assert!(kinds[20..70].iter().all(|k| *k == AccountKind::Service));
        assert!(kinds[70..].iter().all(|k| *k == AccountKind::User));
        assert_eq!(p.accounts[0].identifier, "admin00");
        assert_eq!(p.accounts[19].identifier, "admin19");
        assert!(p.accounts[20].identifier.ends_with("000"));
        for a in p.iter() {
            assert!(a.observed(ids::ATTR_MFA_ENABLED).is_some());
            assert!(a.observed(ids::ATTR_PASSWORD_ROTATED).is_some());
            assert!(a.observed(ids::ATTR_ACTIVE).is_some());
        }
    }

    #[test]
    fn small_sizes_fill_admins_first() {
        let p = SyntheticDirectory::new(5, Some(3)).load().expect("load");
        assert_eq!(p.len(), 5);
        assert!(p.iter().all(|a| a.kind == AccountKind::Admin));
        assert!(SyntheticDirectory::new(0, Some(3)).load().expect("load").is_empty());
    }

    #[test]
    fn oversize_request_is_rejected() {
        assert!(SyntheticDirectory::new(16_271, Some(1)).load().is_err());
        assert!(SyntheticDirectory::new(20_000, Some(1)).load().is_err());
    }

    #[test]
    fn full_name_space_generates_for_any_seed() {
        for seed in 0..5 {
            let p = SyntheticDirectory::new(16_270, Some(seed))
                .load()
                .expect("load at capacity");
            assert_eq!(p.len(), 16_270);
            let unique: HashSet<&str> = p.iter().map(|a| a.identifier.as_str()).collect();
            assert_eq!(unique.len(), p.len());
        }
    }

    #[test]
    fn user_slots_cover_the_name_space_edges() {
        assert_eq!(user_name(0), "jhr.100");
        assert_eq!(user_name(899), "jhr.999");
        assert_eq!(user_name(900), "jit.100");
        assert_eq!(user_name(USER_NAME_SPACE - 1), "sqa.999");
    }

    #[test]
    fn inferred_kinds_match_generated_kinds() {
        let p = SyntheticDirectory::new(300, Some(11)).load().expect("load");
        for a in p.iter() {
            assert_eq!(crate::infer_kind(&a.identifier), a.kind, "{}", a.identifier);
        }
    }

    #[test]
    fn describe_mentions_seed() {
        assert_eq!(
            SyntheticDirectory::new(10, Some(9)).describe(),
            "synthetic:10:seed=9"
        );
        assert_eq!(SyntheticDirectory::new(10, None).describe(), "synthetic:10");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn identifiers_are_unique(size in 0usize..1500, seed in any::<u64>()) {
            let p = SyntheticDirectory::new(size, Some(seed)).load().expect("load");
            let unique: HashSet<&str> = p.iter().map(|a| a.identifier.as_str()).collect();
            prop_assert_eq!(unique.len(), p.len());
            prop_assert_eq!(p.len(), size);
        }
    }
}
