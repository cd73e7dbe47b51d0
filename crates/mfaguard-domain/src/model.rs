use mfaguard_types::ids;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Coarse account classification used by conditional requirements.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    Admin,
    Service,
    #[default]
    User,
}

impl AccountKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AccountKind::Admin => "admin",
            AccountKind::Service => "service",
            AccountKind::User => "user",
        }
    }
}

/// One identity/principal with its observed security attributes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Account {
    pub identifier: String,
    pub kind: AccountKind,
    /// Observed boolean attributes keyed by attribute name (e.g. `mfa_enabled`).
    pub attributes: BTreeMap<String, bool>,
}

impl Account {
    pub fn new(identifier: impl Into<String>, kind: AccountKind) -> Self {
        Self {
            identifier: identifier.into(),
            kind,
            attributes: BTreeMap::new(),
        }
    }

    /// Shorthand for the single-attribute case: a user account with an MFA flag.
    pub fn with_mfa(identifier: impl Into<String>, mfa_enabled: bool) -> Self {
        Self::new(identifier, AccountKind::User).with_attribute(ids::ATTR_MFA_ENABLED, mfa_enabled)
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: bool) -> Self {
        self.attributes.insert(name.into(), value);
        self
    }

    pub fn observed(&self, attribute: &str) -> Option<bool> {
        self.attributes.get(attribute).copied()
    }
}

/// An ordered, immutable-for-the-pass snapshot of accounts.
///
/// Order is irrelevant to the compliance verdict but fixes the reporting order.
/// Uniqueness of identifiers is enforced at bind time, not here.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Population {
    pub accounts: Vec<Account>,
}

impl Population {
    pub fn new(accounts: Vec<Account>) -> Self {
        Self { accounts }
    }

    /// Build a single-attribute (`mfa_enabled`) population from `(identifier, observed)` pairs.
    pub fn from_mfa_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, bool)>,
        S: Into<String>,
    {
        Self {
            accounts: pairs
                .into_iter()
                .map(|(id, mfa)| Account::with_mfa(id, mfa))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Account> {
        self.accounts.iter()
    }
}

impl FromIterator<Account> for Population {
    fn from_iter<T: IntoIterator<Item = Account>>(iter: T) -> Self {
        Self {
            accounts: iter.into_iter().collect(),
        }
    }
}
