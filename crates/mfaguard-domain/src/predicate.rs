//! Predicate model: accounts and requirements as boolean propositions.
//!
//! Each (account, rule) pair becomes two propositions, the observed value and the
//! required value, tied together by equality constraints. The observed and required
//! sides stay separate so conditional and cross-account requirements can be expressed
//! with the same constraint vocabulary.

use crate::error::InvalidAccountError;
use crate::model::Account;
use crate::policy::PolicyRule;
use std::collections::HashSet;
use std::fmt;

/// A boolean variable in the constraint space of one evaluation pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Proposition(u32);

impl Proposition {
    pub fn index(self) -> u32 {
        self.0
    }
}

/// Allocates propositions and remembers their names for diagnostics.
#[derive(Clone, Debug, Default)]
pub struct PropositionTable {
    names: Vec<String>,
}

impl PropositionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fresh(&mut self, name: impl Into<String>) -> Proposition {
        let id = self.names.len() as u32;
        self.names.push(name.into());
        Proposition(id)
    }

    pub fn name(&self, prop: Proposition) -> Option<&str> {
        self.names.get(prop.0 as usize).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Term {
    Prop(Proposition),
    Const(bool),
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Prop(p) => write!(f, "p{}", p.0),
            Term::Const(v) => write!(f, "{v}"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Constraint {
    Equals(Term, Term),
}

impl Constraint {
    pub fn equals(lhs: Term, rhs: Term) -> Self {
        Constraint::Equals(lhs, rhs)
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::Equals(a, b) => write!(f, "{a} == {b}"),
        }
    }
}

/// Propositions and constraints for one (account, rule) pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Binding<'a> {
    pub account: &'a Account,
    pub rule_index: usize,
    pub observed: Proposition,
    pub required: Proposition,
    pub observed_value: bool,
    pub required_value: bool,
    /// `{ observed == observed_value, required == required_value, observed == required }`.
    pub constraints: Vec<Constraint>,
}

impl Binding<'_> {
    /// Direct evaluation of the binding, without a solver.
    pub fn conflicts(&self) -> bool {
        self.observed_value != self.required_value
    }
}

/// Binds accounts of one population, enforcing identifier validity and uniqueness.
#[derive(Debug, Default)]
pub struct Binder {
    table: PropositionTable,
    seen: HashSet<String>,
    admitted: usize,
}

impl Binder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(&self) -> &PropositionTable {
        &self.table
    }

    /// Validate `account` against the population seen so far and bind it to every
    /// rule that applies to it. Rules that do not apply produce no binding.
    pub fn bind_account<'a>(
        &mut self,
        account: &'a Account,
        rules: &[PolicyRule],
    ) -> Result<Vec<Binding<'a>>, InvalidAccountError> {
        let position = self.admitted;
        if account.identifier.is_empty() {
            return Err(InvalidAccountError::EmptyIdentifier { position });
        }
        if !self.seen.insert(account.identifier.clone()) {
            return Err(InvalidAccountError::DuplicateIdentifier {
                identifier: account.identifier.clone(),
            });
        }
        self.admitted += 1;

        let mut out = Vec::new();
        for (rule_index, rule) in rules.iter().enumerate() {
            if let Some(binding) = self.bind(account, rule_index, rule)? {
                out.push(binding);
            }
        }
        Ok(out)
    }

    fn bind<'a>(
        &mut self,
        account: &'a Account,
        rule_index: usize,
        rule: &PolicyRule,
    ) -> Result<Option<Binding<'a>>, InvalidAccountError> {
        let Some(required_value) = rule.required_for(account) else {
            return Ok(None);
        };
        let observed_value = account.observed(&rule.attribute).ok_or_else(|| {
            InvalidAccountError::MissingAttribute {
                identifier: account.identifier.clone(),
                attribute: rule.attribute.clone(),
            }
        })?;

        let observed = self
            .table
            .fresh(format!("{}.{}", account.identifier, rule.attribute));
        let required = self
            .table
            .fresh(format!("{}.{}.required", account.identifier, rule.attribute));

        let constraints = vec![
            Constraint::equals(Term::Prop(observed), Term::Const(observed_value)),
            Constraint::equals(Term::Prop(required), Term::Const(required_value)),
            Constraint::equals(Term::Prop(observed), Term::Prop(required)),
        ];

        Ok(Some(Binding {
            account,
            rule_index,
            observed,
            required,
            observed_value,
            required_value,
            constraints,
        }))
    }
}
