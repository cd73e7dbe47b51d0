//! A small propositional satisfiability checker.
//!
//! Constraints are lowered to CNF clauses and checked with DPLL (unit propagation plus
//! chronological backtracking). Variable choice is deterministic: the lowest unassigned
//! proposition is decided `true` first. Every clause visit counts against the budget;
//! exhausting it yields [`SatOutcome::Unknown`], never a verdict.

use crate::policy::SolverBudget;
use crate::predicate::{Constraint, Proposition, Term};
use std::collections::{BTreeMap, HashMap};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Literal {
    pub prop: Proposition,
    pub positive: bool,
}

impl Literal {
    pub fn new(prop: Proposition, positive: bool) -> Self {
        Self { prop, positive }
    }

    pub fn negated(self) -> Self {
        Self {
            prop: self.prop,
            positive: !self.positive,
        }
    }
}

/// A satisfying assignment.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Assignment {
    values: BTreeMap<Proposition, bool>,
}

impl Assignment {
    pub fn value(&self, prop: Proposition) -> Option<bool> {
        self.values.get(&prop).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SatOutcome {
    Satisfiable(Assignment),
    Unsatisfiable,
    /// Budget exhausted before a verdict.
    Unknown { steps: u64 },
}

#[derive(Clone, Copy, Debug)]
struct TrailEntry {
    var: usize,
    value: bool,
    decision: bool,
}

enum Propagation {
    Stable,
    Conflict,
    Exhausted,
}

#[derive(Clone, Debug, Default)]
pub struct Solver {
    budget: SolverBudget,
    index: HashMap<Proposition, usize>,
    props: Vec<Proposition>,
    clauses: Vec<Vec<(usize, bool)>>,
}

impl Solver {
    pub fn new(budget: SolverBudget) -> Self {
        Self {
            budget,
            ..Self::default()
        }
    }

    pub fn num_propositions(&self) -> usize {
        self.props.len()
    }

    pub fn num_clauses(&self) -> usize {
        self.clauses.len()
    }

    pub fn add_constraints<'c, I>(&mut self, constraints: I)
    where
        I: IntoIterator<Item = &'c Constraint>,
    {
        for c in constraints {
            self.add_constraint(c);
        }
    }

    pub fn add_constraint(&mut self, constraint: &Constraint) {
        match *constraint {
            Constraint::Equals(lhs, rhs) => match (lhs, rhs) {
                (Term::Const(a), Term::Const(b)) => {
                    if a != b {
                        // Empty clause: unsatisfiable on its own.
                        self.clauses.push(Vec::new());
                    }
                }
                (Term::Prop(p), Term::Const(v)) | (Term::Const(v), Term::Prop(p)) => {
                    self.add_clause(&[Literal::new(p, v)]);
                }
                (Term::Prop(p), Term::Prop(q)) => {
                    if p != q {
                        let (p, q) = (Literal::new(p, true), Literal::new(q, true));
                        self.add_clause(&[p.negated(), q]);
                        self.add_clause(&[p, q.negated()]);
                    }
                }
            },
        }
    }

    /// Add a disjunction of literals.
    pub fn add_clause(&mut self, literals: &[Literal]) {
        let clause = literals
            .iter()
            .map(|lit| (self.var(lit.prop), lit.positive))
            .collect();
        self.clauses.push(clause);
    }

    fn var(&mut self, prop: Proposition) -> usize {
        if let Some(&v) = self.index.get(&prop) {
            return v;
        }
        let v = self.props.len();
        self.props.push(prop);
        self.index.insert(prop, v);
        v
    }

    pub fn check(&self) -> SatOutcome {
        let mut values: Vec<Option<bool>> = vec![None; self.props.len()];
        let mut trail: Vec<TrailEntry> = Vec::new();
        let mut steps = 0u64;

        loop {
            match self.propagate(&mut values, &mut trail, &mut steps) {
                Propagation::Exhausted => return SatOutcome::Unknown { steps },
                Propagation::Conflict => {
                    // Undo implied assignments back to the most recent decision, then flip it.
                    loop {
                        let Some(entry) = trail.pop() else {
                            return SatOutcome::Unsatisfiable;
                        };
                        values[entry.var] = None;
                        if entry.decision {
                            values[entry.var] = Some(!entry.value);
                            trail.push(TrailEntry {
                                var: entry.var,
                                value: !entry.value,
                                decision: false,
                            });
                            break;
                        }
                    }
                }
                Propagation::Stable => match values.iter().position(Option::is_none) {
                    None => return SatOutcome::Satisfiable(self.assignment(&values)),
                    Some(var) => {
                        values[var] = Some(true);
                        trail.push(TrailEntry {
                            var,
                            value: true,
                            decision: true,
                        });
                    }
                },
            }
        }
    }

    fn propagate(
        &self,
        values: &mut [Option<bool>],
        trail: &mut Vec<TrailEntry>,
        steps: &mut u64,
    ) -> Propagation {
        loop {
            let mut changed = false;
            for clause in &self.clauses {
                *steps += 1;
                if *steps > self.budget.max_steps {
                    return Propagation::Exhausted;
                }

                let mut satisfied = false;
                let mut open = 0usize;
                let mut last_open = None;
                for &(var, positive) in clause {
                    match values[var] {
                        Some(v) if v == positive => {
                            satisfied = true;
                            break;
                        }
                        Some(_) => {}
                        None => {
                            open += 1;
                            last_open = Some((var, positive));
                        }
                    }
                }
                if satisfied {
                    continue;
                }
                match (open, last_open) {
                    (0, _) => return Propagation::Conflict,
                    (1, Some((var, positive))) => {
                        values[var] = Some(positive);
                        trail.push(TrailEntry {
                            var,
                            value: positive,
                            decision: false,
                        });
                        changed = true;
                    }
                    _ => {}
                }
            }
            if !changed {
                return Propagation::Stable;
            }
        }
    }

    fn assignment(&self, values: &[Option<bool>]) -> Assignment {
        let values = self
            .props
            .iter()
            .zip(values)
            .filter_map(|(prop, v)| v.map(|v| (*prop, v)))
            .collect();
        Assignment { values }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicate::PropositionTable;

    fn props(n: usize) -> Vec<Proposition> {
        let mut table = PropositionTable::new();
        (0..n).map(|i| table.fresh(format!("x{i}"))).collect()
    }

    fn pos(p: Proposition) -> Literal {
        Literal::new(p, true)
    }

    fn neg(p: Proposition) -> Literal {
        Literal::new(p, false)
    }

    #[test]
    fn empty_problem_is_satisfiable() {
        let solver = Solver::new(SolverBudget::default());
        assert_eq!(
            solver.check(),
            SatOutcome::Satisfiable(Assignment::default())
        );
    }

    #[test]
    fn consistent_equalities_are_satisfiable_with_model() {
        let p = props(2);
        let mut solver = Solver::new(SolverBudget::default());
        solver.add_constraint(&Constraint::equals(Term::Prop(p[0]), Term::Const(true)));
        solver.add_constraint(&Constraint::equals(Term::Prop(p[1]), Term::Const(true)));
        solver.add_constraint(&Constraint::equals(Term::Prop(p[0]), Term::Prop(p[1])));

        let SatOutcome::Satisfiable(model) = solver.check() else {
            panic!("expected satisfiable");
        };
        assert_eq!(model.value(p[0]), Some(true));
        assert_eq!(model.value(p[1]), Some(true));
        assert_eq!(solver.num_clauses(), 4);
    }

    #[test]
    fn observed_false_required_true_is_unsatisfiable() {
        let p = props(2);
        let mut solver = Solver::new(SolverBudget::default());
        solver.add_constraints(&[
            Constraint::equals(Term::Prop(p[0]), Term::Const(false)),
            Constraint::equals(Term::Prop(p[1]), Term::Const(true)),
            Constraint::equals(Term::Prop(p[0]), Term::Prop(p[1])),
        ]);
        assert_eq!(solver.check(), SatOutcome::Unsatisfiable);
    }

    #[test]
    fn mismatched_constants_are_unsatisfiable() {
        let mut solver = Solver::new(SolverBudget::default());
        solver.add_constraint(&Constraint::equals(Term::Const(true), Term::Const(false)));
        assert_eq!(solver.check(), SatOutcome::Unsatisfiable);
    }

    #[test]
    fn search_backtracks_over_decisions() {
        // All four two-literal clauses over {a, b}: needs decisions to refute.
        let p = props(2);
        let (a, b) = (p[0], p[1]);
        let mut solver = Solver::new(SolverBudget::default());
        solver.add_clause(&[pos(a), pos(b)]);
        solver.add_clause(&[neg(a), pos(b)]);
        solver.add_clause(&[pos(a), neg(b)]);
        solver.add_clause(&[neg(a), neg(b)]);
        assert_eq!(solver.check(), SatOutcome::Unsatisfiable);
    }

    #[test]
    fn search_finds_model_after_flipping_a_decision() {
        // Deciding a=true forces a conflict; a=false must be found.
        let p = props(3);
        let (a, b, c) = (p[0], p[1], p[2]);
        let mut solver = Solver::new(SolverBudget::default());
        solver.add_clause(&[neg(a), pos(b)]);
        solver.add_clause(&[neg(a), neg(b)]);
        solver.add_clause(&[pos(c), pos(a)]);

        let SatOutcome::Satisfiable(model) = solver.check() else {
            panic!("expected satisfiable");
        };
        assert_eq!(model.value(a), Some(false));
        assert_eq!(model.value(c), Some(true));
    }

    #[test]
    fn exhausted_budget_is_unknown() {
        let p = props(4);
        let mut solver = Solver::new(SolverBudget { max_steps: 2 });
        for w in p.windows(2) {
            solver.add_constraint(&Constraint::equals(Term::Prop(w[0]), Term::Prop(w[1])));
        }
        assert!(matches!(solver.check(), SatOutcome::Unknown { steps: 3 }));
    }
}
