//! Refutation proving by binary resolution with set of support.
//!
//! A query negates the goal sentence, seeds a per-query overlay store with
//! its CNF (the set of support), and derives resolvents breadth-first until
//! the empty clause appears or no new non-redundant clause can be produced.
//! Redundancy control: tautology elimination, whole-clause unification
//! pruning, and forward/backward subsumption against a feature-indexed
//! store. The base knowledge base is never modified by a query.

mod derivation;

pub use derivation::{Derivation, ResolutionTrace, TraceStep};

use crate::cnf::to_cnf;
use crate::fol::{Clause, Sentence, StandardisedVariable, Substitution, Variable};
use crate::index::{AddOutcome, SimpleClauseStore, SubsumptionFilteredStore};
use crate::index::subsumption::unifies_with_any_of;
use crate::kb::{Answer, AskError, CancellationToken, KnowledgeBase, TellError};
use crate::unification::unify_atoms;
use std::collections::VecDeque;

/// A binary resolvent together with the unifier that produced it
#[derive(Debug, Clone)]
pub struct Resolvent {
    pub clause: Clause,
    pub unifier: Substitution,
}

/// Rename every variable of a clause to a fresh standardised identifier, so
/// two clauses entering an inference can never capture each other's
/// variables.
pub fn rename_clause_apart(clause: &Clause) -> Clause {
    let mut renaming = Substitution::new();
    for var in clause.variables() {
        let fresh = Variable::standardised(StandardisedVariable::renaming(var.clone()));
        renaming.insert(var, crate::fol::Term::Variable(fresh));
    }
    clause.apply_substitution(&renaming)
}

/// Every valid binary resolvent of two clauses: one resolvent per
/// complementary literal pair whose atoms unify. The right clause is
/// renamed apart first.
pub fn binary_resolvents(left: &Clause, right: &Clause) -> Vec<Resolvent> {
    let mut resolvents = Vec::new();
    let renamed_right = rename_clause_apart(right);

    for left_lit in left.literals() {
        for right_lit in renamed_right.literals() {
            if left_lit.polarity == right_lit.polarity
                || left_lit.atom.predicate != right_lit.atom.predicate
            {
                continue;
            }
            if let Ok(mgu) = unify_atoms(&left_lit.atom, &right_lit.atom) {
                let clause = left
                    .without(left_lit)
                    .apply_substitution(&mgu)
                    .union(&renamed_right.without(right_lit).apply_substitution(&mgu));
                resolvents.push(Resolvent {
                    clause,
                    unifier: mgu,
                });
            }
        }
    }

    resolvents
}

/// Outcome of a resolution query. Cancellation is its own outcome, never a
/// disguised "not proved".
#[derive(Debug, Clone, PartialEq)]
pub enum ResolutionOutcome {
    /// The empty clause was derived: the query sentence is entailed
    Proved(ResolutionTrace),
    /// The search space was exhausted without a refutation
    NotProved,
    /// The caller's cancellation signal fired
    Cancelled,
}

/// A knowledge base answering queries by resolution refutation
#[derive(Debug, Default)]
pub struct ResolutionKnowledgeBase {
    base: SimpleClauseStore,
}

impl ResolutionKnowledgeBase {
    pub fn new() -> Self {
        ResolutionKnowledgeBase {
            base: SimpleClauseStore::new(),
        }
    }

    /// Assert a sentence: its CNF clauses join the base store
    pub fn tell(&mut self, sentence: &Sentence) {
        for clause in to_cnf(sentence).clauses() {
            self.base.add(clause.clone());
        }
    }

    /// Snapshot of the base clause set
    pub fn clauses(&self) -> Vec<Clause> {
        self.base.clauses()
    }

    /// Pose a query. Free variables of the sentence are read
    /// existentially, so proving it finds some satisfying binding.
    pub fn ask(&self, query: &Sentence) -> ResolutionQuery {
        let mut closed = query.clone();
        for var in query.free_variables() {
            closed = Sentence::exists(var, closed);
        }
        let negated = to_cnf(&Sentence::not(closed));
        ResolutionQuery::new(self.base.clauses(), negated.clauses())
    }

    /// Tri-state truth of a sentence: prove it, else prove its negation,
    /// else unknown.
    pub fn truth(&self, sentence: &Sentence, cancel: &CancellationToken) -> Answer {
        match self.ask(sentence).execute_cancellable(cancel) {
            ResolutionOutcome::Proved(_) => Answer::Proved,
            ResolutionOutcome::Cancelled => Answer::Cancelled,
            ResolutionOutcome::NotProved => {
                let negated = Sentence::not(sentence.clone());
                match self.ask(&negated).execute_cancellable(cancel) {
                    ResolutionOutcome::Proved(_) => Answer::Disproved,
                    ResolutionOutcome::Cancelled => Answer::Cancelled,
                    ResolutionOutcome::NotProved => Answer::Unknown,
                }
            }
        }
    }
}

impl KnowledgeBase for ResolutionKnowledgeBase {
    type Query = ResolutionQuery;

    fn tell(&mut self, sentence: &Sentence) -> Result<(), TellError> {
        ResolutionKnowledgeBase::tell(self, sentence);
        Ok(())
    }

    fn ask(&self, query: &Sentence) -> Result<ResolutionQuery, AskError> {
        Ok(ResolutionKnowledgeBase::ask(self, query))
    }
}

struct Record {
    clause: Clause,
    derivation: Derivation,
    unifier: Option<Substitution>,
    /// False once backward subsumption has displaced this clause
    retained: bool,
}

/// An executable resolution query: a snapshot of the base store plus the
/// negated query clauses, expanded breadth-first under set of support.
pub struct ResolutionQuery {
    records: Vec<Record>,
    store: SubsumptionFilteredStore,
    frontier: VecDeque<usize>,
    outcome: Option<ResolutionOutcome>,
}

impl ResolutionQuery {
    fn new(base: Vec<Clause>, support: &[Clause]) -> Self {
        let mut query = ResolutionQuery {
            records: Vec::new(),
            store: SubsumptionFilteredStore::new(),
            frontier: VecDeque::new(),
            outcome: None,
        };
        // Seed the support set first: a base clause may generalize a seed,
        // and subsumption must not be allowed to empty the support set.
        for clause in support {
            query.admit(clause.clone(), Derivation::negated_query(), None, true);
        }
        for clause in base {
            query.admit(clause, Derivation::input(), None, false);
        }
        query
    }

    /// Run redundancy control and record a clause. Returns the record
    /// index when the clause was kept.
    fn admit(
        &mut self,
        clause: Clause,
        derivation: Derivation,
        unifier: Option<Substitution>,
        in_support: bool,
    ) -> Option<usize> {
        if clause.is_tautology() {
            return None;
        }
        // Whole-clause unification pruning applies to derived clauses only;
        // dropping an input clause against a more specific one would lose
        // information the subsumption checks cannot recover.
        if !derivation.is_input() && !clause.is_empty() {
            let snapshot = self.store.clauses();
            if unifies_with_any_of(&clause, snapshot.iter()) {
                return None;
            }
        }
        match self.store.add(clause.clone()) {
            AddOutcome::Subsumed => None,
            AddOutcome::Added { displaced } => {
                for record in self.records.iter_mut() {
                    // Support seeds stay live even when subsumed: the
                    // refutation must be reachable from the set of support
                    if record.retained
                        && record.derivation.rule != "NegatedQuery"
                        && displaced.contains(&record.clause)
                    {
                        record.retained = false;
                    }
                }
                let index = self.records.len();
                self.records.push(Record {
                    clause,
                    derivation,
                    unifier,
                    retained: true,
                });
                if in_support {
                    self.frontier.push_back(index);
                }
                Some(index)
            }
        }
    }

    /// Run the query to completion with a token that never fires
    pub fn execute(&mut self) -> &ResolutionOutcome {
        self.execute_cancellable(&CancellationToken::new())
    }

    /// Run the query to completion, checking the cancellation signal
    /// between resolvent-pair expansions. Re-running a finished query
    /// returns the cached outcome.
    pub fn execute_cancellable(&mut self, cancel: &CancellationToken) -> &ResolutionOutcome {
        let outcome = match self.outcome.take() {
            Some(finished) => finished,
            None => self.search(cancel),
        };
        self.outcome.insert(outcome)
    }

    fn search(&mut self, cancel: &CancellationToken) -> ResolutionOutcome {
        while let Some(given_index) = self.frontier.pop_front() {
            if cancel.is_cancelled() {
                return ResolutionOutcome::Cancelled;
            }
            if !self.records[given_index].retained {
                continue;
            }
            let given = self.records[given_index].clause.clone();

            let partner_count = self.records.len();
            for partner_index in 0..partner_count {
                if cancel.is_cancelled() {
                    return ResolutionOutcome::Cancelled;
                }
                if !self.records[partner_index].retained {
                    continue;
                }

                let partner = self.records[partner_index].clause.clone();
                for resolvent in binary_resolvents(&given, &partner) {
                    if resolvent.clause.is_empty() {
                        let index = self.records.len();
                        self.records.push(Record {
                            clause: resolvent.clause,
                            derivation: Derivation::resolution(given_index, partner_index),
                            unifier: Some(resolvent.unifier),
                            retained: true,
                        });
                        return ResolutionOutcome::Proved(self.trace_with(Some(index)));
                    }
                    self.admit(
                        resolvent.clause,
                        Derivation::resolution(given_index, partner_index),
                        Some(resolvent.unifier),
                        true,
                    );
                }
            }
        }

        ResolutionOutcome::NotProved
    }

    /// The query's outcome, if it has been executed
    pub fn result(&self) -> Option<&ResolutionOutcome> {
        self.outcome.as_ref()
    }

    /// Snapshot of the per-query store: base clauses plus retained
    /// derivations so far
    pub fn clauses(&self) -> Vec<Clause> {
        self.store.clauses()
    }

    /// The derivation trace accumulated so far
    pub fn trace(&self) -> ResolutionTrace {
        let empty_clause = self
            .records
            .iter()
            .position(|record| record.clause.is_empty());
        self.trace_with(empty_clause)
    }

    fn trace_with(&self, empty_clause: Option<usize>) -> ResolutionTrace {
        ResolutionTrace {
            steps: self
                .records
                .iter()
                .map(|record| TraceStep {
                    clause: record.clause.clone(),
                    derivation: record.derivation.clone(),
                    unifier: record.unifier.clone(),
                })
                .collect(),
            empty_clause,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fol::{Atom, Literal, Term};

    fn pos(name: &str, args: Vec<Term>) -> Literal {
        Literal::positive(Atom::new(name, args))
    }

    fn neg(name: &str, args: Vec<Term>) -> Literal {
        Literal::negative(Atom::new(name, args))
    }

    #[test]
    fn test_binary_resolvents() {
        // P(a) | Q(X) against ~P(a) | R(b) resolves to Q(X) | R(b)
        let left = Clause::new(vec![
            pos("P", vec![Term::constant("a")]),
            pos("Q", vec![Term::var("X")]),
        ]);
        let right = Clause::new(vec![
            neg("P", vec![Term::constant("a")]),
            pos("R", vec![Term::constant("b")]),
        ]);

        let resolvents = binary_resolvents(&left, &right);
        assert_eq!(resolvents.len(), 1);
        assert_eq!(resolvents[0].clause.len(), 2);
    }

    #[test]
    fn test_resolvents_standardize_apart() {
        // P(X) against ~P(f(X)): the X's are distinct variables, so the
        // pair resolves; without renaming apart, the occurs check would
        // reject it
        let left = Clause::new(vec![pos("P", vec![Term::var("X")])]);
        let right = Clause::new(vec![neg(
            "P",
            vec![Term::function("f", vec![Term::var("X")])],
        )]);

        let resolvents = binary_resolvents(&left, &right);
        assert_eq!(resolvents.len(), 1);
        assert!(resolvents[0].clause.is_empty());
    }

    #[test]
    fn test_unit_refutation() {
        let mut kb = ResolutionKnowledgeBase::new();
        kb.tell(&Sentence::pred(Atom::new("P", vec![Term::constant("a")])));

        let mut query = kb.ask(&Sentence::pred(Atom::new("P", vec![Term::constant("a")])));
        match query.execute() {
            ResolutionOutcome::Proved(trace) => {
                assert!(trace.empty_clause.is_some());
                assert!(!trace.refutation().is_empty());
            }
            other => panic!("expected proof, got {:?}", other),
        }
    }

    #[test]
    fn test_modus_ponens_refutation() {
        // { ∀x. P(x) => Q(x), P(a) } entails Q(a)
        let x = Variable::new("x");
        let mut kb = ResolutionKnowledgeBase::new();
        kb.tell(&Sentence::forall(
            x,
            Sentence::implies(
                Sentence::pred(Atom::new("P", vec![Term::var("x")])),
                Sentence::pred(Atom::new("Q", vec![Term::var("x")])),
            ),
        ));
        kb.tell(&Sentence::pred(Atom::new("P", vec![Term::constant("a")])));

        let mut query = kb.ask(&Sentence::pred(Atom::new("Q", vec![Term::constant("a")])));
        match query.execute() {
            ResolutionOutcome::Proved(trace) => {
                // The refutation runs through ~Q(a), the implication clause,
                // ~P(a), P(a), and the empty clause
                let refutation = trace.refutation();
                assert!(refutation.len() >= 4);
                let last = *refutation.last().unwrap();
                assert!(trace.steps[last].clause.is_empty());
            }
            other => panic!("expected proof, got {:?}", other),
        }
    }

    #[test]
    fn test_unprovable_query_saturates() {
        let mut kb = ResolutionKnowledgeBase::new();
        kb.tell(&Sentence::pred(Atom::new("P", vec![Term::constant("a")])));

        let mut query = kb.ask(&Sentence::pred(Atom::new("Q", vec![Term::constant("a")])));
        assert_eq!(*query.execute(), ResolutionOutcome::NotProved);
    }

    #[test]
    fn test_cancellation_surfaces() {
        let mut kb = ResolutionKnowledgeBase::new();
        kb.tell(&Sentence::pred(Atom::new("P", vec![Term::constant("a")])));

        let cancel = CancellationToken::new();
        cancel.cancel();
        let mut query = kb.ask(&Sentence::pred(Atom::new("P", vec![Term::constant("a")])));
        assert_eq!(
            *query.execute_cancellable(&cancel),
            ResolutionOutcome::Cancelled
        );
    }

    #[test]
    fn test_query_does_not_mutate_base() {
        let mut kb = ResolutionKnowledgeBase::new();
        kb.tell(&Sentence::pred(Atom::new("P", vec![Term::constant("a")])));
        let before = kb.clauses();

        let mut query = kb.ask(&Sentence::pred(Atom::new("P", vec![Term::constant("a")])));
        query.execute();
        assert_eq!(kb.clauses(), before);
        // The overlay accumulated derived clauses beyond the base snapshot
        assert!(query.clauses().len() >= before.len());
    }

    #[test]
    fn test_free_query_variable_is_existential() {
        // King(John), Greedy(John), ∀x. King(x) ∧ Greedy(x) ⇒ Evil(x)
        // ⊢ ∃x. Evil(x)
        let x = Variable::new("x");
        let mut kb = ResolutionKnowledgeBase::new();
        kb.tell(&Sentence::pred(Atom::new("King", vec![Term::constant("John")])));
        kb.tell(&Sentence::pred(Atom::new("Greedy", vec![Term::constant("John")])));
        kb.tell(&Sentence::forall(
            x,
            Sentence::implies(
                Sentence::and(
                    Sentence::pred(Atom::new("King", vec![Term::var("x")])),
                    Sentence::pred(Atom::new("Greedy", vec![Term::var("x")])),
                ),
                Sentence::pred(Atom::new("Evil", vec![Term::var("x")])),
            ),
        ));

        let mut query = kb.ask(&Sentence::pred(Atom::new("Evil", vec![Term::var("X")])));
        assert!(matches!(query.execute(), ResolutionOutcome::Proved(_)));
    }

    #[test]
    fn test_truth_tri_state() {
        let mut kb = ResolutionKnowledgeBase::new();
        kb.tell(&Sentence::pred(Atom::new("P", vec![Term::constant("a")])));
        kb.tell(&Sentence::not(Sentence::pred(Atom::new(
            "Q",
            vec![Term::constant("a")],
        ))));

        let cancel = CancellationToken::new();
        let p = Sentence::pred(Atom::new("P", vec![Term::constant("a")]));
        let q = Sentence::pred(Atom::new("Q", vec![Term::constant("a")]));
        let r = Sentence::pred(Atom::new("R", vec![Term::constant("a")]));

        assert_eq!(kb.truth(&p, &cancel), Answer::Proved);
        assert_eq!(kb.truth(&q, &cancel), Answer::Disproved);
        assert_eq!(kb.truth(&r, &cancel), Answer::Unknown);
    }
}
