//! Backward chaining over definite clauses.
//!
//! The knowledge base accepts only sentences whose CNF is a set of definite
//! clauses; anything else is rejected at `tell` time with the state left
//! unchanged. Queries run goal-directed depth-first SLD search: a goal is
//! discharged by any clause whose head unifies with it, with the clause's
//! body conjuncts proved recursively under the accumulated substitution.
//! Every clause is re-standardized with fresh variables per use, so no two
//! uses can capture each other's bindings. The search yields every
//! satisfying substitution together with its proof tree.

use crate::cnf::to_cnf;
use crate::fol::{
    Atom, Sentence, StandardisedVariable, Substitution, Term, Variable,
};
use crate::kb::{Answer, AskError, CancellationToken, KnowledgeBase, TellError};
use crate::unification::unify_atoms;
use serde::Serialize;

/// Depth bound guarding depth-first search against cyclic rule sets.
/// Hitting the bound fails only the offending branch.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// A definite clause split into its head (the single positive literal) and
/// body (the negated literals, read as a conjunction of subgoals)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefiniteClause {
    head: Atom,
    body: Vec<Atom>,
}

impl DefiniteClause {
    pub fn head(&self) -> &Atom {
        &self.head
    }

    pub fn body(&self) -> &[Atom] {
        &self.body
    }

    /// A copy of this clause over fresh standardised variables
    fn standardized(&self) -> (Atom, Vec<Atom>) {
        let mut vars = self.head.variables();
        for atom in &self.body {
            atom.collect_variables(&mut vars);
        }

        let mut renaming = Substitution::new();
        for var in vars {
            let fresh = Variable::standardised(StandardisedVariable::renaming(var.clone()));
            renaming.insert(var, Term::Variable(fresh));
        }

        (
            self.head.apply_substitution(&renaming),
            self.body
                .iter()
                .map(|atom| atom.apply_substitution(&renaming))
                .collect(),
        )
    }
}

/// A knowledge base restricted to definite clauses, queried by backward
/// chaining
#[derive(Debug)]
pub struct BackwardChainingKnowledgeBase {
    clauses: Vec<DefiniteClause>,
    max_depth: usize,
}

impl Default for BackwardChainingKnowledgeBase {
    fn default() -> Self {
        Self::new()
    }
}

impl BackwardChainingKnowledgeBase {
    pub fn new() -> Self {
        Self::with_max_depth(DEFAULT_MAX_DEPTH)
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        BackwardChainingKnowledgeBase {
            clauses: Vec::new(),
            max_depth,
        }
    }

    /// Assert a sentence. Every clause of its CNF must be definite;
    /// otherwise the sentence is rejected and the knowledge base is
    /// unchanged.
    pub fn tell(&mut self, sentence: &Sentence) -> Result<(), TellError> {
        let cnf = to_cnf(sentence);
        let mut admitted = Vec::with_capacity(cnf.len());
        for clause in cnf.clauses() {
            if !clause.is_definite() {
                return Err(TellError::NotDefinite(clause.clone()));
            }
            let mut head = None;
            let mut body = Vec::new();
            for literal in clause.literals() {
                if literal.is_positive() {
                    head = Some(literal.atom.clone());
                } else {
                    body.push(literal.atom.clone());
                }
            }
            admitted.push(DefiniteClause {
                // A definite clause has exactly one positive literal
                head: head.unwrap_or_else(|| unreachable!("definite clause without head")),
                body,
            });
        }
        self.clauses.extend(admitted);
        Ok(())
    }

    /// The definite clauses currently asserted
    pub fn clauses(&self) -> &[DefiniteClause] {
        &self.clauses
    }

    /// Pose a predicate goal, possibly with free variables. The query
    /// snapshots the current clause set.
    pub fn ask(&self, goal: &Sentence) -> Result<ChainingQuery, AskError> {
        match goal {
            Sentence::Predicate(atom) => Ok(ChainingQuery {
                goal: atom.clone(),
                clauses: self.clauses.clone(),
                max_depth: self.max_depth,
                outcome: None,
            }),
            other => Err(AskError::UnsupportedGoal(other.clone())),
        }
    }

    /// Tri-state truth of a goal. Backward chaining cannot disprove, so
    /// failure reports `Unknown`.
    pub fn truth(&self, goal: &Sentence, cancel: &CancellationToken) -> Result<Answer, AskError> {
        let mut query = self.ask(goal)?;
        Ok(match query.execute_cancellable(cancel) {
            ChainingOutcome::Proved(_) => Answer::Proved,
            ChainingOutcome::NotProved => Answer::Unknown,
            ChainingOutcome::Cancelled => Answer::Cancelled,
        })
    }
}

impl KnowledgeBase for BackwardChainingKnowledgeBase {
    type Query = ChainingQuery;

    fn tell(&mut self, sentence: &Sentence) -> Result<(), TellError> {
        BackwardChainingKnowledgeBase::tell(self, sentence)
    }

    fn ask(&self, query: &Sentence) -> Result<ChainingQuery, AskError> {
        BackwardChainingKnowledgeBase::ask(self, query)
    }
}

/// Outcome of a backward-chaining query
#[derive(Debug, Clone, PartialEq)]
pub enum ChainingOutcome {
    /// At least one proof was found; one entry per satisfying substitution
    Proved(Vec<Proof>),
    /// The goal could not be established from the definite clauses
    NotProved,
    /// The caller's cancellation signal fired
    Cancelled,
}

/// One successful proof of the query goal
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Proof {
    /// The satisfying bindings for the goal's free variables
    pub substitution: Substitution,
    pub tree: ProofStep,
}

/// One node of a proof tree: a resolved goal, the clause instance that
/// discharged it, the unifier used, and the sub-proofs of its body
/// conjuncts
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProofStep {
    pub goal: Atom,
    pub rule_head: Atom,
    pub unifier: Substitution,
    pub subproofs: Vec<ProofStep>,
}

/// An executable backward-chaining query over a snapshot of the clause set
pub struct ChainingQuery {
    goal: Atom,
    clauses: Vec<DefiniteClause>,
    max_depth: usize,
    outcome: Option<ChainingOutcome>,
}

struct CancelledSignal;

impl ChainingQuery {
    /// Run the query to completion with a token that never fires
    pub fn execute(&mut self) -> &ChainingOutcome {
        self.execute_cancellable(&CancellationToken::new())
    }

    /// Run the query to completion, checking the cancellation signal at
    /// each goal expansion. Re-running a finished query returns the cached
    /// outcome.
    pub fn execute_cancellable(&mut self, cancel: &CancellationToken) -> &ChainingOutcome {
        let outcome = match self.outcome.take() {
            Some(finished) => finished,
            None => self.run(cancel),
        };
        self.outcome.insert(outcome)
    }

    fn run(&self, cancel: &CancellationToken) -> ChainingOutcome {
        let solver = Solver {
            clauses: &self.clauses,
            cancel,
        };
        match solver.solve_goal(&self.goal, &Substitution::new(), self.max_depth) {
            Err(CancelledSignal) => ChainingOutcome::Cancelled,
            Ok(solutions) if solutions.is_empty() => ChainingOutcome::NotProved,
            Ok(solutions) => {
                let goal_vars = self.goal.variables();
                ChainingOutcome::Proved(
                    solutions
                        .into_iter()
                        .map(|(substitution, tree)| Proof {
                            substitution: substitution.restricted_to(&goal_vars),
                            tree,
                        })
                        .collect(),
                )
            }
        }
    }

    /// The query's outcome, if it has been executed
    pub fn result(&self) -> Option<&ChainingOutcome> {
        self.outcome.as_ref()
    }

    /// The distinct satisfying substitutions of an executed query
    pub fn answers(&self) -> Vec<Substitution> {
        match &self.outcome {
            Some(ChainingOutcome::Proved(proofs)) => {
                let mut answers: Vec<Substitution> = Vec::new();
                for proof in proofs {
                    if !answers.contains(&proof.substitution) {
                        answers.push(proof.substitution.clone());
                    }
                }
                answers
            }
            _ => Vec::new(),
        }
    }
}

struct Solver<'a> {
    clauses: &'a [DefiniteClause],
    cancel: &'a CancellationToken,
}

impl Solver<'_> {
    /// All proofs of one goal under the accumulated substitution. `depth`
    /// bounds the remaining chain length.
    fn solve_goal(
        &self,
        goal: &Atom,
        subst: &Substitution,
        depth: usize,
    ) -> Result<Vec<(Substitution, ProofStep)>, CancelledSignal> {
        if self.cancel.is_cancelled() {
            return Err(CancelledSignal);
        }
        if depth == 0 {
            return Ok(Vec::new());
        }

        let current = goal.apply_substitution(subst);
        let mut solutions = Vec::new();

        for clause in self.clauses {
            // Fresh variables per use: repeated uses of one clause must not
            // share bindings
            let (head, body) = clause.standardized();
            let Ok(mgu) = unify_atoms(&current, &head) else {
                continue;
            };
            let combined = subst.compose(&mgu);

            for (solution, steps) in self.solve_conjuncts(&body, combined, depth)? {
                let step = ProofStep {
                    goal: current.apply_substitution(&solution),
                    rule_head: head.apply_substitution(&solution),
                    unifier: mgu.clone(),
                    subproofs: steps,
                };
                solutions.push((solution, step));
            }
        }

        Ok(solutions)
    }

    /// All ways of proving a conjunction of subgoals left to right, with
    /// each subgoal's bindings carried into the next
    fn solve_conjuncts(
        &self,
        goals: &[Atom],
        subst: Substitution,
        depth: usize,
    ) -> Result<Vec<(Substitution, Vec<ProofStep>)>, CancelledSignal> {
        let Some((first, rest)) = goals.split_first() else {
            return Ok(vec![(subst, Vec::new())]);
        };

        let mut solutions = Vec::new();
        for (next, step) in self.solve_goal(first, &subst, depth - 1)? {
            for (solution, mut steps) in self.solve_conjuncts(rest, next, depth)? {
                steps.insert(0, step.clone());
                solutions.push((solution, steps));
            }
        }
        Ok(solutions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fol::Term;

    fn fact(name: &str, constant: &str) -> Sentence {
        Sentence::pred(Atom::new(name, vec![Term::constant(constant)]))
    }

    /// King(John), Greedy(John), ∀x. King(x) ∧ Greedy(x) ⇒ Evil(x)
    fn greedy_kings_kb() -> BackwardChainingKnowledgeBase {
        let mut kb = BackwardChainingKnowledgeBase::new();
        kb.tell(&fact("King", "John")).unwrap();
        kb.tell(&fact("Greedy", "John")).unwrap();
        kb.tell(&Sentence::forall(
            Variable::new("x"),
            Sentence::implies(
                Sentence::and(
                    Sentence::pred(Atom::new("King", vec![Term::var("x")])),
                    Sentence::pred(Atom::new("Greedy", vec![Term::var("x")])),
                ),
                Sentence::pred(Atom::new("Evil", vec![Term::var("x")])),
            ),
        ))
        .unwrap();
        kb
    }

    #[test]
    fn test_fact_is_proved() {
        let kb = greedy_kings_kb();
        let mut query = kb.ask(&fact("King", "John")).unwrap();
        assert!(matches!(query.execute(), ChainingOutcome::Proved(_)));
    }

    #[test]
    fn test_multi_conjunct_query_binds_variable() {
        let kb = greedy_kings_kb();
        let mut query = kb
            .ask(&Sentence::pred(Atom::new("Evil", vec![Term::var("X")])))
            .unwrap();

        match query.execute() {
            ChainingOutcome::Proved(proofs) => {
                assert_eq!(proofs.len(), 1);
                assert_eq!(
                    proofs[0].substitution.get(&Variable::new("X")),
                    Some(&Term::constant("John"))
                );
                // Proof tree: Evil(John) via the rule, with King and Greedy
                // sub-proofs
                let tree = &proofs[0].tree;
                assert_eq!(tree.goal, Atom::new("Evil", vec![Term::constant("John")]));
                assert_eq!(tree.subproofs.len(), 2);
                assert!(tree.subproofs.iter().all(|s| s.subproofs.is_empty()));
            }
            other => panic!("expected proof, got {:?}", other),
        }
        assert_eq!(query.answers().len(), 1);
    }

    #[test]
    fn test_inconsistent_binding_is_not_proved() {
        // King(John), Greedy(Richard): no single binding satisfies both
        let mut kb = BackwardChainingKnowledgeBase::new();
        kb.tell(&fact("King", "John")).unwrap();
        kb.tell(&fact("Greedy", "Richard")).unwrap();
        kb.tell(&Sentence::forall(
            Variable::new("x"),
            Sentence::implies(
                Sentence::and(
                    Sentence::pred(Atom::new("King", vec![Term::var("x")])),
                    Sentence::pred(Atom::new("Greedy", vec![Term::var("x")])),
                ),
                Sentence::pred(Atom::new("Evil", vec![Term::var("x")])),
            ),
        ))
        .unwrap();

        let mut query = kb
            .ask(&Sentence::pred(Atom::new("Evil", vec![Term::var("X")])))
            .unwrap();
        assert_eq!(*query.execute(), ChainingOutcome::NotProved);
        assert!(query.answers().is_empty());
    }

    #[test]
    fn test_non_definite_tell_is_rejected_without_change() {
        let mut kb = BackwardChainingKnowledgeBase::new();
        kb.tell(&fact("King", "John")).unwrap();
        let before = kb.clauses().len();

        // P(a) ∨ Q(a) has two positive literals
        let rejected = kb.tell(&Sentence::or(fact("P", "a"), fact("Q", "a")));
        assert!(matches!(rejected, Err(TellError::NotDefinite(_))));
        assert_eq!(kb.clauses().len(), before);

        // ¬P(a) has no positive literal
        let rejected = kb.tell(&Sentence::not(fact("P", "a")));
        assert!(matches!(rejected, Err(TellError::NotDefinite(_))));
        assert_eq!(kb.clauses().len(), before);
    }

    #[test]
    fn test_non_predicate_goal_is_rejected() {
        let kb = greedy_kings_kb();
        let goal = Sentence::and(fact("King", "John"), fact("Greedy", "John"));
        assert!(matches!(
            kb.ask(&goal),
            Err(AskError::UnsupportedGoal(_))
        ));
    }

    #[test]
    fn test_multiple_answers() {
        let mut kb = BackwardChainingKnowledgeBase::new();
        kb.tell(&fact("King", "John")).unwrap();
        kb.tell(&fact("King", "Richard")).unwrap();

        let mut query = kb
            .ask(&Sentence::pred(Atom::new("King", vec![Term::var("X")])))
            .unwrap();
        query.execute();
        let answers = query.answers();
        assert_eq!(answers.len(), 2);
    }

    #[test]
    fn test_cyclic_rules_terminate() {
        // Ancestor(x, y) ⇐ Ancestor(x, y) would recurse forever without
        // the depth bound
        let mut kb = BackwardChainingKnowledgeBase::with_max_depth(16);
        kb.tell(&Sentence::forall(
            Variable::new("x"),
            Sentence::implies(
                Sentence::pred(Atom::new("Ancestor", vec![Term::var("x")])),
                Sentence::pred(Atom::new("Ancestor", vec![Term::var("x")])),
            ),
        ))
        .unwrap();

        let mut query = kb
            .ask(&Sentence::pred(Atom::new(
                "Ancestor",
                vec![Term::constant("a")],
            )))
            .unwrap();
        assert_eq!(*query.execute(), ChainingOutcome::NotProved);
    }

    #[test]
    fn test_cancellation_surfaces() {
        let kb = greedy_kings_kb();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let mut query = kb.ask(&fact("King", "John")).unwrap();
        assert_eq!(
            *query.execute_cancellable(&cancel),
            ChainingOutcome::Cancelled
        );
    }

    #[test]
    fn test_truth_surface() {
        let kb = greedy_kings_kb();
        let cancel = CancellationToken::new();
        assert_eq!(
            kb.truth(&fact("King", "John"), &cancel).unwrap(),
            Answer::Proved
        );
        assert_eq!(
            kb.truth(&fact("King", "Richard"), &cancel).unwrap(),
            Answer::Unknown
        );
    }
}
