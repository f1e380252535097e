//! Canonical variable renaming and instance tests.
//!
//! Ordinalization renames variables to the canonical alphabet `v0, v1, …`
//! in first-encounter order under an in-order traversal, so two expressions
//! are alpha-equivalent exactly when their ordinalized forms are
//! structurally equal.

use super::clause::Clause;
use super::literal::Literal;
use super::sentence::Sentence;
use super::term::{Term, Variable};
use crate::rewrite::{self, SentenceRewriter};
use crate::unification::matching;
use std::collections::HashMap;

struct Ordinaliser {
    assigned: HashMap<Variable, Variable>,
    next: usize,
}

impl Ordinaliser {
    fn new() -> Self {
        Ordinaliser {
            assigned: HashMap::new(),
            next: 0,
        }
    }

    fn rename(&mut self, variable: &Variable) -> Variable {
        if let Some(existing) = self.assigned.get(variable) {
            return existing.clone();
        }
        let fresh = Variable::ordinal(self.next);
        self.next += 1;
        self.assigned.insert(variable.clone(), fresh.clone());
        fresh
    }
}

impl SentenceRewriter for Ordinaliser {
    fn rewrite_term(&mut self, term: &Term) -> Option<Term> {
        match term {
            Term::Variable(v) => Some(Term::Variable(self.rename(v))),
            _ => rewrite::walk_term(self, term),
        }
    }

    fn rewrite_declaration(&mut self, variable: &Variable) -> Option<Variable> {
        Some(self.rename(variable))
    }
}

/// Canonically rename all variables in a sentence
pub fn ordinalize(sentence: &Sentence) -> Sentence {
    rewrite::rewrite(&mut Ordinaliser::new(), sentence).into_owned()
}

/// Canonically rename all variables in a term
pub fn ordinalize_term(term: &Term) -> Term {
    rewrite::rewrite_term(&mut Ordinaliser::new(), term).into_owned()
}

/// Canonically rename all variables in a literal
pub fn ordinalize_literal(literal: &Literal) -> Literal {
    let mut ordinaliser = Ordinaliser::new();
    Literal {
        atom: ordinaliser
            .rewrite_atom(&literal.atom)
            .unwrap_or_else(|| literal.atom.clone()),
        polarity: literal.polarity,
    }
}

/// Canonically rename all variables in a clause, sharing one assignment
/// across its literals in stored order
pub fn ordinalize_clause(clause: &Clause) -> Clause {
    let mut ordinaliser = Ordinaliser::new();
    Clause::new(
        clause
            .literals()
            .iter()
            .map(|lit| Literal {
                atom: ordinaliser
                    .rewrite_atom(&lit.atom)
                    .unwrap_or_else(|| lit.atom.clone()),
                polarity: lit.polarity,
            })
            .collect(),
    )
}

/// True iff `term` is obtainable from `general` by substituting only
/// variables of `general`
pub fn is_instance_of(term: &Term, general: &Term) -> bool {
    matching::match_term(general, term).is_some()
}

/// True iff `general` can be specialized into `term`
pub fn is_generalisation_of(general: &Term, term: &Term) -> bool {
    is_instance_of(term, general)
}

/// Literal counterpart of [`is_instance_of`]
pub fn literal_is_instance_of(literal: &Literal, general: &Literal) -> bool {
    matching::match_literal(general, literal).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fol::Atom;

    #[test]
    fn test_ordinalize_term() {
        // F(G(X, Y), G(X, Z)) => F(G(v0, v1), G(v0, v2))
        let term = Term::function(
            "F",
            vec![
                Term::function("G", vec![Term::var("X"), Term::var("Y")]),
                Term::function("G", vec![Term::var("X"), Term::var("Z")]),
            ],
        );
        let expected = Term::function(
            "F",
            vec![
                Term::function(
                    "G",
                    vec![
                        Term::Variable(Variable::ordinal(0)),
                        Term::Variable(Variable::ordinal(1)),
                    ],
                ),
                Term::function(
                    "G",
                    vec![
                        Term::Variable(Variable::ordinal(0)),
                        Term::Variable(Variable::ordinal(2)),
                    ],
                ),
            ],
        );
        assert_eq!(ordinalize_term(&term), expected);
    }

    #[test]
    fn test_ordinalize_idempotent() {
        let term = Term::function(
            "F",
            vec![Term::var("B"), Term::var("A"), Term::var("B")],
        );
        let once = ordinalize_term(&term);
        assert_eq!(ordinalize_term(&once), once);
    }

    #[test]
    fn test_alpha_equivalence_through_ordinalization() {
        let left = Term::function("f", vec![Term::var("X"), Term::var("X")]);
        let right = Term::function("f", vec![Term::var("Y"), Term::var("Y")]);
        let other = Term::function("f", vec![Term::var("X"), Term::var("Y")]);

        assert_eq!(ordinalize_term(&left), ordinalize_term(&right));
        assert_ne!(ordinalize_term(&left), ordinalize_term(&other));
    }

    #[test]
    fn test_ordinalize_sentence_renames_declarations() {
        let sentence = Sentence::forall(
            Variable::new("x"),
            Sentence::pred(Atom::new("P", vec![Term::var("x")])),
        );
        let expected = Sentence::forall(
            Variable::ordinal(0),
            Sentence::pred(Atom::new(
                "P",
                vec![Term::Variable(Variable::ordinal(0))],
            )),
        );
        assert_eq!(ordinalize(&sentence), expected);
    }

    #[test]
    fn test_instance_of() {
        let general = Term::function("f", vec![Term::var("X"), Term::var("Y")]);
        let instance = Term::function("f", vec![Term::constant("a"), Term::constant("b")]);
        let mismatched = Term::function("g", vec![Term::constant("a"), Term::constant("b")]);

        assert!(is_instance_of(&instance, &general));
        assert!(is_generalisation_of(&general, &instance));
        assert!(!is_instance_of(&general, &instance));
        assert!(!is_instance_of(&mismatched, &general));
    }

    #[test]
    fn test_instance_requires_consistent_binding() {
        let general = Term::function("f", vec![Term::var("X"), Term::var("X")]);
        let consistent = Term::function("f", vec![Term::constant("a"), Term::constant("a")]);
        let inconsistent = Term::function("f", vec![Term::constant("a"), Term::constant("b")]);

        assert!(is_instance_of(&consistent, &general));
        assert!(!is_instance_of(&inconsistent, &general));
    }
}
