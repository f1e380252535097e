//! Sentences of first-order logic
//!
//! The sentence algebra is a closed sum: predicates, the usual connectives,
//! and quantification. Values are deeply immutable after construction.
//! Conjunction, disjunction and equivalence compare commutatively; hashes
//! are consistent with that equality.

use super::literal::Atom;
use super::term::Variable;
use serde::Serialize;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};

/// Quantifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Quantifier {
    Forall,
    Exists,
}

/// A first-order sentence
#[derive(Debug, Clone, Serialize)]
pub enum Sentence {
    /// Atomic formula
    Predicate(Atom),
    /// Negation
    Not(Box<Sentence>),
    /// Conjunction (commutative)
    And(Box<Sentence>, Box<Sentence>),
    /// Disjunction (commutative)
    Or(Box<Sentence>, Box<Sentence>),
    /// Implication (antecedent, consequent)
    Implies(Box<Sentence>, Box<Sentence>),
    /// Equivalence (commutative)
    Iff(Box<Sentence>, Box<Sentence>),
    /// Quantified sentence; the variable is a declaration scoped to the body
    Quantified(Quantifier, Variable, Box<Sentence>),
}

impl Sentence {
    pub fn pred(atom: Atom) -> Sentence {
        Sentence::Predicate(atom)
    }

    pub fn not(inner: Sentence) -> Sentence {
        Sentence::Not(Box::new(inner))
    }

    pub fn and(left: Sentence, right: Sentence) -> Sentence {
        Sentence::And(Box::new(left), Box::new(right))
    }

    pub fn or(left: Sentence, right: Sentence) -> Sentence {
        Sentence::Or(Box::new(left), Box::new(right))
    }

    pub fn implies(antecedent: Sentence, consequent: Sentence) -> Sentence {
        Sentence::Implies(Box::new(antecedent), Box::new(consequent))
    }

    pub fn iff(left: Sentence, right: Sentence) -> Sentence {
        Sentence::Iff(Box::new(left), Box::new(right))
    }

    pub fn forall(variable: Variable, body: Sentence) -> Sentence {
        Sentence::Quantified(Quantifier::Forall, variable, Box::new(body))
    }

    pub fn exists(variable: Variable, body: Sentence) -> Sentence {
        Sentence::Quantified(Quantifier::Exists, variable, Box::new(body))
    }

    /// Conjoin a non-empty sequence of sentences, left-associated
    pub fn conjoin(sentences: impl IntoIterator<Item = Sentence>) -> Option<Sentence> {
        sentences.into_iter().reduce(Sentence::and)
    }

    /// Get all free variables in the sentence
    pub fn free_variables(&self) -> HashSet<Variable> {
        match self {
            Sentence::Predicate(atom) => atom.variables(),
            Sentence::Not(inner) => inner.free_variables(),
            Sentence::And(a, b)
            | Sentence::Or(a, b)
            | Sentence::Implies(a, b)
            | Sentence::Iff(a, b) => {
                let mut vars = a.free_variables();
                vars.extend(b.free_variables());
                vars
            }
            Sentence::Quantified(_, var, body) => {
                let mut vars = body.free_variables();
                vars.remove(var);
                vars
            }
        }
    }

    /// Check if the sentence is closed (no free variables)
    pub fn is_closed(&self) -> bool {
        self.free_variables().is_empty()
    }
}

impl PartialEq for Sentence {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Sentence::Predicate(a), Sentence::Predicate(b)) => a == b,
            (Sentence::Not(a), Sentence::Not(b)) => a == b,
            // Commutative connectives: operands may be swapped
            (Sentence::And(a1, a2), Sentence::And(b1, b2))
            | (Sentence::Or(a1, a2), Sentence::Or(b1, b2))
            | (Sentence::Iff(a1, a2), Sentence::Iff(b1, b2)) => {
                (a1 == b1 && a2 == b2) || (a1 == b2 && a2 == b1)
            }
            (Sentence::Implies(a1, a2), Sentence::Implies(b1, b2)) => a1 == b1 && a2 == b2,
            (Sentence::Quantified(q1, v1, s1), Sentence::Quantified(q2, v2, s2)) => {
                q1 == q2 && v1 == v2 && s1 == s2
            }
            _ => false,
        }
    }
}

impl Eq for Sentence {}

fn child_hash(sentence: &Sentence) -> u64 {
    let mut hasher = DefaultHasher::new();
    sentence.hash(&mut hasher);
    hasher.finish()
}

impl Hash for Sentence {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Sentence::Predicate(atom) => {
                0u8.hash(state);
                atom.hash(state);
            }
            Sentence::Not(inner) => {
                1u8.hash(state);
                inner.hash(state);
            }
            // Commutative connectives hash by sorted child hashes, so
            // swapped operands produce the same value
            Sentence::And(a, b) | Sentence::Or(a, b) | Sentence::Iff(a, b) => {
                match self {
                    Sentence::And(..) => 2u8.hash(state),
                    Sentence::Or(..) => 3u8.hash(state),
                    _ => 4u8.hash(state),
                }
                let (ha, hb) = (child_hash(a), child_hash(b));
                ha.min(hb).hash(state);
                ha.max(hb).hash(state);
            }
            Sentence::Implies(a, b) => {
                5u8.hash(state);
                a.hash(state);
                b.hash(state);
            }
            Sentence::Quantified(q, v, body) => {
                6u8.hash(state);
                q.hash(state);
                v.hash(state);
                body.hash(state);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fol::Term;

    fn p() -> Sentence {
        Sentence::pred(Atom::new("P", vec![Term::constant("a")]))
    }

    fn q() -> Sentence {
        Sentence::pred(Atom::new("Q", vec![Term::constant("b")]))
    }

    fn hash_of(s: &Sentence) -> u64 {
        let mut hasher = DefaultHasher::new();
        s.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_commutative_equality() {
        assert_eq!(Sentence::and(p(), q()), Sentence::and(q(), p()));
        assert_eq!(Sentence::or(p(), q()), Sentence::or(q(), p()));
        assert_eq!(Sentence::iff(p(), q()), Sentence::iff(q(), p()));
    }

    #[test]
    fn test_implication_is_not_commutative() {
        assert_ne!(Sentence::implies(p(), q()), Sentence::implies(q(), p()));
        assert_eq!(Sentence::implies(p(), q()), Sentence::implies(p(), q()));
    }

    #[test]
    fn test_commutative_hash_consistency() {
        assert_eq!(
            hash_of(&Sentence::and(p(), q())),
            hash_of(&Sentence::and(q(), p()))
        );
        assert_eq!(
            hash_of(&Sentence::or(p(), q())),
            hash_of(&Sentence::or(q(), p()))
        );
        assert_eq!(
            hash_of(&Sentence::iff(p(), q())),
            hash_of(&Sentence::iff(q(), p()))
        );
    }

    #[test]
    fn test_distinct_connectives_are_unequal() {
        assert_ne!(Sentence::and(p(), q()), Sentence::or(p(), q()));
        assert_ne!(Sentence::implies(p(), q()), Sentence::or(p(), q()));
    }

    #[test]
    fn test_free_variables() {
        let x = Variable::new("x");
        let open = Sentence::pred(Atom::new("P", vec![Term::var("x"), Term::var("y")]));
        let partly_closed = Sentence::forall(x.clone(), open.clone());

        assert_eq!(open.free_variables().len(), 2);
        let free = partly_closed.free_variables();
        assert_eq!(free.len(), 1);
        assert!(free.contains(&Variable::new("y")));
        assert!(!partly_closed.is_closed());
        assert!(Sentence::forall(Variable::new("y"), partly_closed).is_closed());
    }

    #[test]
    fn test_conjoin() {
        let all = Sentence::conjoin([p(), q(), p()]).unwrap();
        assert_eq!(all, Sentence::and(Sentence::and(p(), q()), p()));
        assert!(Sentence::conjoin([]).is_none());
    }
}
