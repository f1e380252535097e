//! One-way matching: find a substitution over the pattern's variables only.
//!
//! Used by instance tests and clause subsumption, where the target must be
//! left untouched.

use crate::fol::{Atom, Literal, Substitution, Term};

/// Find σ defined on the pattern's variables such that `pattern σ == term`
pub fn match_term(pattern: &Term, term: &Term) -> Option<Substitution> {
    let mut subst = Substitution::new();
    match_terms_with(pattern, term, &mut subst).then_some(subst)
}

/// Literal counterpart of [`match_term`]; polarities must agree
pub fn match_literal(pattern: &Literal, literal: &Literal) -> Option<Substitution> {
    let mut subst = Substitution::new();
    match_literals_with(pattern, literal, &mut subst).then_some(subst)
}

/// Try to extend `subst` so that `pattern subst == literal`
pub fn match_literals_with(
    pattern: &Literal,
    literal: &Literal,
    subst: &mut Substitution,
) -> bool {
    pattern.polarity == literal.polarity && match_atoms_with(&pattern.atom, &literal.atom, subst)
}

/// Try to extend `subst` so that `pattern subst == atom`
pub fn match_atoms_with(pattern: &Atom, atom: &Atom, subst: &mut Substitution) -> bool {
    pattern.predicate == atom.predicate
        && pattern.args.len() == atom.args.len()
        && pattern
            .args
            .iter()
            .zip(atom.args.iter())
            .all(|(p, t)| match_terms_with(p, t, subst))
}

/// Try to extend `subst` so that `pattern subst == term`
pub fn match_terms_with(pattern: &Term, term: &Term, subst: &mut Substitution) -> bool {
    match pattern {
        Term::Variable(v) => {
            if let Some(bound) = subst.get(v) {
                // Already bound: the binding must reproduce the target
                bound == term
            } else {
                subst.insert(v.clone(), term.clone());
                true
            }
        }
        Term::Constant(c1) => matches!(term, Term::Constant(c2) if c1 == c2),
        Term::Function(f1, args1) => match term {
            Term::Function(f2, args2) => {
                f1 == f2
                    && args1.len() == args2.len()
                    && args1
                        .iter()
                        .zip(args2.iter())
                        .all(|(a1, a2)| match_terms_with(a1, a2, subst))
            }
            _ => false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fol::Atom;

    #[test]
    fn test_match_variable() {
        let subst = match_term(&Term::var("X"), &Term::constant("a")).unwrap();
        assert_eq!(
            Term::var("X").apply_substitution(&subst),
            Term::constant("a")
        );
    }

    #[test]
    fn test_match_function() {
        let pattern = Term::function("f", vec![Term::var("X"), Term::var("Y")]);
        let term = Term::function("f", vec![Term::constant("a"), Term::constant("b")]);

        let subst = match_term(&pattern, &term).unwrap();
        assert_eq!(pattern.apply_substitution(&subst), term);
    }

    #[test]
    fn test_no_match_constant_against_variable() {
        // Matching is one-way: only pattern variables bind
        assert!(match_term(&Term::constant("a"), &Term::var("X")).is_none());
    }

    #[test]
    fn test_no_match_inconsistent_variable() {
        // mult(inv(X), X) must not match mult(inv(Y), mult(Y, Z))
        let pattern = Term::function(
            "mult",
            vec![
                Term::function("inv", vec![Term::var("X")]),
                Term::var("X"),
            ],
        );
        let term = Term::function(
            "mult",
            vec![
                Term::function("inv", vec![Term::var("Y")]),
                Term::function("mult", vec![Term::var("Y"), Term::var("Z")]),
            ],
        );
        assert!(match_term(&pattern, &term).is_none());
    }

    #[test]
    fn test_match_literal_polarity() {
        let pattern = Literal::negative(Atom::new("P", vec![Term::var("X")]));
        let positive = Literal::positive(Atom::new("P", vec![Term::constant("a")]));
        let negative = Literal::negative(Atom::new("P", vec![Term::constant("a")]));

        assert!(match_literal(&pattern, &positive).is_none());
        assert!(match_literal(&pattern, &negative).is_some());
    }
}
