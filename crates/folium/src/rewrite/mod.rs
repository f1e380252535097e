//! Sharing-preserving recursive rewriting over sentences and terms.
//!
//! A rewriter overrides only the hooks it cares about; every hook returns
//! `Option`, where `None` means "unchanged". The default walks reconstruct a
//! parent only when some child actually changed, so a rewriter that changes
//! nothing allocates nothing and `rewrite` hands back the borrowed input.
//! The CNF pipeline's rewriting stages, substitution application at every
//! level (terms through sentences), ordinalization, and the fresh-variable
//! clause renamings used by both engines all run through this core; the
//! only sentence manipulation outside it is CNF distribution, which folds
//! the matrix into clause lists instead of producing a sentence.

use crate::fol::{Atom, Sentence, Term, Variable};
use std::borrow::Cow;

/// A recursive sentence/term rewriter with default-identity behavior.
pub trait SentenceRewriter {
    /// Rewrite a whole sentence. The default descends into children.
    fn rewrite_sentence(&mut self, sentence: &Sentence) -> Option<Sentence> {
        walk_sentence(self, sentence)
    }

    /// Rewrite an atom. The default descends into the argument terms.
    fn rewrite_atom(&mut self, atom: &Atom) -> Option<Atom> {
        walk_atom(self, atom)
    }

    /// Rewrite a term. The default descends into function arguments;
    /// variable references and constants are left unchanged.
    fn rewrite_term(&mut self, term: &Term) -> Option<Term> {
        walk_term(self, term)
    }

    /// Rewrite a quantifier declaration. Distinct from `rewrite_term`:
    /// a rewriter that turns variable references into other terms must not
    /// disturb declarations, and vice versa.
    fn rewrite_declaration(&mut self, _variable: &Variable) -> Option<Variable> {
        None
    }
}

/// Apply a rewriter to a sentence. Returns `Cow::Borrowed` when nothing
/// changed, preserving sharing for callers that cache rewritten sentences.
pub fn rewrite<'a, R>(rewriter: &mut R, sentence: &'a Sentence) -> Cow<'a, Sentence>
where
    R: SentenceRewriter + ?Sized,
{
    match rewriter.rewrite_sentence(sentence) {
        Some(changed) => Cow::Owned(changed),
        None => Cow::Borrowed(sentence),
    }
}

/// Apply a rewriter to a standalone term, cloning only on change.
pub fn rewrite_term<'a, R>(rewriter: &mut R, term: &'a Term) -> Cow<'a, Term>
where
    R: SentenceRewriter + ?Sized,
{
    match rewriter.rewrite_term(term) {
        Some(changed) => Cow::Owned(changed),
        None => Cow::Borrowed(term),
    }
}

/// Default walk over a sentence's children.
pub fn walk_sentence<R>(rewriter: &mut R, sentence: &Sentence) -> Option<Sentence>
where
    R: SentenceRewriter + ?Sized,
{
    match sentence {
        Sentence::Predicate(atom) => rewriter.rewrite_atom(atom).map(Sentence::Predicate),
        Sentence::Not(inner) => rewriter
            .rewrite_sentence(inner)
            .map(|s| Sentence::Not(Box::new(s))),
        Sentence::And(a, b) => walk_pair(rewriter, a, b, Sentence::And),
        Sentence::Or(a, b) => walk_pair(rewriter, a, b, Sentence::Or),
        Sentence::Implies(a, b) => walk_pair(rewriter, a, b, Sentence::Implies),
        Sentence::Iff(a, b) => walk_pair(rewriter, a, b, Sentence::Iff),
        Sentence::Quantified(quantifier, variable, body) => {
            let new_variable = rewriter.rewrite_declaration(variable);
            let new_body = rewriter.rewrite_sentence(body);
            if new_variable.is_none() && new_body.is_none() {
                return None;
            }
            Some(Sentence::Quantified(
                *quantifier,
                new_variable.unwrap_or_else(|| variable.clone()),
                Box::new(new_body.unwrap_or_else(|| (**body).clone())),
            ))
        }
    }
}

fn walk_pair<R>(
    rewriter: &mut R,
    a: &Sentence,
    b: &Sentence,
    construct: fn(Box<Sentence>, Box<Sentence>) -> Sentence,
) -> Option<Sentence>
where
    R: SentenceRewriter + ?Sized,
{
    let new_a = rewriter.rewrite_sentence(a);
    let new_b = rewriter.rewrite_sentence(b);
    if new_a.is_none() && new_b.is_none() {
        return None;
    }
    Some(construct(
        Box::new(new_a.unwrap_or_else(|| a.clone())),
        Box::new(new_b.unwrap_or_else(|| b.clone())),
    ))
}

/// Default walk over an atom's argument terms.
pub fn walk_atom<R>(rewriter: &mut R, atom: &Atom) -> Option<Atom>
where
    R: SentenceRewriter + ?Sized,
{
    walk_args(rewriter, &atom.args).map(|args| Atom {
        predicate: atom.predicate.clone(),
        args,
    })
}

/// Default walk over a term's children.
pub fn walk_term<R>(rewriter: &mut R, term: &Term) -> Option<Term>
where
    R: SentenceRewriter + ?Sized,
{
    match term {
        Term::Variable(_) | Term::Constant(_) => None,
        Term::Function(symbol, args) => {
            walk_args(rewriter, args).map(|args| Term::Function(symbol.clone(), args))
        }
    }
}

// Rebuilds the argument list only when some argument changed; the clone of
// the untouched prefix happens lazily on the first change.
fn walk_args<R>(rewriter: &mut R, args: &[Term]) -> Option<Vec<Term>>
where
    R: SentenceRewriter + ?Sized,
{
    let mut rebuilt: Option<Vec<Term>> = None;
    for (i, arg) in args.iter().enumerate() {
        match rewriter.rewrite_term(arg) {
            Some(changed) => {
                rebuilt
                    .get_or_insert_with(|| args[..i].to_vec())
                    .push(changed);
            }
            None => {
                if let Some(out) = rebuilt.as_mut() {
                    out.push(arg.clone());
                }
            }
        }
    }
    rebuilt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fol::{Atom, Term, Variable};

    struct Identity;
    impl SentenceRewriter for Identity {}

    struct RenameRefs;
    impl SentenceRewriter for RenameRefs {
        fn rewrite_term(&mut self, term: &Term) -> Option<Term> {
            match term {
                Term::Variable(_) => Some(Term::var("renamed")),
                _ => walk_term(self, term),
            }
        }
    }

    fn sample() -> Sentence {
        Sentence::forall(
            Variable::new("x"),
            Sentence::implies(
                Sentence::pred(Atom::new("P", vec![Term::var("x")])),
                Sentence::pred(Atom::new("Q", vec![Term::function(
                    "f",
                    vec![Term::var("x"), Term::constant("a")],
                )])),
            ),
        )
    }

    #[test]
    fn test_identity_preserves_sharing() {
        let sentence = sample();
        let result = rewrite(&mut Identity, &sentence);
        assert!(matches!(result, Cow::Borrowed(_)));
        assert_eq!(&*result, &sentence);
    }

    #[test]
    fn test_identity_on_term() {
        let term = Term::function("f", vec![Term::var("x")]);
        let result = rewrite_term(&mut Identity, &term);
        assert!(matches!(result, Cow::Borrowed(_)));
    }

    #[test]
    fn test_reference_rewrite_leaves_declarations_alone() {
        let sentence = sample();
        let result = rewrite(&mut RenameRefs, &sentence);
        match &*result {
            Sentence::Quantified(_, declaration, body) => {
                // Declaration untouched, references renamed
                assert_eq!(declaration, &Variable::new("x"));
                match &**body {
                    Sentence::Implies(antecedent, _) => match &**antecedent {
                        Sentence::Predicate(atom) => {
                            assert_eq!(atom.args[0], Term::var("renamed"));
                        }
                        other => panic!("unexpected antecedent {:?}", other),
                    },
                    other => panic!("unexpected body {:?}", other),
                }
            }
            other => panic!("unexpected result {:?}", other),
        }
    }
}
