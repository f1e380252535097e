//! Variable substitutions

use super::clause::Clause;
use super::literal::{Atom, Literal};
use super::sentence::Sentence;
use super::term::{Term, Variable};
use crate::rewrite::{self, SentenceRewriter};
use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};
use std::collections::HashMap;

/// A substitution mapping variables to terms.
///
/// The map is kept normalized: inserting through `insert_normalized`
/// propagates each new binding into every stored image, so application is a
/// single pass and never needs to chase binding chains. Acyclicity is the
/// caller's obligation and is guaranteed by the unifier's occurs-check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Substitution {
    map: HashMap<Variable, Term>,
}

impl Substitution {
    /// Create a new empty (identity) substitution
    pub fn new() -> Self {
        Substitution {
            map: HashMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Add a variable -> term mapping without normalization
    pub fn insert(&mut self, var: Variable, term: Term) {
        self.map.insert(var, term);
    }

    /// Add a variable -> term mapping with eager propagation, keeping every
    /// stored image fully substituted
    pub fn insert_normalized(&mut self, var: Variable, term: Term) {
        let normalized = term.apply_substitution(self);

        let mut single = Substitution::new();
        single.insert(var.clone(), normalized.clone());

        for image in self.map.values_mut() {
            *image = image.apply_substitution(&single);
        }
        self.map.insert(var, normalized);
    }

    /// Compose two substitutions: applying the result is equivalent to
    /// applying `self`, then `other`
    pub fn compose(&self, other: &Substitution) -> Substitution {
        let mut result = Substitution::new();

        for (var, term) in &self.map {
            result.insert(var.clone(), term.apply_substitution(other));
        }
        for (var, term) in &other.map {
            if !self.map.contains_key(var) {
                result.insert(var.clone(), term.clone());
            }
        }

        result
    }

    /// Get the term a variable is bound to, if any
    pub fn get(&self, var: &Variable) -> Option<&Term> {
        self.map.get(var)
    }

    /// Check if a variable is bound
    pub fn contains(&self, var: &Variable) -> bool {
        self.map.contains_key(var)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Variable, &Term)> {
        self.map.iter()
    }

    /// The substitution restricted to the given variables
    pub fn restricted_to<'a>(
        &self,
        vars: impl IntoIterator<Item = &'a Variable>,
    ) -> Substitution {
        let mut result = Substitution::new();
        for var in vars {
            if let Some(term) = self.map.get(var) {
                result.insert(var.clone(), term.clone());
            }
        }
        result
    }
}

// JSON objects need string keys, so a substitution serializes as a sequence
// of bindings rather than a map.
impl Serialize for Substitution {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Binding<'a> {
            variable: &'a Variable,
            term: &'a Term,
        }

        let mut seq = serializer.serialize_seq(Some(self.map.len()))?;
        for (variable, term) in &self.map {
            seq.serialize_element(&Binding { variable, term })?;
        }
        seq.end()
    }
}

impl Term {
    /// Apply a substitution to this term
    pub fn apply_substitution(&self, subst: &Substitution) -> Term {
        rewrite::rewrite_term(&mut Substitute::new(subst), self).into_owned()
    }
}

impl Atom {
    /// Apply a substitution to this atom
    pub fn apply_substitution(&self, subst: &Substitution) -> Atom {
        let mut rewriter = Substitute::new(subst);
        rewriter.rewrite_atom(self).unwrap_or_else(|| self.clone())
    }
}

impl Literal {
    /// Apply a substitution to this literal
    pub fn apply_substitution(&self, subst: &Substitution) -> Literal {
        Literal {
            atom: self.atom.apply_substitution(subst),
            polarity: self.polarity,
        }
    }
}

impl Clause {
    /// Apply a substitution to this clause. Literals that become equal under
    /// the substitution collapse, per the clause's set semantics.
    pub fn apply_substitution(&self, subst: &Substitution) -> Clause {
        let mut rewriter = Substitute::new(subst);
        Clause::new(
            self.literals()
                .iter()
                .map(|lit| Literal {
                    atom: rewriter
                        .rewrite_atom(&lit.atom)
                        .unwrap_or_else(|| lit.atom.clone()),
                    polarity: lit.polarity,
                })
                .collect(),
        )
    }
}

/// The one substitution rewriter behind every applier, from terms up to
/// sentences. It replaces variable references and respects quantifier
/// shadowing: a binding for `x` does not reach below a quantifier that
/// re-declares `x`. Declarations themselves are never rewritten.
struct Substitute<'a> {
    subst: &'a Substitution,
    shadowed: Vec<Variable>,
}

impl<'a> Substitute<'a> {
    fn new(subst: &'a Substitution) -> Self {
        Substitute {
            subst,
            shadowed: Vec::new(),
        }
    }
}

impl SentenceRewriter for Substitute<'_> {
    fn rewrite_sentence(&mut self, sentence: &Sentence) -> Option<Sentence> {
        if let Sentence::Quantified(quantifier, variable, body) = sentence {
            if self.subst.contains(variable) {
                self.shadowed.push(variable.clone());
                let new_body = self.rewrite_sentence(body);
                self.shadowed.pop();
                return new_body.map(|b| {
                    Sentence::Quantified(*quantifier, variable.clone(), Box::new(b))
                });
            }
        }
        rewrite::walk_sentence(self, sentence)
    }

    fn rewrite_term(&mut self, term: &Term) -> Option<Term> {
        if let Term::Variable(v) = term {
            if self.shadowed.contains(v) {
                return None;
            }
            return self.subst.get(v).cloned();
        }
        rewrite::walk_term(self, term)
    }
}

impl Sentence {
    /// Apply a substitution to every free variable reference in this sentence
    pub fn apply_substitution(&self, subst: &Substitution) -> Sentence {
        rewrite::rewrite(&mut Substitute::new(subst), self).into_owned()
    }
}
