//! Conversion of sentences to Conjunctive Normal Form.
//!
//! The pipeline: negation normal form (connective elimination inlined),
//! standardize apart, Skolemize, drop universal quantifiers, distribute
//! disjunction over conjunction, flatten into a [`CNFSentence`]. Every
//! rewriting stage is a [`SentenceRewriter`] over the shared traversal
//! core; the distribution step is a fold into clause lists rather than a
//! sentence-to-sentence rewrite. The result is equi-satisfiable with the
//! input (logically equivalent up to Skolemization of existentials).

use crate::fol::{
    CNFSentence, Clause, Constant, FunctionSymbol, Literal, Quantifier, Sentence, SkolemFunction,
    StandardisedVariable, Substitution, Term, Variable,
};
use crate::rewrite::{self, SentenceRewriter};
use std::sync::Arc;

/// Convert a sentence to CNF
pub fn to_cnf(sentence: &Sentence) -> CNFSentence {
    // The original sentence, shared as the back-pointer target of every
    // identifier generated below
    let source = Arc::new(sentence.clone());

    let nnf = rewrite::rewrite(&mut NegationNormalize { negate: false }, sentence).into_owned();
    let standardized = rewrite::rewrite(
        &mut StandardizeApart {
            renaming: Vec::new(),
            source: source.clone(),
        },
        &nnf,
    )
    .into_owned();
    let skolemized = rewrite::rewrite(
        &mut Skolemize {
            universal_scope: Vec::new(),
            source,
        },
        &standardized,
    )
    .into_owned();
    let matrix = rewrite::rewrite(&mut DropUniversals, &skolemized).into_owned();

    CNFSentence::new(distribute(&matrix).into_iter().map(Clause::new).collect())
}

/// Negation normal form with a negation flag: eliminates implications and
/// equivalences, pushes negations inward via De Morgan and quantifier
/// duality, and removes double negations. The positive fragment rides the
/// default walk, so subtrees already in NNF are shared, not rebuilt.
struct NegationNormalize {
    negate: bool,
}

impl NegationNormalize {
    /// Rewrite a child under the given absolute negation flag
    fn with_negate(&mut self, sentence: &Sentence, negate: bool) -> Sentence {
        let saved = self.negate;
        self.negate = negate;
        let out = self
            .rewrite_sentence(sentence)
            .unwrap_or_else(|| sentence.clone());
        self.negate = saved;
        out
    }
}

impl SentenceRewriter for NegationNormalize {
    fn rewrite_sentence(&mut self, sentence: &Sentence) -> Option<Sentence> {
        match sentence {
            Sentence::Predicate(_) => self.negate.then(|| Sentence::not(sentence.clone())),

            Sentence::Not(inner) => {
                if !self.negate {
                    if let Sentence::Predicate(_) = &**inner {
                        // Already a literal
                        return None;
                    }
                }
                // Double negation flips the flag and continues
                Some(self.with_negate(inner, !self.negate))
            }

            // De Morgan: ~(A & B) = ~A | ~B
            Sentence::And(a, b) if self.negate => Some(Sentence::or(
                self.with_negate(a, true),
                self.with_negate(b, true),
            )),

            // De Morgan: ~(A | B) = ~A & ~B
            Sentence::Or(a, b) if self.negate => Some(Sentence::and(
                self.with_negate(a, true),
                self.with_negate(b, true),
            )),

            Sentence::Implies(a, b) => Some(if self.negate {
                // ~(A => B) = A & ~B
                Sentence::and(self.with_negate(a, false), self.with_negate(b, true))
            } else {
                // A => B = ~A | B
                Sentence::or(self.with_negate(a, true), self.with_negate(b, false))
            }),

            Sentence::Iff(a, b) => Some(if self.negate {
                // ~(A <=> B) = (A & ~B) | (~A & B)
                Sentence::or(
                    Sentence::and(self.with_negate(a, false), self.with_negate(b, true)),
                    Sentence::and(self.with_negate(a, true), self.with_negate(b, false)),
                )
            } else {
                // A <=> B = (~A | B) & (A | ~B)
                Sentence::and(
                    Sentence::or(self.with_negate(a, true), self.with_negate(b, false)),
                    Sentence::or(self.with_negate(a, false), self.with_negate(b, true)),
                )
            }),

            // ~(∀x.P) = ∃x.~P and ~(∃x.P) = ∀x.~P
            Sentence::Quantified(quantifier, variable, body) if self.negate => {
                let dual = match quantifier {
                    Quantifier::Forall => Quantifier::Exists,
                    Quantifier::Exists => Quantifier::Forall,
                };
                Some(Sentence::Quantified(
                    dual,
                    variable.clone(),
                    Box::new(self.with_negate(body, true)),
                ))
            }

            // Positive conjunction, disjunction, and quantification descend
            // through the default walk under the current flag
            _ => rewrite::walk_sentence(self, sentence),
        }
    }
}

/// Rename every bound variable to a fresh standardised identifier, so no
/// two quantifiers in the result share a variable. Free variables are
/// untouched. The renaming stack tracks lexical scope, so an inner
/// declaration shadows an outer same-named one.
struct StandardizeApart {
    renaming: Vec<(Variable, Variable)>,
    source: Arc<Sentence>,
}

impl SentenceRewriter for StandardizeApart {
    fn rewrite_sentence(&mut self, sentence: &Sentence) -> Option<Sentence> {
        if let Sentence::Quantified(quantifier, variable, body) = sentence {
            let fresh = Variable::standardised(StandardisedVariable::scoped(
                variable.clone(),
                self.source.clone(),
            ));
            self.renaming.push((variable.clone(), fresh.clone()));
            let new_body = self
                .rewrite_sentence(body)
                .unwrap_or_else(|| (**body).clone());
            self.renaming.pop();
            return Some(Sentence::Quantified(*quantifier, fresh, Box::new(new_body)));
        }
        rewrite::walk_sentence(self, sentence)
    }

    fn rewrite_term(&mut self, term: &Term) -> Option<Term> {
        if let Term::Variable(v) = term {
            return self
                .renaming
                .iter()
                .rev()
                .find(|(declared, _)| declared == v)
                .map(|(_, fresh)| Term::Variable(fresh.clone()));
        }
        rewrite::walk_term(self, term)
    }
}

/// Eliminate existential quantifiers by replacing each existential
/// variable with a Skolem term over the enclosing universal scope.
struct Skolemize {
    /// Universally quantified variables currently in scope, outermost first
    universal_scope: Vec<Variable>,
    source: Arc<Sentence>,
}

impl SentenceRewriter for Skolemize {
    fn rewrite_sentence(&mut self, sentence: &Sentence) -> Option<Sentence> {
        match sentence {
            Sentence::Quantified(Quantifier::Forall, variable, body) => {
                self.universal_scope.push(variable.clone());
                let new_body = self.rewrite_sentence(body);
                self.universal_scope.pop();
                new_body.map(|b| {
                    Sentence::Quantified(Quantifier::Forall, variable.clone(), Box::new(b))
                })
            }

            Sentence::Quantified(Quantifier::Exists, variable, body) => {
                let skolem = SkolemFunction::fresh(variable.clone(), self.source.clone());
                let skolem_term = if self.universal_scope.is_empty() {
                    // No enclosing universals: the Skolem function collapses
                    // to a Skolem constant
                    Term::Constant(Constant::skolem(skolem))
                } else {
                    Term::Function(
                        FunctionSymbol::Skolem(skolem),
                        self.universal_scope
                            .iter()
                            .map(|v| Term::Variable(v.clone()))
                            .collect(),
                    )
                };

                let mut subst = Substitution::new();
                subst.insert(variable.clone(), skolem_term);
                let substituted = body.apply_substitution(&subst);
                Some(self.rewrite_sentence(&substituted).unwrap_or(substituted))
            }

            Sentence::Implies(..) | Sentence::Iff(..) => {
                panic!("implications and equivalences are eliminated by NNF conversion")
            }

            _ => rewrite::walk_sentence(self, sentence),
        }
    }
}

/// Remove universal quantifiers: all remaining variables are implicitly
/// universally quantified.
struct DropUniversals;

impl SentenceRewriter for DropUniversals {
    fn rewrite_sentence(&mut self, sentence: &Sentence) -> Option<Sentence> {
        match sentence {
            Sentence::Quantified(Quantifier::Forall, _, body) => Some(
                self.rewrite_sentence(body)
                    .unwrap_or_else(|| (**body).clone()),
            ),
            Sentence::Quantified(Quantifier::Exists, ..) => {
                panic!("existentials are eliminated by Skolemization")
            }
            Sentence::Implies(..) | Sentence::Iff(..) => {
                panic!("implications and equivalences are eliminated by NNF conversion")
            }
            _ => rewrite::walk_sentence(self, sentence),
        }
    }
}

/// Distribute ∨ over ∧, folding the quantifier-free matrix into the clause
/// lists of the final CNF
fn distribute(sentence: &Sentence) -> Vec<Vec<Literal>> {
    match sentence {
        Sentence::And(a, b) => {
            let mut clauses = distribute(a);
            clauses.extend(distribute(b));
            clauses
        }

        Sentence::Or(a, b) => {
            // (A & B) | C distributes as the cross product of both sides'
            // clause lists
            let left = distribute(a);
            let right = distribute(b);
            let mut clauses = Vec::with_capacity(left.len() * right.len());
            for l in &left {
                for r in &right {
                    let mut combined = l.clone();
                    combined.extend(r.iter().cloned());
                    clauses.push(combined);
                }
            }
            clauses
        }

        Sentence::Predicate(atom) => vec![vec![Literal::positive(atom.clone())]],

        Sentence::Not(inner) => match &**inner {
            Sentence::Predicate(atom) => vec![vec![Literal::negative(atom.clone())]],
            other => panic!("negation of non-atom after NNF conversion: {:?}", other),
        },

        other => panic!("quantifier or connective survived CNF conversion: {:?}", other),
    }
}
