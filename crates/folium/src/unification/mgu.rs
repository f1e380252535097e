//! Most General Unifier (MGU) computation

use crate::fol::{
    Atom, ConstantSymbol, FunctionSymbol, Literal, PredicateSymbol, Substitution, Term, Variable,
};
use std::fmt;

/// Result of a unification attempt
pub type UnificationResult = Result<Substitution, UnificationError>;

/// Why a unification attempt failed. An occurs-check failure is the defined
/// "not unifiable" outcome, not an error condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnificationError {
    /// Occurs check failed - variable occurs in term
    OccursCheck(Variable, Term),
    /// Function symbols don't match
    FunctionClash(FunctionSymbol, FunctionSymbol),
    /// Constant symbols don't match
    ConstantClash(ConstantSymbol, ConstantSymbol),
    /// Argument list lengths don't match
    ArityMismatch(usize, usize),
    /// Term kinds don't match (e.g. function vs constant)
    TermKindClash(Term, Term),
    /// Predicate symbols don't match
    PredicateClash(PredicateSymbol, PredicateSymbol),
    /// Literal polarities don't match
    PolarityMismatch,
}

impl fmt::Display for UnificationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnificationError::OccursCheck(var, term) => {
                write!(f, "occurs check: {} occurs in {}", var, term)
            }
            UnificationError::FunctionClash(a, b) => {
                write!(f, "function symbols clash: {} vs {}", a, b)
            }
            UnificationError::ConstantClash(a, b) => {
                write!(f, "constant symbols clash: {} vs {}", a, b)
            }
            UnificationError::ArityMismatch(a, b) => {
                write!(f, "arity mismatch: {} vs {}", a, b)
            }
            UnificationError::TermKindClash(a, b) => {
                write!(f, "term kinds clash: {} vs {}", a, b)
            }
            UnificationError::PredicateClash(a, b) => {
                write!(f, "predicate symbols clash: {} vs {}", a, b)
            }
            UnificationError::PolarityMismatch => write!(f, "literal polarities differ"),
        }
    }
}

/// Unify two terms, returning a most general unifier (MGU) if one exists
pub fn unify(term1: &Term, term2: &Term) -> UnificationResult {
    let mut subst = Substitution::new();
    unify_with(term1, term2, &mut subst)?;
    Ok(subst)
}

/// Unify two atoms: predicate identifiers must be equal and argument lists
/// must unify pairwise under one accumulating substitution
pub fn unify_atoms(atom1: &Atom, atom2: &Atom) -> UnificationResult {
    let mut subst = Substitution::new();
    unify_atoms_with(atom1, atom2, &mut subst)?;
    Ok(subst)
}

/// Unify two literals: polarities must match, then the atoms must unify
pub fn unify_literals(lit1: &Literal, lit2: &Literal) -> UnificationResult {
    if lit1.polarity != lit2.polarity {
        return Err(UnificationError::PolarityMismatch);
    }
    unify_atoms(&lit1.atom, &lit2.atom)
}

/// Unify two atoms under an existing substitution
pub fn unify_atoms_with(
    atom1: &Atom,
    atom2: &Atom,
    subst: &mut Substitution,
) -> Result<(), UnificationError> {
    if atom1.predicate != atom2.predicate {
        return Err(UnificationError::PredicateClash(
            atom1.predicate.clone(),
            atom2.predicate.clone(),
        ));
    }
    if atom1.args.len() != atom2.args.len() {
        return Err(UnificationError::ArityMismatch(
            atom1.args.len(),
            atom2.args.len(),
        ));
    }
    for (arg1, arg2) in atom1.args.iter().zip(atom2.args.iter()) {
        unify_with(arg1, arg2, subst)?;
    }
    Ok(())
}

/// Unify two terms under an existing substitution
pub fn unify_with(
    term1: &Term,
    term2: &Term,
    subst: &mut Substitution,
) -> Result<(), UnificationError> {
    let t1 = term1.apply_substitution(subst);
    let t2 = term2.apply_substitution(subst);

    match (&t1, &t2) {
        // Same term - nothing to do
        _ if t1 == t2 => Ok(()),

        // Variable cases
        (Term::Variable(v), t) | (t, Term::Variable(v)) => {
            if occurs_check(v, t) {
                Err(UnificationError::OccursCheck(v.clone(), t.clone()))
            } else {
                // Normalized insert keeps the accumulated substitution
                // fully propagated
                subst.insert_normalized(v.clone(), t.clone());
                Ok(())
            }
        }

        // Constant clash
        (Term::Constant(c1), Term::Constant(c2)) => Err(UnificationError::ConstantClash(
            c1.symbol.clone(),
            c2.symbol.clone(),
        )),

        // Function terms
        (Term::Function(f1, args1), Term::Function(f2, args2)) => {
            if f1 != f2 {
                return Err(UnificationError::FunctionClash(f1.clone(), f2.clone()));
            }
            if args1.len() != args2.len() {
                return Err(UnificationError::ArityMismatch(args1.len(), args2.len()));
            }

            // Unify arguments pairwise
            for (arg1, arg2) in args1.iter().zip(args2.iter()) {
                unify_with(arg1, arg2, subst)?;
            }
            Ok(())
        }

        // Function-constant clash
        (Term::Function(..), Term::Constant(_)) | (Term::Constant(_), Term::Function(..)) => {
            Err(UnificationError::TermKindClash(t1.clone(), t2.clone()))
        }
    }
}

/// Check if variable occurs in term (occurs check)
pub fn occurs_check(var: &Variable, term: &Term) -> bool {
    match term {
        Term::Variable(v) => v == var,
        Term::Constant(_) => false,
        Term::Function(_, args) => args.iter().any(|arg| occurs_check(var, arg)),
    }
}
