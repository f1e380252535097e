//! Atoms and literals in first-order logic

use super::symbol::PredicateSymbol;
use super::term::{Term, Variable};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// An atomic formula (predicate applied to terms)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Atom {
    pub predicate: PredicateSymbol,
    pub args: Vec<Term>,
}

/// A literal (positive or negative atom)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Literal {
    pub atom: Atom,
    pub polarity: bool, // true = positive, false = negative
}

impl Atom {
    /// An atom with a named predicate symbol
    pub fn new(predicate: impl Into<String>, args: Vec<Term>) -> Self {
        Atom {
            predicate: PredicateSymbol::Named(predicate.into()),
            args,
        }
    }

    /// An equality atom, using the reserved sentinel identifier
    pub fn equality(left: Term, right: Term) -> Self {
        Atom {
            predicate: PredicateSymbol::Equality,
            args: vec![left, right],
        }
    }

    /// Check if this atom uses the reserved equality identifier
    pub fn is_equality(&self) -> bool {
        self.predicate == PredicateSymbol::Equality
    }

    /// Collect all variables in this atom
    pub fn collect_variables(&self, vars: &mut HashSet<Variable>) {
        for arg in &self.args {
            arg.collect_variables(vars);
        }
    }

    /// Get all variables in this atom
    pub fn variables(&self) -> HashSet<Variable> {
        let mut vars = HashSet::new();
        self.collect_variables(&mut vars);
        vars
    }

    /// Check whether the atom contains no variables
    pub fn is_ground(&self) -> bool {
        self.args.iter().all(Term::is_ground)
    }
}

impl Literal {
    /// Create a new positive literal
    pub fn positive(atom: Atom) -> Self {
        Literal {
            atom,
            polarity: true,
        }
    }

    /// Create a new negative literal
    pub fn negative(atom: Atom) -> Self {
        Literal {
            atom,
            polarity: false,
        }
    }

    /// Get the complement of this literal
    pub fn complement(&self) -> Literal {
        Literal {
            atom: self.atom.clone(),
            polarity: !self.polarity,
        }
    }

    pub fn is_positive(&self) -> bool {
        self.polarity
    }

    /// Collect all variables in this literal
    pub fn collect_variables(&self, vars: &mut HashSet<Variable>) {
        self.atom.collect_variables(vars);
    }
}

// Display implementations

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_equality() && self.args.len() == 2 {
            write!(f, "{} = {}", self.args[0], self.args[1])
        } else {
            write!(f, "{}(", self.predicate)?;
            for (i, arg) in self.args.iter().enumerate() {
                if i > 0 {
                    write!(f, ",")?;
                }
                write!(f, "{}", arg)?;
            }
            write!(f, ")")
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.polarity {
            write!(f, "~")?;
        }
        write!(f, "{}", self.atom)
    }
}
