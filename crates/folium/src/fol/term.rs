//! Terms in first-order logic

use super::symbol::{ConstantSymbol, FunctionSymbol, StandardisedVariable, VariableSymbol};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// A variable in first-order logic.
///
/// The same type appears as a declaration (in quantifier nodes) and as a
/// reference (in `Term::Variable`); a reference denotes the innermost
/// enclosing declaration with an equal symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Variable {
    pub symbol: VariableSymbol,
}

/// A constant symbol
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Constant {
    pub symbol: ConstantSymbol,
}

/// A term in first-order logic
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum Term {
    Variable(Variable),
    Constant(Constant),
    Function(FunctionSymbol, Vec<Term>),
}

impl Variable {
    pub fn new(name: impl Into<String>) -> Self {
        Variable {
            symbol: VariableSymbol::Named(name.into()),
        }
    }

    pub fn standardised(sv: StandardisedVariable) -> Self {
        Variable {
            symbol: VariableSymbol::Standardised(sv),
        }
    }

    pub fn ordinal(n: usize) -> Self {
        Variable {
            symbol: VariableSymbol::Ordinal(n),
        }
    }
}

impl Constant {
    pub fn new(name: impl Into<String>) -> Self {
        Constant {
            symbol: ConstantSymbol::Named(name.into()),
        }
    }

    pub fn skolem(sk: super::symbol::SkolemFunction) -> Self {
        Constant {
            symbol: ConstantSymbol::Skolem(sk),
        }
    }
}

impl Term {
    /// A variable reference term with a named symbol
    pub fn var(name: impl Into<String>) -> Term {
        Term::Variable(Variable::new(name))
    }

    /// A constant term with a named symbol
    pub fn constant(name: impl Into<String>) -> Term {
        Term::Constant(Constant::new(name))
    }

    /// A function application with a named symbol
    pub fn function(name: impl Into<String>, args: Vec<Term>) -> Term {
        Term::Function(FunctionSymbol::Named(name.into()), args)
    }

    /// Collect all variables in this term
    pub fn collect_variables(&self, vars: &mut HashSet<Variable>) {
        match self {
            Term::Variable(v) => {
                vars.insert(v.clone());
            }
            Term::Constant(_) => {}
            Term::Function(_, args) => {
                for arg in args {
                    arg.collect_variables(vars);
                }
            }
        }
    }

    /// Get all variables in this term
    pub fn variables(&self) -> HashSet<Variable> {
        let mut vars = HashSet::new();
        self.collect_variables(&mut vars);
        vars
    }

    /// Check whether the term contains no variables
    pub fn is_ground(&self) -> bool {
        match self {
            Term::Variable(_) => false,
            Term::Constant(_) => true,
            Term::Function(_, args) => args.iter().all(Term::is_ground),
        }
    }

    /// Check whether the given variable occurs in this term
    pub fn contains_variable(&self, var: &Variable) -> bool {
        match self {
            Term::Variable(v) => v == var,
            Term::Constant(_) => false,
            Term::Function(_, args) => args.iter().any(|arg| arg.contains_variable(var)),
        }
    }
}

// Display implementations for diagnostics

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol)
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Variable(v) => write!(f, "{}", v),
            Term::Constant(c) => write!(f, "{}", c),
            Term::Function(func, args) => {
                write!(f, "{}(", func)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
        }
    }
}
