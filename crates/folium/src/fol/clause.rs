//! Clauses and CNF sentences
//!
//! A clause is an unordered set of literals, read disjunctively; a CNF
//! sentence is an unordered set of clauses, read conjunctively. Both
//! deduplicate on construction and compare as sets, with hashes built from
//! an order-independent combination of element hashes.

use super::literal::Literal;
use super::term::Variable;
use serde::Serialize;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A clause (set of literals, representing their disjunction).
///
/// The empty clause exists and represents falsity.
#[derive(Debug, Clone, Serialize)]
pub struct Clause {
    literals: Vec<Literal>,
}

impl Clause {
    /// Create a clause from literals, deduplicating structural repeats.
    /// Insertion order of first occurrences is preserved for display and
    /// iteration, but plays no part in equality or hashing.
    pub fn new(literals: Vec<Literal>) -> Self {
        let mut deduped: Vec<Literal> = Vec::with_capacity(literals.len());
        for lit in literals {
            if !deduped.contains(&lit) {
                deduped.push(lit);
            }
        }
        Clause { literals: deduped }
    }

    /// The empty clause (falsity)
    pub fn empty() -> Self {
        Clause {
            literals: Vec::new(),
        }
    }

    pub fn literals(&self) -> &[Literal] {
        &self.literals
    }

    pub fn len(&self) -> usize {
        self.literals.len()
    }

    pub fn contains(&self, literal: &Literal) -> bool {
        self.literals.contains(literal)
    }

    /// Check if this clause is empty (contradiction)
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    /// Exactly one literal
    pub fn is_unit(&self) -> bool {
        self.literals.len() == 1
    }

    fn positive_count(&self) -> usize {
        self.literals.iter().filter(|l| l.is_positive()).count()
    }

    /// At most one positive literal
    pub fn is_horn(&self) -> bool {
        self.positive_count() <= 1
    }

    /// Exactly one positive literal
    pub fn is_definite(&self) -> bool {
        self.positive_count() == 1
    }

    /// No positive literal
    pub fn is_goal(&self) -> bool {
        self.positive_count() == 0
    }

    /// Check if this clause contains a complementary literal pair
    pub fn is_tautology(&self) -> bool {
        for i in 0..self.literals.len() {
            for j in (i + 1)..self.literals.len() {
                if self.literals[i].atom == self.literals[j].atom
                    && self.literals[i].polarity != self.literals[j].polarity
                {
                    return true;
                }
            }
        }
        false
    }

    /// Get all variables in this clause
    pub fn variables(&self) -> HashSet<Variable> {
        let mut vars = HashSet::new();
        for lit in &self.literals {
            lit.collect_variables(&mut vars);
        }
        vars
    }

    /// This clause minus one literal
    pub fn without(&self, literal: &Literal) -> Clause {
        Clause {
            literals: self
                .literals
                .iter()
                .filter(|l| *l != literal)
                .cloned()
                .collect(),
        }
    }

    /// Set union with another clause
    pub fn union(&self, other: &Clause) -> Clause {
        let mut literals = self.literals.clone();
        literals.extend(other.literals.iter().cloned());
        Clause::new(literals)
    }
}

fn element_hash<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

impl PartialEq for Clause {
    fn eq(&self, other: &Self) -> bool {
        // Both sides are deduplicated, so mutual inclusion reduces to
        // length equality plus one-way containment
        self.literals.len() == other.literals.len()
            && self.literals.iter().all(|lit| other.contains(lit))
    }
}

impl Eq for Clause {}

impl Hash for Clause {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.literals.len().hash(state);
        let combined = self
            .literals
            .iter()
            .fold(0u64, |acc, lit| acc ^ element_hash(lit));
        combined.hash(state);
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "⊥")
        } else {
            for (i, lit) in self.literals.iter().enumerate() {
                if i > 0 {
                    write!(f, " ∨ ")?;
                }
                write!(f, "{}", lit)?;
            }
            Ok(())
        }
    }
}

/// A CNF sentence (set of clauses, representing their conjunction)
#[derive(Debug, Clone, Serialize)]
pub struct CNFSentence {
    clauses: Vec<Clause>,
}

impl CNFSentence {
    /// Create a CNF sentence from clauses, deduplicating structural repeats
    pub fn new(clauses: Vec<Clause>) -> Self {
        let mut deduped: Vec<Clause> = Vec::with_capacity(clauses.len());
        for clause in clauses {
            if !deduped.contains(&clause) {
                deduped.push(clause);
            }
        }
        CNFSentence { clauses: deduped }
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn contains(&self, clause: &Clause) -> bool {
        self.clauses.contains(clause)
    }
}

impl PartialEq for CNFSentence {
    fn eq(&self, other: &Self) -> bool {
        self.clauses.len() == other.clauses.len()
            && self.clauses.iter().all(|c| other.contains(c))
    }
}

impl Eq for CNFSentence {}

impl Hash for CNFSentence {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.clauses.len().hash(state);
        let combined = self
            .clauses
            .iter()
            .fold(0u64, |acc, clause| acc ^ element_hash(clause));
        combined.hash(state);
    }
}

impl fmt::Display for CNFSentence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, clause) in self.clauses.iter().enumerate() {
            if i > 0 {
                write!(f, " ∧ ")?;
            }
            write!(f, "({})", clause)?;
        }
        Ok(())
    }
}
