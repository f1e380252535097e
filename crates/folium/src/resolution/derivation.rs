//! Derivation records and resolution traces.
//!
//! Every clause a query touches gets a record of how it arose (inference
//! rule plus premise indices). A trace over those records is enough to
//! reconstruct the refutation graph, and serializes to JSON.

use crate::fol::{Clause, Substitution};
use serde::Serialize;

/// How a clause was derived
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Derivation {
    /// Name of the inference rule that produced this clause
    pub rule: String,
    /// Indices of the premise clauses used in the inference
    pub premises: Vec<usize>,
}

impl Derivation {
    /// A base knowledge-base clause (no premises)
    pub fn input() -> Self {
        Derivation {
            rule: "Input".into(),
            premises: vec![],
        }
    }

    /// A clause of the negated query (the set-of-support seed)
    pub fn negated_query() -> Self {
        Derivation {
            rule: "NegatedQuery".into(),
            premises: vec![],
        }
    }

    /// A binary resolvent of two clauses
    pub fn resolution(left: usize, right: usize) -> Self {
        Derivation {
            rule: "Resolution".into(),
            premises: vec![left, right],
        }
    }

    pub fn is_input(&self) -> bool {
        self.premises.is_empty()
    }
}

/// One clause of a resolution trace
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceStep {
    pub clause: Clause,
    pub derivation: Derivation,
    /// Unifier of the complementary literal pair, for derived clauses
    pub unifier: Option<Substitution>,
}

/// The full record of a resolution run: every clause the query retained,
/// in derivation order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolutionTrace {
    pub steps: Vec<TraceStep>,
    /// Index of the empty clause, when the run ended in a refutation
    pub empty_clause: Option<usize>,
}

impl ResolutionTrace {
    /// The ancestor closure of the empty clause: the indices of exactly the
    /// steps participating in the refutation, in ascending order. Empty when
    /// no refutation was found.
    pub fn refutation(&self) -> Vec<usize> {
        let Some(root) = self.empty_clause else {
            return vec![];
        };

        let mut included = vec![false; self.steps.len()];
        let mut worklist = vec![root];
        while let Some(index) = worklist.pop() {
            if included[index] {
                continue;
            }
            included[index] = true;
            worklist.extend(self.steps[index].derivation.premises.iter().copied());
        }

        (0..self.steps.len()).filter(|&i| included[i]).collect()
    }

    /// Serialize the trace to JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
