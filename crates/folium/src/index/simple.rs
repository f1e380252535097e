//! The unindexed clause store: a duplicate-rejecting set of clauses.

use super::feature_vector::{read_lock, write_lock};
use crate::fol::Clause;
use crate::resolution::{binary_resolvents, Resolvent};
use indexmap::IndexSet;
use std::sync::RwLock;

/// A set of clauses with stable (insertion-order) iteration, safe for
/// concurrent reads with writes serialized through an internal lock.
/// Readers always observe a consistent snapshot.
#[derive(Debug, Default)]
pub struct SimpleClauseStore {
    clauses: RwLock<IndexSet<Clause>>,
}

impl SimpleClauseStore {
    pub fn new() -> Self {
        SimpleClauseStore {
            clauses: RwLock::new(IndexSet::new()),
        }
    }

    /// Add a clause; returns false and stores nothing when a structurally
    /// equal clause is already present.
    pub fn add(&self, clause: Clause) -> bool {
        write_lock(&self.clauses).insert(clause)
    }

    /// Remove a clause; returns whether it was present. The relative order
    /// of the remaining clauses is preserved.
    pub fn remove(&self, clause: &Clause) -> bool {
        write_lock(&self.clauses).shift_remove(clause)
    }

    pub fn contains(&self, clause: &Clause) -> bool {
        read_lock(&self.clauses).contains(clause)
    }

    pub fn len(&self) -> usize {
        read_lock(&self.clauses).len()
    }

    pub fn is_empty(&self) -> bool {
        read_lock(&self.clauses).is_empty()
    }

    /// Snapshot of the stored clauses, in insertion order
    pub fn clauses(&self) -> Vec<Clause> {
        read_lock(&self.clauses).iter().cloned().collect()
    }

    /// Every valid binary resolvent between the given clause and any stored
    /// clause, paired with the store clause it resolved against
    pub fn find_resolvents(&self, clause: &Clause) -> Vec<(Clause, Resolvent)> {
        let snapshot = self.clauses();
        let mut results = Vec::new();
        for stored in snapshot {
            for resolvent in binary_resolvents(clause, &stored) {
                results.push((stored.clone(), resolvent));
            }
        }
        results
    }
}
