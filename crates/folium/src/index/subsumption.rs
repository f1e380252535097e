//! Clause subsumption and the subsumption-filtered clause store.
//!
//! A clause C subsumes D when some substitution σ over C's variables makes
//! every literal of Cσ a member of D. Subsumed clauses are redundant, so the
//! filtered store rejects them on the way in (forward subsumption) and can
//! evict stored clauses a newcomer subsumes (backward subsumption).

use super::feature_vector::{FeatureExtractor, FeatureVectorIndex, SymbolFeatures};
use crate::fol::{Clause, Substitution};
use crate::unification::matching::match_literals_with;
use crate::unification::unify_atoms_with;
use std::sync::Mutex;

/// True iff some substitution σ over `subsumer`'s variables makes every
/// literal of `subsumer σ` a literal of `subsumed`.
///
/// The empty clause subsumes nothing, not even itself: it is falsity and the
/// engines detect it before any subsumption bookkeeping.
pub fn subsumes(subsumer: &Clause, subsumed: &Clause) -> bool {
    if subsumer.is_empty() {
        return false;
    }
    find_subsumption_mapping(subsumer, subsumed, 0, &Substitution::new())
}

/// Backtracking search for the subsumption substitution. Several subsumer
/// literals may map onto one target literal (the substitution can merge
/// them), so targets are not marked used.
fn find_subsumption_mapping(
    subsumer: &Clause,
    subsumed: &Clause,
    index: usize,
    subst: &Substitution,
) -> bool {
    let Some(literal) = subsumer.literals().get(index) else {
        return true; // All literals mapped
    };

    for target in subsumed.literals() {
        if target.polarity != literal.polarity {
            continue;
        }
        let mut branch = subst.clone();
        if match_literals_with(literal, target, &mut branch)
            && find_subsumption_mapping(subsumer, subsumed, index + 1, &branch)
        {
            return true;
        }
    }

    false
}

/// True iff `clause`, taken as a whole, unifies with some member of
/// `others`: the literal sets admit a bijective pairing that unifies under
/// one substitution. Used by the resolution engine to prune redundant work.
pub fn unifies_with_any_of<'a>(
    clause: &Clause,
    others: impl IntoIterator<Item = &'a Clause>,
) -> bool {
    others
        .into_iter()
        .any(|other| clauses_unify(clause, other))
}

fn clauses_unify(left: &Clause, right: &Clause) -> bool {
    left.len() == right.len()
        && pair_literals(
            left,
            right,
            0,
            &Substitution::new(),
            &mut vec![false; right.len()],
        )
}

fn pair_literals(
    left: &Clause,
    right: &Clause,
    index: usize,
    subst: &Substitution,
    used: &mut Vec<bool>,
) -> bool {
    let Some(literal) = left.literals().get(index) else {
        return true;
    };

    for (j, candidate) in right.literals().iter().enumerate() {
        if used[j] || candidate.polarity != literal.polarity {
            continue;
        }
        let mut branch = subst.clone();
        if unify_atoms_with(&literal.atom, &candidate.atom, &mut branch).is_ok() {
            used[j] = true;
            if pair_literals(left, right, index + 1, &branch, used) {
                return true;
            }
            used[j] = false;
        }
    }

    false
}

/// Result of adding a clause to a [`SubsumptionFilteredStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// Rejected: an existing clause subsumes the newcomer (or it is an
    /// exact duplicate)
    Subsumed,
    /// Stored; `displaced` lists existing clauses the newcomer subsumed
    /// and evicted
    Added { displaced: Vec<Clause> },
}

impl AddOutcome {
    pub fn was_added(&self) -> bool {
        matches!(self, AddOutcome::Added { .. })
    }
}

/// A clause store layered over a [`FeatureVectorIndex`] that performs
/// forward subsumption on every add, and backward subsumption unless
/// disabled. Reads are concurrent; writers queue on a single lock.
#[derive(Debug)]
pub struct SubsumptionFilteredStore<X: FeatureExtractor = SymbolFeatures> {
    index: FeatureVectorIndex<X, ()>,
    backward: bool,
    writer: Mutex<()>,
}

impl SubsumptionFilteredStore<SymbolFeatures> {
    pub fn new() -> Self {
        Self::with_extractor(SymbolFeatures)
    }
}

impl Default for SubsumptionFilteredStore<SymbolFeatures> {
    fn default() -> Self {
        Self::new()
    }
}

impl<X: FeatureExtractor> SubsumptionFilteredStore<X> {
    pub fn with_extractor(extractor: X) -> Self {
        SubsumptionFilteredStore {
            index: FeatureVectorIndex::new(extractor),
            backward: true,
            writer: Mutex::new(()),
        }
    }

    /// Enable or disable backward subsumption on add (enabled by default)
    pub fn with_backward(mut self, enabled: bool) -> Self {
        self.backward = enabled;
        self
    }

    /// Add a clause, rejecting it if an existing clause subsumes it and
    /// evicting existing clauses it subsumes.
    pub fn add(&self, clause: Clause) -> AddOutcome {
        let _writer = self
            .writer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if !clause.is_empty() {
            for candidate in self.index.potential_subsumers(&clause) {
                if subsumes(&candidate, &clause) {
                    return AddOutcome::Subsumed;
                }
            }
        }

        let mut displaced = Vec::new();
        if self.backward && !clause.is_empty() {
            for candidate in self.index.potential_subsumees(&clause) {
                if subsumes(&clause, &candidate) && self.index.remove(&candidate).is_some() {
                    displaced.push(candidate);
                }
            }
        }

        if self.index.add(clause, ()) {
            AddOutcome::Added { displaced }
        } else {
            AddOutcome::Subsumed
        }
    }

    /// Check whether an existing clause subsumes the given one
    pub fn is_subsumed(&self, clause: &Clause) -> bool {
        !clause.is_empty()
            && self
                .index
                .potential_subsumers(clause)
                .iter()
                .any(|candidate| subsumes(candidate, clause))
    }

    pub fn contains(&self, clause: &Clause) -> bool {
        self.index.contains(clause)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Snapshot of the stored clauses
    pub fn clauses(&self) -> Vec<Clause> {
        self.index.clauses()
    }
}
