//! Feature vector indexing for subsumption filtering.
//!
//! Each clause is summarized as a sorted vector of (feature, multiplicity)
//! pairs; the index is a trie over these vectors. Vector comparison gives a
//! cheap necessary condition for subsumption, so candidate subsumers
//! (componentwise ≤) and candidate subsumees (componentwise ≥) can be
//! retrieved without touching most of the stored clauses. Features absent
//! from a vector have an implicit count of zero.

use crate::fol::{Clause, FunctionSymbol, PredicateSymbol, Term};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::RwLock;

/// Produces the feature vector summarizing a clause's literals.
///
/// The `Ord` bound supplies the feature ordering; Rust's `Ord` contract
/// makes it consistent with equality, which the trie relies on.
pub trait FeatureExtractor {
    type Feature: Clone + Ord + fmt::Debug;

    /// Raw (feature, count) pairs for a clause. Order and duplicates are
    /// irrelevant; the index sorts and merges them.
    fn features(&self, clause: &Clause) -> Vec<(Self::Feature, u32)>;
}

/// The stock extractor: positive and negative occurrence counts per
/// predicate, plus occurrence counts per function symbol.
#[derive(Debug, Clone, Copy, Default)]
pub struct SymbolFeatures;

/// Feature alphabet of [`SymbolFeatures`]
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SymbolFeature {
    Positive(PredicateSymbol),
    Negative(PredicateSymbol),
    Function(FunctionSymbol),
}

impl FeatureExtractor for SymbolFeatures {
    type Feature = SymbolFeature;

    fn features(&self, clause: &Clause) -> Vec<(SymbolFeature, u32)> {
        let mut features = Vec::new();
        for lit in clause.literals() {
            let feature = if lit.polarity {
                SymbolFeature::Positive(lit.atom.predicate.clone())
            } else {
                SymbolFeature::Negative(lit.atom.predicate.clone())
            };
            features.push((feature, 1));
            for term in &lit.atom.args {
                count_functions(term, &mut features);
            }
        }
        features
    }
}

fn count_functions(term: &Term, features: &mut Vec<(SymbolFeature, u32)>) {
    if let Term::Function(symbol, args) = term {
        features.push((SymbolFeature::Function(symbol.clone()), 1));
        for arg in args {
            count_functions(arg, features);
        }
    }
}

/// Sort features and merge duplicate entries; zero counts are dropped so
/// every stored vector is in canonical sparse form.
fn normalize<F: Ord>(raw: Vec<(F, u32)>) -> Vec<(F, u32)> {
    let mut merged: BTreeMap<F, u32> = BTreeMap::new();
    for (feature, count) in raw {
        if count > 0 {
            *merged.entry(feature).or_insert(0) += count;
        }
    }
    merged.into_iter().collect()
}

/// A node in the feature vector trie. Children are keyed by the next
/// (feature, count) vector element; payloads sit at the node where a
/// clause's vector ends.
#[derive(Debug)]
struct Node<F: Ord, V> {
    children: BTreeMap<(F, u32), Node<F, V>>,
    values: HashMap<Clause, V>,
}

impl<F: Ord + Clone, V> Node<F, V> {
    fn new() -> Self {
        Node {
            children: BTreeMap::new(),
            values: HashMap::new(),
        }
    }

    fn get_or_add_child(&mut self, key: (F, u32)) -> &mut Node<F, V> {
        self.children.entry(key).or_insert_with(Node::new)
    }

    fn delete_child(&mut self, key: &(F, u32)) {
        self.children.remove(key);
    }

    /// Attach a payload; fails if the clause already has one here
    fn add_value(&mut self, clause: Clause, value: V) -> bool {
        if self.values.contains_key(&clause) {
            return false;
        }
        self.values.insert(clause, value);
        true
    }

    fn remove_value(&mut self, clause: &Clause) -> Option<V> {
        self.values.remove(clause)
    }

    fn is_disposable(&self) -> bool {
        self.values.is_empty() && self.children.is_empty()
    }
}

/// A clause index keyed on feature vectors, safe for concurrent reads with
/// writes serialized through an internal lock.
#[derive(Debug)]
pub struct FeatureVectorIndex<X: FeatureExtractor, V = ()> {
    extractor: X,
    inner: RwLock<Inner<X::Feature, V>>,
}

#[derive(Debug)]
struct Inner<F: Ord, V> {
    root: Node<F, V>,
    len: usize,
}

impl<X: FeatureExtractor, V> FeatureVectorIndex<X, V> {
    pub fn new(extractor: X) -> Self {
        FeatureVectorIndex {
            extractor,
            inner: RwLock::new(Inner {
                root: Node::new(),
                len: 0,
            }),
        }
    }

    fn vector(&self, clause: &Clause) -> Vec<(X::Feature, u32)> {
        normalize(self.extractor.features(clause))
    }

    /// Insert a clause with a payload. Returns false (and stores nothing)
    /// if an equal clause is already present.
    pub fn add(&self, clause: Clause, value: V) -> bool {
        let vector = self.vector(&clause);
        let mut inner = write_lock(&self.inner);
        let mut node = &mut inner.root;
        for key in vector {
            node = node.get_or_add_child(key);
        }
        let added = node.add_value(clause, value);
        if added {
            inner.len += 1;
        }
        added
    }

    /// Remove a clause, returning its payload. Empty trie branches are
    /// pruned on the way back up.
    pub fn remove(&self, clause: &Clause) -> Option<V> {
        let vector = self.vector(clause);
        let mut inner = write_lock(&self.inner);
        let removed = remove_rec(&mut inner.root, &vector, clause);
        if removed.is_some() {
            inner.len -= 1;
        }
        removed
    }

    pub fn contains(&self, clause: &Clause) -> bool {
        let vector = self.vector(clause);
        let inner = read_lock(&self.inner);
        let mut node = &inner.root;
        for key in &vector {
            match node.children.get(key) {
                Some(child) => node = child,
                None => return false,
            }
        }
        node.values.contains_key(clause)
    }

    pub fn len(&self) -> usize {
        read_lock(&self.inner).len
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of every stored clause
    pub fn clauses(&self) -> Vec<Clause> {
        let inner = read_lock(&self.inner);
        let mut out = Vec::with_capacity(inner.len);
        collect_all(&inner.root, &mut out);
        out
    }

    /// Stored clauses whose feature vectors are componentwise ≤ the
    /// target's: the candidate subsumers of `clause`
    pub fn potential_subsumers(&self, clause: &Clause) -> Vec<Clause> {
        let vector = self.vector(clause);
        let inner = read_lock(&self.inner);
        let mut out = Vec::new();
        collect_subsumers(&inner.root, &vector, 0, &mut out);
        out
    }

    /// Stored clauses whose feature vectors are componentwise ≥ the
    /// source's: the candidates `clause` may subsume
    pub fn potential_subsumees(&self, clause: &Clause) -> Vec<Clause> {
        let vector = self.vector(clause);
        let inner = read_lock(&self.inner);
        let mut out = Vec::new();
        collect_subsumees(&inner.root, &vector, 0, &mut out);
        out.retain(|stored| stored != clause);
        out
    }
}

impl<X: FeatureExtractor, V: Clone> FeatureVectorIndex<X, V> {
    /// Get a clause's payload
    pub fn get(&self, clause: &Clause) -> Option<V> {
        let vector = self.vector(clause);
        let inner = read_lock(&self.inner);
        let mut node = &inner.root;
        for key in &vector {
            node = node.children.get(key)?;
        }
        node.values.get(clause).cloned()
    }
}

impl<X: FeatureExtractor + Default, V> Default for FeatureVectorIndex<X, V> {
    fn default() -> Self {
        Self::new(X::default())
    }
}

// Lock helpers that survive poisoning: a panicked writer left no partial
// tree mutation visible past its own removal, and readers hold no state.
pub(crate) fn read_lock<T>(lock: &RwLock<T>) -> std::sync::RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub(crate) fn write_lock<T>(lock: &RwLock<T>) -> std::sync::RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn remove_rec<F: Ord + Clone, V>(
    node: &mut Node<F, V>,
    vector: &[(F, u32)],
    clause: &Clause,
) -> Option<V> {
    match vector.split_first() {
        None => node.remove_value(clause),
        Some((key, rest)) => {
            let child = node.children.get_mut(key)?;
            let removed = remove_rec(child, rest, clause);
            if child.is_disposable() {
                node.delete_child(key);
            }
            removed
        }
    }
}

fn collect_all<F: Ord + Clone, V>(node: &Node<F, V>, out: &mut Vec<Clause>) {
    out.extend(node.values.keys().cloned());
    for child in node.children.values() {
        collect_all(child, out);
    }
}

/// Forward query: descend only along edges matched by a target element with
/// a count at least as large. Every node reached holds clauses whose whole
/// vector is covered, so its values qualify.
fn collect_subsumers<F: Ord + Clone, V>(
    node: &Node<F, V>,
    target: &[(F, u32)],
    pos: usize,
    out: &mut Vec<Clause>,
) {
    out.extend(node.values.keys().cloned());
    for ((feature, count), child) in &node.children {
        let mut j = pos;
        while j < target.len() && target[j].0 < *feature {
            j += 1;
        }
        if j < target.len() && target[j].0 == *feature && *count <= target[j].1 {
            collect_subsumers(child, target, j + 1, out);
        }
    }
}

/// Backward query: a candidate may carry extra features, but must cover
/// every source element with a count at least as large. Values qualify only
/// once the whole source vector has been covered.
fn collect_subsumees<F: Ord + Clone, V>(
    node: &Node<F, V>,
    source: &[(F, u32)],
    pos: usize,
    out: &mut Vec<Clause>,
) {
    if pos == source.len() {
        collect_all(node, out);
        return;
    }
    for ((feature, count), child) in &node.children {
        if *feature < source[pos].0 {
            collect_subsumees(child, source, pos, out);
        } else if *feature == source[pos].0 && *count >= source[pos].1 {
            collect_subsumees(child, source, pos + 1, out);
        }
    }
}
