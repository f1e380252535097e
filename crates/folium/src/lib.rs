//! Folium: first-order logic knowledge representation and inference
//!
//! This library provides an immutable sentence algebra, conversion to
//! Conjunctive Normal Form, most-general unification, clause stores with
//! feature-vector subsumption indexing, and two inference engines: backward
//! chaining over definite clauses and resolution refutation with set of
//! support.

pub mod chaining;
pub mod cnf;
pub mod fol;
pub mod index;
pub mod kb;
pub mod resolution;
pub mod rewrite;
pub mod unification;

// Re-export commonly used types from fol
pub use fol::{
    Atom, CNFSentence, Clause, Constant, ConstantSymbol, FunctionSymbol, Literal,
    PredicateSymbol, Quantifier, Sentence, SkolemFunction, StandardisedVariable, Substitution,
    Term, Variable, VariableSymbol,
};

// Re-export conversion and unification entry points
pub use cnf::to_cnf;
pub use fol::variables::{
    is_generalisation_of, is_instance_of, ordinalize, ordinalize_clause, ordinalize_literal,
    ordinalize_term,
};
pub use unification::{unify, unify_atoms, unify_literals, UnificationError, UnificationResult};

// Re-export storage types
pub use index::{
    subsumes, AddOutcome, FeatureExtractor, FeatureVectorIndex, SimpleClauseStore, SymbolFeatures,
    SubsumptionFilteredStore,
};

// Re-export engine surfaces
pub use chaining::{BackwardChainingKnowledgeBase, ChainingOutcome, ChainingQuery, Proof};
pub use kb::{Answer, AskError, CancellationToken, KnowledgeBase, TellError};
pub use resolution::{
    binary_resolvents, Derivation, ResolutionKnowledgeBase, ResolutionOutcome, ResolutionQuery,
    ResolutionTrace, Resolvent,
};
