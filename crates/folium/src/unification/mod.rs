//! Unification and matching of terms, atoms, and literals

pub mod matching;
mod mgu;

#[cfg(test)]
mod proptest_tests;

pub use matching::{match_literal, match_term};
pub use mgu::{
    occurs_check, unify, unify_atoms, unify_atoms_with, unify_literals, unify_with,
    UnificationError, UnificationResult,
};
