//! Symbol kinds for first-order logic identifiers.
//!
//! Identifiers come in four namespaces (variables, constants, functions,
//! predicates). Within each namespace, user-supplied names and generated
//! identifiers are distinct kinds: a standardised variable or Skolem function
//! never compares equal to a named symbol, even when their printed forms
//! collide. Generated identifiers carry a process-unique id and compare by
//! that id alone, which gives them instance identity.

use super::sentence::Sentence;
use super::term::Variable;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{self, AtomicU64};
use std::sync::Arc;

static NEXT_SYMBOL_ID: AtomicU64 = AtomicU64::new(0);

fn next_symbol_id() -> u64 {
    NEXT_SYMBOL_ID.fetch_add(1, atomic::Ordering::Relaxed)
}

/// A variable identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum VariableSymbol {
    /// A caller-supplied label.
    Named(String),
    /// A fresh identifier produced by standardising apart (or by an engine
    /// renaming clauses apart before an inference).
    Standardised(StandardisedVariable),
    /// The canonical alphabet used by ordinalization: `v0, v1, v2, …`.
    Ordinal(usize),
}

/// A constant identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum ConstantSymbol {
    /// A caller-supplied label.
    Named(String),
    /// A Skolem function of arity zero.
    Skolem(SkolemFunction),
}

/// A function identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum FunctionSymbol {
    /// A caller-supplied label.
    Named(String),
    /// A function introduced by Skolemization.
    Skolem(SkolemFunction),
}

/// A predicate identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum PredicateSymbol {
    /// A caller-supplied label.
    Named(String),
    /// The reserved equality sentinel. Compares unequal to every named
    /// predicate, including ones a caller happens to label `"="`.
    Equality,
}

impl PredicateSymbol {
    pub fn named(name: impl Into<String>) -> Self {
        PredicateSymbol::Named(name.into())
    }
}

/// A fresh variable identifier produced by standardising apart.
///
/// Carries a back-pointer to the original declaration it replaced and,
/// when produced by the CNF pipeline, the sentence it was produced from.
/// Equality and hash use the unique id only; the printed label is
/// diagnostic and may collide between distinct instances.
#[derive(Debug, Clone)]
pub struct StandardisedVariable {
    id: u64,
    context: Arc<StandardisedVariableContext>,
}

#[derive(Debug)]
pub struct StandardisedVariableContext {
    /// The variable declared by the quantifier (or clause) this replaced.
    pub original: Variable,
    /// The sentence the standardisation pass ran on, when one exists.
    /// Engine-side renamings of loose clause variables have no sentence.
    pub source: Option<Arc<Sentence>>,
}

impl StandardisedVariable {
    /// A fresh identifier for a quantifier declaration in `source`.
    pub fn scoped(original: Variable, source: Arc<Sentence>) -> Self {
        StandardisedVariable {
            id: next_symbol_id(),
            context: Arc::new(StandardisedVariableContext {
                original,
                source: Some(source),
            }),
        }
    }

    /// A fresh identifier for an engine-side clause renaming.
    pub fn renaming(original: Variable) -> Self {
        StandardisedVariable {
            id: next_symbol_id(),
            context: Arc::new(StandardisedVariableContext {
                original,
                source: None,
            }),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// The declaration this identifier replaced.
    pub fn original(&self) -> &Variable {
        &self.context.original
    }

    /// The sentence this identifier was produced from, if any.
    pub fn source(&self) -> Option<&Arc<Sentence>> {
        self.context.source.as_ref()
    }
}

impl PartialEq for StandardisedVariable {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for StandardisedVariable {}

impl Hash for StandardisedVariable {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for StandardisedVariable {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for StandardisedVariable {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl Serialize for StandardisedVariable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut st = serializer.serialize_struct("StandardisedVariable", 3)?;
        st.serialize_field("kind", "standardised")?;
        st.serialize_field("id", &self.id)?;
        st.serialize_field("label", &self.to_string())?;
        st.end()
    }
}

impl fmt::Display for StandardisedVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.context.original)
    }
}

/// A fresh function identifier produced by Skolemization.
///
/// Carries a back-pointer to the existentially quantified variable it
/// replaced and the sentence it was produced from. Equality and hash use
/// the unique id only.
#[derive(Debug, Clone)]
pub struct SkolemFunction {
    id: u64,
    context: Arc<SkolemFunctionContext>,
}

#[derive(Debug)]
pub struct SkolemFunctionContext {
    /// The existentially quantified variable this function replaced.
    pub existential: Variable,
    /// The sentence the Skolemization pass ran on.
    pub source: Arc<Sentence>,
}

impl SkolemFunction {
    pub fn fresh(existential: Variable, source: Arc<Sentence>) -> Self {
        SkolemFunction {
            id: next_symbol_id(),
            context: Arc::new(SkolemFunctionContext {
                existential,
                source,
            }),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// The existential declaration this function replaced.
    pub fn existential(&self) -> &Variable {
        &self.context.existential
    }

    /// The sentence this function was produced from.
    pub fn source(&self) -> &Arc<Sentence> {
        &self.context.source
    }
}

impl PartialEq for SkolemFunction {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for SkolemFunction {}

impl Hash for SkolemFunction {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for SkolemFunction {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SkolemFunction {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl Serialize for SkolemFunction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut st = serializer.serialize_struct("SkolemFunction", 3)?;
        st.serialize_field("kind", "skolem")?;
        st.serialize_field("id", &self.id)?;
        st.serialize_field("label", &self.to_string())?;
        st.end()
    }
}

impl fmt::Display for SkolemFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sk{}", self.id)
    }
}

impl fmt::Display for VariableSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariableSymbol::Named(name) => write!(f, "{}", name),
            VariableSymbol::Standardised(sv) => write!(f, "{}", sv),
            VariableSymbol::Ordinal(n) => write!(f, "v{}", n),
        }
    }
}

impl fmt::Display for ConstantSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstantSymbol::Named(name) => write!(f, "{}", name),
            ConstantSymbol::Skolem(sk) => write!(f, "{}", sk),
        }
    }
}

impl fmt::Display for FunctionSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FunctionSymbol::Named(name) => write!(f, "{}", name),
            FunctionSymbol::Skolem(sk) => write!(f, "{}", sk),
        }
    }
}

impl fmt::Display for PredicateSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PredicateSymbol::Named(name) => write!(f, "{}", name),
            PredicateSymbol::Equality => write!(f, "="),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fol::Term;
    use std::collections::HashSet;

    fn dummy_source() -> Arc<Sentence> {
        Arc::new(Sentence::Predicate(crate::fol::Atom::new("P", vec![])))
    }

    #[test]
    fn test_standardised_instance_identity() {
        let original = Variable::new("x");
        let a = StandardisedVariable::scoped(original.clone(), dummy_source());
        let b = StandardisedVariable::scoped(original.clone(), dummy_source());

        // Same original, same printed label, still distinct identifiers
        assert_eq!(a.to_string(), b.to_string());
        assert_ne!(a, b);
        assert_eq!(a, a.clone());

        let mut set = HashSet::new();
        set.insert(a.clone());
        set.insert(b.clone());
        set.insert(a.clone());
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_skolem_back_pointer() {
        let existential = Variable::new("y");
        let source = dummy_source();
        let sk = SkolemFunction::fresh(existential.clone(), source.clone());

        assert_eq!(sk.existential(), &existential);
        assert!(Arc::ptr_eq(sk.source(), &source));
    }

    #[test]
    fn test_equality_sentinel_is_reserved() {
        // A user predicate that prints as "=" is still a different identifier
        let user = PredicateSymbol::named("=");
        assert_ne!(user, PredicateSymbol::Equality);
        assert_eq!(user.to_string(), PredicateSymbol::Equality.to_string());
    }

    #[test]
    fn test_named_kinds_do_not_collide() {
        let named = VariableSymbol::Named("x".to_string());
        let standardised = VariableSymbol::Standardised(StandardisedVariable::scoped(
            Variable::new("x"),
            dummy_source(),
        ));
        assert_ne!(named, standardised);
    }

    #[test]
    fn test_renaming_of_renaming_keeps_label() {
        let v = Variable::new("x");
        let first = Variable::standardised(StandardisedVariable::renaming(v));
        let second = StandardisedVariable::renaming(first);
        assert_eq!(second.to_string(), "x");
        let _ = Term::Variable(Variable::standardised(second));
    }
}
