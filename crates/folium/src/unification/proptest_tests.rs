//! Property-based tests for unification and matching using proptest.

use super::{match_term, unify};
use crate::fol::variables::ordinalize_term;
use crate::fol::Term;
use proptest::prelude::*;

/// Term description used by the generators: a small fixed alphabet of
/// variables, constants, and function symbols, with bounded depth.
#[derive(Debug, Clone)]
enum TermDesc {
    Var(u8),
    Const(u8),
    Func(u8, Vec<TermDesc>),
}

fn arb_term_desc(max_depth: u32) -> BoxedStrategy<TermDesc> {
    if max_depth == 0 {
        prop_oneof![
            (0..4u8).prop_map(TermDesc::Var),
            (0..4u8).prop_map(TermDesc::Const),
        ]
        .boxed()
    } else {
        prop_oneof![
            3 => (0..4u8).prop_map(TermDesc::Var),
            3 => (0..4u8).prop_map(TermDesc::Const),
            2 => (0..2u8, proptest::collection::vec(arb_term_desc(max_depth - 1), 1..=2))
                .prop_map(|(f, args)| TermDesc::Func(f, args)),
        ]
        .boxed()
    }
}

fn arb_ground_term_desc(max_depth: u32) -> BoxedStrategy<TermDesc> {
    if max_depth == 0 {
        (0..4u8).prop_map(TermDesc::Const).boxed()
    } else {
        prop_oneof![
            3 => (0..4u8).prop_map(TermDesc::Const),
            2 => (0..2u8, proptest::collection::vec(arb_ground_term_desc(max_depth - 1), 1..=2))
                .prop_map(|(f, args)| TermDesc::Func(f, args)),
        ]
        .boxed()
    }
}

fn build_term(desc: &TermDesc) -> Term {
    match desc {
        TermDesc::Var(i) => Term::var(format!("X{}", i)),
        TermDesc::Const(i) => Term::constant(format!("c{}", i)),
        TermDesc::Func(f, args) => {
            Term::function(format!("f{}", f), args.iter().map(build_term).collect())
        }
    }
}

proptest! {
    /// If unification succeeds, the unifier makes both terms identical.
    #[test]
    fn mgu_agreement(d1 in arb_term_desc(3), d2 in arb_term_desc(3)) {
        let t1 = build_term(&d1);
        let t2 = build_term(&d2);
        if let Ok(mgu) = unify(&t1, &t2) {
            prop_assert_eq!(t1.apply_substitution(&mgu), t2.apply_substitution(&mgu));
        }
    }

    /// A successful unifier never binds a variable to a term containing it.
    #[test]
    fn occurs_check_soundness(d1 in arb_term_desc(3), d2 in arb_term_desc(3)) {
        let t1 = build_term(&d1);
        let t2 = build_term(&d2);
        if let Ok(mgu) = unify(&t1, &t2) {
            for (var, image) in mgu.iter() {
                prop_assert!(!image.contains_variable(var));
            }
        }
    }

    /// A term unifies with itself under the identity substitution.
    #[test]
    fn self_unification_is_identity(d in arb_term_desc(3)) {
        let t = build_term(&d);
        let mgu = unify(&t, &t).unwrap();
        prop_assert!(mgu.is_empty());
    }

    /// Matching a pattern against a ground term implies unifiability, and
    /// the match reproduces the target exactly.
    #[test]
    fn matching_agrees_with_unification(d1 in arb_term_desc(2), d2 in arb_ground_term_desc(2)) {
        let pattern = build_term(&d1);
        let target = build_term(&d2);
        if let Some(subst) = match_term(&pattern, &target) {
            prop_assert_eq!(pattern.apply_substitution(&subst), target.clone());
            prop_assert!(unify(&pattern, &target).is_ok());
        }
    }

    /// Ordinalization is idempotent.
    #[test]
    fn ordinalize_idempotent(d in arb_term_desc(3)) {
        let t = build_term(&d);
        let once = ordinalize_term(&t);
        prop_assert_eq!(ordinalize_term(&once), once);
    }
}
