//! Property tests for the coverage audit algebra.
//!
//! Descriptors are drawn from a small kind alphabet so the generated
//! universe, covered, exempt, and known-gap sets overlap often.

use std::collections::BTreeSet;

use proptest::prelude::*;
use valcov_audit::{
    all_types, audit, Auditor, ExceptionEntry, ExceptionLists, Scheme, UniverseFilter,
};
use valcov_core::{GroupVersion, KnownType, TypeDescriptor};

fn descriptor() -> impl Strategy<Value = TypeDescriptor> {
    "[A-H]".prop_map(|k| format!("v1.Kind{k}").parse::<TypeDescriptor>().unwrap())
}

fn descriptors() -> impl Strategy<Value = Vec<TypeDescriptor>> {
    prop::collection::vec(descriptor(), 0..12)
}

proptest! {
    #[test]
    fn fully_covered_universe_has_no_violations(u in descriptors(), extra in descriptors()) {
        let covered: Vec<_> = u.iter().chain(extra.iter()).cloned().collect();
        let none: &[TypeDescriptor] = &[];
        prop_assert!(audit(&u, &covered, none, none).is_empty());
    }

    #[test]
    fn exempt_type_never_reported(
        u in descriptors(),
        covered in descriptors(),
        exempt in descriptors(),
        gap in descriptors(),
    ) {
        let result = audit(&u, &covered, &exempt, &gap);
        for t in &exempt {
            prop_assert!(!result.contains(t));
        }
    }

    #[test]
    fn unexcused_uncovered_type_always_reported(
        u in descriptors(),
        covered in descriptors(),
        exempt in descriptors(),
        gap in descriptors(),
    ) {
        let result = audit(&u, &covered, &exempt, &gap);
        let expected: BTreeSet<TypeDescriptor> = u
            .iter()
            .filter(|t| !covered.contains(t) && !exempt.contains(t) && !gap.contains(t))
            .cloned()
            .collect();
        prop_assert_eq!(result, expected);
    }

    #[test]
    fn idempotent(
        u in descriptors(),
        covered in descriptors(),
        exempt in descriptors(),
        gap in descriptors(),
    ) {
        prop_assert_eq!(
            audit(&u, &covered, &exempt, &gap),
            audit(&u, &covered, &exempt, &gap)
        );
    }

    #[test]
    fn order_independent(
        u in descriptors(),
        covered in descriptors(),
        exempt in descriptors(),
        gap in descriptors(),
    ) {
        let rev = |v: &Vec<TypeDescriptor>| v.iter().rev().cloned().collect::<Vec<_>>();
        prop_assert_eq!(
            audit(&u, &covered, &exempt, &gap),
            audit(&rev(&u), &rev(&covered), &rev(&exempt), &rev(&gap))
        );
    }

    #[test]
    fn report_matches_pure_audit(
        u in descriptors(),
        covered in descriptors(),
        exempt in descriptors(),
        gap in descriptors(),
    ) {
        let dedup = |v: &Vec<TypeDescriptor>| -> Vec<ExceptionEntry> {
            v.iter()
                .collect::<BTreeSet<_>>()
                .into_iter()
                .map(|t| ExceptionEntry::new(t.clone(), "generated"))
                .collect()
        };
        let lists = ExceptionLists { known_exempt: dedup(&exempt), known_gap: dedup(&gap) };
        let universe: BTreeSet<_> = u.iter().cloned().collect();
        let covered_set: BTreeSet<_> = covered.iter().cloned().collect();

        let report = Auditor::default().audit_sets(&universe, &covered_set, &lists);
        let reported: BTreeSet<_> =
            report.violations.iter().map(|v| v.descriptor.clone()).collect();
        prop_assert_eq!(reported, audit(&u, &covered, &exempt, &gap));
        prop_assert_eq!(
            report.exempted.len() + report.known_gaps.len() + report.violations.len(),
            universe.difference(&covered_set).count()
        );
    }
}

#[test]
fn collection_wrapper_excluded_before_audit() {
    let mut scheme = Scheme::new();
    scheme
        .add_known_type(
            KnownType::new("v1.ListOfA".parse().unwrap(), "pkg/apis/a").with_collection(true),
        )
        .unwrap();

    let universe = all_types(&scheme, &GroupVersion::core_v1(), &UniverseFilter::default());
    assert!(universe.is_empty());

    let report = Auditor::default().run(
        &scheme,
        &valcov_audit::ValidatorRegistry::<()>::new(),
        &ExceptionLists::default(),
    );
    assert!(report.passed);
    assert_eq!(report.universe_size, 0);
}
