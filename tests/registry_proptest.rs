//! Property-based tests for the coreference class registry.

use multisieve::registry::{ClassId, CoreferenceClassRegistry};
use multisieve::{Error, MentionId};
use proptest::prelude::*;
use std::collections::BTreeSet;

fn arb_groups() -> impl Strategy<Value = Vec<BTreeSet<usize>>> {
    prop::collection::vec(prop::collection::btree_set(0usize..20, 1..5), 0..12)
}

fn fill(groups: &[BTreeSet<usize>]) -> CoreferenceClassRegistry {
    let mut registry = CoreferenceClassRegistry::new();
    for group in groups {
        registry
            .add_coref_class(group.iter().copied().map(MentionId), false)
            .unwrap();
    }
    registry
}

proptest! {
    #[test]
    fn merge_is_idempotent(groups in arb_groups()) {
        let mut registry = fill(&groups);
        registry.merge().unwrap();
        let snapshot = registry.clone();
        prop_assert!(registry.merge().unwrap().is_empty());
        prop_assert_eq!(registry, snapshot);
    }

    #[test]
    fn merged_classes_are_disjoint(groups in arb_groups()) {
        let mut registry = fill(&groups);
        registry.merge().unwrap();
        let mut seen = BTreeSet::new();
        for members in registry.classes().values() {
            for mention in members {
                prop_assert!(seen.insert(*mention), "{} is in two classes", mention);
            }
        }
    }

    #[test]
    fn merge_preserves_mentions_and_links(groups in arb_groups()) {
        let mut registry = fill(&groups);
        let before = registry.referenced_mentions();
        registry.merge().unwrap();
        prop_assert_eq!(registry.referenced_mentions(), before);

        for group in &groups {
            let first = MentionId(*group.iter().next().unwrap());
            for other in group {
                prop_assert!(registry.are_coreferent(first, MentionId(*other)));
            }
        }
    }

    #[test]
    fn merge_keeps_oldest_id(groups in arb_groups()) {
        let mut registry = fill(&groups);
        let replaced = registry.merge().unwrap();
        for (gone, kept) in &replaced {
            prop_assert!(kept < gone);
            prop_assert!(registry.get(*gone).is_none());
            prop_assert!(registry.get(*kept).is_some());
        }
        prop_assert_eq!(registry.len() + replaced.len(), groups.len());
    }

    #[test]
    fn unknown_class_leaves_registry_untouched(groups in arb_groups(), extra in 100u64..200) {
        let mut registry = fill(&groups);
        let snapshot = registry.clone();
        let mut group: BTreeSet<ClassId> = registry.classes().keys().copied().collect();
        group.insert(ClassId(extra));
        let err = registry.merge_keys(&[group]).unwrap_err();
        prop_assert!(matches!(err, Error::UnknownClass(_)));
        prop_assert_eq!(registry, snapshot);
    }
}
