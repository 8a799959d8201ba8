//! Property-based tests for ConstituencyGraph invariants.
//!
//! Graphs are generated over small integer node sets so that cycles,
//! self-loops and shared dependents show up often.

use multisieve::{ConstituencyGraph, HeadDeps};
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet, VecDeque};

const RELATIONS: &[&str] = &["hd/su", "hd/obj1", "hd/mod", "-- / --"];

fn arb_edges(max_node: u32) -> impl Strategy<Value = Vec<(u32, u32, String)>> {
    prop::collection::vec(
        (0..max_node, 0..max_node, prop::sample::select(RELATIONS)),
        0..40,
    )
    .prop_map(|edges| {
        edges
            .into_iter()
            .map(|(h, d, r)| (h, d, r.to_string()))
            .collect()
    })
}

fn adjacency(edges: &[(u32, u32, String)]) -> HeadDeps<u32> {
    let mut map: HeadDeps<u32> = BTreeMap::new();
    for (h, d, r) in edges {
        map.entry(*h).or_default().insert((*d, r.clone()));
    }
    map
}

fn reachable(edges: &[(u32, u32, String)], start: u32) -> BTreeSet<u32> {
    let map = adjacency(edges);
    let mut seen = BTreeSet::from([start]);
    let mut queue = VecDeque::from([start]);
    while let Some(node) = queue.pop_front() {
        for (dep, _) in map.get(&node).into_iter().flatten() {
            if seen.insert(*dep) {
                queue.push_back(*dep);
            }
        }
    }
    seen
}

proptest! {
    #[test]
    fn constituent_always_contains_node(edges in arb_edges(12)) {
        let graph = ConstituencyGraph::from_triples(edges);
        // 12..16 are never part of the graph
        for node in 0..16u32 {
            prop_assert!(graph.get_constituent(&node).contains(&node));
        }
    }

    #[test]
    fn dep2heads_is_exact_inverse(edges in arb_edges(12)) {
        let graph = ConstituencyGraph::from_triples(edges);
        for (head, deps) in graph.head2deps() {
            for (dep, relation) in deps {
                let heads = graph.dep2heads().get(dep);
                prop_assert!(heads.is_some_and(|h| h.contains(&(*head, relation.clone()))));
            }
        }
        for (dep, heads) in graph.dep2heads() {
            for (head, relation) in heads {
                let deps = graph.head2deps().get(head);
                prop_assert!(deps.is_some_and(|d| d.contains(&(*dep, relation.clone()))));
            }
        }
    }

    #[test]
    fn self_reference_filter_is_idempotent(edges in arb_edges(8)) {
        let once = ConstituencyGraph::filter_direct_self_reference(&adjacency(&edges));
        let twice = ConstituencyGraph::filter_direct_self_reference(&once);
        prop_assert_eq!(&once, &twice);
        prop_assert!(once.iter().all(|(h, deps)| !deps.is_empty() && deps.iter().all(|(d, _)| d != h)));
    }

    #[test]
    fn first_query_sees_full_reachability(edges in arb_edges(10), start in 0..10u32) {
        // Before any memoization a node's constituent is everything reachable.
        let graph = ConstituencyGraph::from_triples(edges.clone());
        let constituent = graph.get_constituent(&start);
        prop_assert_eq!(&*constituent, &reachable(&edges, start));
    }

    #[test]
    fn acyclic_constituents_are_exact(raw in arb_edges(10)) {
        // Orient every edge downwards so the graph is a DAG.
        let edges: Vec<(u32, u32, String)> = raw
            .into_iter()
            .filter(|(h, d, _)| h != d)
            .map(|(h, d, r)| (h.min(d), h.max(d), r))
            .collect();
        let graph = ConstituencyGraph::from_triples(edges.clone());
        for node in 0..10u32 {
            let constituent = graph.get_constituent(&node);
            prop_assert_eq!(&*constituent, &reachable(&edges, node));
        }
        prop_assert!(graph.get_roots(false, false).is_ok());
    }

    #[test]
    fn filtering_never_loses_reachable_kept_nodes(edges in arb_edges(10), dropped in 0..10u32) {
        let keep = |n: &u32| *n != dropped;
        let graph = ConstituencyGraph::from_edges(edges.clone(), keep);
        for node in (0..10u32).filter(|n| *n != dropped) {
            let mut expected = reachable(&edges, node);
            expected.remove(&dropped);
            let fresh = ConstituencyGraph::from_edges(edges.clone(), keep);
            let constituent = fresh.get_constituent(&node);
            prop_assert_eq!(&*constituent, &expected);
        }
        prop_assert!(graph.get_direct_dependents(&dropped).is_none());
        prop_assert!(graph.get_direct_parents(&dropped).is_none());
    }
}
