//! Constituent and root scenarios for the dependency graph.

use multisieve::{ConstituencyGraph, Error, LOOSE_PUNCTUATION};
use std::collections::BTreeSet;

// =============================================================================
// Constituents
// =============================================================================

#[test]
fn test_subject_object_fragment() {
    let graph = ConstituencyGraph::from_triples([("h", "s", "hd/su"), ("h", "o", "hd/obj1")]);

    assert_eq!(*graph.get_constituent(&"h"), BTreeSet::from(["h", "s", "o"]));
    assert_eq!(*graph.get_constituent(&"s"), BTreeSet::from(["s"]));
    assert_eq!(graph.get_direct_dependents(&"h"), Some(BTreeSet::from(["s", "o"])));
    assert!(graph.get_direct_dependents(&"s").is_none());
    assert_eq!(graph.get_direct_parents(&"o"), Some(BTreeSet::from(["h"])));
}

#[test]
fn test_unknown_node_is_singleton() {
    let graph = ConstituencyGraph::from_triples([("h", "s", "hd/su")]);
    assert_eq!(*graph.get_constituent(&"nope"), BTreeSet::from(["nope"]));
    assert!(graph.get_direct_parents(&"nope").is_none());
}

#[test]
fn test_self_loop_terminates() {
    let graph = ConstituencyGraph::from_triples([(0u32, 0u32, "x")]);
    assert_eq!(*graph.get_constituent(&0), BTreeSet::from([0]));
}

#[test]
fn test_pure_cycles_terminate() {
    for k in [2u32, 3, 10] {
        let graph = ConstituencyGraph::from_triples((0..k).map(|i| (i, (i + 1) % k, "x")));
        for node in 0..k {
            let constituent = graph.get_constituent(&node);
            assert!(constituent.contains(&node));
            assert!(constituent.len() <= k as usize);
        }
        // a fresh graph sees the whole cycle from any entry point
        let fresh = ConstituencyGraph::from_triples((0..k).map(|i| (i, (i + 1) % k, "x")));
        assert_eq!(fresh.get_constituent(&(k - 1)).len(), k as usize);
    }
}

#[test]
fn test_deep_chain_does_not_overflow() {
    let n = 3_000u32;
    let graph = ConstituencyGraph::from_triples((0..n).map(|i| (i, i + 1, "hd/mod")));
    assert_eq!(graph.get_constituent(&0).len(), n as usize + 1);
    assert_eq!(graph.get_roots(false, false).unwrap(), BTreeSet::from([0]));
}

// =============================================================================
// Roots
// =============================================================================

fn tree_with_cluster(escape: bool) -> ConstituencyGraph<&'static str> {
    let mut edges = vec![
        ("r", "x", "hd/su"),
        ("x", "y", "hd/mod"),
        ("a", "b", "hd/obj1"),
        ("b", "a", "hd/mod"),
    ];
    if escape {
        edges.push(("a", "p", LOOSE_PUNCTUATION));
    }
    ConstituencyGraph::from_triples(edges)
}

#[test]
fn test_single_root() {
    let graph = tree_with_cluster(false);
    let tree = ConstituencyGraph::from_triples([("r", "x", "hd/su"), ("x", "y", "hd/mod")]);
    assert_eq!(tree.get_roots(false, false).unwrap(), BTreeSet::from(["r"]));
    assert_eq!(graph.get_roots(true, false).unwrap(), BTreeSet::from(["r"]));
}

#[test]
fn test_unrooted_cycle_is_structural_error() {
    let graph = tree_with_cluster(false);
    let err = graph.get_roots(false, false).unwrap_err();
    assert!(matches!(err, Error::Structural(ref msg) if msg.ends_with("a, b")));
    // no escape edge to repair with
    assert!(graph.get_roots(false, true).is_err());
    assert!(graph.get_roots(true, true).is_err());
}

#[test]
fn test_loose_punctuation_repair() {
    let graph = tree_with_cluster(true);
    assert!(graph.get_roots(false, false).is_err());
    assert_eq!(graph.get_roots(false, true).unwrap(), BTreeSet::from(["a", "r"]));
    assert_eq!(graph.get_roots(true, true).unwrap(), BTreeSet::from(["a", "r"]));
}

#[test]
fn test_nested_repair_candidates_rejected() {
    // a and b both carry loose punctuation and reach each other
    let graph = ConstituencyGraph::from_triples([
        ("a", "b", "hd/obj1"),
        ("b", "a", "hd/mod"),
        ("a", "p", LOOSE_PUNCTUATION),
        ("b", "q", LOOSE_PUNCTUATION),
    ]);
    let err = graph.get_roots(false, true).unwrap_err();
    assert!(matches!(err, Error::Structural(ref msg) if msg.contains("contains")));
}

// =============================================================================
// Filtering
// =============================================================================

#[test]
fn test_from_edges_elides_filtered_heads() {
    // "," heads a dependent in some parser output; it must not drop it
    let graph = ConstituencyGraph::from_edges(
        [("v", ",", "-- / --"), (",", "n", "hd/su")],
        |node: &&str| *node != ",",
    );
    assert_eq!(graph.get_direct_dependents(&"v"), Some(BTreeSet::from(["n"])));
    assert!(graph.get_constituent(&"v").contains("n"));
    assert!(graph.get_direct_parents(&",").is_none());
}
