//! Constituency lookups over a dependency graph.
//!
//! The graph is built once per document from dependency edges and is
//! read-only afterwards. Its only mutable state is the constituent memo
//! table, which sits behind [`crate::sync::Mutex`].
//!
//! # Constituents
//!
//! The constituent of a node is everything reachable from it through
//! head→dependent edges, plus the node itself:
//!
//! ```text
//!          herkende (t_1)
//!         /            \
//!     hd/su           hd/obj1
//!       /                \
//!   Jan (t_0)       zichzelf (t_2)
//!
//!   constituent(t_1) = {t_0, t_1, t_2}
//!   constituent(t_0) = {t_0}
//! ```
//!
//! Parser output is not guaranteed to be a tree. Traversal keeps an explicit
//! stack with an on-path marker per node; an edge back into the current path
//! contributes nothing. Nodes on a cycle therefore get a partial (but finite)
//! constituent, and that answer is memoized like any other.
//!
//! # Example
//!
//! ```rust
//! use multisieve_core::ConstituencyGraph;
//! use std::collections::BTreeSet;
//!
//! let graph = ConstituencyGraph::from_triples([
//!     ("h", "s", "hd/su"),
//!     ("h", "o", "hd/obj1"),
//! ]);
//!
//! assert_eq!(*graph.get_constituent(&"h"), BTreeSet::from(["h", "o", "s"]));
//! assert_eq!(*graph.get_constituent(&"s"), BTreeSet::from(["s"]));
//! assert!(graph.get_direct_dependents(&"s").is_none());
//! ```

use crate::error::{Error, Result};
use crate::sync::{lock, Mutex};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

/// Relation label used by the default root repair: Alpino's loose punctuation.
pub const LOOSE_PUNCTUATION: &str = "-- / --";

/// Adjacency map: node → set of (neighbour, relation).
pub type HeadDeps<N> = BTreeMap<N, BTreeSet<(N, String)>>;

/// Bound for node identifiers.
pub trait GraphNode: Clone + Ord + Hash + fmt::Display {}

impl<T: Clone + Ord + Hash + fmt::Display> GraphNode for T {}

// =============================================================================
// Arena
// =============================================================================

/// Dense index over all nodes, so traversal can use plain vectors for its
/// visit markers and memo slots.
#[derive(Debug, Default)]
struct Arena<N> {
    nodes: Vec<N>,
    index: HashMap<N, usize>,
    children: Vec<Vec<usize>>,
}

impl<N: GraphNode> Arena<N> {
    fn build(head2deps: &HeadDeps<N>) -> Self {
        let mut arena = Arena {
            nodes: Vec::new(),
            index: HashMap::new(),
            children: Vec::new(),
        };
        for (head, deps) in head2deps {
            let h = arena.intern(head);
            for (dep, _) in deps {
                let d = arena.intern(dep);
                if !arena.children[h].contains(&d) {
                    arena.children[h].push(d);
                }
            }
        }
        arena
    }

    fn intern(&mut self, node: &N) -> usize {
        if let Some(&i) = self.index.get(node) {
            return i;
        }
        let i = self.nodes.len();
        self.nodes.push(node.clone());
        self.index.insert(node.clone(), i);
        self.children.push(Vec::new());
        i
    }
}

// =============================================================================
// ConstituencyGraph
// =============================================================================

/// Head→dependent adjacency with memoized constituent lookups.
///
/// `dep2heads` is derived from `head2deps` at construction and never mutated
/// separately, so it is always the exact inverse.
pub struct ConstituencyGraph<N> {
    head2deps: HeadDeps<N>,
    dep2heads: HeadDeps<N>,
    arena: Arena<N>,
    constituents: Mutex<Vec<Option<Arc<BTreeSet<N>>>>>,
    loose_punctuation: String,
}

impl<N: GraphNode> ConstituencyGraph<N> {
    /// Build from an adjacency map. Heads with an empty dependent set are dropped.
    #[must_use]
    pub fn new(head2deps: HeadDeps<N>) -> Self {
        let head2deps: HeadDeps<N> = head2deps
            .into_iter()
            .filter(|(_, deps)| !deps.is_empty())
            .collect();
        let dep2heads = invert(&head2deps);
        let arena = Arena::build(&head2deps);
        let slots = arena.nodes.len();
        log::debug!(
            "[graph] {} heads, {} dependents, {} nodes",
            head2deps.len(),
            dep2heads.len(),
            slots
        );
        Self {
            head2deps,
            dep2heads,
            arena,
            constituents: Mutex::new(vec![None; slots]),
            loose_punctuation: LOOSE_PUNCTUATION.to_string(),
        }
    }

    /// Build from `(head, dependent, relation)` triples, keeping every node.
    #[must_use]
    pub fn from_triples<I, R>(triples: I) -> Self
    where
        I: IntoIterator<Item = (N, N, R)>,
        R: Into<String>,
    {
        Self::from_edges(triples, |_| true)
    }

    /// Build from `(head, dependent, relation)` triples, keeping only nodes
    /// for which `keep` holds.
    ///
    /// Edges to a filtered dependent are dropped. A filtered head is elided:
    /// its kept dependents are re-attached to its nearest kept ancestors.
    #[must_use]
    pub fn from_edges<I, R, F>(edges: I, keep: F) -> Self
    where
        I: IntoIterator<Item = (N, N, R)>,
        R: Into<String>,
        F: Fn(&N) -> bool,
    {
        let mut all: HeadDeps<N> = BTreeMap::new();
        for (head, dep, relation) in edges {
            all.entry(head).or_default().insert((dep, relation.into()));
        }
        Self::new(Self::filter_head_deps(&all, keep))
    }

    /// Set the relation label `get_roots(_, true)` treats as loose punctuation.
    #[must_use]
    pub fn with_loose_punctuation(mut self, relation: impl Into<String>) -> Self {
        self.loose_punctuation = relation.into();
        self
    }

    /// Head → (dependent, relation).
    #[must_use]
    pub fn head2deps(&self) -> &HeadDeps<N> {
        &self.head2deps
    }

    /// Dependent → (head, relation); the exact inverse of [`Self::head2deps`].
    #[must_use]
    pub fn dep2heads(&self) -> &HeadDeps<N> {
        &self.dep2heads
    }

    // -------------------------------------------------------------------------
    // Filtering
    // -------------------------------------------------------------------------

    /// Drop every node failing `keep` from an adjacency map.
    ///
    /// Dependents are re-parented to the nearest kept ancestors of an elided
    /// head, found breadth-first over the unfiltered inverse. The search skips
    /// visited nodes, so cyclic input terminates.
    #[must_use]
    pub fn filter_head_deps<F>(head2deps: &HeadDeps<N>, keep: F) -> HeadDeps<N>
    where
        F: Fn(&N) -> bool,
    {
        let inverse = invert(head2deps);
        let mut filtered: HeadDeps<N> = BTreeMap::new();

        for (head, deps) in head2deps {
            let accepted: BTreeSet<(N, String)> =
                deps.iter().filter(|(dep, _)| keep(dep)).cloned().collect();
            if accepted.is_empty() {
                continue;
            }
            if keep(head) {
                filtered.entry(head.clone()).or_default().extend(accepted);
                continue;
            }

            let mut visited: HashSet<&N> = HashSet::from([head]);
            let mut queue: VecDeque<&N> = VecDeque::from([head]);
            while let Some(node) = queue.pop_front() {
                let Some(parents) = inverse.get(node) else {
                    continue;
                };
                for (parent, _) in parents {
                    if !visited.insert(parent) {
                        continue;
                    }
                    if keep(parent) {
                        filtered
                            .entry(parent.clone())
                            .or_default()
                            .extend(accepted.iter().cloned());
                    } else {
                        queue.push_back(parent);
                    }
                }
            }
        }

        filtered.retain(|_, deps| !deps.is_empty());
        filtered
    }

    /// Drop edges from a node to itself; heads left without dependents disappear.
    ///
    /// Idempotent.
    #[must_use]
    pub fn filter_direct_self_reference(head2deps: &HeadDeps<N>) -> HeadDeps<N> {
        head2deps
            .iter()
            .filter_map(|(head, deps)| {
                let kept: BTreeSet<(N, String)> =
                    deps.iter().filter(|(dep, _)| dep != head).cloned().collect();
                (!kept.is_empty()).then(|| (head.clone(), kept))
            })
            .collect()
    }

    // -------------------------------------------------------------------------
    // Direct lookups
    // -------------------------------------------------------------------------

    /// Direct dependents of `node`, or `None` when it heads no edges.
    #[must_use]
    pub fn get_direct_dependents(&self, node: &N) -> Option<BTreeSet<N>> {
        self.head2deps
            .get(node)
            .map(|deps| deps.iter().map(|(dep, _)| dep.clone()).collect())
    }

    /// Direct dependents of `node` with their relation labels.
    #[must_use]
    pub fn get_direct_dependents_with_relation(&self, node: &N) -> Option<&BTreeSet<(N, String)>> {
        self.head2deps.get(node)
    }

    /// Direct heads of `node`, or `None` when it depends on nothing.
    #[must_use]
    pub fn get_direct_parents(&self, node: &N) -> Option<BTreeSet<N>> {
        self.dep2heads
            .get(node)
            .map(|heads| heads.iter().map(|(head, _)| head.clone()).collect())
    }

    /// Direct heads of `node` with their relation labels.
    #[must_use]
    pub fn get_direct_parents_with_relation(&self, node: &N) -> Option<&BTreeSet<(N, String)>> {
        self.dep2heads.get(node)
    }

    // -------------------------------------------------------------------------
    // Constituents
    // -------------------------------------------------------------------------

    /// The constituent of `node`: `node` plus everything below it.
    ///
    /// Always contains `node`, including for ids the graph has never seen.
    pub fn get_constituent(&self, node: &N) -> Arc<BTreeSet<N>> {
        let Some(&start) = self.arena.index.get(node) else {
            return Arc::new(BTreeSet::from([node.clone()]));
        };

        let mut memo = lock(&self.constituents);
        if let Some(done) = &memo[start] {
            return Arc::clone(done);
        }

        struct Frame<N> {
            node: usize,
            next_child: usize,
            members: BTreeSet<N>,
        }

        let mut on_path = vec![false; self.arena.nodes.len()];
        let mut stack = vec![Frame {
            node: start,
            next_child: 0,
            members: BTreeSet::new(),
        }];
        on_path[start] = true;

        loop {
            let Some(frame) = stack.last_mut() else {
                break;
            };
            let children = &self.arena.children[frame.node];
            if let Some(&child) = children.get(frame.next_child) {
                frame.next_child += 1;
                if on_path[child] {
                    // back edge: cycle break
                    continue;
                }
                if let Some(done) = &memo[child] {
                    frame.members.extend(done.iter().cloned());
                    continue;
                }
                on_path[child] = true;
                stack.push(Frame {
                    node: child,
                    next_child: 0,
                    members: BTreeSet::new(),
                });
                continue;
            }

            let Some(mut finished) = stack.pop() else {
                break;
            };
            on_path[finished.node] = false;
            finished
                .members
                .insert(self.arena.nodes[finished.node].clone());
            let result = Arc::new(finished.members);
            memo[finished.node] = Some(Arc::clone(&result));
            match stack.last_mut() {
                Some(parent) => parent.members.extend(result.iter().cloned()),
                None => return result,
            }
        }

        Arc::new(BTreeSet::from([node.clone()]))
    }

    // -------------------------------------------------------------------------
    // Roots
    // -------------------------------------------------------------------------

    /// Nodes with outgoing edges but no incoming edge.
    ///
    /// The union of the roots' constituents must cover every head; otherwise
    /// some cycle hangs below no root.
    ///
    /// - `ignore_non_trees = false, try_fixing = false`: uncovered heads are an error.
    /// - `try_fixing = true`: uncovered heads with a loose-punctuation edge
    ///   become extra roots, provided none of them contains another; the
    ///   coverage check then runs again and must pass, whatever
    ///   `ignore_non_trees` says.
    /// - `ignore_non_trees = true, try_fixing = false`: no coverage check.
    pub fn get_roots(&self, ignore_non_trees: bool, try_fixing: bool) -> Result<BTreeSet<N>> {
        let mut roots: BTreeSet<N> = self
            .head2deps
            .keys()
            .filter(|head| !self.dep2heads.contains_key(*head))
            .cloned()
            .collect();
        if ignore_non_trees && !try_fixing {
            return Ok(roots);
        }

        let uncovered = self.uncovered_heads(&roots);
        if uncovered.is_empty() {
            return Ok(roots);
        }
        if !try_fixing {
            if ignore_non_trees {
                return Ok(roots);
            }
            return Err(Error::not_a_tree(&uncovered));
        }

        let extra: BTreeSet<N> = uncovered
            .iter()
            .filter(|node| {
                self.head2deps.get(*node).is_some_and(|deps| {
                    deps.iter()
                        .any(|(_, relation)| *relation == self.loose_punctuation)
                })
            })
            .cloned()
            .collect();
        log::debug!(
            "[graph] {} uncovered heads, {} loose-punctuation root candidates",
            uncovered.len(),
            extra.len()
        );

        for candidate in &extra {
            let constituent = self.get_constituent(candidate);
            if let Some(other) = extra
                .iter()
                .find(|other| *other != candidate && constituent.contains(*other))
            {
                return Err(Error::structural(format!(
                    "candidate root {} contains candidate root {}",
                    candidate, other
                )));
            }
        }

        roots.extend(extra);
        let still_uncovered = self.uncovered_heads(&roots);
        if !still_uncovered.is_empty() {
            return Err(Error::not_a_tree(&still_uncovered));
        }
        Ok(roots)
    }

    fn uncovered_heads(&self, roots: &BTreeSet<N>) -> BTreeSet<N> {
        let mut covered: HashSet<N> = HashSet::new();
        for root in roots {
            covered.extend(self.get_constituent(root).iter().cloned());
        }
        self.head2deps
            .keys()
            .filter(|head| !covered.contains(*head))
            .cloned()
            .collect()
    }
}

impl<N: GraphNode + fmt::Debug> fmt::Debug for ConstituencyGraph<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstituencyGraph")
            .field("head2deps", &self.head2deps)
            .field("loose_punctuation", &self.loose_punctuation)
            .finish()
    }
}

impl<N: GraphNode> PartialEq for ConstituencyGraph<N> {
    fn eq(&self, other: &Self) -> bool {
        self.head2deps == other.head2deps
    }
}

/// Structural inverse of an adjacency map.
fn invert<N: GraphNode>(head2deps: &HeadDeps<N>) -> HeadDeps<N> {
    let mut inverse: HeadDeps<N> = BTreeMap::new();
    for (head, deps) in head2deps {
        for (dep, relation) in deps {
            inverse
                .entry(dep.clone())
                .or_default()
                .insert((head.clone(), relation.clone()));
        }
    }
    inverse
}
