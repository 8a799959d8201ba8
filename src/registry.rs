//! Coreference equivalence classes.
//!
//! Sieve stages propose classes through [`CoreferenceClassRegistry::add_coref_class`];
//! a proposal may share mentions with existing classes. Such overlaps are
//! collapsed in batches by [`CoreferenceClassRegistry::merge`], which the
//! pipeline runs after every stage.
//!
//! # Example
//!
//! ```rust
//! use multisieve::registry::CoreferenceClassRegistry;
//! use multisieve::MentionId;
//!
//! let mut registry = CoreferenceClassRegistry::new();
//! let a = registry.add_coref_class([MentionId(0), MentionId(1)], true).unwrap();
//! let b = registry.add_coref_class([MentionId(1), MentionId(2)], true).unwrap();
//!
//! // The second class shared m1 with the first, so it was folded into it.
//! assert_eq!(a, b);
//! assert!(registry.are_coreferent(MentionId(0), MentionId(2)));
//! ```

use crate::{Error, MentionId, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Identifier of a coreference class, displayed as `c{n}`.
///
/// Ids are allocated in increasing order, so the minimum of a group is the
/// oldest class in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassId(pub u64);

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

/// Equivalence-class store over mention ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoreferenceClassRegistry {
    classes: BTreeMap<ClassId, BTreeSet<MentionId>>,
    next_id: u64,
}

impl CoreferenceClassRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of classes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Are there no classes?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Members of a class.
    #[must_use]
    pub fn get(&self, id: ClassId) -> Option<&BTreeSet<MentionId>> {
        self.classes.get(&id)
    }

    /// All classes, ordered by id.
    #[must_use]
    pub fn classes(&self) -> &BTreeMap<ClassId, BTreeSet<MentionId>> {
        &self.classes
    }

    /// Consume the registry, keeping the class map.
    #[must_use]
    pub fn into_classes(self) -> BTreeMap<ClassId, BTreeSet<MentionId>> {
        self.classes
    }

    /// Every class currently containing `mention`.
    ///
    /// Outside of a stage this has at most one element; between a proposal
    /// and the following merge it may have more.
    #[must_use]
    pub fn classes_of_mention(&self, mention: MentionId) -> Vec<ClassId> {
        self.classes
            .iter()
            .filter(|(_, members)| members.contains(&mention))
            .map(|(id, _)| *id)
            .collect()
    }

    /// The first class containing `mention`, if any.
    #[must_use]
    pub fn class_of(&self, mention: MentionId) -> Option<ClassId> {
        self.classes
            .iter()
            .find(|(_, members)| members.contains(&mention))
            .map(|(id, _)| *id)
    }

    /// Do `a` and `b` share a class?
    #[must_use]
    pub fn are_coreferent(&self, a: MentionId, b: MentionId) -> bool {
        a == b
            || self
                .classes
                .values()
                .any(|members| members.contains(&a) && members.contains(&b))
    }

    /// Every mention id referenced by some class.
    #[must_use]
    pub fn referenced_mentions(&self) -> BTreeSet<MentionId> {
        self.classes.values().flatten().copied().collect()
    }

    /// Store a new class.
    ///
    /// With `merge` set, [`Self::merge`] runs immediately and the returned id
    /// is the canonical id of the class that now holds `mentions`; otherwise
    /// it is the freshly allocated id.
    pub fn add_coref_class<I>(&mut self, mentions: I, merge: bool) -> Result<ClassId>
    where
        I: IntoIterator<Item = MentionId>,
    {
        let members: BTreeSet<MentionId> = mentions.into_iter().collect();
        if members.is_empty() {
            return Err(Error::invalid_input("coreference class without mentions"));
        }
        let id = ClassId(self.next_id);
        self.next_id += 1;
        self.classes.insert(id, members);
        if !merge {
            return Ok(id);
        }
        let replaced = self.merge()?;
        Ok(replaced.get(&id).copied().unwrap_or(id))
    }

    /// Collapse every group of classes that share a mention.
    ///
    /// Returns a map from each removed class id to the id that absorbed it.
    /// A second call without intervening additions returns an empty map.
    pub fn merge(&mut self) -> Result<BTreeMap<ClassId, ClassId>> {
        let mut holders: BTreeMap<MentionId, BTreeSet<ClassId>> = BTreeMap::new();
        for (id, members) in &self.classes {
            for mention in members {
                holders.entry(*mention).or_default().insert(*id);
            }
        }
        let groups: Vec<BTreeSet<ClassId>> = holders
            .into_values()
            .filter(|ids| ids.len() > 1)
            .collect();
        if groups.is_empty() {
            return Ok(BTreeMap::new());
        }
        self.merge_keys(&groups)
    }

    /// Merge explicit groups of class ids.
    ///
    /// Groups sharing an id are merged transitively. Each resulting cluster
    /// keeps its minimum id. Fails with [`Error::UnknownClass`] before touching
    /// anything if a group names a class that does not exist.
    pub fn merge_keys(&mut self, groups: &[BTreeSet<ClassId>]) -> Result<BTreeMap<ClassId, ClassId>> {
        if let Some(missing) = groups
            .iter()
            .flatten()
            .find(|id| !self.classes.contains_key(*id))
        {
            return Err(Error::unknown_class(missing));
        }

        fn find(parent: &mut BTreeMap<ClassId, ClassId>, id: ClassId) -> ClassId {
            let p = parent.get(&id).copied().unwrap_or(id);
            if p == id {
                return id;
            }
            let root = find(parent, p);
            parent.insert(id, root);
            root
        }

        fn union(parent: &mut BTreeMap<ClassId, ClassId>, a: ClassId, b: ClassId) {
            let ra = find(parent, a);
            let rb = find(parent, b);
            // smaller id wins
            if ra < rb {
                parent.insert(rb, ra);
            } else if rb < ra {
                parent.insert(ra, rb);
            }
        }

        let mut parent: BTreeMap<ClassId, ClassId> = BTreeMap::new();
        for group in groups {
            let mut ids = group.iter().copied();
            if let Some(first) = ids.next() {
                parent.entry(first).or_insert(first);
                for id in ids {
                    parent.entry(id).or_insert(id);
                    union(&mut parent, first, id);
                }
            }
        }

        let mut replaced = BTreeMap::new();
        let ids: Vec<ClassId> = parent.keys().copied().collect();
        for id in ids {
            let root = find(&mut parent, id);
            if root == id {
                continue;
            }
            if let Some(members) = self.classes.remove(&id) {
                self.classes.entry(root).or_default().extend(members);
            }
            replaced.insert(id, root);
        }

        if !replaced.is_empty() {
            log::debug!(
                "[registry] merged {} classes, {} remain",
                replaced.len(),
                self.classes.len()
            );
        }
        Ok(replaced)
    }

    /// Drop classes with a single member. Returns how many were removed.
    pub fn remove_singletons(&mut self) -> usize {
        let before = self.classes.len();
        self.classes.retain(|_, members| members.len() > 1);
        before - self.classes.len()
    }
}
