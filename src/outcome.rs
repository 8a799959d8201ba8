//! Result of resolving one document.

use crate::registry::ClassId;
use crate::{Mention, MentionId, ResolvedQuotation, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Final coreference classes and the mentions they refer to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorefOutcome {
    /// Class id → member mentions
    pub classes: BTreeMap<ClassId, BTreeSet<MentionId>>,
    /// Surviving mentions, with their final prohibitions
    pub mentions: Vec<Mention>,
    /// Mention → class
    pub membership: BTreeMap<MentionId, ClassId>,
    /// Quotations with linked participants
    #[serde(default)]
    pub quotations: Vec<ResolvedQuotation>,
}

impl CorefOutcome {
    /// Assemble an outcome and derive the membership map.
    #[must_use]
    pub fn new(
        classes: BTreeMap<ClassId, BTreeSet<MentionId>>,
        mentions: Vec<Mention>,
        quotations: Vec<ResolvedQuotation>,
    ) -> Self {
        let membership = classes
            .iter()
            .flat_map(|(id, members)| members.iter().map(move |m| (*m, *id)))
            .collect();
        Self {
            classes,
            mentions,
            membership,
            quotations,
        }
    }

    /// The class a mention ended up in.
    #[must_use]
    pub fn class_of(&self, mention: MentionId) -> Option<ClassId> {
        self.membership.get(&mention).copied()
    }

    /// Are both mentions in the same class?
    #[must_use]
    pub fn are_coreferent(&self, a: MentionId, b: MentionId) -> bool {
        match (self.class_of(a), self.class_of(b)) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        }
    }

    /// Look up a surviving mention.
    #[must_use]
    pub fn mention(&self, id: MentionId) -> Option<&Mention> {
        self.mentions.iter().find(|m| m.id == id)
    }

    /// Classes with more than one member as mention lists in head order,
    /// ordered by their first mention.
    #[must_use]
    pub fn chains(&self) -> Vec<Vec<MentionId>> {
        let head_of = |id: &MentionId| self.mention(*id).map_or(usize::MAX, |m| m.head);
        let mut chains: Vec<Vec<MentionId>> = self
            .classes
            .values()
            .filter(|members| members.len() > 1)
            .map(|members| {
                let mut chain: Vec<MentionId> = members.iter().copied().collect();
                chain.sort_by_key(|id| (head_of(id), *id));
                chain
            })
            .collect();
        chains.sort_by_key(|chain| chain.first().map(|id| (head_of(id), *id)));
        chains
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
