//! Parsed input document: terms, dependencies, named entities and quotations.
//!
//! A [`Document`] is the per-document input of the pipeline. It indexes its
//! terms by id and by offset; all later stages address terms by offset.
//!
//! # JSON format
//!
//! ```json
//! {
//!   "terms": [{"id": "t_0", "text": "Jan", "pos": "name", "sentence": 1, "offset": 0}],
//!   "dependencies": [{"from": "t_1", "to": "t_0", "rfunc": "hd/su"}],
//!   "entities": [{"span": ["t_0"], "type": "PER"}],
//!   "quotations": [{"span": [3, 4, 5], "source": "t_0"}]
//! }
//! ```

use crate::config::CorefConfig;
use crate::{
    ConstituencyGraph, DependencyEdge, EntityType, Error, HeadDeps, Quotation, Result, Span, Term,
    TermId,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// A named entity from the entity layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedEntity {
    /// Terms covered by the entity, in document order
    pub span: Vec<TermId>,
    /// Entity type
    #[serde(rename = "type", alias = "entity_type")]
    pub entity_type: EntityType,
}

impl NamedEntity {
    /// Create a named entity.
    #[must_use]
    pub fn new<I, T>(span: I, entity_type: EntityType) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TermId>,
    {
        Self {
            span: span.into_iter().map(Into::into).collect(),
            entity_type,
        }
    }
}

/// Serialized form of a [`Document`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct DocumentData {
    terms: Vec<Term>,
    #[serde(default)]
    dependencies: Vec<DependencyEdge>,
    #[serde(default)]
    entities: Vec<NamedEntity>,
    #[serde(default)]
    quotations: Vec<Quotation>,
}

/// An annotated document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "DocumentData", into = "DocumentData")]
pub struct Document {
    terms: Vec<Term>,
    dependencies: Vec<DependencyEdge>,
    entities: Vec<NamedEntity>,
    quotations: Vec<Quotation>,
    by_id: HashMap<TermId, usize>,
    by_offset: BTreeMap<usize, usize>,
}

impl Document {
    /// Build a document from terms and dependency edges.
    ///
    /// Fails when two terms share an id or an offset.
    pub fn new(terms: Vec<Term>, dependencies: Vec<DependencyEdge>) -> Result<Self> {
        let mut by_id = HashMap::with_capacity(terms.len());
        let mut by_offset = BTreeMap::new();
        for (i, term) in terms.iter().enumerate() {
            if by_id.insert(term.id.clone(), i).is_some() {
                return Err(Error::invalid_input(format!("duplicate term id {}", term.id)));
            }
            if by_offset.insert(term.offset, i).is_some() {
                return Err(Error::invalid_input(format!(
                    "duplicate term offset {} ({})",
                    term.offset, term.id
                )));
            }
        }
        Ok(Self {
            terms,
            dependencies,
            entities: Vec::new(),
            quotations: Vec::new(),
            by_id,
            by_offset,
        })
    }

    /// Parse a document from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Attach named entities.
    #[must_use]
    pub fn with_entities(mut self, entities: Vec<NamedEntity>) -> Self {
        self.entities = entities;
        self
    }

    /// Attach quotations.
    #[must_use]
    pub fn with_quotations(mut self, quotations: Vec<Quotation>) -> Self {
        self.quotations = quotations;
        self
    }

    /// Terms in input order.
    #[must_use]
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// Dependency edges.
    #[must_use]
    pub fn dependencies(&self) -> &[DependencyEdge] {
        &self.dependencies
    }

    /// Named entities.
    #[must_use]
    pub fn entities(&self) -> &[NamedEntity] {
        &self.entities
    }

    /// Quotations.
    #[must_use]
    pub fn quotations(&self) -> &[Quotation] {
        &self.quotations
    }

    /// Look up a term by id.
    #[must_use]
    pub fn term(&self, id: &TermId) -> Option<&Term> {
        self.by_id.get(id).map(|&i| &self.terms[i])
    }

    /// Look up a term by offset.
    #[must_use]
    pub fn term_at(&self, offset: usize) -> Option<&Term> {
        self.by_offset.get(&offset).map(|&i| &self.terms[i])
    }

    /// Offset of a term.
    #[must_use]
    pub fn offset_of(&self, id: &TermId) -> Option<usize> {
        self.term(id).map(|t| t.offset)
    }

    /// Offsets of the given terms, sorted; unknown ids are skipped.
    #[must_use]
    pub fn offsets<'a, I>(&self, ids: I) -> Span
    where
        I: IntoIterator<Item = &'a TermId>,
    {
        crate::normalize_span(ids.into_iter().filter_map(|id| self.offset_of(id)))
    }

    /// Sentence number of the term at `offset`.
    #[must_use]
    pub fn sentence_of(&self, offset: usize) -> Option<usize> {
        self.term_at(offset).map(|t| t.sentence)
    }

    /// Space-joined text of the terms at `span`, in offset order.
    #[must_use]
    pub fn surface(&self, span: &[usize]) -> String {
        let mut offsets = span.to_vec();
        offsets.sort_unstable();
        offsets.dedup();
        offsets
            .iter()
            .filter_map(|&o| self.term_at(o))
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Words of `span` as lowercased strings, in offset order.
    #[must_use]
    pub fn words(&self, span: &[usize]) -> Vec<String> {
        self.surface(span)
            .split_whitespace()
            .map(str::to_lowercase)
            .collect()
    }

    /// Build the dependency graph, leaving out terms whose tag is in
    /// `config.filtered_pos` and terms the document does not know.
    #[must_use]
    pub fn constituency_graph(&self, config: &CorefConfig) -> ConstituencyGraph<TermId> {
        let keep = |id: &TermId| {
            self.term(id)
                .is_some_and(|t| !config.filtered_pos.contains(&t.pos))
        };
        let filtered = ConstituencyGraph::filter_head_deps(&self.head_deps(), keep);
        let head2deps = ConstituencyGraph::filter_direct_self_reference(&filtered);
        ConstituencyGraph::new(head2deps)
            .with_loose_punctuation(config.loose_punctuation_relation.clone())
    }

    /// Build the dependency graph with every edge except self-loops.
    ///
    /// Root checks run on this graph: loose-punctuation edges usually point
    /// at punctuation terms, which [`Self::constituency_graph`] leaves out.
    #[must_use]
    pub fn unfiltered_graph(&self, config: &CorefConfig) -> ConstituencyGraph<TermId> {
        let head2deps = ConstituencyGraph::filter_direct_self_reference(&self.head_deps());
        ConstituencyGraph::new(head2deps)
            .with_loose_punctuation(config.loose_punctuation_relation.clone())
    }

    fn head_deps(&self) -> HeadDeps<TermId> {
        let mut all: HeadDeps<TermId> = BTreeMap::new();
        for edge in &self.dependencies {
            all.entry(edge.head.clone())
                .or_default()
                .insert((edge.dependent.clone(), edge.relation.clone()));
        }
        all
    }
}

impl TryFrom<DocumentData> for Document {
    type Error = Error;

    fn try_from(data: DocumentData) -> Result<Self> {
        Ok(Document::new(data.terms, data.dependencies)?
            .with_entities(data.entities)
            .with_quotations(data.quotations))
    }
}

impl From<Document> for DocumentData {
    fn from(doc: Document) -> Self {
        DocumentData {
            terms: doc.terms,
            dependencies: doc.dependencies,
            entities: doc.entities,
            quotations: doc.quotations,
        }
    }
}
