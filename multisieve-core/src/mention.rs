//! Mentions, grammatical features, entity types and quotations.
//!
//! # Terminology
//!
//! - **Mention**: a candidate referring expression ("Jan", "hij", "de minister")
//! - **Span**: the offsets of the terms a mention covers, in ascending order
//! - **Relaxed span**: the span without post-head modifiers
//! - **Full head**: the multi-word head of a name ("Mark Rutte")
//! - **Prohibition**: a mention id this mention must never co-refer with

use crate::error::{Error, Result};
use crate::term::{PartOfSpeech, TermId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::str::FromStr;

/// Ordered term offsets covered by a mention or quotation.
pub type Span = Vec<usize>;

// =============================================================================
// Identifiers
// =============================================================================

/// Identifier of a mention, displayed as `m{n}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MentionId(pub usize);

impl fmt::Display for MentionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m{}", self.0)
    }
}

// =============================================================================
// Grammatical features
// =============================================================================

/// Grammatical number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Number {
    /// Singular (`ev`)
    Singular,
    /// Plural (`mv`)
    Plural,
}

/// Grammatical gender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    /// Masculine (`masc`)
    Masculine,
    /// Feminine (`fem`)
    Feminine,
    /// Neuter (`onz`)
    Neuter,
}

/// Grammatical person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GrammaticalPerson {
    /// Speaker ("ik", "wij")
    First,
    /// Addressee ("jij", "u")
    Second,
    /// Anyone else ("hij", "zij")
    Third,
}

/// Two optional features are compatible when either is unspecified or both agree.
#[must_use]
pub fn compatible<T: PartialEq>(a: Option<T>, b: Option<T>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a == b,
        _ => true,
    }
}

// =============================================================================
// Entity types
// =============================================================================

/// Named-entity type of a mention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum EntityType {
    /// Person name (PER)
    Person,
    /// Organization name (ORG)
    Organization,
    /// Location (LOC)
    Location,
    /// Any other named entity (MISC)
    Misc,
}

/// Coarse family of entity types.
///
/// Taggers frequently swap organizations and locations for the same
/// expression ("Amsterdam" the city vs. the municipality), so they share a
/// family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityFamily {
    /// People
    Person,
    /// Organizations and places
    Institution,
    /// Everything else
    Misc,
}

impl EntityType {
    /// Canonical label.
    #[must_use]
    pub const fn as_label(&self) -> &'static str {
        match self {
            EntityType::Person => "PER",
            EntityType::Organization => "ORG",
            EntityType::Location => "LOC",
            EntityType::Misc => "MISC",
        }
    }

    /// Coarse family used by proper head-word matching.
    #[must_use]
    pub const fn family(&self) -> EntityFamily {
        match self {
            EntityType::Person => EntityFamily::Person,
            EntityType::Organization | EntityType::Location => EntityFamily::Institution,
            EntityType::Misc => EntityFamily::Misc,
        }
    }
}

impl FromStr for EntityType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        // Accept BIO-prefixed and DBpedia-style labels ("B-PER", "DBpedia:Person").
        let label = s.trim();
        let label = label
            .strip_prefix("B-")
            .or_else(|| label.strip_prefix("I-"))
            .unwrap_or(label);
        let label = label.rsplit(':').next().unwrap_or(label);
        let ty = match label.to_uppercase().as_str() {
            "PER" | "PERSON" => EntityType::Person,
            "ORG" | "ORGANIZATION" | "ORGANISATION" => EntityType::Organization,
            "LOC" | "LOCATION" | "PLACE" | "GPE" => EntityType::Location,
            "MISC" | "MISCELLANEOUS" => EntityType::Misc,
            _ => return Err(Error::unknown_tag("entity-type", s)),
        };
        Ok(ty)
    }
}

impl TryFrom<String> for EntityType {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<EntityType> for String {
    fn from(ty: EntityType) -> Self {
        ty.as_label().to_string()
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

// =============================================================================
// Mention
// =============================================================================

/// A candidate referring expression.
///
/// Created once by mention extraction; sieve stages only ever append to
/// [`Mention::coreference_prohibited`] and set [`Mention::in_quotation`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mention {
    /// Unique identifier
    pub id: MentionId,
    /// Offset of the syntactic head
    pub head: usize,
    /// Full span, ascending offsets
    pub span: Span,
    /// Span with trailing post-head modifiers removed
    #[serde(default)]
    pub relaxed_span: Span,
    /// Multi-word head (names); defaults to the head alone
    #[serde(default)]
    pub full_head: Span,
    /// Modifier sub-spans
    #[serde(default)]
    pub modifiers: Vec<Span>,
    /// Appositive sub-spans
    #[serde(default)]
    pub appositives: Vec<Span>,
    /// Predicative sub-spans
    #[serde(default)]
    pub predicatives: Vec<Span>,
    /// Named-entity type, if the mention is a named entity
    #[serde(default)]
    pub entity_type: Option<EntityType>,
    /// Grammatical number
    #[serde(default)]
    pub number: Option<Number>,
    /// Grammatical gender
    #[serde(default)]
    pub gender: Option<Gender>,
    /// Grammatical person
    #[serde(default)]
    pub person: Option<GrammaticalPerson>,
    /// Part-of-speech of the head
    pub head_pos: PartOfSpeech,
    /// Sentence number of the head
    pub sentence: usize,
    /// Relative pronoun ("die", "dat", "wie")
    #[serde(default)]
    pub is_relative_pronoun: bool,
    /// Reflexive pronoun ("zich", "zichzelf")
    #[serde(default)]
    pub is_reflexive_pronoun: bool,
    /// Fully contained in a direct quotation
    #[serde(default)]
    pub in_quotation: bool,
    /// Mentions this one must never co-refer with
    #[serde(default)]
    pub coreference_prohibited: BTreeSet<MentionId>,
}

impl Mention {
    /// Create a mention whose span is just its head.
    #[must_use]
    pub fn new(id: MentionId, head: usize, head_pos: PartOfSpeech, sentence: usize) -> Self {
        Self {
            id,
            head,
            span: vec![head],
            relaxed_span: vec![head],
            full_head: vec![head],
            modifiers: Vec::new(),
            appositives: Vec::new(),
            predicatives: Vec::new(),
            entity_type: None,
            number: None,
            gender: None,
            person: None,
            head_pos,
            sentence,
            is_relative_pronoun: false,
            is_reflexive_pronoun: false,
            in_quotation: false,
            coreference_prohibited: BTreeSet::new(),
        }
    }

    /// Set the span; the relaxed span follows unless set explicitly afterwards.
    #[must_use]
    pub fn with_span(mut self, span: impl IntoIterator<Item = usize>) -> Self {
        self.span = normalize_span(span);
        self.relaxed_span = self.span.clone();
        self
    }

    /// Set the relaxed span.
    #[must_use]
    pub fn with_relaxed_span(mut self, span: impl IntoIterator<Item = usize>) -> Self {
        self.relaxed_span = normalize_span(span);
        self
    }

    /// Set the full (multi-word) head.
    #[must_use]
    pub fn with_full_head(mut self, span: impl IntoIterator<Item = usize>) -> Self {
        self.full_head = normalize_span(span);
        self
    }

    /// Set the entity type.
    #[must_use]
    pub fn with_entity_type(mut self, entity_type: EntityType) -> Self {
        self.entity_type = Some(entity_type);
        self
    }

    /// Set person, number and gender.
    #[must_use]
    pub fn with_features(
        mut self,
        person: Option<GrammaticalPerson>,
        number: Option<Number>,
        gender: Option<Gender>,
    ) -> Self {
        self.person = person;
        self.number = number;
        self.gender = gender;
        self
    }

    /// Add a modifier sub-span.
    #[must_use]
    pub fn with_modifier(mut self, span: impl IntoIterator<Item = usize>) -> Self {
        self.modifiers.push(normalize_span(span));
        self
    }

    /// Add an appositive sub-span.
    #[must_use]
    pub fn with_appositive(mut self, span: impl IntoIterator<Item = usize>) -> Self {
        self.appositives.push(normalize_span(span));
        self
    }

    /// Add a predicative sub-span.
    #[must_use]
    pub fn with_predicative(mut self, span: impl IntoIterator<Item = usize>) -> Self {
        self.predicatives.push(normalize_span(span));
        self
    }

    /// Mark as relative pronoun.
    #[must_use]
    pub fn relative(mut self) -> Self {
        self.is_relative_pronoun = true;
        self
    }

    /// Mark as reflexive pronoun.
    #[must_use]
    pub fn reflexive(mut self) -> Self {
        self.is_reflexive_pronoun = true;
        self
    }

    /// Is the head a pronoun? Possessive determiners ("zijn", "haar") count.
    #[must_use]
    pub fn is_pronoun(&self) -> bool {
        matches!(
            self.head_pos,
            PartOfSpeech::Pronoun | PartOfSpeech::Determiner
        )
    }

    /// Is this a named-entity mention?
    #[must_use]
    pub fn is_named_entity(&self) -> bool {
        self.entity_type.is_some()
    }

    /// First offset of the span (the head when the span is empty).
    #[must_use]
    pub fn begin(&self) -> usize {
        self.span.first().copied().unwrap_or(self.head)
    }

    /// Last offset of the span (the head when the span is empty).
    #[must_use]
    pub fn end(&self) -> usize {
        self.span.last().copied().unwrap_or(self.head)
    }

    /// Do the spans share any offset?
    #[must_use]
    pub fn overlaps(&self, other: &Mention) -> bool {
        let mine: HashSet<usize> = self.span.iter().copied().collect();
        other.span.iter().any(|o| mine.contains(o))
    }

    /// Is every offset of this span also in `other`'s span?
    #[must_use]
    pub fn span_within(&self, other: &Mention) -> bool {
        is_subspan(&self.span, &other.span)
    }

    /// Has either mention prohibited coreference with the other?
    #[must_use]
    pub fn prohibits(&self, other: &Mention) -> bool {
        self.coreference_prohibited.contains(&other.id)
            || other.coreference_prohibited.contains(&self.id)
    }
}

/// Sort and deduplicate offsets.
#[must_use]
pub fn normalize_span(span: impl IntoIterator<Item = usize>) -> Span {
    let set: BTreeSet<usize> = span.into_iter().collect();
    set.into_iter().collect()
}

/// Is every offset of `inner` contained in `outer`? Empty spans are contained nowhere.
#[must_use]
pub fn is_subspan(inner: &[usize], outer: &[usize]) -> bool {
    if inner.is_empty() {
        return false;
    }
    let outer: HashSet<usize> = outer.iter().copied().collect();
    inner.iter().all(|o| outer.contains(o))
}

/// Do two spans cover exactly the same offsets?
#[must_use]
pub fn same_offsets(a: &[usize], b: &[usize]) -> bool {
    let a: BTreeSet<usize> = a.iter().copied().collect();
    let b: BTreeSet<usize> = b.iter().copied().collect();
    a == b
}

// =============================================================================
// Quotations
// =============================================================================

/// Reference to a stretch of text attached to a quotation: either explicit
/// offsets, or a head term whose constituent is computed from the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SpanRef {
    /// Explicit term offsets
    Offsets(Span),
    /// Head term; expands to the offsets of its constituent
    Head(TermId),
}

/// A detected direct-speech span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quotation {
    /// Offsets inside the quotation marks
    pub span: Span,
    /// Who speaks
    #[serde(default)]
    pub source: Option<SpanRef>,
    /// Who is spoken to
    #[serde(default)]
    pub addressee: Option<SpanRef>,
    /// Who is spoken about
    #[serde(default)]
    pub topic: Option<SpanRef>,
}

impl Quotation {
    /// Create a quotation without attributed participants.
    #[must_use]
    pub fn new(span: impl IntoIterator<Item = usize>) -> Self {
        Self {
            span: normalize_span(span),
            source: None,
            addressee: None,
            topic: None,
        }
    }

    /// Set the source.
    #[must_use]
    pub fn with_source(mut self, source: SpanRef) -> Self {
        self.source = Some(source);
        self
    }

    /// Set the addressee.
    #[must_use]
    pub fn with_addressee(mut self, addressee: SpanRef) -> Self {
        self.addressee = Some(addressee);
        self
    }

    /// Set the topic.
    #[must_use]
    pub fn with_topic(mut self, topic: SpanRef) -> Self {
        self.topic = Some(topic);
        self
    }
}

/// A quotation whose participants have been mapped onto mention ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedQuotation {
    /// Offsets inside the quotation marks
    pub span: Span,
    /// Source mention
    pub source: Option<MentionId>,
    /// Addressee mention
    pub addressee: Option<MentionId>,
    /// Topic mention
    pub topic: Option<MentionId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_type_labels() {
        assert_eq!("PER".parse::<EntityType>().unwrap(), EntityType::Person);
        assert_eq!("B-ORG".parse::<EntityType>().unwrap(), EntityType::Organization);
        assert_eq!("DBpedia:Place".parse::<EntityType>().unwrap(), EntityType::Location);
        assert!("FOOD".parse::<EntityType>().is_err());
    }

    #[test]
    fn test_entity_family() {
        assert_eq!(EntityType::Organization.family(), EntityType::Location.family());
        assert_ne!(EntityType::Person.family(), EntityType::Location.family());
    }

    #[test]
    fn test_compatible() {
        assert!(compatible(Some(Number::Plural), None));
        assert!(compatible::<Number>(None, None));
        assert!(compatible(Some(Gender::Feminine), Some(Gender::Feminine)));
        assert!(!compatible(Some(Gender::Feminine), Some(Gender::Masculine)));
    }

    #[test]
    fn test_span_helpers() {
        let a = Mention::new(MentionId(0), 3, PartOfSpeech::Noun, 0).with_span([3, 2, 4]);
        let b = Mention::new(MentionId(1), 3, PartOfSpeech::Noun, 0).with_span([1, 2, 3, 4, 5]);
        assert_eq!(a.span, vec![2, 3, 4]);
        assert!(a.span_within(&b));
        assert!(!b.span_within(&a));
        assert!(a.overlaps(&b));
        assert_eq!((b.begin(), b.end()), (1, 5));
        assert!(!is_subspan(&[], &[1, 2]));
        assert!(same_offsets(&[2, 1], &[1, 2]));
    }

    #[test]
    fn test_span_ref_untagged() {
        let offsets: SpanRef = serde_json::from_str("[4, 5]").unwrap();
        assert_eq!(offsets, SpanRef::Offsets(vec![4, 5]));
        let head: SpanRef = serde_json::from_str(r#""t_3""#).unwrap();
        assert_eq!(head, SpanRef::Head(TermId::new("t_3")));
    }
}
