//! Mention extraction.
//!
//! Mentions are built from two sources:
//!
//! 1. **Syntactic heads**: every noun, name and pronoun, plus possessive
//!    determiners. The mention span is the head's constituent.
//! 2. **Named entities**: the entity layer marks names the parser may have
//!    split. Each entity is anchored on the term heading its span; if a head
//!    mention already exists there it receives the entity type and the entity
//!    span as full head, otherwise a new mention is added.
//!
//! Mention ids are assigned in head-offset order after both sources have
//! been merged.

use crate::document::Document;
use crate::{
    normalize_span, ConstituencyGraph, EntityType, Gender, GrammaticalPerson, Mention, MentionId,
    Number, PartOfSpeech, Span, Term, TermId,
};
use std::collections::{BTreeMap, BTreeSet};

/// Multi-word part of a name.
pub const REL_MULTIWORD: &str = "mwp/mwp";
/// Modifier.
pub const REL_MODIFIER: &str = "hd/mod";
/// Appositive.
pub const REL_APPOSITIVE: &str = "hd/app";
/// Subject.
pub const REL_SUBJECT: &str = "hd/su";
/// Predicative complements.
pub const REL_PREDICATIVES: &[&str] = &["hd/predc", "hd/predm"];

/// Marker of possessive pronouns in the morphological features.
const POSSESSIVE_MARKER: &str = "VNW(bez";

const SINGULAR_LEMMAS: &[&str] = &["haar", "zijn", "mijn", "jouw", "je"];
const PLURAL_LEMMAS: &[&str] = &["ons", "jullie", "hun"];
const REFLEXIVE_LEMMAS: &[&str] = &["zich", "zichzelf"];

// =============================================================================
// Constituent information
// =============================================================================

/// Syntactic information about the constituent headed by one term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstituentInfo {
    /// Head term
    pub head: TermId,
    /// All terms of the constituent
    pub span: BTreeSet<TermId>,
    /// Head plus its multi-word dependents
    pub full_head: BTreeSet<TermId>,
    /// Constituents of `hd/mod` dependents
    pub modifiers: Vec<BTreeSet<TermId>>,
    /// Constituents of `hd/app` dependents
    pub appositives: Vec<BTreeSet<TermId>>,
    /// Predicatives of a clause this head is the subject of
    pub predicatives: Vec<BTreeSet<TermId>>,
    /// Entity type when built from the entity layer
    pub entity_type: Option<EntityType>,
}

impl ConstituentInfo {
    /// Collect constituent information for `head`.
    #[must_use]
    pub fn build(graph: &ConstituencyGraph<TermId>, head: &TermId) -> Self {
        let mut full_head = BTreeSet::from([head.clone()]);
        let mut modifiers = Vec::new();
        let mut appositives = Vec::new();

        for (dep, relation) in graph.get_direct_dependents_with_relation(head).into_iter().flatten() {
            match relation.as_str() {
                REL_MULTIWORD => {
                    full_head.insert(dep.clone());
                }
                REL_MODIFIER => modifiers.push((*graph.get_constituent(dep)).clone()),
                REL_APPOSITIVE => appositives.push((*graph.get_constituent(dep)).clone()),
                _ => {}
            }
        }

        let mut predicatives = Vec::new();
        for (clause, relation) in graph.get_direct_parents_with_relation(head).into_iter().flatten() {
            if relation != REL_SUBJECT {
                continue;
            }
            for (dep, deprel) in graph.get_direct_dependents_with_relation(clause).into_iter().flatten() {
                if REL_PREDICATIVES.contains(&deprel.as_str()) {
                    predicatives.push((*graph.get_constituent(dep)).clone());
                }
            }
        }

        Self {
            head: head.clone(),
            span: (*graph.get_constituent(head)).clone(),
            full_head,
            modifiers,
            appositives,
            predicatives,
            entity_type: None,
        }
    }
}

// =============================================================================
// Heads
// =============================================================================

/// Terms that head a candidate mention: nouns, names, pronouns and
/// possessive determiners.
#[must_use]
pub fn candidate_heads(doc: &Document) -> Vec<TermId> {
    doc.terms()
        .iter()
        .filter(|t| match t.pos {
            PartOfSpeech::Noun | PartOfSpeech::Name | PartOfSpeech::Pronoun => true,
            PartOfSpeech::Determiner => t.morphofeat.contains(POSSESSIVE_MARKER),
            _ => false,
        })
        .map(|t| t.id.clone())
        .collect()
}

/// The term heading `span`.
///
/// The first term whose constituent covers the whole span wins. If none does
/// (the entity crosses constituents), the term with the most direct
/// dependents inside the span is taken, and failing that the first term.
#[must_use]
pub fn find_head_in_span(graph: &ConstituencyGraph<TermId>, span: &[TermId]) -> Option<TermId> {
    let wanted: BTreeSet<&TermId> = span.iter().collect();
    let covering = span.iter().find(|term| {
        let constituent = graph.get_constituent(term);
        wanted.iter().all(|w| constituent.contains(*w))
    });
    if let Some(head) = covering {
        return Some(head.clone());
    }

    let mut best: Option<(&TermId, usize)> = None;
    for term in span {
        let Some(deps) = graph.get_direct_dependents(term) else {
            continue;
        };
        let inside = deps.iter().filter(|d| wanted.contains(d)).count();
        if best.map_or(true, |(_, n)| inside > n) {
            best = Some((term, inside));
        }
    }
    best.map(|(t, _)| t.clone()).or_else(|| span.first().cloned())
}

/// Is `span` new relative to `found`? A span contained in an earlier one is
/// a duplicate.
#[must_use]
pub fn verify_span_uniqueness(found: &[Vec<TermId>], span: &[TermId]) -> bool {
    !found
        .iter()
        .any(|earlier| span.iter().all(|t| earlier.contains(t)))
}

// =============================================================================
// Pronouns
// =============================================================================

/// Features read off a pronoun's morphological tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PronounFeatures {
    /// Grammatical person
    pub person: Option<GrammaticalPerson>,
    /// Grammatical number
    pub number: Option<Number>,
    /// Grammatical gender
    pub gender: Option<Gender>,
    /// Relative pronoun
    pub relative: bool,
    /// Reflexive pronoun
    pub reflexive: bool,
}

/// Decode person, number, gender and pronoun type.
///
/// Features are the comma-separated fields inside the tag's parentheses
/// (`VNW(pers,pron,nomin,vol,3,ev,masc)`). `getal` leaves number to the lemma.
#[must_use]
pub fn analyze_pronoun(term: &Term) -> PronounFeatures {
    let inner = term
        .morphofeat
        .split_once('(')
        .map(|(_, rest)| rest.trim_end_matches(')'))
        .unwrap_or(&term.morphofeat);
    let lemma = lemma_of(term);
    let mut features = PronounFeatures::default();

    for field in inner.split(',').map(str::trim) {
        match field {
            "ev" => features.number = Some(Number::Singular),
            "mv" => features.number = Some(Number::Plural),
            "getal" if features.number.is_none() => {
                if SINGULAR_LEMMAS.contains(&lemma.as_str()) {
                    features.number = Some(Number::Singular);
                } else if PLURAL_LEMMAS.contains(&lemma.as_str()) {
                    features.number = Some(Number::Plural);
                }
            }
            "fem" => features.gender = Some(Gender::Feminine),
            "masc" => features.gender = Some(Gender::Masculine),
            "onz" => features.gender = Some(Gender::Neuter),
            "betr" => features.relative = true,
            "refl" => features.reflexive = true,
            // "1", "2v", "3p", ...
            f if features.person.is_none() && f.starts_with(['1', '2', '3']) => {
                features.person = Some(match &f[..1] {
                    "1" => GrammaticalPerson::First,
                    "2" => GrammaticalPerson::Second,
                    _ => GrammaticalPerson::Third,
                });
            }
            _ => {}
        }
    }
    if REFLEXIVE_LEMMAS.contains(&lemma.as_str()) {
        features.reflexive = true;
    }
    features
}

fn lemma_of(term: &Term) -> String {
    if term.lemma.is_empty() {
        term.text.to_lowercase()
    } else {
        term.lemma.to_lowercase()
    }
}

// =============================================================================
// Extraction
// =============================================================================

/// Extract all mentions of `doc`, with ids in head-offset order.
#[must_use]
pub fn extract_mentions(doc: &Document, graph: &ConstituencyGraph<TermId>) -> Vec<Mention> {
    let mut by_head: BTreeMap<usize, Mention> = BTreeMap::new();
    let mut extra: Vec<Mention> = Vec::new();

    for head in candidate_heads(doc) {
        let info = ConstituentInfo::build(graph, &head);
        if let Some(mention) = mention_from_constituent(doc, &info) {
            by_head.insert(mention.head, mention);
        }
    }

    let mut found: Vec<Vec<TermId>> = Vec::new();
    for entity in doc.entities() {
        if entity.span.is_empty() || !verify_span_uniqueness(&found, &entity.span) {
            log::debug!("[mentions] skipping duplicate entity span {:?}", entity.span);
            continue;
        }
        found.push(entity.span.clone());

        let Some(head) = find_head_in_span(graph, &entity.span) else {
            continue;
        };
        let full_head = doc.offsets(&entity.span);
        match doc.offset_of(&head).and_then(|o| by_head.get_mut(&o)) {
            Some(mention) => {
                mention.entity_type = Some(entity.entity_type);
                mention.full_head = full_head;
            }
            None => {
                let mut info = ConstituentInfo::build(graph, &head);
                info.entity_type = Some(entity.entity_type);
                info.full_head = entity.span.iter().cloned().collect();
                match mention_from_constituent(doc, &info) {
                    Some(mention) => extra.push(mention),
                    None => log::warn!("[mentions] entity head {} is not a known term", head),
                }
            }
        }
    }

    let mut mentions: Vec<Mention> = by_head.into_values().chain(extra).collect();
    mentions.sort_by_key(|m| (m.head, m.begin()));
    for (i, mention) in mentions.iter_mut().enumerate() {
        mention.id = MentionId(i);
    }
    log::debug!("[mentions] extracted {} mentions", mentions.len());
    mentions
}

/// Turn constituent information into a mention. Ids are placeholders.
fn mention_from_constituent(doc: &Document, info: &ConstituentInfo) -> Option<Mention> {
    let head_term = doc.term(&info.head)?;
    let head = head_term.offset;
    let span = doc.offsets(&info.span);
    let modifiers: Vec<Span> = info.modifiers.iter().map(|m| doc.offsets(m)).collect();

    let post_head: BTreeSet<usize> = modifiers
        .iter()
        .filter(|m| m.first().is_some_and(|&first| first > head))
        .flatten()
        .copied()
        .collect();
    let relaxed = normalize_span(span.iter().copied().filter(|o| !post_head.contains(o)));

    let mut mention = Mention::new(MentionId(0), head, head_term.pos, head_term.sentence)
        .with_span(span)
        .with_relaxed_span(relaxed)
        .with_full_head(doc.offsets(&info.full_head));
    mention.modifiers = modifiers;
    mention.appositives = info.appositives.iter().map(|a| doc.offsets(a)).collect();
    mention.predicatives = info.predicatives.iter().map(|p| doc.offsets(p)).collect();
    mention.entity_type = info.entity_type;

    if mention.is_pronoun() {
        let features = analyze_pronoun(head_term);
        mention = mention.with_features(features.person, features.number, features.gender);
        mention.is_relative_pronoun = features.relative;
        mention.is_reflexive_pronoun = features.reflexive;
    }
    Some(mention)
}
