//! Terms, part-of-speech tags, and dependency edges.
//!
//! A [`Term`] is a token-bearing syntactic unit of the annotation layer. The
//! core treats terms as immutable keys: it reads their tag, lemma, morphology,
//! sentence number and offset, and never rewrites them.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Identifiers
// =============================================================================

/// Opaque identifier of a term (e.g. `t_12`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TermId(pub String);

impl TermId {
    /// Create a term id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TermId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TermId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for TermId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

// =============================================================================
// Part of speech
// =============================================================================

/// Coarse part-of-speech category of a term.
///
/// This is a closed vocabulary. Labels outside it are rejected when parsing
/// instead of silently failing to match later on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PartOfSpeech {
    /// Common noun (`noun`)
    Noun,
    /// Proper name (`name`)
    Name,
    /// Pronoun (`pron`)
    Pronoun,
    /// Determiner, including possessive determiners (`det`)
    Determiner,
    /// Adjective (`adj`)
    Adjective,
    /// Verb (`verb`)
    Verb,
    /// Adverb (`adv`)
    Adverb,
    /// Preposition (`prep`)
    Preposition,
    /// Conjunction (`conj`, `vg`)
    Conjunction,
    /// Numeral (`num`)
    Numeral,
    /// Interjection (`int`, `tsw`)
    Interjection,
    /// Punctuation (`punct`)
    Punctuation,
    /// Explicit "other" tag of the tagger (`other`)
    Other,
}

impl PartOfSpeech {
    /// Canonical label.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            PartOfSpeech::Noun => "noun",
            PartOfSpeech::Name => "name",
            PartOfSpeech::Pronoun => "pron",
            PartOfSpeech::Determiner => "det",
            PartOfSpeech::Adjective => "adj",
            PartOfSpeech::Verb => "verb",
            PartOfSpeech::Adverb => "adv",
            PartOfSpeech::Preposition => "prep",
            PartOfSpeech::Conjunction => "conj",
            PartOfSpeech::Numeral => "num",
            PartOfSpeech::Interjection => "int",
            PartOfSpeech::Punctuation => "punct",
            PartOfSpeech::Other => "other",
        }
    }

    /// Nouns and names: the heads string matching works on.
    #[must_use]
    pub const fn is_nominal(&self) -> bool {
        matches!(self, PartOfSpeech::Noun | PartOfSpeech::Name)
    }

    /// Nouns and adjectives count as "main modifiers" of a mention.
    #[must_use]
    pub const fn is_main_modifier(&self) -> bool {
        matches!(self, PartOfSpeech::Noun | PartOfSpeech::Adjective)
    }
}

impl FromStr for PartOfSpeech {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let pos = match s.trim().to_lowercase().as_str() {
            "noun" | "n" => PartOfSpeech::Noun,
            "name" | "propn" => PartOfSpeech::Name,
            "pron" | "pronoun" => PartOfSpeech::Pronoun,
            "det" => PartOfSpeech::Determiner,
            "adj" => PartOfSpeech::Adjective,
            "verb" | "v" => PartOfSpeech::Verb,
            "adv" => PartOfSpeech::Adverb,
            "prep" | "adp" => PartOfSpeech::Preposition,
            "conj" | "vg" | "cconj" | "sconj" => PartOfSpeech::Conjunction,
            "num" => PartOfSpeech::Numeral,
            "int" | "tsw" | "intj" => PartOfSpeech::Interjection,
            "punct" | "let" => PartOfSpeech::Punctuation,
            "other" | "x" => PartOfSpeech::Other,
            _ => return Err(Error::unknown_tag("part-of-speech", s)),
        };
        Ok(pos)
    }
}

impl TryFrom<String> for PartOfSpeech {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<PartOfSpeech> for String {
    fn from(pos: PartOfSpeech) -> Self {
        pos.as_str().to_string()
    }
}

impl fmt::Display for PartOfSpeech {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Term
// =============================================================================

/// A term of the annotation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    /// Term identifier
    pub id: TermId,
    /// Surface text
    pub text: String,
    /// Lemma
    #[serde(default)]
    pub lemma: String,
    /// Part-of-speech category
    pub pos: PartOfSpeech,
    /// Morphological feature string as produced by the tagger (e.g. `VNW(pers,pron,nomin,vol,1,ev)`)
    #[serde(default)]
    pub morphofeat: String,
    /// Sentence number
    pub sentence: usize,
    /// Linear offset of the first token; unique per term
    pub offset: usize,
}

impl Term {
    /// Create a term with an empty lemma and no morphology.
    #[must_use]
    pub fn new(
        id: impl Into<TermId>,
        text: impl Into<String>,
        pos: PartOfSpeech,
        sentence: usize,
        offset: usize,
    ) -> Self {
        let text = text.into();
        Self {
            id: id.into(),
            lemma: text.to_lowercase(),
            text,
            pos,
            morphofeat: String::new(),
            sentence,
            offset,
        }
    }

    /// Set the lemma.
    #[must_use]
    pub fn with_lemma(mut self, lemma: impl Into<String>) -> Self {
        self.lemma = lemma.into();
        self
    }

    /// Set the morphological feature string.
    #[must_use]
    pub fn with_morphofeat(mut self, morphofeat: impl Into<String>) -> Self {
        self.morphofeat = morphofeat.into();
        self
    }
}

// =============================================================================
// Dependency edge
// =============================================================================

/// A labelled, directed dependency edge from head to dependent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DependencyEdge {
    /// Governing term
    #[serde(alias = "from")]
    pub head: TermId,
    /// Governed term
    #[serde(alias = "to")]
    pub dependent: TermId,
    /// Relation label (e.g. `hd/su`)
    #[serde(alias = "rfunc")]
    pub relation: String,
}

impl DependencyEdge {
    /// Create an edge.
    #[must_use]
    pub fn new(
        head: impl Into<TermId>,
        dependent: impl Into<TermId>,
        relation: impl Into<String>,
    ) -> Self {
        Self {
            head: head.into(),
            dependent: dependent.into(),
            relation: relation.into(),
        }
    }
}
