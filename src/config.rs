//! Pipeline configuration.
//!
//! ```rust
//! use multisieve::config::{CorefConfig, TreeValidation};
//!
//! let config = CorefConfig::from_json(r#"{"remove_singletons": true}"#).unwrap();
//! assert!(config.remove_singletons);
//! assert_eq!(config.tree_validation, TreeValidation::Repair);
//! assert_eq!(config.max_pronoun_sentence_distance, 3);
//! ```

use crate::{PartOfSpeech, Result, LOOSE_PUNCTUATION};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Dutch function words ignored by word-inclusion checks.
pub const DUTCH_STOP_WORDS: &[&str] = &[
    "aan", "al", "alle", "als", "bij", "dan", "dat", "de", "deze", "die", "dit", "door", "een",
    "en", "er", "het", "hier", "hun", "in", "is", "je", "maar", "met", "na", "naar", "niet", "nog",
    "of", "om", "onder", "ook", "op", "over", "te", "tegen", "toch", "tot", "uit", "van", "voor",
    "want", "was", "wat", "wel", "werd", "wordt", "zal", "ze", "zij", "zijn", "zo", "zonder",
];

/// How the pipeline checks the dependency graph before running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreeValidation {
    /// Do not check coverage of the roots.
    Ignore,
    /// Fail on any head not covered by a root.
    Strict,
    /// Promote loose-punctuation heads to roots, then fail if still uncovered.
    #[default]
    Repair,
}

/// Configuration for the sieve pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorefConfig {
    /// Relation label that marks loose punctuation attached to a sentence
    pub loose_punctuation_relation: String,
    /// Root check performed before the sieves
    pub tree_validation: TreeValidation,
    /// Terms with these tags are left out of the dependency graph
    pub filtered_pos: BTreeSet<PartOfSpeech>,
    /// Maximum number of sentences a pronoun may look back
    pub max_pronoun_sentence_distance: usize,
    /// Drop single-member classes from the output
    pub remove_singletons: bool,
    /// Lowercased words ignored when checking word inclusion
    pub stop_words: BTreeSet<String>,
}

impl Default for CorefConfig {
    fn default() -> Self {
        Self {
            loose_punctuation_relation: LOOSE_PUNCTUATION.to_string(),
            tree_validation: TreeValidation::default(),
            filtered_pos: BTreeSet::from([PartOfSpeech::Punctuation]),
            max_pronoun_sentence_distance: 3,
            remove_singletons: false,
            stop_words: DUTCH_STOP_WORDS.iter().map(|w| w.to_string()).collect(),
        }
    }
}

impl CorefConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set the loose-punctuation relation label.
    #[must_use]
    pub fn with_loose_punctuation_relation(mut self, relation: impl Into<String>) -> Self {
        self.loose_punctuation_relation = relation.into();
        self
    }

    /// Set the tree validation mode.
    #[must_use]
    pub fn with_tree_validation(mut self, mode: TreeValidation) -> Self {
        self.tree_validation = mode;
        self
    }

    /// Set the tags filtered out of the graph.
    #[must_use]
    pub fn with_filtered_pos(mut self, tags: impl IntoIterator<Item = PartOfSpeech>) -> Self {
        self.filtered_pos = tags.into_iter().collect();
        self
    }

    /// Set the pronoun look-back window in sentences.
    #[must_use]
    pub fn with_max_pronoun_sentence_distance(mut self, distance: usize) -> Self {
        self.max_pronoun_sentence_distance = distance;
        self
    }

    /// Enable or disable singleton removal.
    #[must_use]
    pub fn with_remove_singletons(mut self, remove: bool) -> Self {
        self.remove_singletons = remove;
        self
    }

    /// Replace the stop-word list.
    #[must_use]
    pub fn with_stop_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.stop_words = words.into_iter().map(|w| w.as_ref().to_lowercase()).collect();
        self
    }

    /// Is `word` a stop word (case-insensitive)?
    #[must_use]
    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(&word.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CorefConfig::default();
        assert_eq!(config.loose_punctuation_relation, "-- / --");
        assert!(config.filtered_pos.contains(&PartOfSpeech::Punctuation));
        assert!(config.is_stop_word("De"));
        assert!(!config.is_stop_word("minister"));
    }

    #[test]
    fn test_from_json_partial_and_invalid() {
        let config =
            CorefConfig::from_json(r#"{"tree_validation": "strict", "filtered_pos": ["punct", "vg"]}"#)
                .unwrap();
        assert_eq!(config.tree_validation, TreeValidation::Strict);
        assert_eq!(config.filtered_pos.len(), 2);

        assert!(CorefConfig::from_json(r#"{"filtered_pos": ["nonsense"]}"#).is_err());
    }
}
