//! # multisieve
//!
//! Deterministic multi-pass sieve coreference resolution over
//! dependency-parsed Dutch text.
//!
//! - **Graph**: constituents and roots over possibly cyclic dependency graphs
//! - **Mentions**: nouns, names, pronouns and named entities with their spans
//! - **Sieves**: ordered rule passes from direct speech to pronoun resolution
//! - **Classes**: a registry that merges overlapping coreference classes
//!
//! ## Quick Start
//!
//! ```rust
//! use multisieve::{CorefConfig, Document, SievePipeline};
//!
//! let doc = Document::from_json(r#"{
//!     "terms": [
//!         {"id": "t_0", "text": "Marie", "pos": "name", "sentence": 1, "offset": 0},
//!         {"id": "t_1", "text": "slaapt", "pos": "verb", "sentence": 1, "offset": 1},
//!         {"id": "t_2", "text": "Ze", "pos": "pron", "sentence": 2, "offset": 2,
//!          "morphofeat": "VNW(pers,pron,nomin,red,3,ev,fem)"},
//!         {"id": "t_3", "text": "droomt", "pos": "verb", "sentence": 2, "offset": 3}
//!     ],
//!     "dependencies": [
//!         {"from": "t_1", "to": "t_0", "rfunc": "hd/su"},
//!         {"from": "t_3", "to": "t_2", "rfunc": "hd/su"}
//!     ],
//!     "entities": [{"span": ["t_0"], "type": "PER"}]
//! }"#)?;
//!
//! let outcome = SievePipeline::new(CorefConfig::default()).resolve_document(&doc)?;
//! assert!(outcome.are_coreferent(multisieve::MentionId(0), multisieve::MentionId(1)));
//! # Ok::<(), multisieve::Error>(())
//! ```
//!
//! ## Stages
//!
//! | Stage | Links |
//! |-------|-------|
//! | speaker identification | pronouns in quotations to source/addressee/topic |
//! | string match | identical full spans |
//! | relaxed string match | identical spans without post-head modifiers |
//! | precise constructs | appositives, predicatives, relatives, acronyms, reflexives |
//! | strict head match (×3) | identical heads, with word/modifier inclusion variants |
//! | proper head-word match | named entities sharing head words |
//! | relaxed head match | named entities of one type, strict antecedents |
//! | prohibition propagation | none; forbids links inside a sentence |
//! | pronoun resolution | closest compatible antecedent |
//!
//! The library logs through the `log` facade and never installs a logger.

pub mod config;
pub mod document;
pub mod mentions;
pub mod outcome;
pub mod quotation;
pub mod registry;
pub mod sieve;

// Re-export core types
pub use multisieve_core::{
    compatible, is_subspan, normalize_span, same_offsets, ConstituencyGraph, DependencyEdge,
    EntityFamily, EntityType, Error, Gender, GrammaticalPerson, GraphNode, HeadDeps, Mention,
    MentionId, Number, PartOfSpeech, Quotation, ResolvedQuotation, Result, Span, SpanRef, Term,
    TermId, LOOSE_PUNCTUATION,
};

pub use config::{CorefConfig, TreeValidation};
pub use document::{Document, NamedEntity};
pub use outcome::CorefOutcome;
pub use registry::{ClassId, CoreferenceClassRegistry};
pub use sieve::{SieveContext, SievePipeline, SieveStage, SieveState};
