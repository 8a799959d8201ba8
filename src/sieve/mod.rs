//! The multi-pass sieve pipeline.
//!
//! Each stage reads the mentions and the current coreference classes,
//! proposes new classes or coreference prohibitions, and is followed by a
//! [`CoreferenceClassRegistry::merge`]. Stages never undo earlier links, so
//! mentions that become coreferent stay coreferent.
//!
//! ```text
//!  Document ──► graph ──► mentions ──► quotations linked
//!                                          │
//!      ┌───────────────────────────────────┘
//!      ▼
//!  speaker ► string ► relaxed string ► precise ► strict head ×3
//!      ► proper head word ► relaxed head ► prohibitions ► pronouns
//!      │
//!      ▼
//!  post-processing ──► CorefOutcome
//! ```
//!
//! # Example
//!
//! ```rust
//! use multisieve::{CorefConfig, Document, SievePipeline};
//!
//! let doc = Document::from_json(r#"{
//!     "terms": [
//!         {"id": "t_0", "text": "Amsterdam", "pos": "name", "sentence": 1, "offset": 0},
//!         {"id": "t_1", "text": "groeit", "pos": "verb", "sentence": 1, "offset": 1},
//!         {"id": "t_2", "text": "Amsterdam", "pos": "name", "sentence": 2, "offset": 2},
//!         {"id": "t_3", "text": "bloeit", "pos": "verb", "sentence": 2, "offset": 3}
//!     ],
//!     "dependencies": [
//!         {"from": "t_1", "to": "t_0", "rfunc": "hd/su"},
//!         {"from": "t_3", "to": "t_2", "rfunc": "hd/su"}
//!     ]
//! }"#).unwrap();
//!
//! let outcome = SievePipeline::new(CorefConfig::default()).resolve_document(&doc).unwrap();
//! assert_eq!(outcome.chains(), vec![vec![multisieve::MentionId(0), multisieve::MentionId(1)]]);
//! ```

mod head_match;
mod precise;
mod pronoun;
mod speaker;
mod string_match;

use crate::config::{CorefConfig, TreeValidation};
use crate::document::Document;
use crate::mentions::extract_mentions;
use crate::outcome::CorefOutcome;
use crate::quotation::resolve_quotations;
use crate::registry::{ClassId, CoreferenceClassRegistry};
use crate::{ConstituencyGraph, Error, Mention, MentionId, Quotation, ResolvedQuotation, Result, TermId};
use std::collections::HashMap;
use std::fmt;

// =============================================================================
// Stages
// =============================================================================

/// One pass of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SieveStage {
    /// Direct speech: pronouns inside quotations against the quotation's participants
    SpeakerIdentification,
    /// Identical surface string of the full span
    StringMatch,
    /// Identical surface string of the relaxed span
    RelaxedStringMatch,
    /// Appositives, predicatives, relative pronouns, acronyms, reflexives
    PreciseConstructs,
    /// Identical head word, optionally with word inclusion and compatible modifiers
    StrictHeadMatch {
        /// Every non-stop word of the mention occurs in the antecedent
        word_inclusion: bool,
        /// Every noun/adjective modifier of the mention occurs in the antecedent
        compatible_modifiers: bool,
    },
    /// Named entities whose full head words are included in each other
    ProperHeadWordMatch,
    /// Like proper head-word match, restricted to strict antecedents of the same type
    RelaxedHeadMatch,
    /// Mentions of one sentence that are not coreferent may never become so
    ProhibitionPropagation,
    /// Unresolved pronouns to the closest compatible antecedent
    PronounResolution,
}

impl SieveStage {
    /// The standard stage order.
    #[must_use]
    pub fn default_order() -> Vec<SieveStage> {
        vec![
            SieveStage::SpeakerIdentification,
            SieveStage::StringMatch,
            SieveStage::RelaxedStringMatch,
            SieveStage::PreciseConstructs,
            SieveStage::StrictHeadMatch {
                word_inclusion: true,
                compatible_modifiers: true,
            },
            SieveStage::StrictHeadMatch {
                word_inclusion: true,
                compatible_modifiers: false,
            },
            SieveStage::StrictHeadMatch {
                word_inclusion: false,
                compatible_modifiers: true,
            },
            SieveStage::ProperHeadWordMatch,
            SieveStage::RelaxedHeadMatch,
            SieveStage::ProhibitionPropagation,
            SieveStage::PronounResolution,
        ]
    }

    /// Short stage name used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            SieveStage::SpeakerIdentification => "speaker-identification",
            SieveStage::StringMatch => "string-match",
            SieveStage::RelaxedStringMatch => "relaxed-string-match",
            SieveStage::PreciseConstructs => "precise-constructs",
            SieveStage::StrictHeadMatch { .. } => "strict-head-match",
            SieveStage::ProperHeadWordMatch => "proper-head-word-match",
            SieveStage::RelaxedHeadMatch => "relaxed-head-match",
            SieveStage::ProhibitionPropagation => "prohibition-propagation",
            SieveStage::PronounResolution => "pronoun-resolution",
        }
    }

    /// Run the stage. Returns the number of links and prohibitions proposed.
    pub fn apply(&self, ctx: &SieveContext<'_>, state: &mut SieveState) -> Result<usize> {
        match *self {
            SieveStage::SpeakerIdentification => speaker::identify_speakers(state),
            SieveStage::StringMatch => string_match::match_strings(ctx, state, |m| &m.span),
            SieveStage::RelaxedStringMatch => {
                string_match::match_strings(ctx, state, |m| &m.relaxed_span)
            }
            SieveStage::PreciseConstructs => precise::match_precise_constructs(ctx, state),
            SieveStage::StrictHeadMatch {
                word_inclusion,
                compatible_modifiers,
            } => head_match::strict_head_match(ctx, state, word_inclusion, compatible_modifiers),
            SieveStage::ProperHeadWordMatch => head_match::proper_head_word_match(ctx, state),
            SieveStage::RelaxedHeadMatch => head_match::relaxed_head_match(ctx, state),
            SieveStage::ProhibitionPropagation => pronoun::propagate_prohibitions(state),
            SieveStage::PronounResolution => pronoun::resolve_pronouns(ctx, state),
        }
    }
}

impl fmt::Display for SieveStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SieveStage::StrictHeadMatch {
                word_inclusion,
                compatible_modifiers,
            } => write!(
                f,
                "{}(words={}, modifiers={})",
                self.name(),
                word_inclusion,
                compatible_modifiers
            ),
            _ => f.write_str(self.name()),
        }
    }
}

// =============================================================================
// Context and state
// =============================================================================

/// Read-only inputs shared by all stages.
#[derive(Debug, Clone, Copy)]
pub struct SieveContext<'a> {
    /// The document being resolved
    pub document: &'a Document,
    /// Its dependency graph
    pub graph: &'a ConstituencyGraph<TermId>,
    /// Pipeline configuration
    pub config: &'a CorefConfig,
}

impl SieveContext<'_> {
    /// Surface string of a span.
    #[must_use]
    pub fn surface(&self, span: &[usize]) -> String {
        self.document.surface(span)
    }

    /// Lowercased words of a span.
    #[must_use]
    pub fn words(&self, span: &[usize]) -> Vec<String> {
        self.document.words(span)
    }
}

/// Mutable per-document state threaded through the stages.
#[derive(Debug, Clone)]
pub struct SieveState {
    /// Mentions, ordered by id
    pub mentions: Vec<Mention>,
    /// Quotations with linked participants
    pub quotations: Vec<ResolvedQuotation>,
    /// Coreference classes
    pub registry: CoreferenceClassRegistry,
    index: HashMap<MentionId, usize>,
}

impl SieveState {
    /// Create the state. Fails when two mentions share an id.
    pub fn new(mut mentions: Vec<Mention>, quotations: Vec<ResolvedQuotation>) -> Result<Self> {
        mentions.sort_by_key(|m| m.id);
        let mut index = HashMap::with_capacity(mentions.len());
        for (i, mention) in mentions.iter().enumerate() {
            if index.insert(mention.id, i).is_some() {
                return Err(Error::invalid_input(format!("duplicate mention id {}", mention.id)));
            }
        }
        Ok(Self {
            mentions,
            quotations,
            registry: CoreferenceClassRegistry::new(),
            index,
        })
    }

    /// Look up a mention.
    #[must_use]
    pub fn mention(&self, id: MentionId) -> Option<&Mention> {
        self.index.get(&id).map(|&i| &self.mentions[i])
    }

    fn mention_mut(&mut self, id: MentionId) -> Option<&mut Mention> {
        self.index.get(&id).map(|&i| &mut self.mentions[i])
    }

    /// Is coreference between `a` and `b` prohibited in either direction?
    #[must_use]
    pub fn prohibited(&self, a: MentionId, b: MentionId) -> bool {
        match (self.mention(a), self.mention(b)) {
            (Some(a), Some(b)) => a.prohibits(b),
            _ => false,
        }
    }

    /// Record that `mention` may not co-refer with `other`.
    pub fn prohibit(&mut self, mention: MentionId, other: MentionId) {
        if mention == other {
            return;
        }
        if let Some(m) = self.mention_mut(mention) {
            m.coreference_prohibited.insert(other);
        }
    }

    /// Propose a class. It is merged with overlapping classes after the stage.
    pub fn link<I>(&mut self, mentions: I) -> Result<ClassId>
    where
        I: IntoIterator<Item = MentionId>,
    {
        self.registry.add_coref_class(mentions, false)
    }
}

// =============================================================================
// Pipeline
// =============================================================================

/// A fixed sequence of sieve stages.
#[derive(Debug, Clone)]
pub struct SievePipeline {
    config: CorefConfig,
    stages: Vec<SieveStage>,
}

impl Default for SievePipeline {
    fn default() -> Self {
        Self::new(CorefConfig::default())
    }
}

impl SievePipeline {
    /// Create a pipeline with the standard stage order.
    #[must_use]
    pub fn new(config: CorefConfig) -> Self {
        Self {
            config,
            stages: SieveStage::default_order(),
        }
    }

    /// Replace the stage sequence.
    #[must_use]
    pub fn with_stages(mut self, stages: Vec<SieveStage>) -> Self {
        self.stages = stages;
        self
    }

    /// Stages in execution order.
    #[must_use]
    pub fn stages(&self) -> &[SieveStage] {
        &self.stages
    }

    /// Configuration.
    #[must_use]
    pub fn config(&self) -> &CorefConfig {
        &self.config
    }

    /// Resolve a whole document: check the roots of the unfiltered graph,
    /// build the filtered graph, extract mentions and run every stage.
    pub fn resolve_document(&self, doc: &Document) -> Result<CorefOutcome> {
        match self.config.tree_validation {
            TreeValidation::Ignore => {}
            TreeValidation::Strict => {
                doc.unfiltered_graph(&self.config).get_roots(false, false)?;
            }
            TreeValidation::Repair => {
                doc.unfiltered_graph(&self.config).get_roots(false, true)?;
            }
        }
        let graph = doc.constituency_graph(&self.config);
        let mentions = extract_mentions(doc, &graph);
        let ctx = SieveContext {
            document: doc,
            graph: &graph,
            config: &self.config,
        };
        self.run(&ctx, mentions, doc.quotations())
    }

    /// Run the stages over prepared mentions and quotations.
    pub fn run(
        &self,
        ctx: &SieveContext<'_>,
        mentions: Vec<Mention>,
        quotations: &[Quotation],
    ) -> Result<CorefOutcome> {
        let resolved = resolve_quotations(ctx.document, ctx.graph, quotations, &mentions);
        let mut state = SieveState::new(mentions, resolved)?;
        log::info!(
            "[sieve] resolving {} mentions, {} quotations",
            state.mentions.len(),
            state.quotations.len()
        );

        for stage in &self.stages {
            let proposed = stage.apply(ctx, &mut state)?;
            let replaced = state.registry.merge()?;
            log::debug!(
                "[sieve] {}: {} proposals, {} classes merged, {} classes",
                stage,
                proposed,
                replaced.len(),
                state.registry.len()
            );
        }

        Ok(self.post_process(state))
    }

    /// Drop singletons if configured, then every mention no class refers to.
    fn post_process(&self, mut state: SieveState) -> CorefOutcome {
        if self.config.remove_singletons {
            let removed = state.registry.remove_singletons();
            log::debug!("[sieve] removed {} singleton classes", removed);
        }
        let referenced = state.registry.referenced_mentions();
        let before = state.mentions.len();
        state.mentions.retain(|m| referenced.contains(&m.id));
        log::debug!(
            "[sieve] pruned {} unreferenced mentions",
            before - state.mentions.len()
        );
        CorefOutcome::new(state.registry.into_classes(), state.mentions, state.quotations)
    }
}

// =============================================================================
// Shared helpers
// =============================================================================

/// The candidate whose head is closest to `anchor`; ties go to the lower id.
pub(crate) fn closest_by_head<'m, I>(anchor: usize, candidates: I) -> Option<MentionId>
where
    I: IntoIterator<Item = &'m Mention>,
{
    candidates
        .into_iter()
        .min_by_key(|m| (m.head.abs_diff(anchor), m.id))
        .map(|m| m.id)
}

/// Do all `needles` occur in `haystack`?
pub(crate) fn all_words_in(needles: &[String], haystack: &[String]) -> bool {
    needles.iter().all(|w| haystack.contains(w))
}
