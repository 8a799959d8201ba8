//! # multisieve-core
//!
//! Core types for the multisieve coreference engine: data structures shared by
//! mention extraction and the sieve pipeline.
//!
//! This crate provides:
//! - **Terms**: `Term`, `TermId`, `PartOfSpeech`, `DependencyEdge`
//! - **Mentions**: `Mention`, `MentionId`, grammatical features, `EntityType`
//! - **Quotations**: `Quotation`, `SpanRef`, `ResolvedQuotation`
//! - **Graph**: `ConstituencyGraph` with memoized constituent lookups
//!
//! The pipeline crate (`multisieve`) depends on `multisieve-core` so that
//! callers can build mentions and graphs without pulling in the sieves.

pub mod constituency;
pub mod error;
pub mod mention;
pub mod sync;
pub mod term;

// Re-exports for convenience
pub use constituency::{ConstituencyGraph, GraphNode, HeadDeps, LOOSE_PUNCTUATION};
pub use error::{Error, Result};
pub use mention::{
    compatible, is_subspan, normalize_span, same_offsets, EntityFamily, EntityType, Gender,
    GrammaticalPerson, Mention, MentionId, Number, Quotation, ResolvedQuotation, Span, SpanRef,
};
pub use term::{DependencyEdge, PartOfSpeech, Term, TermId};
