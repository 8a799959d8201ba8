//! Linking quotation participants to mentions.
//!
//! A quotation names its source, addressee and topic as raw stretches of
//! text. Before the sieves run these are mapped onto mention ids: a stretch
//! links to the mention covering exactly the same terms, else to the first
//! mention whose span contains it or is contained in it.

use crate::document::Document;
use crate::{
    is_subspan, same_offsets, ConstituencyGraph, Mention, MentionId, Quotation, ResolvedQuotation,
    Span, SpanRef, TermId,
};

/// Expand a participant reference to term offsets.
///
/// A head reference expands to the offsets of its constituent; a head the
/// document does not know expands to nothing.
#[must_use]
pub fn expand_span_ref(
    doc: &Document,
    graph: &ConstituencyGraph<TermId>,
    span_ref: &SpanRef,
) -> Option<Span> {
    let span = match span_ref {
        SpanRef::Offsets(offsets) => crate::normalize_span(offsets.iter().copied()),
        SpanRef::Head(head) => {
            doc.term(head)?;
            doc.offsets(graph.get_constituent(head).iter())
        }
    };
    (!span.is_empty()).then_some(span)
}

/// The mention a stretch of text refers to, if any.
#[must_use]
pub fn link_span_to_mention(span: &[usize], mentions: &[Mention]) -> Option<MentionId> {
    if span.is_empty() {
        return None;
    }
    mentions
        .iter()
        .find(|m| same_offsets(span, &m.span))
        .or_else(|| {
            mentions
                .iter()
                .find(|m| is_subspan(span, &m.span) || is_subspan(&m.span, span))
        })
        .map(|m| m.id)
}

/// Resolve every participant of every quotation.
///
/// Participants that match no mention stay `None`.
#[must_use]
pub fn resolve_quotations(
    doc: &Document,
    graph: &ConstituencyGraph<TermId>,
    quotations: &[Quotation],
    mentions: &[Mention],
) -> Vec<ResolvedQuotation> {
    let link = |role: &str, participant: &Option<SpanRef>| -> Option<MentionId> {
        let span_ref = participant.as_ref()?;
        let linked = expand_span_ref(doc, graph, span_ref)
            .and_then(|span| link_span_to_mention(&span, mentions));
        if linked.is_none() {
            log::debug!("[sieve] quotation {} {:?} matches no mention", role, span_ref);
        }
        linked
    };

    quotations
        .iter()
        .map(|q| ResolvedQuotation {
            span: q.span.clone(),
            source: link("source", &q.source),
            addressee: link("addressee", &q.addressee),
            topic: link("topic", &q.topic),
        })
        .collect()
}
