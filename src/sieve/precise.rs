//! Precise constructs: appositives, predicatives, relative pronouns,
//! acronyms and reflexive pronouns, applied in that order.

use super::{closest_by_head, SieveContext, SieveState};
use crate::{is_subspan, same_offsets, Mention, MentionId, Result};

pub(super) fn match_precise_constructs(ctx: &SieveContext<'_>, state: &mut SieveState) -> Result<usize> {
    let mut links: Vec<(MentionId, MentionId)> = Vec::new();
    let mentions = &state.mentions;

    for mention in mentions {
        for appositive in &mention.appositives {
            if let Some(other) = mention_for_span(mentions, appositive, mention.id) {
                links.push((mention.id, other));
            }
        }
    }
    for mention in mentions {
        for predicative in &mention.predicatives {
            if let Some(other) = mention_for_span(mentions, predicative, mention.id) {
                links.push((mention.id, other));
            }
        }
    }
    for pronoun in mentions.iter().filter(|m| m.is_relative_pronoun) {
        let candidates = mentions.iter().filter(|m| {
            m.id != pronoun.id
                && !state.prohibited(pronoun.id, m.id)
                && m.modifiers.iter().any(|modifier| modifier.contains(&pronoun.head))
        });
        if let Some(antecedent) = closest_by_head(pronoun.head, candidates) {
            links.push((pronoun.id, antecedent));
        }
    }
    for (i, a) in mentions.iter().enumerate() {
        for b in &mentions[i + 1..] {
            if a.is_named_entity() && b.is_named_entity() && is_acronym_pair(ctx, a, b) {
                links.push((a.id, b.id));
            }
        }
    }
    for pronoun in mentions.iter().filter(|m| m.is_reflexive_pronoun) {
        let candidates = mentions.iter().filter(|m| {
            m.id != pronoun.id
                && m.sentence == pronoun.sentence
                && m.head < pronoun.head
                && !state.prohibited(pronoun.id, m.id)
        });
        if let Some(antecedent) = closest_by_head(pronoun.head, candidates) {
            links.push((pronoun.id, antecedent));
        }
    }

    links.retain(|(a, b)| !state.prohibited(*a, *b));
    let proposed = links.len();
    for (a, b) in links {
        state.link([a, b])?;
    }
    Ok(proposed)
}

/// The mention realizing `span`: one with exactly these offsets, else the
/// largest mention inside the span whose head lies in it.
fn mention_for_span(mentions: &[Mention], span: &[usize], exclude: MentionId) -> Option<MentionId> {
    let others = mentions.iter().filter(|m| m.id != exclude);
    others
        .clone()
        .find(|m| same_offsets(&m.span, span))
        .or_else(|| {
            others
                .filter(|m| span.contains(&m.head) && is_subspan(&m.span, span))
                .max_by_key(|m| (m.span.len(), std::cmp::Reverse(m.id)))
        })
        .map(|m| m.id)
}

/// Is one full head an acronym of the other ("VN" / "Verenigde Naties")?
fn is_acronym_pair(ctx: &SieveContext<'_>, a: &Mention, b: &Mention) -> bool {
    let a = ctx.surface(&a.full_head);
    let b = ctx.surface(&b.full_head);
    is_acronym_of(&a, &b) || is_acronym_of(&b, &a)
}

fn is_acronym_of(acronym: &str, name: &str) -> bool {
    let acronym: String = acronym.chars().filter(|c| *c != '.').collect();
    if acronym.contains(char::is_whitespace)
        || acronym.chars().filter(|c| c.is_uppercase()).count() < 2
    {
        return false;
    }
    let words: Vec<&str> = name.split_whitespace().collect();
    if words.len() < 2 {
        return false;
    }
    let all_initials: String = words.iter().filter_map(|w| w.chars().next()).collect();
    let capital_initials: String = words
        .iter()
        .filter_map(|w| w.chars().next())
        .filter(|c| c.is_uppercase())
        .collect();
    acronym == all_initials || acronym == capital_initials
}
