//! Head matching: strict head match, proper head-word match and relaxed
//! head match.

use super::{all_words_in, SieveContext, SieveState};
use crate::{is_subspan, Mention, MentionId, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

static DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d").expect("valid regex"));

/// Link non-pronoun mentions to earlier, non-overlapping mentions with the
/// same head word.
pub(super) fn strict_head_match(
    ctx: &SieveContext<'_>,
    state: &mut SieveState,
    word_inclusion: bool,
    compatible_modifiers: bool,
) -> Result<usize> {
    let mut links = Vec::new();
    for mention in state.mentions.iter().filter(|m| !m.is_pronoun()) {
        let head = ctx.surface(&[mention.head]);
        let content_words = content_words(ctx, mention);
        let modifiers = main_modifier_words(ctx, mention);

        for antecedent in &state.mentions {
            if antecedent.is_pronoun()
                || antecedent.head >= mention.head
                || antecedent.overlaps(mention)
                || ctx.surface(&[antecedent.head]) != head
                || state.prohibited(mention.id, antecedent.id)
            {
                continue;
            }
            let words = ctx.words(&antecedent.span);
            if word_inclusion && !all_words_in(&content_words, &words) {
                continue;
            }
            if compatible_modifiers && !all_words_in(&modifiers, &words) {
                continue;
            }
            links.push((mention.id, antecedent.id));
        }
    }
    commit(state, links)
}

/// Link named entities of the same family whose full-head words are
/// included in each other's.
pub(super) fn proper_head_word_match(ctx: &SieveContext<'_>, state: &mut SieveState) -> Result<usize> {
    let mut links = Vec::new();
    let entities: Vec<&Mention> = state.mentions.iter().filter(|m| m.is_named_entity()).collect();

    for mention in &entities {
        let head_words = ctx.words(&mention.full_head);
        for candidate in &entities {
            if candidate.id == mention.id
                || !same_family(mention, candidate)
                || is_subspan(&mention.span, &candidate.span)
                || is_subspan(&candidate.span, &mention.span)
                || state.prohibited(mention.id, candidate.id)
            {
                continue;
            }
            if all_words_in(&head_words, &ctx.words(&candidate.full_head))
                && digits_agree(ctx, mention, candidate)
            {
                links.push((mention.id, candidate.id));
            }
        }
    }
    commit(state, links)
}

/// Link named entities to strictly preceding entities of the same type that
/// contain their full head and all their content words.
pub(super) fn relaxed_head_match(ctx: &SieveContext<'_>, state: &mut SieveState) -> Result<usize> {
    let mut links = Vec::new();
    let entities: Vec<&Mention> = state.mentions.iter().filter(|m| m.is_named_entity()).collect();

    for mention in &entities {
        let head_words = ctx.words(&mention.full_head);
        let content_words = content_words(ctx, mention);
        for candidate in &entities {
            if candidate.end() >= mention.begin()
                || candidate.entity_type != mention.entity_type
                || state.prohibited(mention.id, candidate.id)
            {
                continue;
            }
            let words = ctx.words(&candidate.span);
            if all_words_in(&head_words, &words)
                && all_words_in(&content_words, &words)
                && digits_agree(ctx, mention, candidate)
            {
                links.push((mention.id, candidate.id));
            }
        }
    }
    commit(state, links)
}

fn commit(state: &mut SieveState, links: Vec<(MentionId, MentionId)>) -> Result<usize> {
    let proposed = links.len();
    for (a, b) in links {
        state.link([a, b])?;
    }
    Ok(proposed)
}

fn same_family(a: &Mention, b: &Mention) -> bool {
    match (a.entity_type, b.entity_type) {
        (Some(a), Some(b)) => a.family() == b.family(),
        _ => false,
    }
}

/// Lowercased words of the span that are not stop words.
fn content_words(ctx: &SieveContext<'_>, mention: &Mention) -> Vec<String> {
    ctx.words(&mention.span)
        .into_iter()
        .filter(|w| !ctx.config.is_stop_word(w))
        .collect()
}

/// Lowercased nouns and adjectives of the span other than the head.
fn main_modifier_words(ctx: &SieveContext<'_>, mention: &Mention) -> Vec<String> {
    mention
        .span
        .iter()
        .filter(|&&o| o != mention.head)
        .filter_map(|&o| ctx.document.term_at(o))
        .filter(|t| t.pos.is_main_modifier())
        .map(|t| t.text.to_lowercase())
        .collect()
}

/// Numbers must match when both spans contain any ("Kamer 2" vs "Kamer 1").
fn digits_agree(ctx: &SieveContext<'_>, a: &Mention, b: &Mention) -> bool {
    let digits = |m: &Mention| -> BTreeSet<String> {
        ctx.words(&m.span)
            .into_iter()
            .filter(|w| DIGITS.is_match(w))
            .collect()
    };
    let (da, db) = (digits(a), digits(b));
    da.is_empty() || db.is_empty() || da == db
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CorefConfig;
    use crate::document::Document;
    use crate::{EntityType, PartOfSpeech, Term};

    /// 0 de 1 grote 2 bank | 3 de 4 bank | 5 de 6 kleine 7 bank
    fn bank_doc() -> Document {
        let words = [
            ("de", PartOfSpeech::Determiner),
            ("grote", PartOfSpeech::Adjective),
            ("bank", PartOfSpeech::Noun),
            ("de", PartOfSpeech::Determiner),
            ("bank", PartOfSpeech::Noun),
            ("de", PartOfSpeech::Determiner),
            ("kleine", PartOfSpeech::Adjective),
            ("bank", PartOfSpeech::Noun),
        ];
        let terms = words
            .iter()
            .enumerate()
            .map(|(i, (w, pos))| Term::new(format!("t_{i}"), *w, *pos, 1 + i / 3, i))
            .collect();
        Document::new(terms, Vec::new()).unwrap()
    }

    fn run<F>(doc: &Document, mentions: Vec<Mention>, f: F) -> SieveState
    where
        F: Fn(&SieveContext<'_>, &mut SieveState) -> Result<usize>,
    {
        let config = CorefConfig::default();
        let graph = doc.constituency_graph(&config);
        let ctx = SieveContext {
            document: doc,
            graph: &graph,
            config: &config,
        };
        let mut state = SieveState::new(mentions, Vec::new()).unwrap();
        f(&ctx, &mut state).unwrap();
        state.registry.merge().unwrap();
        state
    }

    fn bank_mentions() -> Vec<Mention> {
        vec![
            Mention::new(MentionId(0), 2, PartOfSpeech::Noun, 1).with_span([0, 1, 2]),
            Mention::new(MentionId(1), 4, PartOfSpeech::Noun, 2).with_span([3, 4]),
            Mention::new(MentionId(2), 7, PartOfSpeech::Noun, 2).with_span([5, 6, 7]),
        ]
    }

    #[test]
    fn test_strict_head_match_with_modifiers() {
        let doc = bank_doc();
        let state = run(&doc, bank_mentions(), |ctx, state| {
            strict_head_match(ctx, state, true, true)
        });
        // "de bank" is included in "de grote bank"; "kleine" is not
        assert!(state.registry.are_coreferent(MentionId(1), MentionId(0)));
        assert!(!state.registry.are_coreferent(MentionId(2), MentionId(0)));
    }

    #[test]
    fn test_strict_head_match_head_only() {
        let doc = bank_doc();
        let state = run(&doc, bank_mentions(), |ctx, state| {
            strict_head_match(ctx, state, false, false)
        });
        assert!(state.registry.are_coreferent(MentionId(2), MentionId(0)));
        assert_eq!(state.registry.len(), 1);
    }

    #[test]
    fn test_strict_head_match_respects_prohibition() {
        let doc = bank_doc();
        let mut mentions = bank_mentions();
        mentions[1].coreference_prohibited.insert(MentionId(0));
        let state = run(&doc, mentions, |ctx, state| strict_head_match(ctx, state, true, true));
        assert!(!state.registry.are_coreferent(MentionId(1), MentionId(0)));
    }

    #[test]
    fn test_word_inclusion_ignores_case() {
        // 0 Centrale 1 bank | 2 de 3 centrale 4 bank
        let words = [
            ("Centrale", PartOfSpeech::Adjective, 1),
            ("bank", PartOfSpeech::Noun, 1),
            ("de", PartOfSpeech::Determiner, 2),
            ("centrale", PartOfSpeech::Adjective, 2),
            ("bank", PartOfSpeech::Noun, 2),
        ];
        let terms = words
            .iter()
            .enumerate()
            .map(|(i, (w, pos, sentence))| Term::new(format!("t_{i}"), *w, *pos, *sentence, i))
            .collect();
        let doc = Document::new(terms, Vec::new()).unwrap();
        let mentions = vec![
            Mention::new(MentionId(0), 1, PartOfSpeech::Noun, 1).with_span([0, 1]),
            Mention::new(MentionId(1), 4, PartOfSpeech::Noun, 2).with_span([2, 3, 4]),
        ];
        let state = run(&doc, mentions, |ctx, state| strict_head_match(ctx, state, true, true));
        assert!(state.registry.are_coreferent(MentionId(1), MentionId(0)));
    }

    /// 0 Mark 1 Rutte 2 zei 3 Rutte 4 Den 5 Haag 6 Haag
    fn names_doc() -> Document {
        let words = ["Mark", "Rutte", "zei", "Rutte", "Den", "Haag", "Haag"];
        let terms = words
            .iter()
            .enumerate()
            .map(|(i, w)| Term::new(format!("t_{i}"), *w, PartOfSpeech::Name, 1, i))
            .collect();
        Document::new(terms, Vec::new()).unwrap()
    }

    fn name_mentions() -> Vec<Mention> {
        vec![
            Mention::new(MentionId(0), 1, PartOfSpeech::Name, 1)
                .with_span([0, 1])
                .with_full_head([0, 1])
                .with_entity_type(EntityType::Person),
            Mention::new(MentionId(1), 3, PartOfSpeech::Name, 1)
                .with_entity_type(EntityType::Person),
            Mention::new(MentionId(2), 5, PartOfSpeech::Name, 1)
                .with_span([4, 5])
                .with_full_head([4, 5])
                .with_entity_type(EntityType::Location),
            Mention::new(MentionId(3), 6, PartOfSpeech::Name, 1)
                .with_entity_type(EntityType::Organization),
        ]
    }

    #[test]
    fn test_proper_head_word_match_uses_family() {
        let doc = names_doc();
        let state = run(&doc, name_mentions(), proper_head_word_match);
        assert!(state.registry.are_coreferent(MentionId(1), MentionId(0)));
        // ORG and LOC share a family
        assert!(state.registry.are_coreferent(MentionId(3), MentionId(2)));
    }

    #[test]
    fn test_relaxed_head_match_requires_equal_type() {
        let doc = names_doc();
        let state = run(&doc, name_mentions(), relaxed_head_match);
        assert!(state.registry.are_coreferent(MentionId(1), MentionId(0)));
        assert!(!state.registry.are_coreferent(MentionId(3), MentionId(2)));
    }

    #[test]
    fn test_digits_must_agree() {
        let words = ["Kamer", "2", "Kamer", "1", "Kamer"];
        let terms = words
            .iter()
            .enumerate()
            .map(|(i, w)| Term::new(format!("t_{i}"), *w, PartOfSpeech::Name, 1, i))
            .collect();
        let doc = Document::new(terms, Vec::new()).unwrap();
        let org = |id: usize, head: usize, span: &[usize]| {
            Mention::new(MentionId(id), head, PartOfSpeech::Name, 1)
                .with_span(span.iter().copied())
                .with_entity_type(EntityType::Organization)
        };
        let state = run(&doc, vec![org(0, 0, &[0, 1]), org(1, 2, &[2, 3])], proper_head_word_match);
        assert!(!state.registry.are_coreferent(MentionId(0), MentionId(1)));

        // a span without numbers agrees with any
        let state = run(&doc, vec![org(0, 0, &[0, 1]), org(2, 4, &[4])], proper_head_word_match);
        assert!(state.registry.are_coreferent(MentionId(0), MentionId(2)));
    }
}
