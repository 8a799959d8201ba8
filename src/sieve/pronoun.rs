//! Prohibition propagation and pronoun resolution.

use super::{closest_by_head, SieveContext, SieveState};
use crate::{compatible, Mention, MentionId, Result};
use std::collections::BTreeMap;

/// Within a sentence, mentions that are not coreferent by now are prohibited
/// from each other.
pub(super) fn propagate_prohibitions(state: &mut SieveState) -> Result<usize> {
    let mut by_sentence: BTreeMap<usize, Vec<MentionId>> = BTreeMap::new();
    for mention in &state.mentions {
        by_sentence.entry(mention.sentence).or_default().push(mention.id);
    }

    let mut pairs = Vec::new();
    for ids in by_sentence.values() {
        for (i, &a) in ids.iter().enumerate() {
            for &b in &ids[i + 1..] {
                if !state.registry.are_coreferent(a, b) {
                    pairs.push((a, b));
                }
            }
        }
    }

    let proposed = pairs.len();
    for (a, b) in pairs {
        state.prohibit(a, b);
        state.prohibit(b, a);
    }
    Ok(proposed)
}

/// Link every pronoun that is not yet in a class with other mentions to the
/// closest preceding compatible mention within the sentence window.
pub(super) fn resolve_pronouns(ctx: &SieveContext<'_>, state: &mut SieveState) -> Result<usize> {
    let window = ctx.config.max_pronoun_sentence_distance;
    let mut links = Vec::new();

    for pronoun in state.mentions.iter().filter(|m| m.is_pronoun()) {
        if is_resolved(state, pronoun.id) {
            continue;
        }
        let candidates = state.mentions.iter().filter(|m| {
            m.head < pronoun.head
                && m.sentence <= pronoun.sentence
                && pronoun.sentence - m.sentence <= window
                && !pronoun.prohibits(m)
                && agrees(pronoun, m)
        });
        if let Some(antecedent) = closest_by_head(pronoun.head, candidates) {
            links.push((pronoun.id, antecedent));
        }
    }

    let proposed = links.len();
    for (pronoun, antecedent) in links {
        state.link([pronoun, antecedent])?;
    }
    Ok(proposed)
}

/// Already in a class together with some other mention.
fn is_resolved(state: &SieveState, mention: MentionId) -> bool {
    state
        .registry
        .classes_of_mention(mention)
        .iter()
        .filter_map(|id| state.registry.get(*id))
        .any(|members| members.len() > 1)
}

fn agrees(a: &Mention, b: &Mention) -> bool {
    compatible(a.number, b.number)
        && compatible(a.gender, b.gender)
        && compatible(a.person, b.person)
        && compatible(a.entity_type, b.entity_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CorefConfig;
    use crate::document::Document;
    use crate::{Gender, GrammaticalPerson, Number, PartOfSpeech};

    fn run_pronouns(mentions: Vec<Mention>, config: CorefConfig) -> SieveState {
        let doc = Document::new(Vec::new(), Vec::new()).unwrap();
        let graph = doc.constituency_graph(&config);
        let ctx = SieveContext {
            document: &doc,
            graph: &graph,
            config: &config,
        };
        let mut state = SieveState::new(mentions, Vec::new()).unwrap();
        resolve_pronouns(&ctx, &mut state).unwrap();
        state.registry.merge().unwrap();
        state
    }

    fn hij(id: usize, head: usize, sentence: usize) -> Mention {
        Mention::new(MentionId(id), head, PartOfSpeech::Pronoun, sentence).with_features(
            Some(GrammaticalPerson::Third),
            Some(Number::Singular),
            Some(Gender::Masculine),
        )
    }

    #[test]
    fn test_closest_compatible_antecedent() {
        let mentions = vec![
            Mention::new(MentionId(0), 0, PartOfSpeech::Name, 1),
            Mention::new(MentionId(1), 3, PartOfSpeech::Noun, 1)
                .with_features(None, Some(Number::Plural), None),
            hij(2, 6, 2),
        ];
        let state = run_pronouns(mentions, CorefConfig::default());
        assert!(state.registry.are_coreferent(MentionId(2), MentionId(0)));
        assert!(!state.registry.are_coreferent(MentionId(2), MentionId(1)));
    }

    #[test]
    fn test_sentence_window() {
        let mentions = vec![Mention::new(MentionId(0), 0, PartOfSpeech::Name, 1), hij(1, 9, 5)];
        let state = run_pronouns(mentions.clone(), CorefConfig::default());
        assert!(state.registry.is_empty());

        let state = run_pronouns(
            mentions,
            CorefConfig::default().with_max_pronoun_sentence_distance(4),
        );
        assert!(state.registry.are_coreferent(MentionId(1), MentionId(0)));
    }

    #[test]
    fn test_prohibited_antecedent_skipped() {
        let mut pronoun = hij(2, 6, 1);
        pronoun.coreference_prohibited.insert(MentionId(1));
        let mentions = vec![
            Mention::new(MentionId(0), 0, PartOfSpeech::Name, 1),
            Mention::new(MentionId(1), 3, PartOfSpeech::Name, 1),
            pronoun,
        ];
        let state = run_pronouns(mentions, CorefConfig::default());
        assert!(state.registry.are_coreferent(MentionId(2), MentionId(0)));
    }

    #[test]
    fn test_propagation_skips_coreferent_pairs() {
        let mut state = SieveState::new(
            vec![
                Mention::new(MentionId(0), 0, PartOfSpeech::Name, 1),
                Mention::new(MentionId(1), 1, PartOfSpeech::Noun, 1),
                Mention::new(MentionId(2), 2, PartOfSpeech::Noun, 1),
                Mention::new(MentionId(3), 3, PartOfSpeech::Noun, 2),
            ],
            Vec::new(),
        )
        .unwrap();
        state.link([MentionId(0), MentionId(1)]).unwrap();
        assert_eq!(propagate_prohibitions(&mut state).unwrap(), 2);
        assert!(!state.prohibited(MentionId(0), MentionId(1)));
        assert!(state.prohibited(MentionId(0), MentionId(2)));
        assert!(state.prohibited(MentionId(2), MentionId(1)));
        assert!(!state.prohibited(MentionId(2), MentionId(3)));
    }
}
