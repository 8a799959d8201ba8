//! Exact and relaxed string matching.
//!
//! Every noun- or name-headed mention ends up in some class: the first
//! mention with a given string keeps (or opens) a class, later mentions with
//! the same string join it. Prohibitions are not consulted.

use super::{SieveContext, SieveState};
use crate::{MentionId, Result, Span};
use std::collections::HashMap;

pub(super) fn match_strings<F>(ctx: &SieveContext<'_>, state: &mut SieveState, key: F) -> Result<usize>
where
    F: Fn(&crate::Mention) -> &Span,
{
    let mut first_with: HashMap<String, MentionId> = HashMap::new();
    let mut links: Vec<(MentionId, MentionId)> = Vec::new();
    let mut opened: Vec<MentionId> = Vec::new();

    for mention in state.mentions.iter().filter(|m| m.head_pos.is_nominal()) {
        let surface = ctx.surface(key(mention));
        if surface.is_empty() {
            continue;
        }
        match first_with.get(&surface) {
            Some(&first) => links.push((first, mention.id)),
            None => {
                if state.registry.class_of(mention.id).is_none() {
                    opened.push(mention.id);
                }
                first_with.insert(surface, mention.id);
            }
        }
    }

    let proposed = links.len();
    for id in opened {
        state.link([id])?;
    }
    for (first, mention) in links {
        state.link([first, mention])?;
    }
    Ok(proposed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CorefConfig;
    use crate::document::Document;
    use crate::{Mention, PartOfSpeech, Term};

    #[test]
    fn test_full_and_relaxed_strings() {
        // "de minister" ... "de minister van Financiën" ... "de minister"
        let words = ["de", "minister", "de", "minister", "van", "Financiën", "de", "minister"];
        let terms = words
            .iter()
            .enumerate()
            .map(|(i, w)| Term::new(format!("t_{i}"), *w, PartOfSpeech::Noun, 1, i))
            .collect();
        let doc = Document::new(terms, Vec::new()).unwrap();
        let graph = doc.constituency_graph(&CorefConfig::default());
        let config = CorefConfig::default();
        let ctx = SieveContext {
            document: &doc,
            graph: &graph,
            config: &config,
        };
        let mentions = vec![
            Mention::new(MentionId(0), 1, PartOfSpeech::Noun, 1).with_span([0, 1]),
            Mention::new(MentionId(1), 3, PartOfSpeech::Noun, 1)
                .with_span([2, 3, 4, 5])
                .with_relaxed_span([2, 3]),
            Mention::new(MentionId(2), 7, PartOfSpeech::Noun, 1).with_span([6, 7]),
            Mention::new(MentionId(3), 4, PartOfSpeech::Preposition, 1),
        ];
        let mut state = SieveState::new(mentions, Vec::new()).unwrap();

        assert_eq!(match_strings(&ctx, &mut state, |m| &m.span).unwrap(), 1);
        state.registry.merge().unwrap();
        assert!(state.registry.are_coreferent(MentionId(0), MentionId(2)));
        assert!(!state.registry.are_coreferent(MentionId(0), MentionId(1)));
        // the singleton class of m1 exists, m3 is not nominal
        assert!(state.registry.class_of(MentionId(1)).is_some());
        assert!(state.registry.class_of(MentionId(3)).is_none());

        match_strings(&ctx, &mut state, |m| &m.relaxed_span).unwrap();
        state.registry.merge().unwrap();
        assert!(state.registry.are_coreferent(MentionId(1), MentionId(2)));
        assert_eq!(state.registry.len(), 1);
    }
}
