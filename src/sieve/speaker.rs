//! Speaker identification in direct speech.
//!
//! | pronoun | coreferent with | prohibited from     |
//! |---------|-----------------|---------------------|
//! | 1st     | source          | addressee, topic    |
//! | 2nd     | addressee       | source, topic       |
//! | 3rd     | topic           | source, addressee   |
//! | other   |                 | source              |

use super::SieveState;
use crate::{is_subspan, GrammaticalPerson, MentionId, Result};

pub(super) fn identify_speakers(state: &mut SieveState) -> Result<usize> {
    let mut links: Vec<(MentionId, MentionId)> = Vec::new();
    let mut prohibitions: Vec<(MentionId, MentionId)> = Vec::new();
    let mut quoted: Vec<MentionId> = Vec::new();

    for mention in &state.mentions {
        for quote in &state.quotations {
            if !is_subspan(&mention.span, &quote.span) {
                continue;
            }
            quoted.push(mention.id);

            if !mention.is_pronoun() {
                if let Some(source) = quote.source {
                    prohibitions.push((mention.id, source));
                }
                continue;
            }

            let (equal, others) = match mention.person {
                Some(GrammaticalPerson::First) => (quote.source, [quote.addressee, quote.topic]),
                Some(GrammaticalPerson::Second) => (quote.addressee, [quote.source, quote.topic]),
                Some(GrammaticalPerson::Third) => (quote.topic, [quote.source, quote.addressee]),
                None => continue,
            };
            if let Some(antecedent) = equal {
                links.push((mention.id, antecedent));
            }
            // a participant that fills two roles is still the one linked
            for other in others.into_iter().flatten().filter(|o| Some(*o) != equal) {
                prohibitions.push((mention.id, other));
            }
        }
    }

    for id in quoted {
        if let Some(i) = state.index.get(&id).copied() {
            state.mentions[i].in_quotation = true;
        }
    }
    let proposed = links.len() + prohibitions.len();
    for (mention, antecedent) in links {
        state.link([mention, antecedent])?;
    }
    for (mention, other) in prohibitions {
        state.prohibit(mention, other);
    }
    Ok(proposed)
}
