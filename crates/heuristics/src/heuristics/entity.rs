use crate::config::HeuristicsConfig;
use crate::features::{feature_names, HeuristicResult};
use crate::heuristic::{Heuristic, HeuristicKind};
use crate::snapshot::HeuristicSnapshot;
use tapsearch_context::{Context, Word};

/// Languages where a run of capitalized words marks a proper noun.
///
/// German is left out on purpose: it capitalizes every noun.
pub const CAMEL_CASE_PROPER_NOUN_LANGUAGES: &[&str] = &[
    "en", "es", "fr", "it", "pt", "nl", "ca", "da", "sv", "nb", "no", "fi", "pl", "ro",
];

const SENTENCE_TERMINATORS: &[char] = &['.', '!', '?', '\u{3002}'];

/// Detects a tap on what looks like a multi-word proper noun ("Barack Obama").
///
/// A likely entity argues for showing the panel, so this heuristic never
/// suppresses. It only reports features for the ranking model.
#[derive(Debug, Clone)]
pub struct EntityHeuristic {
    enabled: bool,
}

impl EntityHeuristic {
    pub fn new(config: &HeuristicsConfig) -> Self {
        Self {
            enabled: config.entity_enabled,
        }
    }
}

impl Heuristic for EntityHeuristic {
    fn kind(&self) -> HeuristicKind {
        HeuristicKind::Entity
    }

    fn evaluate(&self, snapshot: &HeuristicSnapshot<'_>) -> HeuristicResult {
        let eligible = snapshot
            .context
            .and_then(Context::detected_language)
            .is_some_and(is_camel_case_language);
        let satisfied = eligible && snapshot.context.is_some_and(is_tap_on_proper_noun);

        HeuristicResult::new(self.kind(), self.enabled, satisfied)
            .with_feature(feature_names::IS_ENTITY_ELIGIBLE, eligible)
            .with_feature(feature_names::IS_ENTITY, satisfied)
    }

    fn suppresses_when_satisfied(&self) -> bool {
        false
    }
}

/// "en-US", "EN" and "en_GB" all count as "en".
fn is_camel_case_language(language: &str) -> bool {
    let primary = language
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    CAMEL_CASE_PROPER_NOUN_LANGUAGES.contains(&primary.as_str())
}

fn is_tap_on_proper_noun(context: &Context) -> bool {
    let Some(tapped) = context.tapped_word() else {
        return false;
    };
    let with_before = context
        .word_before()
        .is_some_and(|before| is_proper_noun_pair(context, before, tapped));
    let with_after = context
        .word_after()
        .is_some_and(|after| is_proper_noun_pair(context, tapped, after));
    with_before || with_after
}

/// Two capitalized words separated by one space, not opening a sentence.
fn is_proper_noun_pair(context: &Context, first: &Word, second: &Word) -> bool {
    is_capitalized(&first.text)
        && is_capitalized(&second.text)
        && second.start == first.end() + 1
        && context.char_at(first.end()) == Some(' ')
        && !starts_sentence(context, first)
}

/// Uppercase first letter followed by at least one lowercase letter, so
/// acronyms and single letters do not count.
fn is_capitalized(word: &str) -> bool {
    let mut chars = word.chars();
    chars.next().is_some_and(char::is_uppercase) && chars.any(char::is_lowercase)
}

fn starts_sentence(context: &Context, word: &Word) -> bool {
    let mut offset = word.start;
    while offset > 0 {
        offset -= 1;
        match context.char_at(offset) {
            Some(c) if c.is_whitespace() => continue,
            Some(c) => return SENTENCE_TERMINATORS.contains(&c),
            None => return true,
        }
    }
    true
}
