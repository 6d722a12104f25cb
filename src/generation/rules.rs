// src/generation/rules.rs

use std::sync::LazyLock;

use regex::Regex;

use crate::models::flashcard::Flashcard;

/// Upper bound on cards the fallback path emits.
pub const MAX_CARDS: usize = 8;

/// Sentences must be longer than this to be turned into an "Explain" card.
pub const EXPLAIN_MIN_CHARS: usize = 30;

/// Number of leading words used as the topic of an "Explain" card.
const TOPIC_WORDS: usize = 5;

static DEFINITION_KEYWORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:is|are|means|refers to|defined as)\b")
        .expect("definition keyword pattern is valid")
});

/// Heuristic rules, in the order they are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// "X is Y", "X means Y", "X refers to Y", ...
    Definition,
    /// "X: Y"
    Colon,
    /// Any long sentence becomes "Explain: <first words>".
    Explain,
}

impl Rule {
    /// Priority order. The first rule that matches a sentence wins.
    pub const PRECEDENCE: [Rule; 3] = [Rule::Definition, Rule::Colon, Rule::Explain];

    /// Tries this rule on one sentence. `produced` is the number of cards
    /// generated so far for the current notes.
    pub fn apply(self, sentence: &str, produced: usize) -> Option<Flashcard> {
        match self {
            Rule::Definition => {
                let keyword = DEFINITION_KEYWORD.find(sentence)?;
                let subject = sentence[..keyword.start()].trim();
                let definition = &sentence[keyword.end()..];
                if subject.is_empty() {
                    return None;
                }
                Flashcard::from_parts(&format!("What is {}?", subject), definition)
            }
            Rule::Colon => {
                let (left, right) = sentence.split_once(':')?;
                let left = left.trim();
                if left.is_empty() {
                    return None;
                }
                Flashcard::from_parts(&format!("What is {}?", left), right)
            }
            Rule::Explain => {
                if produced >= MAX_CARDS || sentence.chars().count() <= EXPLAIN_MIN_CHARS {
                    return None;
                }
                let topic = sentence
                    .split_whitespace()
                    .take(TOPIC_WORDS)
                    .collect::<Vec<_>>()
                    .join(" ");
                Flashcard::from_parts(&format!("Explain: {}", topic), sentence)
            }
        }
    }
}

/// Runs the rules over a sentence in precedence order.
/// Returns the matching rule together with the card it produced.
pub fn match_sentence(sentence: &str, produced: usize) -> Option<(Rule, Flashcard)> {
    Rule::PRECEDENCE
        .iter()
        .find_map(|rule| rule.apply(sentence, produced).map(|card| (*rule, card)))
}
