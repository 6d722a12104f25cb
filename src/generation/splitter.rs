// src/generation/splitter.rs

use std::sync::LazyLock;

use regex::Regex;

/// Pieces shorter than this many characters are not worth a flashcard.
pub const MIN_SENTENCE_CHARS: usize = 20;

static SENTENCE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?\n]+").expect("sentence break pattern is valid"));

/// Splits raw notes into candidate sentences.
///
/// Breaks on runs of `.`, `!`, `?` and newlines, trims each piece and drops
/// anything shorter than [`MIN_SENTENCE_CHARS`].
pub fn split_sentences(notes: &str) -> Vec<&str> {
    SENTENCE_BREAK
        .split(notes)
        .map(str::trim)
        .filter(|s| s.chars().count() >= MIN_SENTENCE_CHARS)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_terminal_punctuation_and_newlines() {
        let notes = "Water boils at 100 degrees Celsius. It is the main solvent of life!\nIce floats because it is less dense?";
        assert_eq!(
            split_sentences(notes),
            vec![
                "Water boils at 100 degrees Celsius",
                "It is the main solvent of life",
                "Ice floats because it is less dense",
            ]
        );
    }

    #[test]
    fn drops_short_fragments() {
        let notes = "Too short. Also short!\n\nThis sentence is long enough to keep.";
        assert_eq!(split_sentences(notes), vec!["This sentence is long enough to keep"]);
    }

    #[test]
    fn keeps_exactly_twenty_characters() {
        let twenty = "abcdefghij klmnopqrs";
        assert_eq!(twenty.chars().count(), 20);
        assert_eq!(split_sentences(twenty), vec![twenty]);
        assert!(split_sentences("abcdefghij klmnopqr").is_empty());
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(split_sentences("").is_empty());
        assert!(split_sentences("...!!!\n\n???").is_empty());
    }
}
