// src/generation/fallback.rs

use crate::{
    generation::{
        rules::{MAX_CARDS, match_sentence},
        splitter::split_sentences,
    },
    models::flashcard::Flashcard,
};

pub const SUMMARY_QUESTION: &str = "What are the main points from these notes?";

/// Characters of the notes quoted by the summary card.
pub const SUMMARY_CHARS: usize = 200;

/// Summary answer for notes with no visible text.
pub const EMPTY_SUMMARY: &str = "(no content)";

/// Deterministic, rule-based flashcard generation.
///
/// Always returns between 1 and [`MAX_CARDS`] cards. When no sentence matches
/// any rule, a single summary card quoting the start of the notes is returned.
pub fn generate_fallback(notes: &str) -> Vec<Flashcard> {
    let mut cards: Vec<Flashcard> = Vec::new();

    for sentence in split_sentences(notes) {
        if let Some((rule, card)) = match_sentence(sentence, cards.len()) {
            tracing::trace!(?rule, "Sentence matched");
            cards.push(card);
        }
    }

    if cards.is_empty() {
        cards.push(summary_card(notes));
    }

    // Definition and colon cards are not capped while matching.
    cards.truncate(MAX_CARDS);
    cards
}

fn summary_card(notes: &str) -> Flashcard {
    let notes = notes.trim();
    let mut answer: String = notes.chars().take(SUMMARY_CHARS).collect();
    if notes.chars().count() > SUMMARY_CHARS {
        answer.push_str("...");
    }
    Flashcard::from_parts(SUMMARY_QUESTION, &answer)
        .unwrap_or_else(|| Flashcard::new(SUMMARY_QUESTION, EMPTY_SUMMARY))
}
