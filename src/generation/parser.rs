// src/generation/parser.rs

use std::sync::LazyLock;

use regex::Regex;

use crate::models::flashcard::Flashcard;

static MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)[QA]:").expect("marker pattern is valid"));

/// Where the parser is inside the current `Q:` block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    /// Reading question text, starting at the byte offset.
    Question(usize),
    /// Question spans `question`; reading answer text from `start`.
    Answer {
        question: (usize, usize),
        start: usize,
    },
    /// Both sides read; ignoring text until the next `Q:`.
    Done {
        question: (usize, usize),
        answer: (usize, usize),
    },
}

/// Extracts flashcards from a model reply in the `Q: ... A: ...` format.
///
/// Markers are case-insensitive. Blocks without an `A:` marker, or with a
/// blank question or answer, are dropped. An answer stops at the next marker,
/// so a stray second `A:` does not leak into it. An empty result means the
/// reply was unusable.
pub fn parse_reply(text: &str) -> Vec<Flashcard> {
    let mut cards = Vec::new();
    let mut section = Section::Question(0);

    for marker in MARKER.find_iter(text) {
        let is_question = marker.as_str().starts_with(['Q', 'q']);

        section = if is_question {
            if let Some(card) = close_block(text, section, marker.start()) {
                cards.push(card);
            }
            Section::Question(marker.end())
        } else {
            match section {
                Section::Question(start) => Section::Answer {
                    question: (start, marker.start()),
                    start: marker.end(),
                },
                Section::Answer { question, start } => Section::Done {
                    question,
                    answer: (start, marker.start()),
                },
                done @ Section::Done { .. } => done,
            }
        };
    }

    if let Some(card) = close_block(text, section, text.len()) {
        cards.push(card);
    }

    cards
}

fn close_block(text: &str, section: Section, end: usize) -> Option<Flashcard> {
    let (question, answer) = match section {
        Section::Question(_) => return None,
        Section::Answer { question, start } => (question, (start, end)),
        Section::Done { question, answer } => (question, answer),
    };
    Flashcard::from_parts(&text[question.0..question.1], &text[answer.0..answer.1])
}
