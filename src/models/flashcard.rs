// src/models/flashcard.rs

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, types::Json};
use validator::Validate;

/// A single question/answer pair derived from study notes.
///
/// Both sides are non-empty after trimming. Equality is structural.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Validate)]
pub struct Flashcard {
    #[validate(length(max = 2000), custom(function = validate_not_blank))]
    pub question: String,
    #[validate(length(max = 5000), custom(function = validate_not_blank))]
    pub answer: String,
}

/// Rejects text that is empty once trimmed.
fn validate_not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        return Err(validator::ValidationError::new("blank_text"));
    }
    Ok(())
}

impl Flashcard {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }

    /// Builds a card from raw text, trimming both sides.
    /// Returns `None` if either side is blank.
    pub fn from_parts(question: &str, answer: &str) -> Option<Self> {
        let question = question.trim();
        let answer = answer.trim();
        if question.is_empty() || answer.is_empty() {
            return None;
        }
        Some(Self::new(question, answer))
    }
}

/// DTO for requesting flashcard generation.
#[derive(Debug, Deserialize, Validate)]
pub struct GenerateRequest {
    /// Missing and blank notes are both reported as "No notes provided".
    #[serde(default)]
    #[validate(length(max = 50000, message = "Notes must be at most 50000 characters."))]
    pub notes: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub flashcards: Vec<Flashcard>,
}

/// Represents the 'decks' table in the database.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SavedDeck {
    pub id: i64,
    pub user_id: i64,
    pub notes: String,
    pub flashcards: Json<Vec<Flashcard>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// DTO for saving a generated deck.
#[derive(Debug, Deserialize, Validate)]
pub struct SaveDeckRequest {
    #[serde(default)]
    #[validate(length(max = 50000))]
    pub notes: String,
    #[validate(length(min = 1, max = 100, message = "A deck needs at least one flashcard."), nested)]
    pub flashcards: Vec<Flashcard>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_sides_fail_validation() {
        assert!(Flashcard::new("What is it?", "A thing").validate().is_ok());
        assert!(Flashcard::new("", "A thing").validate().is_err());
        assert!(Flashcard::new("   ", "A thing").validate().is_err());
        assert!(Flashcard::new("What is it?", "\n\t ").validate().is_err());
    }

    #[test]
    fn blank_card_fails_the_whole_deck() {
        let request = SaveDeckRequest {
            notes: "notes".to_string(),
            flashcards: vec![Flashcard::new("q", "a"), Flashcard::new("q2", "  ")],
        };
        assert!(request.validate().is_err());
    }
}
