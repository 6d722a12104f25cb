// src/generation/orchestrator.rs

use std::{fmt, sync::Arc};

use crate::{
    generation::{
        backend::{BackendError, GenerationBackend},
        fallback::generate_fallback,
        parser::parse_reply,
    },
    models::flashcard::Flashcard,
};

/// Errors a generation request can surface to its caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    /// Notes were missing or blank; nothing was generated.
    EmptyNotes,
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationError::EmptyNotes => write!(f, "No notes provided"),
        }
    }
}

impl std::error::Error for GenerationError {}

/// Which path produced the cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardSource {
    Ai,
    Fallback,
}

/// Why the AI path was abandoned for a request.
#[derive(Debug)]
pub enum FallbackReason {
    BackendFailure(BackendError),
    ParseEmpty,
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::BackendFailure(err) => write!(f, "{}", err),
            FallbackReason::ParseEmpty => write!(f, "reply contained no parseable flashcards"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated {
    pub flashcards: Vec<Flashcard>,
    pub source: CardSource,
}

/// Builds the instruction sent to the model. The reply format must match
/// what [`parse_reply`] understands.
pub fn build_prompt(notes: &str) -> String {
    format!(
        "You are a helpful study assistant. Given the following study notes, create 5-8 high-quality flashcards.
Each flashcard should have a clear question and a concise answer.

Format your response EXACTLY like this (no extra text):
Q: [Question 1]
A: [Answer 1]

Q: [Question 2]
A: [Answer 2]

Study Notes:
{}

Generate flashcards:",
        notes
    )
}

/// Chooses between the AI backend and the heuristic generator.
///
/// One backend call per request, no retries. Any backend error or an
/// unparseable reply is answered with the fallback cards instead.
#[derive(Clone)]
pub struct Orchestrator {
    backend: Arc<dyn GenerationBackend>,
}

impl Orchestrator {
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Self {
        Self { backend }
    }

    /// Generates flashcards for `notes`. `requester` identifies the caller in
    /// logs and is not otherwise interpreted.
    #[tracing::instrument(skip(self, notes), fields(backend = self.backend.name(), notes_len = notes.len()))]
    pub async fn generate(&self, notes: &str, requester: &str) -> Result<Generated, GenerationError> {
        if notes.trim().is_empty() {
            return Err(GenerationError::EmptyNotes);
        }

        let reason = match self.backend.generate(&build_prompt(notes)).await {
            Ok(reply) => {
                let flashcards = parse_reply(&reply);
                if !flashcards.is_empty() {
                    tracing::info!(count = flashcards.len(), "Generated flashcards with AI backend");
                    return Ok(Generated {
                        flashcards,
                        source: CardSource::Ai,
                    });
                }
                FallbackReason::ParseEmpty
            }
            Err(err) => FallbackReason::BackendFailure(err),
        };

        match &reason {
            FallbackReason::BackendFailure(BackendError::Disabled) => {
                tracing::debug!("AI backend disabled, using fallback")
            }
            _ => tracing::warn!("AI generation failed, using fallback: {}", reason),
        }

        Ok(Generated {
            flashcards: generate_fallback(notes),
            source: CardSource::Fallback,
        })
    }
}
