// src/models/quiz.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    models::flashcard::Flashcard,
    quiz::session::{Quiz, QuizState, Verdict},
};

/// DTO for starting a quiz over a set of cards.
#[derive(Debug, Deserialize, Validate)]
pub struct StartQuizRequest {
    #[validate(length(max = 100), nested)]
    pub flashcards: Vec<Flashcard>,
}

#[derive(Debug, Deserialize)]
pub struct GradeRequest {
    pub verdict: Verdict,
}

/// Public view of a user's quiz after each transition.
/// The answer is only present once it has been revealed.
#[derive(Debug, Serialize)]
pub struct QuizView {
    pub state: QuizState,
    pub index: usize,
    pub total: usize,
    pub score: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
}

impl From<&Quiz> for QuizView {
    fn from(quiz: &Quiz) -> Self {
        let state = quiz.state();
        let Some(session) = quiz.session() else {
            return Self {
                state,
                index: 0,
                total: 0,
                score: 0,
                question: None,
                answer: None,
            };
        };

        let current = session.current();
        Self {
            state,
            index: session.index(),
            total: session.cards().len(),
            score: session.score(),
            question: current.map(|card| card.question.clone()),
            answer: current
                .filter(|_| state == QuizState::AnswerShown)
                .map(|card| card.answer.clone()),
        }
    }
}
