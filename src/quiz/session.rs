// src/quiz/session.rs

use std::fmt;

use rand::{Rng, seq::SliceRandom};
use serde::{Deserialize, Serialize};

use crate::models::flashcard::Flashcard;

/// Observable state of a user's quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizState {
    Idle,
    QuestionShown,
    AnswerShown,
    Results,
}

impl fmt::Display for QuizState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QuizState::Idle => "idle",
            QuizState::QuestionShown => "question shown",
            QuizState::AnswerShown => "answer shown",
            QuizState::Results => "results",
        };
        f.write_str(name)
    }
}

/// Transitions requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizAction {
    ShowAnswer,
    Grade,
    Results,
    Retake,
}

impl fmt::Display for QuizAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QuizAction::ShowAnswer => "show answer",
            QuizAction::Grade => "grade",
            QuizAction::Results => "view results",
            QuizAction::Retake => "retake",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizError {
    /// A quiz needs at least one card.
    NoCards,
    /// The action is not allowed in the current state.
    InvalidTransition { state: QuizState, action: QuizAction },
}

impl fmt::Display for QuizError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuizError::NoCards => write!(f, "Cannot start a quiz without flashcards"),
            QuizError::InvalidTransition { state, action } => {
                write!(f, "Cannot {} while quiz is in state '{}'", action, state)
            }
        }
    }
}

impl std::error::Error for QuizError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Correct,
    Incorrect,
}

/// Summary shown once every card has been graded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizResults {
    pub total: usize,
    pub score: usize,
    pub incorrect_count: usize,
    pub percentage: u32,
    pub incorrect: Vec<Flashcard>,
}

/// `round(100 * score / total)` with halves rounded up, in integers.
pub fn percentage(score: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((200 * score + total) / (2 * total)) as u32
}

/// One run through a shuffled set of flashcards.
#[derive(Debug, Clone)]
pub struct QuizSession {
    source: Vec<Flashcard>,
    cards: Vec<Flashcard>,
    index: usize,
    score: usize,
    correct: Vec<Flashcard>,
    incorrect: Vec<Flashcard>,
    answer_shown: bool,
}

impl QuizSession {
    /// Starts a session over a uniformly shuffled copy of `cards`.
    pub fn start<R: Rng + ?Sized>(cards: Vec<Flashcard>, rng: &mut R) -> Result<Self, QuizError> {
        if cards.is_empty() {
            return Err(QuizError::NoCards);
        }

        let mut shuffled = cards.clone();
        shuffled.shuffle(rng);

        Ok(Self {
            source: cards,
            cards: shuffled,
            index: 0,
            score: 0,
            correct: Vec::new(),
            incorrect: Vec::new(),
            answer_shown: false,
        })
    }

    pub fn state(&self) -> QuizState {
        if self.index == self.cards.len() {
            QuizState::Results
        } else if self.answer_shown {
            QuizState::AnswerShown
        } else {
            QuizState::QuestionShown
        }
    }

    pub fn cards(&self) -> &[Flashcard] {
        &self.cards
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn correct(&self) -> &[Flashcard] {
        &self.correct
    }

    pub fn incorrect(&self) -> &[Flashcard] {
        &self.incorrect
    }

    /// The card being asked, if the run is not finished.
    pub fn current(&self) -> Option<&Flashcard> {
        self.cards.get(self.index)
    }

    pub fn show_answer(&mut self) -> Result<&Flashcard, QuizError> {
        self.expect_state(QuizState::QuestionShown, QuizAction::ShowAnswer)?;
        self.answer_shown = true;
        Ok(&self.cards[self.index])
    }

    /// Records the verdict for the current card and moves on.
    /// Returns the state after the transition.
    pub fn grade(&mut self, verdict: Verdict) -> Result<QuizState, QuizError> {
        self.expect_state(QuizState::AnswerShown, QuizAction::Grade)?;

        let card = self.cards[self.index].clone();
        match verdict {
            Verdict::Correct => {
                self.score += 1;
                self.correct.push(card);
            }
            Verdict::Incorrect => self.incorrect.push(card),
        }
        self.index += 1;
        self.answer_shown = false;

        Ok(self.state())
    }

    pub fn results(&self) -> Result<QuizResults, QuizError> {
        self.expect_state(QuizState::Results, QuizAction::Results)?;
        let total = self.cards.len();
        Ok(QuizResults {
            total,
            score: self.score,
            incorrect_count: total - self.score,
            percentage: percentage(self.score, total),
            incorrect: self.incorrect.clone(),
        })
    }

    /// Starts over on the original card set with a fresh shuffle.
    pub fn retake<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), QuizError> {
        self.expect_state(QuizState::Results, QuizAction::Retake)?;
        *self = Self::start(std::mem::take(&mut self.source), rng)?;
        Ok(())
    }

    fn expect_state(&self, expected: QuizState, action: QuizAction) -> Result<(), QuizError> {
        let state = self.state();
        if state != expected {
            return Err(QuizError::InvalidTransition { state, action });
        }
        Ok(())
    }
}

/// A user's quiz: nothing running, or a session in progress or finished.
#[derive(Debug, Clone, Default)]
pub enum Quiz {
    #[default]
    Idle,
    Active(QuizSession),
}

impl Quiz {
    pub fn state(&self) -> QuizState {
        match self {
            Quiz::Idle => QuizState::Idle,
            Quiz::Active(session) => session.state(),
        }
    }

    pub fn session(&self) -> Option<&QuizSession> {
        match self {
            Quiz::Idle => None,
            Quiz::Active(session) => Some(session),
        }
    }

    /// Starts a new session, replacing any existing one.
    /// Returns the state after the transition.
    pub fn start<R: Rng + ?Sized>(
        &mut self,
        cards: Vec<Flashcard>,
        rng: &mut R,
    ) -> Result<QuizState, QuizError> {
        let session = QuizSession::start(cards, rng)?;
        let state = session.state();
        *self = Quiz::Active(session);
        Ok(state)
    }

    pub fn show_answer(&mut self) -> Result<&Flashcard, QuizError> {
        self.active_mut(QuizAction::ShowAnswer)?.show_answer()
    }

    pub fn grade(&mut self, verdict: Verdict) -> Result<QuizState, QuizError> {
        self.active_mut(QuizAction::Grade)?.grade(verdict)
    }

    pub fn results(&self) -> Result<QuizResults, QuizError> {
        match self {
            Quiz::Idle => Err(QuizError::InvalidTransition {
                state: QuizState::Idle,
                action: QuizAction::Results,
            }),
            Quiz::Active(session) => session.results(),
        }
    }

    pub fn retake<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), QuizError> {
        self.active_mut(QuizAction::Retake)?.retake(rng)
    }

    /// Discards the session whatever its state.
    pub fn abort(&mut self) {
        *self = Quiz::Idle;
    }

    fn active_mut(&mut self, action: QuizAction) -> Result<&mut QuizSession, QuizError> {
        match self {
            Quiz::Idle => Err(QuizError::InvalidTransition {
                state: QuizState::Idle,
                action,
            }),
            Quiz::Active(session) => Ok(session),
        }
    }
}
