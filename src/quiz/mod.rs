// src/quiz/mod.rs

pub mod session;

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use crate::error::AppError;
use session::Quiz;

/// Quiz sessions keyed by user id. Each user owns at most one session.
///
/// Transitions run under the lock and never await, so a user's session is
/// never touched by two requests at once.
#[derive(Clone, Default)]
pub struct QuizStore {
    sessions: Arc<Mutex<HashMap<i64, Quiz>>>,
}

impl QuizStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `f` against the user's quiz, creating an idle one if needed.
    /// Sessions that end up idle are dropped from the map.
    pub fn with_quiz<T>(&self, user_id: i64, f: impl FnOnce(&mut Quiz) -> T) -> Result<T, AppError> {
        let mut sessions = self.sessions.lock().map_err(|e| {
            tracing::error!("Quiz store lock poisoned: {}", e);
            AppError::InternalServerError("Quiz store unavailable".to_string())
        })?;

        let quiz = sessions.entry(user_id).or_default();
        let result = f(quiz);
        if matches!(quiz, Quiz::Idle) {
            sessions.remove(&user_id);
        }
        Ok(result)
    }

    /// Discards the user's session, if any.
    pub fn discard(&self, user_id: i64) -> Result<(), AppError> {
        self.with_quiz(user_id, Quiz::abort)
    }
}
