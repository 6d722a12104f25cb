// src/handlers/quiz.rs

use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use validator::Validate;

use crate::{
    error::AppError,
    models::quiz::{GradeRequest, QuizView, StartQuizRequest},
    quiz::{QuizStore, session::QuizError},
    utils::jwt::Claims,
};

/// Starts (or restarts) the caller's quiz over the given cards.
/// Returns the first question.
pub async fn start_quiz(
    State(quizzes): State<QuizStore>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<StartQuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let user_id = claims.user_id()?;
    let view = quizzes.with_quiz(user_id, |quiz| -> Result<QuizView, QuizError> {
        quiz.start(payload.flashcards, &mut rand::thread_rng())?;
        Ok(QuizView::from(&*quiz))
    })??;

    tracing::info!(user_id, total = view.total, "Quiz started");
    Ok(Json(view))
}

/// Current public state of the caller's quiz.
pub async fn current_quiz(
    State(quizzes): State<QuizStore>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let view = quizzes.with_quiz(claims.user_id()?, |quiz| QuizView::from(&*quiz))?;
    Ok(Json(view))
}

/// Reveals the answer to the current question.
pub async fn show_answer(
    State(quizzes): State<QuizStore>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let view = quizzes.with_quiz(claims.user_id()?, |quiz| -> Result<QuizView, QuizError> {
        quiz.show_answer()?;
        Ok(QuizView::from(&*quiz))
    })??;
    Ok(Json(view))
}

/// Records the caller's own verdict on the revealed card.
pub async fn grade_answer(
    State(quizzes): State<QuizStore>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<GradeRequest>,
) -> Result<impl IntoResponse, AppError> {
    let view = quizzes.with_quiz(claims.user_id()?, |quiz| -> Result<QuizView, QuizError> {
        quiz.grade(payload.verdict)?;
        Ok(QuizView::from(&*quiz))
    })??;
    Ok(Json(view))
}

/// Final score, percentage and the cards to review. Only after the last grade.
pub async fn quiz_results(
    State(quizzes): State<QuizStore>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let results = quizzes.with_quiz(claims.user_id()?, |quiz| quiz.results())??;
    Ok(Json(results))
}

/// Runs the same cards again in a new order.
pub async fn retake_quiz(
    State(quizzes): State<QuizStore>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let view = quizzes.with_quiz(claims.user_id()?, |quiz| -> Result<QuizView, QuizError> {
        quiz.retake(&mut rand::thread_rng())?;
        Ok(QuizView::from(&*quiz))
    })??;
    Ok(Json(view))
}

/// Exits the quiz, discarding it in whatever state it was.
pub async fn abort_quiz(
    State(quizzes): State<QuizStore>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    quizzes.discard(claims.user_id()?)?;
    Ok(StatusCode::NO_CONTENT)
}
