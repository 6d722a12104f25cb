// src/handlers/flashcards.rs

use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;
use sqlx::{SqlitePool, types::Json as SqlJson};
use validator::Validate;

use crate::{
    error::AppError,
    generation::{GenerationError, Orchestrator, fallback::generate_fallback},
    models::flashcard::{GenerateRequest, GenerateResponse, SaveDeckRequest, SavedDeck},
    utils::{
        html::{sanitize_cards, strip_markup},
        jwt::Claims,
    },
};

/// Turns the caller's notes into flashcards.
///
/// Uses the AI backend when it is available and its reply parses, the
/// heuristic generator otherwise. Which path ran is only logged.
pub async fn generate_flashcards(
    State(generator): State<Orchestrator>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<GenerateRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let generated = generator.generate(&payload.notes, &claims.sub).await?;
    tracing::info!(
        user_id = %claims.sub,
        source = ?generated.source,
        count = generated.flashcards.len(),
        "Flashcards generated"
    );

    let mut flashcards = sanitize_cards(generated.flashcards);
    if flashcards.is_empty() {
        // Every card was markup. Retry the rules on the cleaned notes.
        let notes = strip_markup(&payload.notes);
        if notes.trim().is_empty() {
            return Err(GenerationError::EmptyNotes.into());
        }
        flashcards = sanitize_cards(generate_fallback(&notes));
    }

    Ok(Json(GenerateResponse { flashcards }))
}

/// Saves a deck of flashcards for the current user.
pub async fn save_flashcards(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<SaveDeckRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let user_id = claims.user_id()?;

    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO decks (user_id, notes, flashcards, created_at)
        VALUES (?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(user_id)
    .bind(&payload.notes)
    .bind(SqlJson(&payload.flashcards))
    .bind(chrono::Utc::now())
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to save deck: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    tracing::info!(user_id, deck_id = id, cards = payload.flashcards.len(), "Deck saved");

    Ok((StatusCode::CREATED, Json(json!({ "success": true, "id": id }))))
}

/// Lists the current user's saved decks, newest first.
pub async fn list_saved(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;

    let decks = sqlx::query_as::<_, SavedDeck>(
        r#"
        SELECT id, user_id, notes, flashcards, created_at
        FROM decks
        WHERE user_id = ?
        ORDER BY id DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to list decks: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok(Json(decks))
}
