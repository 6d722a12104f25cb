// src/handlers/auth.rs

use axum::{
    Extension, Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use serde_json::json;
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    config::Config,
    error::AppError,
    models::user::{AuthResponse, AuthStatus, CreateUserRequest, LoginRequest, User},
    state::AppState,
    utils::{
        hash::{hash_password, verify_password},
        jwt::{BearerToken, Claims, authenticate, sign_jwt},
    },
};

/// Registers a new user and logs them in.
///
/// Hashes the password using Argon2 before storing it.
/// Returns 201 Created with a bearer token.
pub async fn register(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let hashed_password = hash_password(&payload.password)?;

    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (username, email, password, created_at)
        VALUES (?, ?, ?, ?)
        RETURNING id, username, email, password, created_at
        "#,
    )
    .bind(&payload.username)
    .bind(&payload.email)
    .bind(&hashed_password)
    .bind(chrono::Utc::now())
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        if e.as_database_error().is_some_and(|db| db.is_unique_violation()) {
            AppError::Conflict(format!("Username '{}' already exists", payload.username))
        } else {
            tracing::error!("Failed to register user: {:?}", e);
            AppError::from(e)
        }
    })?;

    tracing::info!(user_id = user.id, "Registered user {}", user.username);

    let token = sign_jwt(user.id, &user.username, &config.jwt_secret, config.jwt_expiration)?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            username: user.username,
            token,
            token_type: "Bearer",
        }),
    ))
}

/// Authenticates a user and returns a JWT token.
pub async fn login(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, email, password, created_at
        FROM users
        WHERE username = ?
        "#,
    )
    .bind(&payload.username)
    .fetch_optional(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Login DB error: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    // Same message for unknown user and wrong password.
    let user = user.ok_or(AppError::AuthError("Invalid credentials".to_string()))?;

    if !verify_password(&payload.password, &user.password)? {
        return Err(AppError::AuthError("Invalid credentials".to_string()));
    }

    let token = sign_jwt(user.id, &user.username, &config.jwt_secret, config.jwt_expiration)?;

    Ok(Json(AuthResponse {
        username: user.username,
        token,
        token_type: "Bearer",
    }))
}

/// Reports whether the request carries a valid, non-revoked token.
/// Never fails with 401; unauthenticated callers get `authenticated: false`.
pub async fn check_auth(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    let status = match authenticate(&state, &headers) {
        Some((claims, _)) => AuthStatus {
            authenticated: true,
            username: Some(claims.name),
        },
        None => AuthStatus {
            authenticated: false,
            username: None,
        },
    };
    Json(status)
}

/// Revokes the caller's token and discards their quiz session.
pub async fn logout(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Extension(BearerToken(token)): Extension<BearerToken>,
) -> Result<impl IntoResponse, AppError> {
    state.revoked_tokens.revoke(&token, claims.exp as u64)?;
    state.quizzes.discard(claims.user_id()?)?;

    tracing::info!(user_id = %claims.sub, "User logged out");

    Ok(Json(json!({ "success": true })))
}
