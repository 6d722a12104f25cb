// src/utils/jwt.rs

use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request, StatusCode, header},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{error::AppError, state::AppState};

/// JWT Claims structure.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Claims {
    /// Subject - Stores the User ID (as string).
    pub sub: String,
    /// Username, echoed back by the auth check.
    pub name: String,
    /// Expiration time as Unix timestamp.
    pub exp: usize,
}

impl Claims {
    /// Numeric user id from the `sub` claim.
    pub fn user_id(&self) -> Result<i64, AppError> {
        self.sub
            .parse::<i64>()
            .map_err(|_| AppError::AuthError("Invalid token subject".to_string()))
    }
}

/// Seconds past `exp` during which a token is still accepted.
pub const EXPIRY_LEEWAY_SECS: u64 = 60;

/// Current Unix time in seconds.
pub fn unix_now() -> Result<u64, AppError> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .map_err(|e| AppError::InternalServerError(e.to_string()))
}

/// The raw bearer token of an authenticated request, kept for logout.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

/// Signs a new JWT for the user.
pub fn sign_jwt(
    id: i64,
    username: &str,
    secret: &str,
    expiration_seconds: u64,
) -> Result<String, AppError> {
    // Calculate expiration: current time + expiration_seconds
    let expiration = (unix_now()? + expiration_seconds) as usize;

    let claims = Claims {
        sub: id.to_string(),
        name: username.to_owned(),
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalServerError(e.to_string()))
}

/// Verifies and decodes a JWT string.
///
/// Returns the `Claims` if valid, otherwise returns an `AppError`.
pub fn verify_jwt(token: &str, secret: &str) -> Result<Claims, AppError> {
    let mut validation = Validation::default();
    validation.leeway = EXPIRY_LEEWAY_SECS;
    let token_data = decode(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
    .map_err(|_| AppError::AuthError("Invalid token".to_string()))?;

    Ok(token_data.claims)
}

/// Extracts `<token>` from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Validates a bearer token against the secret and the logout list.
pub fn authenticate(state: &AppState, headers: &HeaderMap) -> Option<(Claims, String)> {
    let token = bearer_token(headers)?;
    if state.revoked_tokens.contains(token) {
        return None;
    }
    let claims = verify_jwt(token, &state.config.jwt_secret).ok()?;
    Some((claims, token.to_owned()))
}

/// Axum Middleware: Authentication.
///
/// Intercepts requests, validates the 'Authorization: Bearer <token>' header.
/// If valid, injects `Claims` and the raw token into the request extensions.
/// If invalid or logged out, returns 401 Unauthorized.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    match authenticate(&state, req.headers()) {
        Some((claims, token)) => {
            req.extensions_mut().insert(claims);
            req.extensions_mut().insert(BearerToken(token));
            Ok(next.run(req).await)
        }
        None => Err(StatusCode::UNAUTHORIZED),
    }
}
