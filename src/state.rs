use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use crate::{
    config::Config,
    error::AppError,
    generation::{GenerationBackend, Orchestrator},
    quiz::QuizStore,
    utils::jwt::{EXPIRY_LEEWAY_SECS, unix_now},
};
use axum::extract::FromRef;
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Config,
    pub generator: Orchestrator,
    pub quizzes: QuizStore,
    pub revoked_tokens: RevokedTokens,
}

impl AppState {
    pub fn new(pool: SqlitePool, config: Config, backend: Arc<dyn GenerationBackend>) -> Self {
        Self {
            pool,
            config,
            generator: Orchestrator::new(backend),
            quizzes: QuizStore::new(),
            revoked_tokens: RevokedTokens::default(),
        }
    }
}

/// Bearer tokens invalidated by logout, with their `exp` claim.
///
/// An entry is kept only while the token could still pass verification,
/// so the list never outgrows the set of live tokens.
#[derive(Clone, Default)]
pub struct RevokedTokens {
    tokens: Arc<RwLock<HashMap<String, u64>>>,
}

impl RevokedTokens {
    /// A poisoned lock counts as revoked.
    pub fn contains(&self, token: &str) -> bool {
        self.tokens
            .read()
            .map(|tokens| tokens.contains_key(token))
            .unwrap_or(true)
    }

    pub fn revoke(&self, token: &str, expires_at: u64) -> Result<(), AppError> {
        self.revoke_at(token, expires_at, unix_now()?)
    }

    /// Records `token` and drops entries that expired before `now`.
    fn revoke_at(&self, token: &str, expires_at: u64, now: u64) -> Result<(), AppError> {
        let mut tokens = self.tokens.write().map_err(|e| {
            tracing::error!("Revoked token list lock poisoned: {}", e);
            AppError::InternalServerError("Logout unavailable".to_string())
        })?;
        tokens.retain(|_, exp| *exp + EXPIRY_LEEWAY_SECS >= now);
        if expires_at + EXPIRY_LEEWAY_SECS >= now {
            tokens.insert(token.to_owned(), expires_at);
        }
        Ok(())
    }
}

impl FromRef<AppState> for SqlitePool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for Orchestrator {
    fn from_ref(state: &AppState) -> Self {
        state.generator.clone()
    }
}

impl FromRef<AppState> for QuizStore {
    fn from_ref(state: &AppState) -> Self {
        state.quizzes.clone()
    }
}
