// src/config.rs

use std::{env, str::FromStr};
use dotenvy::dotenv;

pub const DEFAULT_HF_API_URL: &str = "https://api-inference.huggingface.co/models/";
pub const DEFAULT_HF_MODEL: &str = "mistralai/Mistral-7B-Instruct-v0.2";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    /// Token lifetime in seconds.
    pub jwt_expiration: u64,
    pub rust_log: String,
    pub port: u16,

    /// Hugging Face API token. Without it every request uses the fallback generator.
    pub hf_api_token: Option<String>,
    pub hf_api_url: String,
    pub hf_model: String,
    pub ai_max_new_tokens: u32,
    pub ai_temperature: f32,
    pub ai_top_p: f32,
    pub ai_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://flashcards.db?mode=rwc".to_string());

        let jwt_secret = env::var("JWT_SECRET")
            .expect("JWT_SECRET must be set");

        let rust_log = env::var("RUST_LOG")
            .unwrap_or_else(|_| "info".to_string());

        let hf_api_token = env::var("HUGGING_FACE_API")
            .ok()
            .filter(|token| !token.trim().is_empty());

        Self {
            database_url,
            jwt_secret,
            jwt_expiration: parse_or("JWT_EXPIRATION", 86_400),
            rust_log,
            port: parse_or("PORT", 3000),
            hf_api_token,
            hf_api_url: env::var("HF_API_URL").unwrap_or_else(|_| DEFAULT_HF_API_URL.to_string()),
            hf_model: env::var("HF_MODEL").unwrap_or_else(|_| DEFAULT_HF_MODEL.to_string()),
            ai_max_new_tokens: parse_or("AI_MAX_NEW_TOKENS", 800),
            ai_temperature: parse_or("AI_TEMPERATURE", 0.7),
            ai_top_p: parse_or("AI_TOP_P", 0.95),
            ai_timeout_secs: parse_or("AI_TIMEOUT_SECS", 30),
        }
    }
}

/// Reads a numeric variable, keeping `default` when unset.
/// A set but unparseable value is a startup error.
fn parse_or<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|_| panic!("{} must be a valid number, got '{}'", key, raw)),
        Err(_) => default,
    }
}
