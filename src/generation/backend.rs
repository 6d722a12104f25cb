// src/generation/backend.rs

use std::{fmt, time::Duration};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::Config;

/// Failure of the text generation backend.
/// Never surfaced to users; the orchestrator falls back instead.
#[derive(Debug)]
pub enum BackendError {
    /// No API token configured, the AI path is switched off.
    Disabled,
    /// Bad endpoint or client setup.
    Config(String),
    /// Connection, timeout or body read failure.
    Transport(String),
    /// Non-success HTTP status from the backend.
    Status(u16, String),
    /// The reply body was not in a recognised shape.
    Decode(String),
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::Disabled => write!(f, "generation backend disabled"),
            BackendError::Config(msg) => write!(f, "backend configuration error: {}", msg),
            BackendError::Transport(msg) => write!(f, "backend transport error: {}", msg),
            BackendError::Status(code, msg) => write!(f, "backend returned {}: {}", code, msg),
            BackendError::Decode(msg) => write!(f, "backend reply could not be decoded: {}", msg),
        }
    }
}

impl std::error::Error for BackendError {}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            BackendError::Decode(err.to_string())
        } else {
            BackendError::Transport(err.to_string())
        }
    }
}

/// Anything that can turn a prompt into generated text.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    async fn generate(&self, prompt: &str) -> Result<String, BackendError>;
}

/// Backend used when no API token is configured. Every call fails, so every
/// request is served by the heuristic generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledBackend;

#[async_trait]
impl GenerationBackend for DisabledBackend {
    fn name(&self) -> &'static str {
        "disabled"
    }

    async fn generate(&self, _prompt: &str) -> Result<String, BackendError> {
        Err(BackendError::Disabled)
    }
}

/// Sampling bounds sent with every request.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct GenerationParams {
    pub max_new_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    /// The reply must not echo the prompt, or the parser would read the
    /// format example as cards.
    pub return_full_text: bool,
}

impl GenerationParams {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_new_tokens: config.ai_max_new_tokens,
            temperature: config.ai_temperature,
            top_p: config.ai_top_p,
            return_full_text: false,
        }
    }
}

#[derive(Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    parameters: GenerationParams,
}

#[derive(Deserialize)]
struct GeneratedText {
    generated_text: String,
}

/// The inference API answers with a list for text generation models, but
/// some deployments return a bare object.
#[derive(Deserialize)]
#[serde(untagged)]
enum InferenceResponse {
    Batch(Vec<GeneratedText>),
    Single(GeneratedText),
}

/// Text generation through the Hugging Face inference API.
pub struct HuggingFaceBackend {
    client: reqwest::Client,
    endpoint: Url,
    token: String,
    params: GenerationParams,
}

impl HuggingFaceBackend {
    /// Builds the client. The request timeout bounds every call; when it
    /// fires the call fails like any other transport error.
    pub fn new(
        base_url: &str,
        model: &str,
        token: impl Into<String>,
        params: GenerationParams,
        timeout: Duration,
    ) -> Result<Self, BackendError> {
        let mut base = base_url.to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let endpoint = Url::parse(&base)
            .and_then(|url| url.join(model))
            .map_err(|e| BackendError::Config(e.to_string()))?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError::Config(e.to_string()))?;

        Ok(Self {
            client,
            endpoint,
            token: token.into(),
            params,
        })
    }

    pub fn from_config(config: &Config, token: &str) -> Result<Self, BackendError> {
        Self::new(
            &config.hf_api_url,
            &config.hf_model,
            token,
            GenerationParams::from_config(config),
            Duration::from_secs(config.ai_timeout_secs),
        )
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl GenerationBackend for HuggingFaceBackend {
    fn name(&self) -> &'static str {
        "huggingface"
    }

    async fn generate(&self, prompt: &str) -> Result<String, BackendError> {
        let request = InferenceRequest {
            inputs: prompt,
            parameters: self.params,
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.token)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("Could not read error body: {}", e));
            return Err(BackendError::Status(status.as_u16(), body));
        }

        let body = response.text().await?;
        let reply: InferenceResponse =
            serde_json::from_str(&body).map_err(|e| BackendError::Decode(e.to_string()))?;

        match reply {
            InferenceResponse::Single(generated) => Ok(generated.generated_text),
            InferenceResponse::Batch(batch) => batch
                .into_iter()
                .next()
                .map(|generated| generated.generated_text)
                .ok_or_else(|| BackendError::Decode("empty generation list".to_string())),
        }
    }
}
