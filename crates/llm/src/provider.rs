use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use vidhi_core::ApiKey;

/// A chat message for the LLM.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// Everything a provider needs for one completion call.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Completion backend. The only seam that touches the network.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send one chat completion request and return the assistant's response text.
    async fn complete(&self, api_key: &ApiKey, request: &CompletionRequest) -> Result<String, LlmError>;
}

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("completion service not configured: {0}")]
    NotConfigured(String),
    #[error("authentication failed ({status}): {body}")]
    Authentication { status: u16, body: String },
    #[error("model '{model}' is not available for this account: {body}")]
    ModelUnavailable { model: String, body: String },
    #[error("rate limit or quota exceeded: {body}")]
    RateLimited { body: String },
    #[error("request timed out after {0}s")]
    Timeout(u64),
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("completion service unavailable: {status} — {body}")]
    Service { status: u16, body: String },
    #[error("API error: {status} — {body}")]
    ApiError { status: u16, body: String },
    #[error("failed to parse response: {0}")]
    ParseError(String),
    #[error("completion service returned an empty answer")]
    EmptyCompletion,
}

/// Coarse grouping that decides what the user is told to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Configuration,
    Authentication,
    Input,
    ModelAccess,
    Transient,
    Other,
}

impl ErrorKind {
    pub fn remedy(&self) -> &'static str {
        match self {
            Self::Configuration => {
                "Set OPENAI_API_KEY or add openai_api_key under [general] in the secrets file, then restart."
            }
            Self::Authentication => {
                "The completion service rejected the API key. Check OPENAI_API_KEY or the secrets file, then restart."
            }
            Self::Input => "Check the input and try again.",
            Self::ModelAccess => {
                "Your account cannot use this model right now. Switch to the standard model or check your plan and quota."
            }
            Self::Transient => "The completion service did not respond. Try again in a moment.",
            Self::Other => "Unexpected response from the completion service.",
        }
    }
}

impl LlmError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotConfigured(_) => ErrorKind::Configuration,
            Self::Authentication { .. } => ErrorKind::Authentication,
            Self::ModelUnavailable { .. } | Self::RateLimited { .. } => ErrorKind::ModelAccess,
            Self::Timeout(_) | Self::HttpError(_) | Self::Service { .. } => ErrorKind::Transient,
            Self::ApiError { .. } | Self::ParseError(_) | Self::EmptyCompletion => ErrorKind::Other,
        }
    }
}
