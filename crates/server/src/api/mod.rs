//! HTTP endpoints for document analysis and legal Q&A.
//!
//! Shared error envelope lives here; each sub-module owns one route group.

mod analyze;
mod ask;
mod health;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::warn;

use vidhi_ingest::ExtractionError;
use vidhi_llm::{AssistantError, ErrorKind, LlmError};

// ── Shared types ─────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: ErrorKind,
    pub remedy: &'static str,
}

/// Error returned from any handler: a status plus the JSON envelope.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorResponse,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: ErrorResponse {
                error: message.into(),
                kind: ErrorKind::Input,
                remedy: ErrorKind::Input.remedy(),
            },
        }
    }

    pub fn with_status(status: StatusCode, message: impl Into<String>) -> Self {
        let kind = ErrorKind::Input;
        Self {
            status,
            body: ErrorResponse {
                error: message.into(),
                kind,
                remedy: kind.remedy(),
            },
        }
    }
}

fn status_for(err: &AssistantError) -> StatusCode {
    match err {
        AssistantError::Extraction(ExtractionError::UnsupportedType(_)) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        AssistantError::Extraction(_) => StatusCode::UNPROCESSABLE_ENTITY,
        AssistantError::EmptyQuestion => StatusCode::BAD_REQUEST,
        AssistantError::Completion(e) => match e {
            LlmError::NotConfigured(_) => StatusCode::SERVICE_UNAVAILABLE,
            LlmError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            LlmError::Authentication { .. } | LlmError::ModelUnavailable { .. } => StatusCode::FORBIDDEN,
            LlmError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::BAD_GATEWAY,
        },
    }
}

impl From<AssistantError> for ApiError {
    fn from(err: AssistantError) -> Self {
        let status = status_for(&err);
        if status.is_server_error() {
            warn!(status = status.as_u16(), "Request failed: {err}");
        }
        Self {
            status,
            body: ErrorResponse {
                error: err.to_string(),
                kind: err.kind(),
                remedy: err.remedy(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

// ── Re-exports ───────────────────────────────────────────────────

pub use analyze::analyze;
pub use ask::ask;
pub use health::{examples, health, models};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        let cases = [
            (AssistantError::from(ExtractionError::UnsupportedType("docx".into())), 415),
            (AssistantError::from(ExtractionError::Encrypted), 422),
            (AssistantError::EmptyQuestion, 400),
            (AssistantError::from(LlmError::NotConfigured("missing".into())), 503),
            (AssistantError::from(LlmError::RateLimited { body: String::new() }), 429),
            (
                AssistantError::from(LlmError::ModelUnavailable { model: "gpt-4".into(), body: String::new() }),
                403,
            ),
            (AssistantError::from(LlmError::Authentication { status: 401, body: String::new() }), 403),
            (AssistantError::from(LlmError::Timeout(60)), 504),
            (AssistantError::from(LlmError::Service { status: 503, body: String::new() }), 502),
            (AssistantError::from(LlmError::EmptyCompletion), 502),
        ];
        for (err, expected) in cases {
            assert_eq!(status_for(&err).as_u16(), expected, "{err}");
        }
    }

    #[test]
    fn envelope_carries_kind_and_remedy() {
        let api = ApiError::from(AssistantError::from(LlmError::NotConfigured("missing".into())));
        let json = serde_json::to_value(&api.body).unwrap();
        assert_eq!(json["kind"], "configuration");
        assert!(json["remedy"].as_str().unwrap().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn rejected_key_points_at_the_key() {
        let api = ApiError::from(AssistantError::from(LlmError::Authentication {
            status: 401,
            body: "invalid_api_key".into(),
        }));
        let json = serde_json::to_value(&api.body).unwrap();
        assert_eq!(json["kind"], "authentication");
        assert!(json["remedy"].as_str().unwrap().contains("API key"));
    }
}
