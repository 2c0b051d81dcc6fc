use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;
use vidhi_core::ApiKey;

use crate::provider::{CompletionRequest, LlmError, LlmProvider, Role};

/// OpenAI-compatible `/v1/chat/completions` backend.
pub struct OpenAiProvider {
    client: reqwest::Client,
    base_url: String,
    timeout_secs: u64,
}

impl OpenAiProvider {
    pub fn new(base_url: String, timeout_secs: u64) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_secs,
        })
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    async fn complete(&self, api_key: &ApiKey, request: &CompletionRequest) -> Result<String, LlmError> {
        let url = format!("{}/v1/chat/completions", self.base_url);

        let api_messages: Vec<serde_json::Value> = request
            .messages
            .iter()
            .map(|m| {
                json!({
                    "role": match m.role {
                        Role::System => "system",
                        Role::User => "user",
                        Role::Assistant => "assistant",
                    },
                    "content": m.content,
                })
            })
            .collect();

        let body = json!({
            "model": request.model,
            "messages": api_messages,
            "temperature": request.temperature,
            "max_tokens": request.max_tokens,
        });

        debug!("OpenAI request to {} (model={})", url, request.model);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", api_key.expose()))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout(self.timeout_secs)
                } else {
                    LlmError::HttpError(e)
                }
            })?;

        let status = response.status().as_u16();
        if status != 200 {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(status, body, &request.model));
        }

        let resp: serde_json::Value = response
            .json()
            .await
            .map_err(|e| LlmError::ParseError(e.to_string()))?;
        let content = resp["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| LlmError::ParseError("missing choices[0].message.content".into()))?
            .trim()
            .to_string();

        if content.is_empty() {
            return Err(LlmError::EmptyCompletion);
        }

        Ok(content)
    }
}

/// Map a non-200 response onto the error the caller can act on.
pub(crate) fn classify_status(status: u16, body: String, model: &str) -> LlmError {
    if body.contains("model_not_found") {
        return LlmError::ModelUnavailable {
            model: model.to_string(),
            body,
        };
    }
    match status {
        401 => LlmError::Authentication { status, body },
        403 | 404 => LlmError::ModelUnavailable {
            model: model.to_string(),
            body,
        },
        429 => LlmError::RateLimited { body },
        500..=599 => LlmError::Service { status, body },
        _ => LlmError::ApiError { status, body },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::Message;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request(model: &str) -> CompletionRequest {
        CompletionRequest {
            model: model.to_string(),
            messages: vec![
                Message { role: Role::System, content: "You are helpful.".into() },
                Message { role: Role::User, content: "Hello".into() },
            ],
            temperature: 0.3,
            max_tokens: 100,
        }
    }

    #[test]
    fn classify_known_statuses() {
        assert!(matches!(
            classify_status(401, "bad key".into(), "gpt-4"),
            LlmError::Authentication { status: 401, .. }
        ));
        assert!(matches!(
            classify_status(404, String::new(), "gpt-4"),
            LlmError::ModelUnavailable { ref model, .. } if model == "gpt-4"
        ));
        assert!(matches!(
            classify_status(400, r#"{"error":{"code":"model_not_found"}}"#.into(), "gpt-5"),
            LlmError::ModelUnavailable { .. }
        ));
        assert!(matches!(
            classify_status(429, "insufficient_quota".into(), "gpt-4"),
            LlmError::RateLimited { .. }
        ));
        assert!(matches!(
            classify_status(502, String::new(), "gpt-4"),
            LlmError::Service { status: 502, .. }
        ));
        assert!(matches!(
            classify_status(400, "bad request".into(), "gpt-4"),
            LlmError::ApiError { status: 400, .. }
        ));
    }

    #[tokio::test]
    async fn sends_chat_completion_and_returns_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("Authorization", "Bearer sk-test"))
            .and(body_partial_json(json!({ "model": "gpt-3.5-turbo", "max_tokens": 100 })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{ "message": { "role": "assistant", "content": "  Namaste.  " } }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = OpenAiProvider::new(server.uri(), 5).unwrap();
        let text = provider
            .complete(&ApiKey::new("sk-test"), &request("gpt-3.5-turbo"))
            .await
            .unwrap();
        assert_eq!(text, "Namaste.");
    }

    #[tokio::test]
    async fn entitlement_failure_is_model_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(404).set_body_string(
                r#"{"error":{"message":"The model `gpt-4` does not exist or you do not have access to it.","code":"model_not_found"}}"#,
            ))
            .mount(&server)
            .await;

        let provider = OpenAiProvider::new(server.uri(), 5).unwrap();
        let err = provider
            .complete(&ApiKey::new("sk-test"), &request("gpt-4"))
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::ModelUnavailable { ref model, .. } if model == "gpt-4"));
    }

    #[tokio::test]
    async fn quota_exceeded_is_rate_limited() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("insufficient_quota"))
            .mount(&server)
            .await;

        let provider = OpenAiProvider::new(server.uri(), 5).unwrap();
        let err = provider
            .complete(&ApiKey::new("sk-test"), &request("gpt-3.5-turbo"))
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::RateLimited { .. }));
    }

    #[tokio::test]
    async fn empty_content_is_not_a_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{ "message": { "role": "assistant", "content": "" } }]
            })))
            .mount(&server)
            .await;

        let provider = OpenAiProvider::new(server.uri(), 5).unwrap();
        let err = provider
            .complete(&ApiKey::new("sk-test"), &request("gpt-3.5-turbo"))
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::EmptyCompletion));
    }

    #[tokio::test]
    async fn slow_service_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_delay(Duration::from_secs(3))
                    .set_body_json(json!({ "choices": [] })),
            )
            .mount(&server)
            .await;

        let provider = OpenAiProvider::new(server.uri(), 1).unwrap();
        let err = provider
            .complete(&ApiKey::new("sk-test"), &request("gpt-3.5-turbo"))
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::Timeout(1)));
    }
}
