use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};
use vidhi_core::{ApiKey, ConfigError, ResolvedCredential};

use crate::prompts::PromptRequest;
use crate::provider::{CompletionRequest, LlmError, LlmProvider};

/// Sends rendered prompts to the completion service.
///
/// The credential is resolved once, before the first request. Without it
/// every call fails with `NotConfigured` and the provider is never invoked.
/// One `send` is one network call: no retry, no caching. Calls are billed
/// externally and no budget is enforced here.
pub struct CompletionClient {
    provider: Arc<dyn LlmProvider>,
    credential: Result<ApiKey, String>,
    temperature: f32,
}

impl CompletionClient {
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        credential: Result<ResolvedCredential, ConfigError>,
        temperature: f32,
    ) -> Self {
        let credential = match credential {
            Ok(resolved) => {
                info!(source = %resolved.source, "Completion service credential loaded");
                Ok(resolved.key)
            }
            Err(e) => {
                warn!("{e}");
                Err(e.to_string())
            }
        };
        Self {
            provider,
            credential,
            temperature,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.credential.is_ok()
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    pub async fn send(&self, prompt: &PromptRequest, model: &str) -> Result<String, LlmError> {
        let api_key = self
            .credential
            .as_ref()
            .map_err(|reason| LlmError::NotConfigured(reason.clone()))?;

        let request = CompletionRequest {
            model: model.to_string(),
            messages: prompt.messages(),
            temperature: self.temperature,
            max_tokens: prompt.max_tokens,
        };

        debug!(
            model,
            prompt_chars = prompt.system.len() + prompt.user.len(),
            "Sending billable completion request"
        );
        let start = Instant::now();
        let result = self.provider.complete(api_key, &request).await;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        match &result {
            Ok(text) => info!(model, elapsed_ms, answer_chars = text.len(), "Completion received"),
            Err(e) => warn!(model, elapsed_ms, kind = ?e.kind(), "Completion failed: {e}"),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use vidhi_core::CredentialSource;

    use crate::prompts::question_prompt;

    #[derive(Default)]
    struct RecordingProvider {
        calls: AtomicUsize,
        last: Mutex<Option<(String, CompletionRequest)>>,
    }

    #[async_trait]
    impl LlmProvider for RecordingProvider {
        async fn complete(&self, api_key: &ApiKey, request: &CompletionRequest) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last.lock().unwrap() = Some((api_key.expose().to_string(), request.clone()));
            Ok("answer".into())
        }
    }

    fn credential() -> Result<ResolvedCredential, ConfigError> {
        Ok(ResolvedCredential {
            key: ApiKey::new("sk-test"),
            source: CredentialSource::Environment("OPENAI_API_KEY".into()),
        })
    }

    #[tokio::test]
    async fn forwards_prompt_model_and_temperature() {
        let provider = Arc::new(RecordingProvider::default());
        let client = CompletionClient::new(provider.clone(), credential(), 0.3);

        let prompt = question_prompt("Is stamp duty payable on a rent agreement?", 1000);
        let text = client.send(&prompt, "gpt-3.5-turbo").await.unwrap();
        assert_eq!(text, "answer");

        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
        let (key, request) = provider.last.lock().unwrap().clone().unwrap();
        assert_eq!(key, "sk-test");
        assert_eq!(request.model, "gpt-3.5-turbo");
        assert_eq!(request.max_tokens, 1000);
        assert!((request.temperature - 0.3).abs() < f32::EPSILON);
        assert_eq!(request.messages, prompt.messages());
    }

    #[tokio::test]
    async fn missing_credential_never_reaches_provider() {
        let provider = Arc::new(RecordingProvider::default());
        let missing = Err(ConfigError::CredentialNotFound {
            env_var: "OPENAI_API_KEY".into(),
            secrets_path: PathBuf::from(".vidhi/secrets.toml"),
        });
        let client = CompletionClient::new(provider.clone(), missing, 0.3);
        assert!(!client.is_configured());

        let err = client
            .send(&question_prompt("anything", 1000), "gpt-3.5-turbo")
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::NotConfigured(ref m) if m.contains("OPENAI_API_KEY")));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }
}
