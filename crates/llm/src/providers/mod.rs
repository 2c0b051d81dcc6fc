pub mod openai;

use std::sync::Arc;

use vidhi_core::config::LlmConfig;

use crate::provider::{LlmError, LlmProvider};

/// Create the completion provider described by config.
pub fn create_provider(llm_config: &LlmConfig) -> Result<Arc<dyn LlmProvider>, LlmError> {
    let provider = openai::OpenAiProvider::new(
        llm_config.base_url.clone(),
        llm_config.request_timeout_secs,
    )?;
    Ok(Arc::new(provider))
}
