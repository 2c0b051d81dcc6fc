use vidhi_core::Config;
use vidhi_llm::LegalAssistant;

/// Read-only after startup; each request runs its own pipeline.
pub struct AppState {
    pub assistant: LegalAssistant,
    pub config: Config,
}

impl AppState {
    pub fn new(assistant: LegalAssistant, config: Config) -> Self {
        Self { assistant, config }
    }
}
