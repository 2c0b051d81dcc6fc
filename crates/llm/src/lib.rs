pub mod assistant;
pub mod client;
pub mod prompts;
pub mod provider;
pub mod providers;

pub use assistant::{AnalysisOutcome, AssistantError, DocumentAnalysis, LegalAnswer, LegalAssistant};
pub use client::CompletionClient;
pub use prompts::{PromptRequest, EXAMPLE_QUESTIONS, LEGAL_DISCLAIMER};
pub use provider::{CompletionRequest, ErrorKind, LlmError, LlmProvider, Message, Role};
pub use providers::openai::OpenAiProvider;
