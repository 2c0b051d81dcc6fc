//! Document analysis and legal Q&A pipelines.
//!
//! Each call runs one sequential pipeline and makes at most one completion
//! request. Nothing is kept between calls.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;
use vidhi_core::config::{DocumentConfig, LlmConfig};
use vidhi_core::credentials::resolve_api_key;
use vidhi_core::{Config, ModelChoice};
use vidhi_ingest::{detect_clauses, extract_text, ClauseMatch, ExtractionError, UploadedDocument};

use crate::client::CompletionClient;
use crate::prompts::{question_prompt, summary_prompt, LEGAL_DISCLAIMER};
use crate::provider::{ErrorKind, LlmError};
use crate::providers::create_provider;

#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    #[error("could not read this file: {0}")]
    Extraction(#[from] ExtractionError),
    #[error("question is empty")]
    EmptyQuestion,
    #[error(transparent)]
    Completion(#[from] LlmError),
}

impl AssistantError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Extraction(_) | Self::EmptyQuestion => ErrorKind::Input,
            Self::Completion(e) => e.kind(),
        }
    }

    pub fn remedy(&self) -> &'static str {
        match self {
            Self::Extraction(ExtractionError::UnsupportedType(_)) => "Upload a PDF document.",
            Self::Extraction(ExtractionError::Encrypted) => {
                "Remove the password protection and upload the file again."
            }
            Self::Extraction(_) => "The file could not be read as a PDF. Check that it is not damaged.",
            Self::EmptyQuestion => "Type a question about Indian law.",
            Self::Completion(e) => e.kind().remedy(),
        }
    }
}

/// Summary, clause list and raw text for one uploaded document.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentAnalysis {
    pub request_id: Uuid,
    pub filename: String,
    pub model: String,
    pub summary: String,
    pub clauses: Vec<ClauseMatch>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub raw_text: String,
    pub page_count: usize,
    pub char_count: usize,
    /// The text sent to the model was cut to the configured length.
    pub truncated: bool,
    pub analyzed_at: DateTime<Utc>,
}

impl DocumentAnalysis {
    /// Plain-text report: summary, detected clauses, optional raw text, disclaimer.
    pub fn render_report(&self, include_text: bool) -> String {
        let mut out = String::new();
        out.push_str(&format!("Document: {} ({} pages, {} characters)\n", self.filename, self.page_count, self.char_count));
        if self.truncated {
            out.push_str("Note: only the beginning of the document was sent for summarisation.\n");
        }
        out.push_str("\nSummary\n-------\n");
        out.push_str(self.summary.trim());
        out.push_str("\n\nDetected clauses\n----------------\n");
        if self.clauses.is_empty() {
            out.push_str("None of the common clause types were found.\n");
        } else {
            for clause in &self.clauses {
                out.push_str(&format!("- {} ({})\n", clause.label(), clause.matched_keywords.join(", ")));
            }
        }
        if include_text {
            out.push_str("\nExtracted text\n--------------\n");
            out.push_str(&self.raw_text);
            out.push('\n');
        }
        out.push('\n');
        out.push_str(LEGAL_DISCLAIMER);
        out
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AnalysisOutcome {
    /// The PDF opened but has no text layer; no completion call was made.
    NoText { filename: String, page_count: usize },
    /// Too little text to summarise; clauses were still scanned, no completion call.
    SparseText {
        filename: String,
        page_count: usize,
        char_count: usize,
        clauses: Vec<ClauseMatch>,
        #[serde(skip_serializing_if = "String::is_empty")]
        raw_text: String,
    },
    Analyzed(DocumentAnalysis),
}

/// A generated answer with the static disclaimer kept separate.
#[derive(Debug, Clone, Serialize)]
pub struct LegalAnswer {
    pub request_id: Uuid,
    pub question: String,
    pub model: String,
    pub answer: String,
    pub disclaimer: &'static str,
}

impl LegalAnswer {
    pub fn render(&self) -> String {
        format!("{}\n\n{}", self.answer.trim(), self.disclaimer)
    }
}

pub struct LegalAssistant {
    client: CompletionClient,
    llm: LlmConfig,
    documents: DocumentConfig,
}

impl LegalAssistant {
    pub fn new(client: CompletionClient, llm: LlmConfig, documents: DocumentConfig) -> Self {
        Self {
            client,
            llm,
            documents,
        }
    }

    /// Build from config: creates the provider and resolves the credential once.
    pub fn from_config(config: &Config) -> Result<Self, LlmError> {
        let provider = create_provider(&config.llm)?;
        let credential = resolve_api_key(&config.profile, &config.secrets_file);
        let client = CompletionClient::new(provider, credential, config.llm.temperature);
        Ok(Self::new(client, config.llm.clone(), config.documents.clone()))
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_configured()
    }

    pub fn llm_config(&self) -> &LlmConfig {
        &self.llm
    }

    pub fn document_config(&self) -> &DocumentConfig {
        &self.documents
    }

    /// Extract → detect clauses → summarise.
    pub async fn analyze_document(
        &self,
        upload: &UploadedDocument,
        model: &ModelChoice,
    ) -> Result<AnalysisOutcome, AssistantError> {
        let request_id = Uuid::new_v4();
        info!(%request_id, filename = %upload.filename, bytes = upload.bytes.len(), "Analyzing document");

        let doc = extract_text(&upload.bytes, &upload.filename)?;
        if doc.is_empty() {
            info!(%request_id, page_count = doc.page_count, "No extractable text; skipping completion call");
            return Ok(AnalysisOutcome::NoText {
                filename: doc.filename,
                page_count: doc.page_count,
            });
        }

        let raw_text = doc.full_text();
        let char_count = doc.total_chars();
        let clauses = detect_clauses(&raw_text);
        info!(%request_id, detected = clauses.len(), "Clause detection complete");

        if doc.is_sparse(self.documents.sparse_text_threshold) {
            warn!(%request_id, char_count, "Very little text extracted; skipping completion call");
            return Ok(AnalysisOutcome::SparseText {
                filename: doc.filename,
                page_count: doc.page_count,
                char_count,
                clauses,
                raw_text,
            });
        }

        let (prompt, truncated) = summary_prompt(
            &raw_text,
            self.documents.max_document_chars,
            self.llm.summary_max_tokens,
        );
        if truncated {
            info!(%request_id, char_count, limit = self.documents.max_document_chars, "Document text truncated for prompt");
        }

        let model_id = model.resolve(&self.llm).to_string();
        let summary = self.client.send(&prompt, &model_id).await?;

        Ok(AnalysisOutcome::Analyzed(DocumentAnalysis {
            request_id,
            filename: doc.filename,
            model: model_id,
            summary,
            clauses,
            raw_text,
            page_count: doc.page_count,
            char_count,
            truncated,
            analyzed_at: Utc::now(),
        }))
    }

    /// Answer a free-text question with the Indian-law framing.
    pub async fn answer_question(
        &self,
        question: &str,
        model: &ModelChoice,
    ) -> Result<LegalAnswer, AssistantError> {
        if question.trim().is_empty() {
            return Err(AssistantError::EmptyQuestion);
        }
        let request_id = Uuid::new_v4();
        let model_id = model.resolve(&self.llm).to_string();
        info!(%request_id, model = %model_id, question_chars = question.len(), "Answering question");

        let prompt = question_prompt(question, self.llm.answer_max_tokens);
        let answer = self.client.send(&prompt, &model_id).await?;

        Ok(LegalAnswer {
            request_id,
            question: question.to_string(),
            model: model_id,
            answer,
            disclaimer: LEGAL_DISCLAIMER,
        })
    }
}
