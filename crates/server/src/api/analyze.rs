use std::sync::Arc;

use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use vidhi_core::ModelChoice;
use vidhi_ingest::{ClauseMatch, UploadedDocument};
use vidhi_llm::{AnalysisOutcome, DocumentAnalysis, LEGAL_DISCLAIMER};

use super::ApiError;
use crate::state::AppState;

const NO_TEXT_MESSAGE: &str = "No text found in the PDF. Scanned documents are not supported.";
const SPARSE_TEXT_MESSAGE: &str =
    "Very little text was extracted. The document might be scanned or have formatting issues.";

#[derive(Debug, Deserialize)]
pub struct AnalyzeParams {
    #[serde(default)]
    pub model: Option<ModelChoice>,
    #[serde(default)]
    pub include_text: bool,
}

#[derive(Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AnalyzeResponse {
    NoText {
        filename: String,
        page_count: usize,
        message: &'static str,
    },
    SparseText {
        filename: String,
        page_count: usize,
        char_count: usize,
        clauses: Vec<ClauseMatch>,
        #[serde(skip_serializing_if = "Option::is_none")]
        raw_text: Option<String>,
        message: &'static str,
    },
    Analyzed {
        #[serde(flatten)]
        analysis: DocumentAnalysis,
        report: String,
        disclaimer: &'static str,
    },
}

fn multipart_error(err: MultipartError) -> ApiError {
    ApiError::with_status(err.status(), format!("Multipart error: {}", err.body_text()))
}

/// Pull the single uploaded file out of the form.
///
/// Non-file text fields are ignored; a second file is rejected.
async fn read_upload(multipart: &mut Multipart) -> Result<UploadedDocument, ApiError> {
    let mut upload: Option<UploadedDocument> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let filename = match (field.file_name(), field.name()) {
            (Some(name), _) => name.to_string(),
            (None, Some("file")) => "upload.pdf".to_string(),
            _ => continue,
        };
        if upload.is_some() {
            return Err(ApiError::bad_request("Upload one PDF at a time"));
        }
        let bytes = field.bytes().await.map_err(multipart_error)?;
        upload = Some(UploadedDocument::new(filename, bytes.to_vec()));
    }

    upload.ok_or_else(|| ApiError::bad_request("No file provided"))
}

/// POST /api/analyze
///
/// Multipart upload of one PDF. Returns the summary, detected clauses and,
/// with `include_text=true`, the extracted text.
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AnalyzeParams>,
    mut multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let upload = read_upload(&mut multipart).await?;
    let model = params.model.unwrap_or_default();
    info!(filename = %upload.filename, bytes = upload.bytes.len(), %model, "Analyze request");

    let outcome = state.assistant.analyze_document(&upload, &model).await?;
    let response = match outcome {
        AnalysisOutcome::NoText { filename, page_count } => AnalyzeResponse::NoText {
            filename,
            page_count,
            message: NO_TEXT_MESSAGE,
        },
        AnalysisOutcome::SparseText {
            filename,
            page_count,
            char_count,
            clauses,
            raw_text,
        } => AnalyzeResponse::SparseText {
            filename,
            page_count,
            char_count,
            clauses,
            raw_text: params.include_text.then_some(raw_text),
            message: SPARSE_TEXT_MESSAGE,
        },
        AnalysisOutcome::Analyzed(mut analysis) => {
            let report = analysis.render_report(params.include_text);
            if !params.include_text {
                analysis.raw_text.clear();
            }
            AnalyzeResponse::Analyzed {
                analysis,
                report,
                disclaimer: LEGAL_DISCLAIMER,
            }
        }
    };
    Ok(Json(response))
}
