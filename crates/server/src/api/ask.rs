use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use vidhi_core::ModelChoice;
use vidhi_llm::LegalAnswer;

use super::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: String,
    #[serde(default)]
    pub model: ModelChoice,
}

/// POST /api/ask
pub async fn ask(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AskRequest>,
) -> Result<Json<LegalAnswer>, ApiError> {
    let answer = state.assistant.answer_question(&req.question, &req.model).await?;
    Ok(Json(answer))
}
