//! Health, model pick-list and example questions.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use vidhi_core::model::model_options;
use vidhi_core::ModelOption;
use vidhi_llm::EXAMPLE_QUESTIONS;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub profile: String,
    pub credential_configured: bool,
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        profile: state.config.profile_label().to_string(),
        credential_configured: state.assistant.is_configured(),
    })
}

#[derive(Serialize)]
pub struct ModelsResponse {
    pub models: Vec<ModelOption>,
}

pub async fn models(State(state): State<Arc<AppState>>) -> Json<ModelsResponse> {
    Json(ModelsResponse {
        models: model_options(state.assistant.llm_config()),
    })
}

#[derive(Serialize)]
pub struct ExamplesResponse {
    pub questions: &'static [&'static str],
}

pub async fn examples() -> Json<ExamplesResponse> {
    Json(ExamplesResponse {
        questions: EXAMPLE_QUESTIONS,
    })
}
