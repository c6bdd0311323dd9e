use axum::{Json, extract::State};
use serde::Serialize;

use crate::AppState;
use crate::session::{
    self, GenerateRequest, ImproveRequest, SeoRequest, SessionOutcome, TranslateRequest,
};

/// In-band response contract shared with the front-end: always HTTP 200,
/// success and error taxonomy encoded in the body.
#[derive(Debug, Serialize)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<SessionOutcome> for ApiResponse {
    fn from(outcome: SessionOutcome) -> Self {
        match outcome {
            SessionOutcome::Success { text } => Self {
                success: true,
                data: Some(text),
                error: None,
            },
            // A partially failed variant batch keeps its inline aggregate
            // in `data` alongside the error.
            SessionOutcome::Failure { error, partial } => Self {
                success: false,
                data: partial,
                error: Some(error.to_string()),
            },
        }
    }
}

pub async fn generate(
    State(state): State<AppState>,
    Json(body): Json<GenerateRequest>,
) -> Json<ApiResponse> {
    let outcome = session::run_generate(&state.llm_client, &state.history, &body).await;
    Json(outcome.into())
}

pub async fn improve(
    State(state): State<AppState>,
    Json(body): Json<ImproveRequest>,
) -> Json<ApiResponse> {
    let outcome = session::run_improve(&state.llm_client, &state.history, &body).await;
    Json(outcome.into())
}

pub async fn seo(State(state): State<AppState>, Json(body): Json<SeoRequest>) -> Json<ApiResponse> {
    let outcome = session::run_seo(&state.llm_client, &body).await;
    Json(outcome.into())
}

pub async fn translate(
    State(state): State<AppState>,
    Json(body): Json<TranslateRequest>,
) -> Json<ApiResponse> {
    let outcome = session::run_translate(&state.llm_client, &body).await;
    Json(outcome.into())
}
