use axum::Json;
use axum::extract::State;
use serde_json::{Value, json};

use crate::AppState;

/// Liveness probe.
pub async fn root() -> Json<Value> {
    Json(json!({
        "message": "Product Copy Generator API",
        "status": "running"
    }))
}

/// Health check with credential verification. A missing token is reported
/// here but never prevents the process from serving.
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let configured = state.config.api_configured();
    Json(json!({
        "status": if configured { "healthy" } else { "error" },
        "api_configured": configured,
        "error": if configured {
            Value::Null
        } else {
            json!("Hugging Face API token not configured")
        },
    }))
}
