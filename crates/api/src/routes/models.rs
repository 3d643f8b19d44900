//! Model discovery route

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use tracing::warn;

use crate::SharedState;

/// Models that support `generateContent`
#[derive(Debug, Serialize)]
pub struct ModelsResponse {
    pub configured_model: String,
    pub models: Vec<String>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Probe the generative API for usable models
pub async fn get_models(
    State(state): State<SharedState>,
) -> Result<Json<ModelsResponse>, (StatusCode, Json<ErrorResponse>)> {
    let client = state.gemini.as_ref().ok_or_else(|| {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse {
                error: "AI advisor is not configured".to_string(),
            }),
        )
    })?;

    match client.list_models().await {
        Ok(models) => Ok(Json(ModelsResponse {
            configured_model: client.config().model.clone(),
            count: models.len(),
            models,
        })),
        Err(e) => {
            warn!("Model probe failed: {}", e);
            Err((
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            ))
        }
    }
}
