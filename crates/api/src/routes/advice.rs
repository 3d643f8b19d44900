//! Advice Routes

use advice_client::AdviceSource;
use advice_rules::{AdviceReport, PollutionReading, WeatherReading};
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::aqi::AqiSummary;
use crate::SharedState;

/// Advice request body
#[derive(Debug, Deserialize)]
pub struct AdviceRequest {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub weather: WeatherReading,
    #[serde(default)]
    pub pollution: PollutionReading,
}

/// Response for the advice endpoint
#[derive(Debug, Serialize)]
pub struct AdviceResponse {
    pub advice: String,
    pub source: AdviceSource,
    pub error: Option<String>,
    pub aqi: AqiSummary,
}

/// Response for the rule-engine-only endpoint
#[derive(Debug, Serialize)]
pub struct FallbackResponse {
    pub advice: String,
    pub report: AdviceReport,
    pub aqi: AqiSummary,
}

/// Get advice from the model, falling back to the rule engine
pub async fn post_advice(
    State(state): State<SharedState>,
    Json(request): Json<AdviceRequest>,
) -> Json<AdviceResponse> {
    debug!("Advice requested: {:?}", request.question);

    let advice = state
        .advisor
        .advise(&request.question, &request.weather, &request.pollution)
        .await;

    Json(AdviceResponse {
        advice: advice.text,
        source: advice.source,
        error: advice.error,
        aqi: AqiSummary::from_value(request.pollution.aqi),
    })
}

/// Get rule-based advice only
pub async fn post_fallback(
    State(state): State<SharedState>,
    Json(request): Json<AdviceRequest>,
) -> Json<FallbackResponse> {
    let report = state.advisor.engine().assess(
        &request.question,
        &request.weather,
        &request.pollution,
        None,
    );

    Json(FallbackResponse {
        advice: report.render(),
        report,
        aqi: AqiSummary::from_value(request.pollution.aqi),
    })
}
