//! AQI Routes

use advice_rules::AqiCategory;
use axum::{extract::Query, Json};
use serde::{Deserialize, Serialize};

/// Query parameters for the AQI endpoint
#[derive(Debug, Deserialize)]
pub struct AqiQuery {
    pub value: f64,
}

/// AQI classification as shown on the dashboard
#[derive(Debug, Serialize)]
pub struct AqiSummary {
    pub value: f64,
    pub category: &'static str,
    pub health: &'static str,
    pub color: &'static str,
}

impl AqiSummary {
    pub fn from_value(value: f64) -> Self {
        let category = AqiCategory::from_aqi(value);
        Self {
            value,
            category: category.label(),
            health: category.health_statement(),
            color: category.color(),
        }
    }
}

/// Classify an AQI value
pub async fn get_aqi(Query(params): Query<AqiQuery>) -> Json<AqiSummary> {
    Json(AqiSummary::from_value(params.value))
}
