//! Weather Advisor API Server
//!
//! REST API serving health advice and AQI classification to the dashboard.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_governor::GovernorLayer;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

pub mod config;
pub mod rate_limit;
mod routes;

use advice_client::{AdviceError, Advisor, GeminiClient};
pub use crate::config::{AppConfig, ConfigError};
use crate::rate_limit::{create_governor_config, RateLimitConfig};

/// Application state shared across handlers
pub struct AppState {
    pub advisor: Advisor,
    /// Gemini client, kept for the model probe
    pub gemini: Option<Arc<GeminiClient>>,
    pub version: String,
    pub start_time: std::time::Instant,
    /// Prometheus handle, `None` when no recorder was installed
    pub metrics: Option<PrometheusHandle>,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    /// Build state from configuration
    pub fn new(config: &AppConfig) -> Self {
        match GeminiClient::new(config.gemini.clone()) {
            Ok(client) => {
                let client = Arc::new(client);
                let mut state = Self::with_advisor(Advisor::new(client.clone()));
                state.gemini = Some(client);
                state
            }
            Err(AdviceError::NotConfigured) => {
                warn!("GEMINI_API_KEY not set, serving rule-based advice only");
                Self::with_advisor(Advisor::fallback_only())
            }
            Err(e) => {
                warn!("Gemini client unavailable ({}), serving rule-based advice only", e);
                Self::with_advisor(Advisor::fallback_only())
            }
        }
    }

    /// Build state around an existing advisor
    pub fn with_advisor(advisor: Advisor) -> Self {
        Self {
            advisor,
            gemini: None,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: std::time::Instant::now(),
            metrics: None,
        }
    }
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: u64,
    pub version: String,
    pub uptime_seconds: u64,
    pub components: ComponentStatus,
}

/// Component status
#[derive(Debug, Serialize)]
pub struct ComponentStatus {
    pub advisor: ComponentHealth,
    pub fallback: ComponentHealth,
}

/// Individual component health
#[derive(Debug, Serialize)]
pub struct ComponentHealth {
    pub status: String,
    pub detail: Option<String>,
}

/// Create the application router
///
/// Advice routes are rate limited when `rate_limit` is given.
pub fn create_router(state: SharedState, rate_limit: Option<&RateLimitConfig>) -> Router {
    let mut advice_routes: Router<SharedState> = Router::new()
        .route("/api/v1/advice", post(routes::advice::post_advice))
        .route("/api/v1/advice/fallback", post(routes::advice::post_fallback))
        .route("/api/v1/models", get(routes::models::get_models));

    if let Some(governor) = rate_limit.and_then(create_governor_config) {
        advice_routes = advice_routes.layer(GovernorLayer { config: governor });
    }

    Router::new()
        .route("/api/v1/health", get(health_handler))
        .route("/api/v1/aqi", get(routes::aqi::get_aqi))
        .route("/metrics", get(metrics_handler))
        .merge(advice_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check handler
async fn health_handler(State(state): State<SharedState>) -> impl IntoResponse {
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    let advisor = match &state.gemini {
        Some(client) => ComponentHealth {
            status: "ok".to_string(),
            detail: Some(client.config().model.clone()),
        },
        None => ComponentHealth {
            status: "disabled".to_string(),
            detail: Some("rule-based advice only".to_string()),
        },
    };

    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp,
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        components: ComponentStatus {
            advisor,
            fallback: ComponentHealth {
                status: "ok".to_string(),
                detail: None,
            },
        },
    })
}

/// Prometheus exposition
async fn metrics_handler(State(state): State<SharedState>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (StatusCode::NOT_FOUND, "metrics recorder not installed".to_string()),
    }
}

/// Initialize logging
pub fn init_logging(level: Level) -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
}

/// Run the server
pub async fn run_server(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = config.server.socket_addr()?;

    let mut state = AppState::new(&config);
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => state.metrics = Some(handle),
        Err(e) => warn!("Metrics recorder not installed: {}", e),
    }

    let app = create_router(Arc::new(state), Some(&config.server.rate_limit));

    info!("Starting API server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
