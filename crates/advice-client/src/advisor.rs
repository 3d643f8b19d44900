//! Advice orchestration
//!
//! Tries the generative backend first. Every failure, including a missing
//! backend or a blank answer, ends in rule-based advice with a short error
//! line on top. The advisor never returns an error.

use std::sync::Arc;

use advice_rules::{FallbackEngine, PollutionReading, WeatherReading};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::prompt::build_prompt;
use crate::AdviceError;

/// Text generation backend
#[async_trait]
pub trait AdviceBackend: Send + Sync {
    /// Backend name for logs
    fn name(&self) -> &str;

    /// Generate advice text for a prompt
    async fn generate(&self, prompt: &str) -> Result<String, AdviceError>;
}

/// Where the advice text came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdviceSource {
    Model,
    Fallback,
}

impl AdviceSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdviceSource::Model => "model",
            AdviceSource::Fallback => "fallback",
        }
    }
}

/// Result of an advice request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Advice {
    pub text: String,
    pub source: AdviceSource,
    /// Error line shown to the user when the fallback was used
    pub error: Option<String>,
}

/// Advice orchestrator
#[derive(Clone)]
pub struct Advisor {
    backend: Option<Arc<dyn AdviceBackend>>,
    engine: FallbackEngine,
}

impl Advisor {
    /// Create an advisor backed by a generative model
    pub fn new(backend: Arc<dyn AdviceBackend>) -> Self {
        info!("Creating advisor with backend: {}", backend.name());
        Self {
            backend: Some(backend),
            engine: FallbackEngine::new(),
        }
    }

    /// Create an advisor that only uses the rule engine
    pub fn fallback_only() -> Self {
        info!("Creating advisor without a generative backend");
        Self {
            backend: None,
            engine: FallbackEngine::new(),
        }
    }

    pub fn has_backend(&self) -> bool {
        self.backend.is_some()
    }

    pub fn engine(&self) -> &FallbackEngine {
        &self.engine
    }

    /// Get advice with its provenance
    pub async fn advise(
        &self,
        question: &str,
        weather: &WeatherReading,
        pollution: &PollutionReading,
    ) -> Advice {
        match self.ask_backend(question, weather, pollution).await {
            Ok(text) => {
                metrics::counter!("advice_requests_total", "source" => AdviceSource::Model.as_str())
                    .increment(1);
                Advice {
                    text,
                    source: AdviceSource::Model,
                    error: None,
                }
            }
            Err(err) => {
                warn!("Advice backend failed, using fallback: {}", err);
                metrics::counter!("advice_requests_total", "source" => AdviceSource::Fallback.as_str())
                    .increment(1);
                metrics::counter!("advice_fallbacks_total", "reason" => err.reason()).increment(1);

                let error_msg = err.user_message();
                let text = self
                    .engine
                    .generate(question, weather, pollution, Some(&error_msg));
                Advice {
                    text,
                    source: AdviceSource::Fallback,
                    error: Some(error_msg),
                }
            }
        }
    }

    /// Get advice text, never empty
    pub async fn get_advice(
        &self,
        question: &str,
        weather: &WeatherReading,
        pollution: &PollutionReading,
    ) -> String {
        self.advise(question, weather, pollution).await.text
    }

    async fn ask_backend(
        &self,
        question: &str,
        weather: &WeatherReading,
        pollution: &PollutionReading,
    ) -> Result<String, AdviceError> {
        let backend = self.backend.as_ref().ok_or(AdviceError::NotConfigured)?;

        let prompt = build_prompt(question, weather, pollution);
        debug!("Sending {} byte prompt to {}", prompt.len(), backend.name());

        let text = backend.generate(&prompt).await?;
        if text.trim().is_empty() {
            return Err(AdviceError::MalformedResponse { detail: None });
        }
        Ok(text)
    }
}

impl Default for Advisor {
    fn default() -> Self {
        Self::fallback_only()
    }
}
