//! Advice Client
//!
//! Asks a generative language model for health advice and falls back to the
//! rule engine whenever the call fails.

mod advisor;
mod gemini;
mod prompt;

pub use advisor::{Advice, AdviceBackend, AdviceSource, Advisor};
pub use gemini::{GeminiClient, GeminiConfig};
pub use prompt::build_prompt;

use thiserror::Error;

/// Errors from the advice backend
#[derive(Debug, Error)]
pub enum AdviceError {
    #[error("Request timed out")]
    Timeout,
    #[error("HTTP error status {status}")]
    Http { status: u16 },
    #[error("Malformed response: {}", .detail.as_deref().unwrap_or("unexpected format"))]
    MalformedResponse { detail: Option<String> },
    #[error("Advice backend not configured")]
    NotConfigured,
    #[error("{0}")]
    Unknown(String),
}

impl AdviceError {
    /// User-facing line shown above fallback advice
    pub fn user_message(&self) -> String {
        match self {
            AdviceError::Timeout => "⏱️ API timeout - using fallback advice".to_string(),
            AdviceError::Http { status: 429 } => {
                "⚠️ Rate limit exceeded. Please try again in a moment.".to_string()
            }
            AdviceError::Http { status: 400 } => {
                "⚠️ Invalid API request. Please check your API key.".to_string()
            }
            AdviceError::Http { status } => format!("API Error: {}", status),
            AdviceError::MalformedResponse { detail: None } => {
                "⚠️ Unexpected API response format".to_string()
            }
            AdviceError::MalformedResponse {
                detail: Some(detail),
            } => format!("⚠️ Error parsing response: {}", detail),
            AdviceError::NotConfigured => {
                "⚠️ AI advisor is not configured - using fallback advice".to_string()
            }
            AdviceError::Unknown(msg) => {
                let truncated: String = msg.chars().take(100).collect();
                format!("⚠️ Error: {}", truncated)
            }
        }
    }

    /// Short label for metrics
    pub fn reason(&self) -> &'static str {
        match self {
            AdviceError::Timeout => "timeout",
            AdviceError::Http { .. } => "http",
            AdviceError::MalformedResponse { .. } => "malformed",
            AdviceError::NotConfigured => "not_configured",
            AdviceError::Unknown(_) => "unknown",
        }
    }
}

impl From<reqwest::Error> for AdviceError {
    fn from(err: reqwest::Error) -> Self {
        let err = err.without_url();
        if err.is_timeout() {
            AdviceError::Timeout
        } else if let Some(status) = err.status() {
            AdviceError::Http {
                status: status.as_u16(),
            }
        } else if err.is_decode() {
            AdviceError::MalformedResponse {
                detail: Some(err.to_string()),
            }
        } else {
            AdviceError::Unknown(err.to_string())
        }
    }
}
